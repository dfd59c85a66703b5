//! Helper methods only available for tests

use std::sync::Arc;

use anyhow::Result;
use expect_test::Expect;
use hyper::{body::to_bytes, Body};
use kube::{error::ErrorResponse, Client};
use serde::Serialize;

use crate::app::TodoApp;
use crate::utils::Context;

// We wrap tower_test::mock::Handle
type ApiServerHandle = tower_test::mock::Handle<http::Request<Body>, http::Response<Body>>;

/// Drives the mock api server, asserting each request the controller makes
/// in sequence.
pub struct ApiServerVerifier(ApiServerHandle);

// Add test specific implementation to the Context
impl Context {
    /// Create a test context with a mocked kube client
    pub fn test() -> (Arc<Self>, ApiServerVerifier) {
        let (mock_service, handle) =
            tower_test::mock::pair::<http::Request<Body>, http::Response<Body>>();
        let mock_k_client = Client::new(mock_service, "default");
        let cx = Self {
            k_client: mock_k_client,
        };
        (Arc::new(cx), ApiServerVerifier(handle))
    }
}

/// Await the verifier task, failing the test if the controller did not make
/// all expected api calls within a second.
pub async fn timeout_after_1s(handle: tokio::task::JoinHandle<()>) {
    tokio::time::timeout(std::time::Duration::from_secs(1), handle)
        .await
        .expect("timeout on mock apiserver")
        .expect("stub succeeded")
}

impl ApiServerVerifier {
    /// Handle a list request, responding with the given TodoApp items.
    pub async fn handle_list(&mut self, expected: Expect, items: &[TodoApp]) -> Result<()> {
        let (_request, send) = self.next(expected).await?;
        let list = serde_json::json!({
            "apiVersion": "todoapp.github.com/v1alpha1",
            "kind": "TodoAppList",
            "metadata": {},
            "items": items,
        });
        send.send_response(
            http::Response::builder()
                .body(Body::from(serde_json::to_vec(&list)?))
                .unwrap(),
        );
        Ok(())
    }

    /// Handle a get request, responding with the given object when present
    /// or a NotFound error otherwise.
    pub async fn handle_get<T>(&mut self, expected: Expect, response: Option<&T>) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let (_request, send) = self.next(expected).await?;
        let response = if let Some(response) = response {
            http::Response::builder()
                .body(Body::from(serde_json::to_vec(response)?))
                .unwrap()
        } else {
            error_response(404, "NotFound")?
        };
        send.send_response(response);
        Ok(())
    }

    /// Handle a create or replace request, echoing the submitted body back.
    pub async fn handle_apply(&mut self, expected: Expect) -> Result<()> {
        let (request, send) = self.next(expected).await?;
        send.send_response(
            http::Response::builder()
                .body(Body::from(request.body))
                .unwrap(),
        );
        Ok(())
    }

    /// Handle any request with an api error of the given code and reason.
    pub async fn handle_error(&mut self, expected: Expect, code: u16, reason: &str) -> Result<()> {
        let (_request, send) = self.next(expected).await?;
        send.send_response(error_response(code, reason)?);
        Ok(())
    }

    async fn next(
        &mut self,
        expected: Expect,
    ) -> Result<(
        Request,
        tower_test::mock::SendResponse<http::Response<Body>>,
    )> {
        let (request, send) = self.0.next_request().await.expect("service not called");
        let request = Request::from_request(request).await?;
        expected.assert_eq(&request.render());
        Ok((request, send))
    }
}

fn error_response(code: u16, reason: &str) -> Result<http::Response<Body>> {
    let error = ErrorResponse {
        status: "Failure".to_owned(),
        message: format!("{reason} from stub"),
        reason: reason.to_owned(),
        code,
    };
    Ok(http::Response::builder()
        .status(code)
        .body(Body::from(serde_json::to_vec(&error)?))
        .unwrap())
}

// Helper struct to assert the contents of a mock Request.
struct Request {
    method: String,
    uri: String,
    body: String,
}

impl Request {
    async fn from_request(request: http::Request<Body>) -> Result<Self> {
        let method = request.method().to_string();
        // Default query params leave a dangling '?', drop it for stable
        // expectations.
        let uri = request.uri().to_string().trim_end_matches('?').to_owned();
        let body_bytes = to_bytes(request.into_body()).await?;
        let body = if body_bytes.is_empty() {
            String::new()
        } else {
            let json: serde_json::Value =
                serde_json::from_slice(&body_bytes).expect("body should be JSON");
            serde_json::to_string_pretty(&json)?
        };
        Ok(Self { method, uri, body })
    }

    // Render the request as a single string for expect![[]] assertions.
    // Parsing the body through serde_json sorts object keys, so the
    // rendering is deterministic.
    fn render(&self) -> String {
        if self.body.is_empty() {
            format!("{} {}", self.method, self.uri)
        } else {
            format!("{} {}\n{}", self.method, self.uri, self.body)
        }
    }
}
