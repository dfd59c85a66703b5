//! Utils is shared functions and constants for the controller
use std::time::Duration;

use async_trait::async_trait;
use k8s_openapi::api::{
    apps::v1::{Deployment, DeploymentSpec},
    core::v1::{Service, ServiceSpec},
};
use kube::{api::PostParams, client::Client, core::ObjectMeta, Api};

use crate::labels::managed_labels;

/// Operator Context
pub struct Context {
    /// Kube client
    pub k_client: Client,
}

impl Context {
    /// Create new context
    pub fn new(k_client: Client) -> Self {
        Context { k_client }
    }
}

/// Pauses execution between convergence cycles.
///
/// Abstracted from the tokio timer so tests can drive cycles without real
/// delays.
#[async_trait]
pub trait Sleep {
    /// Pause for the given duration.
    async fn sleep(&self, duration: Duration);
}

/// Sleep using the tokio timer.
pub struct TokioSleep;

#[async_trait]
impl Sleep for TokioSleep {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Outcome of a create-or-update call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    /// The object did not exist and was created.
    Created,
    /// The object existed and was replaced with the desired state.
    Updated,
}

/// Ensure a Deployment with the given name exists with exactly the given
/// spec.
///
/// The object is fetched by name, created when not found, and otherwise
/// submitted again as a full replace. No resource version is carried over,
/// so fields set by other writers are overwritten.
pub async fn create_or_update_deployment(
    cx: &Context,
    ns: &str,
    name: &str,
    spec: DeploymentSpec,
) -> Result<Convergence, kube::error::Error> {
    let deployments: Api<Deployment> = Api::namespaced(cx.k_client.clone(), ns);

    let deployment = Deployment {
        metadata: ObjectMeta {
            name: Some(name.to_owned()),
            labels: managed_labels(),
            ..ObjectMeta::default()
        },
        spec: Some(spec),
        ..Default::default()
    };
    match deployments.get(name).await {
        Ok(_) => {
            deployments
                .replace(name, &PostParams::default(), &deployment)
                .await?;
            Ok(Convergence::Updated)
        }
        Err(kube::Error::Api(err)) if err.reason == "NotFound" => {
            deployments
                .create(&PostParams::default(), &deployment)
                .await?;
            Ok(Convergence::Created)
        }
        Err(e) => Err(e),
    }
}

/// Ensure a Service with the given name exists with exactly the given spec.
///
/// Same create-or-update semantics as [`create_or_update_deployment`].
pub async fn create_or_update_service(
    cx: &Context,
    ns: &str,
    name: &str,
    spec: ServiceSpec,
) -> Result<Convergence, kube::error::Error> {
    let services: Api<Service> = Api::namespaced(cx.k_client.clone(), ns);

    let service = Service {
        metadata: ObjectMeta {
            name: Some(name.to_owned()),
            labels: managed_labels(),
            ..ObjectMeta::default()
        },
        spec: Some(spec),
        ..Default::default()
    };
    match services.get(name).await {
        Ok(_) => {
            services
                .replace(name, &PostParams::default(), &service)
                .await?;
            Ok(Convergence::Updated)
        }
        Err(kube::Error::Api(err)) if err.reason == "NotFound" => {
            services.create(&PostParams::default(), &service).await?;
            Ok(Convergence::Created)
        }
        Err(e) => Err(e),
    }
}
