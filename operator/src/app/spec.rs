//! Place all spec types into a single module so they can be used as a lightweight dependency
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Primary CRD declaring the desired state of a todo application.
///
/// The backend and frontend documents are deliberately loose. Structural
/// validation is the job of the CRD schema on the cluster side; the spec
/// extractor decodes the documents into typed component parameters once per
/// cycle and applies defaults for anything missing or malformed.
#[derive(CustomResource, Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "todoapp.github.com",
    version = "v1alpha1",
    kind = "TodoApp",
    plural = "todoapps",
    derive = "PartialEq",
    namespaced
)]
pub struct TodoAppSpec {
    /// Desired state document for the backend component.
    /// Expected to hold an `image` string and an optional `replicas` number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<serde_json::Value>,
    /// Desired state document for the frontend component.
    /// Expected to hold an `image` string and an optional `replicas` number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontend: Option<serde_json::Value>,
}
