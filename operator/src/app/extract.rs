//! Spec extraction decodes the loosely typed TodoApp spec documents into
//! typed per-component parameters.
//!
//! The decode happens once at this boundary; downstream code only ever sees
//! [`ComponentSpec`] and [`ComponentConfig`], never raw JSON.

use serde_json::Value;

use crate::app::{workload::Role, TodoAppSpec};

/// Replica count used when the spec does not declare a usable one.
pub const DEFAULT_REPLICAS: i32 = 2;

/// A single field decoded from a component document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<T> {
    /// The key is not present in the document.
    Absent,
    /// The key is present but holds the wrong JSON type.
    Invalid,
    /// The key holds a usable value.
    Value(T),
}

impl<T> FieldValue<T> {
    /// Return the decoded value, falling back to the given default.
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            FieldValue::Value(value) => value,
            FieldValue::Absent | FieldValue::Invalid => default,
        }
    }

    /// True unless the field holds a usable value.
    pub fn is_missing(&self) -> bool {
        !matches!(self, FieldValue::Value(_))
    }
}

/// Parameters decoded from one role's component document, before defaults.
///
/// Keeping the per-field decode results around lets the caller report
/// missing or malformed fields before applying defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpec {
    /// Container image reference, passed through verbatim when present.
    pub image: FieldValue<String>,
    /// Desired replica count, truncated to an integer when numeric.
    pub replicas: FieldValue<i32>,
}

impl ComponentSpec {
    /// Apply defaults producing the parameters used for reconciliation.
    ///
    /// A missing or non-string image becomes the empty string and surfaces
    /// as a cluster-side failure downstream. A missing or non-numeric
    /// replica count becomes [`DEFAULT_REPLICAS`]. Negative or zero replica
    /// counts pass through unclamped.
    pub fn into_config(self) -> ComponentConfig {
        ComponentConfig {
            image: self.image.unwrap_or(String::new()),
            replicas: self.replicas.unwrap_or(DEFAULT_REPLICAS),
        }
    }
}

/// Validated parameters for one component after defaulting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentConfig {
    /// Container image reference. May be empty, see [`ComponentSpec::into_config`].
    pub image: String,
    /// Desired replica count.
    pub replicas: i32,
}

/// Extract the component spec for the given role from an application spec.
///
/// Returns None when the role key is missing or is not an object. An absent
/// component is skipped by the caller, it is not an error.
pub fn component_spec(spec: &TodoAppSpec, role: Role) -> Option<ComponentSpec> {
    let doc = match role {
        Role::Backend => spec.backend.as_ref(),
        Role::Frontend => spec.frontend.as_ref(),
    }?;
    let doc = doc.as_object()?;
    Some(ComponentSpec {
        image: decode_image(doc.get("image")),
        replicas: decode_replicas(doc.get("replicas")),
    })
}

fn decode_image(value: Option<&Value>) -> FieldValue<String> {
    match value {
        None => FieldValue::Absent,
        Some(Value::String(image)) => FieldValue::Value(image.clone()),
        Some(_) => FieldValue::Invalid,
    }
}

fn decode_replicas(value: Option<&Value>) -> FieldValue<i32> {
    match value {
        None => FieldValue::Absent,
        // Truncate toward zero, any JSON number is accepted.
        Some(Value::Number(n)) => match n.as_f64() {
            Some(replicas) => FieldValue::Value(replicas as i32),
            None => FieldValue::Invalid,
        },
        Some(_) => FieldValue::Invalid,
    }
}
