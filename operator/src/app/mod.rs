//! TodoApp is a k8s custom resource that declares a deployable application.

// Export all spec types
mod spec;
pub use spec::*;

// All other mods are behind the controller flag to keep the deps to a minimum
#[cfg(feature = "controller")]
pub(crate) mod controller;
#[cfg(feature = "controller")]
pub(crate) mod extract;
#[cfg(feature = "controller")]
pub(crate) mod workload;

#[cfg(test)]
#[cfg(feature = "controller")]
pub mod stub;

#[cfg(feature = "controller")]
pub use controller::{run, CYCLE_INTERVAL, NAMESPACE};
