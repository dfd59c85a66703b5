//! Provides API for the operator and related tooling.
#![warn(missing_docs)]

/// App module for managing TodoApp resources.
pub mod app;
/// Labels module for managing resource labels.
#[cfg(feature = "controller")]
pub(crate) mod labels;
/// Telemetry module for log collection.
#[cfg(feature = "controller")]
pub mod telemetry;
/// Utils module for shared utility functions.
#[cfg(feature = "controller")]
pub mod utils;
