//! # vigil-core
//!
//! Foundation crate for the Vigil state-machine validation engine.
//! Defines the operator model, status records, value parsing, the
//! variable-behavior boundary, errors, config, and telemetry.
//! The analysis crate depends on this.

pub mod config;
pub mod errors;
pub mod operator;
pub mod status;
pub mod telemetry;
pub mod value;
pub mod variable;

// Re-export the most commonly used types at the crate root.
pub use config::InferenceConfig;
pub use errors::VariableError;
pub use operator::{Direction, Operator};
pub use status::{Classification, Status};
pub use variable::{EvalContext, StateVariable, VariableKind, VariableMap};
