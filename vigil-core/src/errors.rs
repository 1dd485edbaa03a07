//! Error taxonomy.
//!
//! Variable errors never cross the `verify` boundary: evaluators recover
//! them locally as `Classification::Uncertain`, which preserves forward
//! progress through the replay. Nothing in the engine panics or aborts.

/// Failure to resolve a variable's value or comparison in the current
/// replay context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VariableError {
    #[error("unknown variable: {name}")]
    UnknownVariable { name: String },

    #[error("no value available for variable {name} in the current context")]
    ValueUnavailable { name: String },

    #[error("cannot compare variable {name}: {reason}")]
    Comparison { name: String, reason: String },
}
