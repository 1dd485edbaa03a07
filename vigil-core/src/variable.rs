//! The variable-behavior boundary between the engine and the replay driver.
//!
//! The engine never reads trace events itself: it asks the variable bound to
//! a constraint to compare, extract, and format values in the context of the
//! (event, instance) pair currently being replayed. Those context tokens are
//! opaque here and are passed through untouched.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;

use crate::errors::VariableError;

/// Opaque replay context forwarded to variable implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EvalContext {
    /// Token identifying the event being replayed.
    pub event: u64,
    /// Token identifying the state-machine instance under evaluation.
    pub instance: u64,
}

impl EvalContext {
    pub fn new(event: u64, instance: u64) -> Self {
        Self { event, instance }
    }
}

/// Declared kind of a state-machine variable, addressed by the namespace
/// prefix of its name (`"kind/subpath"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    /// Discrete event counter (preemptions, syscalls). Takes the ±1
    /// boundary adjustment during inference.
    Counter,
    /// Continuous duration (cpu time).
    Timer,
    /// Deadline relative to the instance start.
    Deadline,
}

impl VariableKind {
    /// Resolve the kind from a variable name's namespace prefix.
    pub fn from_variable_name(name: &str) -> Option<Self> {
        let prefix = name.split('/').next().unwrap_or(name);
        match prefix {
            "preempt" | "syscalls" => Some(Self::Counter),
            "cputime" => Some(Self::Timer),
            "deadline" => Some(Self::Deadline),
            _ => None,
        }
    }

    /// Discrete kinds hold integral values.
    pub fn is_discrete(&self) -> bool {
        matches!(self, Self::Counter)
    }
}

/// Behavior contract for one named variable (external collaborator).
///
/// `format` is the constraint's configured value string; implementations may
/// use it to pick a resolution or display scale.
pub trait StateVariable {
    /// Three-way compare the variable's current value against `value` in the
    /// given replay context.
    fn compare_to(&self, value: &str, ctx: &EvalContext) -> Result<Ordering, VariableError>;

    /// Extract a plain numeric value for this variable, when the event
    /// carries one. `None` when the observation is not numeric.
    fn numeric_value(&self, format: &str, ctx: &EvalContext) -> Option<f64>;

    /// Human-readable rendering of the variable's current value.
    fn formatted_value(&self, format: &str, ctx: &EvalContext) -> String;

    /// Current raw value in the replay context.
    fn value(&self, ctx: &EvalContext) -> Result<String, VariableError>;

    /// Pre-trace baseline value, if one was declared.
    fn initial_value(&self) -> Option<String>;

    /// Declared kind of this variable.
    fn kind(&self) -> VariableKind;
}

/// Variable lookup table handed to `verify` by the replay driver.
pub type VariableMap = FxHashMap<String, Box<dyn StateVariable>>;
