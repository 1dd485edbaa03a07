//! Comparison operators and their directional semantics.
//!
//! Operators classify the sign of a three-way comparison between a variable
//! and its bound value. `Adaptive` is a placeholder: it is never satisfied
//! directly and must be resolved to a concrete operator by the inference
//! engine before a constraint can validate anything.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which side of the bound value a constraint pins the variable to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// The variable must sit above the value (`>` / `>=`).
    VariableOverValue,
    /// The variable must sit below the value (`<` / `<=`).
    VariableUnderValue,
    /// The variable must match the value (`==` / `!=`).
    VariableEqualValue,
}

/// A comparison operator binding a variable to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// `==`
    Eq,
    /// `!=`
    Neq,
    /// `<=`
    Leq,
    /// `<`
    Lt,
    /// `>=`
    Geq,
    /// `>`
    Gt,
    /// `??` — to be inferred from observations.
    Adaptive,
}

impl Operator {
    /// Textual symbol used in model files.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::Leq => "<=",
            Self::Lt => "<",
            Self::Geq => ">=",
            Self::Gt => ">",
            Self::Adaptive => "??",
        }
    }

    /// Whether the operator holds for the given three-way comparison of the
    /// variable (left) against the bound value (right).
    ///
    /// `Adaptive` is never satisfied: callers must resolve it first.
    pub fn satisfied(&self, comparison: Ordering) -> bool {
        match self {
            Self::Eq => comparison == Ordering::Equal,
            Self::Neq => comparison != Ordering::Equal,
            Self::Leq => comparison != Ordering::Greater,
            Self::Lt => comparison == Ordering::Less,
            Self::Geq => comparison != Ordering::Less,
            Self::Gt => comparison == Ordering::Greater,
            Self::Adaptive => false,
        }
    }

    /// The direction this operator pins the variable to. `None` for `Adaptive`.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::Geq | Self::Gt => Some(Direction::VariableOverValue),
            Self::Leq | Self::Lt => Some(Direction::VariableUnderValue),
            Self::Eq | Self::Neq => Some(Direction::VariableEqualValue),
            Self::Adaptive => None,
        }
    }

    /// Whether the operator accepts equality at the boundary.
    pub fn has_equality(&self) -> bool {
        matches!(self, Self::Eq | Self::Geq | Self::Leq)
    }

    /// Whether this is the unresolved placeholder.
    pub fn is_adaptive(&self) -> bool {
        matches!(self, Self::Adaptive)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Error returned when parsing an operator from an unknown symbol.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized operator symbol: {0}")]
pub struct ParseOperatorError(pub String);

impl FromStr for Operator {
    type Err = ParseOperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(Self::Eq),
            "!=" => Ok(Self::Neq),
            "<=" => Ok(Self::Leq),
            "<" => Ok(Self::Lt),
            ">=" => Ok(Self::Geq),
            ">" => Ok(Self::Gt),
            "??" => Ok(Self::Adaptive),
            other => Err(ParseOperatorError(other.to_string())),
        }
    }
}
