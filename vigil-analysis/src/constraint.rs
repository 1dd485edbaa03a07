//! Base constraint evaluator.
//!
//! A constraint binds a named variable to a value through an operator. The
//! bound value is either a literal or the name of a sibling variable
//! resolved at evaluation time. Evaluation never fails: anything the
//! resolver cannot answer degrades to `Uncertain`.

use std::fmt;

use serde::{Deserialize, Serialize};

use vigil_core::operator::{Direction, Operator};
use vigil_core::status::Status;
use vigil_core::variable::{EvalContext, VariableKind, VariableMap};

/// How the bound value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    /// The value is a literal.
    Constant,
    /// The value names another variable, resolved dynamically.
    Variable,
}

/// A constraint binding a named variable to a value through an operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    var_name: String,
    operator: Operator,
    value_type: ValueType,
    value: String,
}

impl Constraint {
    pub fn new(
        var_name: impl Into<String>,
        operator: Operator,
        value_type: ValueType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            var_name: var_name.into(),
            operator,
            value_type,
            value: value.into(),
        }
    }

    pub fn var_name(&self) -> &str {
        &self.var_name
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Replace the operator (model editing).
    pub fn set_operator(&mut self, operator: Operator) {
        self.operator = operator;
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the bound value (model editing).
    pub fn set_value(&mut self, value_type: ValueType, value: impl Into<String>) {
        self.value_type = value_type;
        self.value = value.into();
    }

    /// Direction of the declared operator.
    pub fn direction(&self) -> Option<Direction> {
        self.operator.direction()
    }

    /// Kind addressed by the variable name's namespace prefix.
    pub fn kind(&self) -> Option<VariableKind> {
        VariableKind::from_variable_name(&self.var_name)
    }

    /// Base constraints are always usable.
    pub fn can_be_used(&self) -> bool {
        true
    }

    /// Evaluate the constraint for one (event, instance) pair.
    ///
    /// Missing variables, unresolvable sibling references, and comparison
    /// failures all classify as `Uncertain`; they are the error signal at
    /// this boundary.
    pub fn verify(&self, variables: &VariableMap, ctx: &EvalContext) -> Status {
        let Some(variable) = variables.get(&self.var_name) else {
            return Status::uncertain();
        };

        let mut bound_value = self.value.clone();
        let mut initial_value = None;
        if self.value_type == ValueType::Variable {
            let Some(sibling) = variables.get(&self.value) else {
                return Status::uncertain();
            };
            match sibling.value(ctx) {
                Ok(resolved) => {
                    initial_value = sibling.initial_value();
                    bound_value = resolved;
                }
                Err(_) => return Status::uncertain(),
            }
        }

        match variable.compare_to(&bound_value, ctx) {
            Ok(comparison) => {
                let actual_left = variable.formatted_value(&bound_value, ctx);
                // TODO: carry the resolved right value for variable-typed
                // bounds once reporting renders it.
                if self.operator.satisfied(comparison) {
                    Status::valid(Some(actual_left), None, initial_value)
                } else {
                    Status::invalid(Some(actual_left), None, initial_value)
                }
            }
            Err(_) => Status::uncertain(),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.var_name, self.operator)?;
        if self.value_type == ValueType::Variable {
            write!(f, "(VARIABLE)")?;
        }
        f.write_str(&self.value)
    }
}
