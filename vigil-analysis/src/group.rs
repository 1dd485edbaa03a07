//! Per-pass constraint grouping and batch revalidation.
//!
//! A group owns every constraint attached to one state-machine model and
//! drives them through a replay pass: `verify_all` evaluates each member
//! against the current event, and `finish_pass` revalidates the adaptive
//! members once the replay completes. Adaptive members register with the
//! group the first time they collect an observation; registration is the
//! moment the group's all-instances-valid hint is applied.

use rustc_hash::FxHashSet;

use vigil_core::status::{Classification, Status};
use vigil_core::variable::{EvalContext, VariableMap};

use crate::adaptive::AdaptiveConstraint;
use crate::constraint::Constraint;

/// A group member: either a fully specified constraint or an adaptive one.
#[derive(Debug, Clone)]
pub enum ConstraintKind {
    Fixed(Constraint),
    Adaptive(AdaptiveConstraint),
}

impl ConstraintKind {
    pub fn var_name(&self) -> &str {
        match self {
            ConstraintKind::Fixed(c) => c.var_name(),
            ConstraintKind::Adaptive(c) => c.var_name(),
        }
    }

    /// Whether downstream consumers may rely on this member yet.
    pub fn can_be_used(&mut self) -> bool {
        match self {
            ConstraintKind::Fixed(c) => c.can_be_used(),
            ConstraintKind::Adaptive(c) => c.can_be_used(),
        }
    }
}

/// All constraints of one model instance, replayed together.
#[derive(Debug, Default)]
pub struct ConstraintGroup {
    members: Vec<ConstraintKind>,
    collecting: FxHashSet<usize>,
    all_instances_valid: bool,
}

impl ConstraintGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// A group whose replayed instances are all known-correct examples.
    /// The hint reaches each adaptive member when it starts collecting.
    pub fn with_all_instances_valid() -> Self {
        Self {
            all_instances_valid: true,
            ..Self::default()
        }
    }

    /// Add a member, returning its index within the group.
    pub fn push(&mut self, member: ConstraintKind) -> usize {
        self.members.push(member);
        self.members.len() - 1
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[ConstraintKind] {
        &self.members
    }

    pub fn member(&self, index: usize) -> Option<&ConstraintKind> {
        self.members.get(index)
    }

    pub fn member_mut(&mut self, index: usize) -> Option<&mut ConstraintKind> {
        self.members.get_mut(index)
    }

    /// Evaluate every member against one (event, instance) context. The
    /// returned statuses parallel the member indices.
    pub fn verify_all(&mut self, variables: &VariableMap, ctx: &EvalContext) -> Vec<Status> {
        let mut statuses = Vec::with_capacity(self.members.len());
        for index in 0..self.members.len() {
            statuses.push(self.verify(index, variables, ctx));
        }
        statuses
    }

    /// Evaluate one member. Out-of-range indices classify as `Uncertain`,
    /// consistent with every other unanswerable evaluation.
    pub fn verify(&mut self, index: usize, variables: &VariableMap, ctx: &EvalContext) -> Status {
        let Some(member) = self.members.get_mut(index) else {
            return Status::uncertain();
        };
        match member {
            ConstraintKind::Fixed(c) => c.verify(variables, ctx),
            ConstraintKind::Adaptive(c) => {
                let status = c.verify(variables, ctx);
                if status.classification == Classification::Adaptive
                    && self.collecting.insert(index)
                {
                    tracing::debug!(
                        constraint = %c.declared(),
                        all_instances_valid = self.all_instances_valid,
                        "adaptive constraint started collecting"
                    );
                    c.set_all_instances_valid(self.all_instances_valid);
                }
                status
            }
        }
    }

    /// Indices of adaptive members that collected at least one observation
    /// during the current pass.
    pub fn collecting(&self) -> impl Iterator<Item = usize> + '_ {
        self.collecting.iter().copied()
    }

    /// Close the replay pass: infer and revalidate every adaptive member
    /// that collected observations.
    pub fn finish_pass(&mut self) {
        for &index in &self.collecting {
            if let Some(ConstraintKind::Adaptive(c)) = self.members.get_mut(index) {
                c.revalidate();
            }
        }
    }

    /// Statuses recorded by an adaptive member during the current pass.
    /// Fixed members keep no history; their statuses are `None`.
    pub fn statuses(&self, index: usize) -> Option<&[Status]> {
        match self.members.get(index)? {
            ConstraintKind::Adaptive(c) => Some(c.statuses()),
            ConstraintKind::Fixed(_) => None,
        }
    }

    /// Whether every member has resolved enough to be relied on.
    pub fn can_be_used(&mut self) -> bool {
        self.members.iter_mut().all(ConstraintKind::can_be_used)
    }
}
