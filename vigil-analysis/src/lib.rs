//! # vigil-analysis
//!
//! Adaptive constraint inference engine for the Vigil state-machine
//! validation tool. Contains the gap-clustering primitive, the observation
//! multiset, the base and adaptive constraint evaluators, and the per-pass
//! revalidation group.

pub mod adaptive;
pub mod clustering;
pub mod constraint;
pub mod group;
pub mod observations;

pub use adaptive::AdaptiveConstraint;
pub use constraint::{Constraint, ValueType};
pub use group::{ConstraintGroup, ConstraintKind};
pub use observations::ObservationSet;
