//! Adaptive constraint inference.
//!
//! An adaptive constraint is declared with the `??` operator or a `?value`
//! bound and discovers, from the population observed while replaying a
//! trace, which operator and threshold best characterize it. Inference is
//! lazy and memoized: the memo pair is cleared whenever a new observation
//! arrives or the all-instances-valid mode flips, and recomputed on the
//! next access.
//!
//! Policy outline (non-all-valid mode):
//! 1. A configured literal target adapts the operator around that target.
//! 2. A value holding the equal-dominance share of the population wins `==`.
//! 3. Otherwise the population is clustered at an adaptive split threshold
//!    and the biggest cluster decides the frontier: by raw side counts when
//!    it dominates, by the imbalance ratio when it does not, merging toward
//!    its closest neighbor and retrying while undecided.

use std::cmp::Ordering;

use vigil_core::config::InferenceConfig;
use vigil_core::operator::{Direction, Operator};
use vigil_core::status::{Classification, Status};
use vigil_core::value;
use vigil_core::variable::{EvalContext, VariableMap};

use crate::clustering::{clusterize, split_threshold};
use crate::constraint::{Constraint, ValueType};
use crate::observations::ObservationSet;

/// A constraint whose operator and threshold are inferred from observation.
#[derive(Debug, Clone)]
pub struct AdaptiveConstraint {
    inner: Constraint,
    config: InferenceConfig,
    observations: ObservationSet,
    statuses: Vec<Status>,
    saved_operator: Option<Operator>,
    saved_value: Option<f64>,
    all_instances_valid: bool,
}

impl AdaptiveConstraint {
    /// Create an adaptive constraint. The bound value is always a literal
    /// (possibly the adaptive `?` marker); variable-typed bounds do not
    /// take part in inference.
    pub fn new(var_name: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self::with_config(var_name, operator, value, InferenceConfig::default())
    }

    pub fn with_config(
        var_name: impl Into<String>,
        operator: Operator,
        value: impl Into<String>,
        config: InferenceConfig,
    ) -> Self {
        Self {
            inner: Constraint::new(var_name, operator, ValueType::Constant, value),
            config,
            observations: ObservationSet::new(),
            statuses: Vec::new(),
            saved_operator: None,
            saved_value: None,
            all_instances_valid: false,
        }
    }

    /// The constraint as declared in the model.
    pub fn declared(&self) -> &Constraint {
        &self.inner
    }

    pub fn var_name(&self) -> &str {
        self.inner.var_name()
    }

    /// The raw configured value string (may be the `?` marker).
    pub fn raw_value(&self) -> &str {
        self.inner.value()
    }

    /// Observations accumulated during the current pass.
    pub fn observations(&self) -> &ObservationSet {
        &self.observations
    }

    /// Every status produced by `verify` during the current pass,
    /// re-classified in place by `revalidate`.
    pub fn statuses(&self) -> &[Status] {
        &self.statuses
    }

    /// Whether this constraint has started collecting observations.
    pub fn is_collecting(&self) -> bool {
        !self.statuses.is_empty()
    }

    fn discrete(&self) -> bool {
        self.inner.kind().map_or(false, |k| k.is_discrete())
    }

    /// Record one evaluation. A numeric observation is appended to the
    /// population, the memo pair is cleared, and an `Adaptive` status is
    /// recorded for later revalidation. Anything non-numeric is `Uncertain`.
    pub fn verify(&mut self, variables: &VariableMap, ctx: &EvalContext) -> Status {
        let Some(variable) = variables.get(self.inner.var_name()) else {
            return Status::uncertain();
        };
        let Some(numeric) = variable.numeric_value(self.inner.value(), ctx) else {
            return Status::uncertain();
        };

        self.observations.insert(numeric);
        self.invalidate();

        let actual_left = variable.formatted_value(self.inner.value(), ctx);
        let status = Status::adaptive(numeric, actual_left);
        self.statuses.push(status.clone());
        status
    }

    /// Whether downstream consumers may rely on this constraint: the
    /// operator must have resolved, and an adaptive bound must have
    /// produced a value.
    pub fn can_be_used(&mut self) -> bool {
        !self.operator().is_adaptive()
            && (!value::is_adaptive(self.inner.value()) || self.adaptive_value().is_some())
    }

    /// Drop the memoized operator/value, forcing re-inference on next
    /// access.
    pub fn invalidate(&mut self) {
        self.saved_operator = None;
        self.saved_value = None;
    }

    /// Flip the all-instances-valid mode. A change invalidates the memo
    /// pair; setting the same value twice is a no-op.
    pub fn set_all_instances_valid(&mut self, all_instances_valid: bool) {
        if all_instances_valid != self.all_instances_valid {
            self.all_instances_valid = all_instances_valid;
            self.invalidate();
        }
    }

    pub fn all_instances_valid(&self) -> bool {
        self.all_instances_valid
    }

    /// The effective operator: the declared one when concrete, otherwise
    /// the memoized or freshly inferred operator. Stays `Adaptive` while
    /// the population supports no decision.
    pub fn operator(&mut self) -> Operator {
        if !self.inner.operator().is_adaptive() {
            return self.inner.operator();
        }
        if let Some(op) = self.saved_operator {
            return op;
        }
        if self.observations.is_empty() {
            return self.inner.operator();
        }

        let op = self.infer_operator();
        if !op.is_adaptive() {
            tracing::debug!(
                constraint = %self.inner,
                operator = %op,
                value = ?self.saved_value,
                "inferred adaptive operator"
            );
        }
        op
    }

    /// The inferred threshold, when one can be derived. `!=` admits no
    /// threshold, and an unresolved operator leaves the value undecided.
    pub fn adaptive_value(&mut self) -> Option<f64> {
        let op = self.operator();
        if op == Operator::Neq || op.is_adaptive() {
            return None;
        }

        if let Some(saved) = self.saved_value {
            return Some(saved);
        }

        if !value::is_adaptive(self.inner.value()) {
            let parsed = value::parse_numeric(self.inner.value())?;
            self.saved_value = Some(parsed);
            return Some(parsed);
        }

        if self.observations.is_empty() {
            return None;
        }

        if self.all_instances_valid {
            return self.infer_value_all_valid(op);
        }

        if op == Operator::Eq {
            // The dominant value is the frontier; no memo, it is cheap.
            return self.observations.most_frequent().map(|(v, _)| v);
        }

        let split = split_threshold(self.observations.values(), self.discrete(), &self.config);
        let clusters = clusterize(self.observations.values(), split, false);
        let biggest = biggest_cluster(&clusters)?;
        let cluster = &clusters[biggest];

        let threshold = match op.direction()? {
            Direction::VariableOverValue => {
                let mut t = cluster[0];
                if !op.has_equality() && self.discrete() {
                    t -= 1.0;
                }
                t
            }
            Direction::VariableUnderValue => {
                let mut t = cluster[cluster.len() - 1];
                if !op.has_equality() && self.discrete() {
                    t += 1.0;
                }
                t
            }
            Direction::VariableEqualValue => return None,
        };
        self.saved_value = Some(threshold);
        Some(threshold)
    }

    /// The constraint value as the model should display/save it: the raw
    /// literal when concrete, otherwise the inferred threshold rendered in
    /// the declared unit family.
    pub fn rendered_value(&mut self) -> String {
        if !value::is_adaptive(self.inner.value()) {
            return self.inner.value().to_string();
        }
        let Some(adaptive) = self.adaptive_value() else {
            return self.inner.value().to_string();
        };
        if self.discrete() {
            let op = self.operator();
            value::render_counter(adaptive, op)
        } else {
            value::render_scaled(self.inner.value(), adaptive)
        }
    }

    /// Re-derive the classification of every recorded evaluation against
    /// the inferred operator/threshold. Runs once, after the replay pass.
    pub fn revalidate(&mut self) {
        let operator = self.operator();
        let threshold = self.adaptive_value();
        let unresolved = operator.is_adaptive() || threshold.is_none();
        let rendered = (!unresolved).then(|| self.rendered_value());

        for status in &mut self.statuses {
            if status.classification != Classification::Adaptive {
                continue;
            }
            match (status.adaptive_value, threshold) {
                (Some(observed), Some(frontier)) if !unresolved => {
                    let comparison = observed.total_cmp(&frontier);
                    if operator.satisfied(comparison) {
                        status.reclassify_valid(rendered.clone());
                    } else {
                        status.reclassify_invalid(rendered.clone());
                    }
                }
                _ => status.reclassify_uncertain(),
            }
        }
    }

    fn infer_operator(&mut self) -> Operator {
        // A concrete literal bound still contributes: it anchors which side
        // of the population the operator should face.
        let literal = if value::is_adaptive(self.inner.value()) {
            None
        } else {
            value::parse_numeric(self.inner.value())
        };

        if self.all_instances_valid {
            return self.infer_operator_all_valid(literal);
        }

        let Some((most_present, most_count)) = self.observations.most_frequent() else {
            return Operator::Adaptive;
        };
        let total = self.observations.len() as f64;

        if let Some(target) = literal {
            if most_present == target {
                self.saved_operator = Some(Operator::Eq);
            } else {
                let before = self
                    .observations
                    .values()
                    .iter()
                    .filter(|&&v| v < target)
                    .count();
                let after = self
                    .observations
                    .values()
                    .iter()
                    .filter(|&&v| v > target)
                    .count();
                let op = if before < after {
                    Operator::Geq
                } else {
                    Operator::Leq
                };
                self.saved_operator = Some(op);
            }
            return self.saved_operator.unwrap_or(Operator::Adaptive);
        }

        if most_count as f64 / total >= self.config.equal_dominance {
            self.saved_operator = Some(Operator::Eq);
            self.saved_value = Some(most_present);
            return Operator::Eq;
        }

        let split = split_threshold(self.observations.values(), self.discrete(), &self.config);
        let clusters = clusterize(self.observations.values(), split, false);
        self.decide_frontier(clusters)
    }

    fn infer_operator_all_valid(&mut self, literal: Option<f64>) -> Operator {
        // Every collected instance is a correct example: an upper bound
        // covering all of them (or plain equality) is the only safe choice.
        let (Some(min), Some(max)) = (self.observations.min(), self.observations.max()) else {
            return Operator::Adaptive;
        };
        let multiple = self.observations.distinct() > 1;

        match literal {
            None => {
                if multiple {
                    self.saved_operator = Some(Operator::Leq);
                    self.saved_value = Some(max);
                } else {
                    self.saved_operator = Some(Operator::Eq);
                    self.saved_value = Some(min);
                }
            }
            Some(target) => {
                if multiple {
                    if target > max {
                        self.saved_operator = Some(Operator::Lt);
                    } else if target == max {
                        self.saved_operator = Some(Operator::Leq);
                    } else if target < min {
                        self.saved_operator = Some(Operator::Gt);
                    } else if target == min {
                        self.saved_operator = Some(Operator::Geq);
                    }
                    // A target strictly inside the observed range is
                    // contradictory under all-instances-valid: stay
                    // unresolved so consumers see the constraint as
                    // unusable.
                } else if target == min {
                    self.saved_operator = Some(Operator::Eq);
                } else {
                    self.saved_operator = Some(Operator::Neq);
                }
            }
        }
        self.saved_operator.unwrap_or(Operator::Adaptive)
    }

    /// Decide the frontier from the biggest cluster, merging toward the
    /// closest neighbor and retrying while undecided.
    fn decide_frontier(&mut self, mut clusters: Vec<Vec<f64>>) -> Operator {
        let total = self.observations.len() as f64;
        let Some(mut biggest) = biggest_cluster(&clusters) else {
            return Operator::Adaptive;
        };

        loop {
            let before_count: usize = clusters[..biggest].iter().map(Vec::len).sum();
            let after_count: usize = clusters[biggest + 1..].iter().map(Vec::len).sum();

            if before_count == 0 && after_count == 0 {
                // Everything merged into one mass: no frontier to commit to.
                tracing::debug!(
                    constraint = %self.inner,
                    "population collapsed to a single cluster; inference gives up"
                );
                return Operator::Adaptive;
            }

            let share = clusters[biggest].len() as f64 / total;
            let (before_wins, after_wins) = if share >= self.config.cluster_dominance {
                (
                    before_count == 0 || before_count > after_count,
                    after_count == 0 || after_count > before_count,
                )
            } else {
                (
                    after_count > 0
                        && before_count as f64 / after_count as f64 >= self.config.imbalance_ratio,
                    before_count > 0
                        && after_count as f64 / before_count as f64 >= self.config.imbalance_ratio,
                )
            };

            if before_wins {
                self.saved_operator = Some(Operator::Leq);
                self.saved_value = Some(cluster_max(&clusters[biggest]));
                return Operator::Leq;
            }
            if after_wins {
                self.saved_operator = Some(Operator::Geq);
                self.saved_value = Some(cluster_min(&clusters[biggest]));
                return Operator::Geq;
            }

            // Undecided: merge the biggest cluster with its closest
            // neighbor and retry. At an extremity, a gap wide enough
            // relative to the cluster's own span commits to the boundary
            // instead, provided the cluster actually outweighs the
            // neighbor it would otherwise swallow.
            let closest = if biggest == 0 {
                let gap = cluster_min(&clusters[1]) - cluster_max(&clusters[0]);
                let span = cluster_span(&clusters[0]);
                if gap >= self.config.extremity_gap_factor * span + 1.0
                    && clusters[0].len() > clusters[1].len()
                {
                    self.saved_operator = Some(Operator::Leq);
                    self.saved_value = Some(cluster_max(&clusters[0]));
                    return Operator::Leq;
                }
                1
            } else if biggest == clusters.len() - 1 {
                let neighbor = biggest - 1;
                let gap = cluster_min(&clusters[biggest]) - cluster_max(&clusters[neighbor]);
                let span = cluster_span(&clusters[biggest]);
                if gap >= self.config.extremity_gap_factor * span + 1.0
                    && clusters[biggest].len() > clusters[neighbor].len()
                {
                    self.saved_operator = Some(Operator::Geq);
                    self.saved_value = Some(cluster_min(&clusters[biggest]));
                    return Operator::Geq;
                }
                neighbor
            } else {
                let space_before =
                    cluster_min(&clusters[biggest]) - cluster_max(&clusters[biggest - 1]);
                let space_after =
                    cluster_min(&clusters[biggest + 1]) - cluster_max(&clusters[biggest]);
                let ratio = space_before.min(space_after) / space_before.max(space_after);
                if ratio >= self.config.near_equal_gap_ratio {
                    // Gaps are (almost) identical: lean toward the heavier
                    // side, before on a tie.
                    if before_count >= after_count {
                        biggest - 1
                    } else {
                        biggest + 1
                    }
                } else if space_before < space_after {
                    biggest - 1
                } else {
                    biggest + 1
                }
            };

            // Clusters are contiguous in sorted order, so appending the
            // higher one onto the lower keeps the merged cluster sorted.
            if closest > biggest {
                let moved = clusters.remove(closest);
                clusters[biggest].extend(moved);
            } else {
                let moved = clusters.remove(biggest);
                clusters[closest].extend(moved);
                biggest = closest;
            }
        }
    }

    fn infer_value_all_valid(&mut self, op: Operator) -> Option<f64> {
        let threshold = match op.direction()? {
            Direction::VariableOverValue => {
                let mut t = self.observations.min()?;
                if !op.has_equality() && self.discrete() {
                    t -= 1.0;
                }
                t
            }
            Direction::VariableUnderValue => {
                let mut t = self.observations.max()?;
                if !op.has_equality() && self.discrete() {
                    t += 1.0;
                }
                t
            }
            Direction::VariableEqualValue => {
                if self.observations.distinct() > 1 {
                    // More than one value under an equality operator while
                    // every instance counts as valid: contradictory.
                    return None;
                }
                self.observations.min()?
            }
        };
        self.saved_value = Some(threshold);
        Some(threshold)
    }
}

/// Index of the cluster with the most members; first one on ties.
fn biggest_cluster(clusters: &[Vec<f64>]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, cluster) in clusters.iter().enumerate() {
        if best.map_or(true, |b| cluster.len() > clusters[b].len()) {
            best = Some(idx);
        }
    }
    best
}

fn cluster_min(cluster: &[f64]) -> f64 {
    cluster[0]
}

fn cluster_max(cluster: &[f64]) -> f64 {
    cluster[cluster.len() - 1]
}

fn cluster_span(cluster: &[f64]) -> f64 {
    cluster_max(cluster) - cluster_min(cluster)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collected(values: &[f64]) -> AdaptiveConstraint {
        let mut c = AdaptiveConstraint::new("cputime/total", Operator::Adaptive, "?");
        for &v in values {
            c.observations.insert(v);
            c.statuses.push(Status::adaptive(v, format!("{v}")));
        }
        c
    }

    #[test]
    fn test_no_observations_returns_declared() {
        let mut c = AdaptiveConstraint::new("cputime/total", Operator::Adaptive, "?");
        assert_eq!(c.operator(), Operator::Adaptive);
        assert_eq!(c.adaptive_value(), None);
        assert!(!c.can_be_used());
    }

    #[test]
    fn test_concrete_operator_passes_through() {
        let mut c = AdaptiveConstraint::new("cputime/total", Operator::Leq, "10ms");
        assert_eq!(c.operator(), Operator::Leq);
        // Literal bound parses straight into the value.
        assert_eq!(c.adaptive_value(), Some(10_000_000.0));
        assert!(c.can_be_used());
    }

    #[test]
    fn test_equal_population_infers_eq() {
        let mut c = collected(&[5.0, 5.0, 5.0, 5.0, 5.0]);
        assert_eq!(c.operator(), Operator::Eq);
        assert_eq!(c.adaptive_value(), Some(5.0));
    }

    #[test]
    fn test_dominant_value_infers_eq() {
        // 8 of 10 observations share one value: the 80% rule fires.
        let mut c = collected(&[3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 9.0, 1.0]);
        assert_eq!(c.operator(), Operator::Eq);
        assert_eq!(c.adaptive_value(), Some(3.0));
    }

    #[test]
    fn test_all_valid_single_value() {
        let mut c = collected(&[7.0, 7.0, 7.0]);
        c.set_all_instances_valid(true);
        assert_eq!(c.operator(), Operator::Eq);
        assert_eq!(c.adaptive_value(), Some(7.0));
    }

    #[test]
    fn test_all_valid_multi_value_upper_bound() {
        let mut c = collected(&[3.0, 5.0, 9.0]);
        c.set_all_instances_valid(true);
        assert_eq!(c.operator(), Operator::Leq);
        assert_eq!(c.adaptive_value(), Some(9.0));
    }

    #[test]
    fn test_all_valid_literal_target_edges() {
        let samples = [3.0, 5.0, 9.0];

        let mut c = AdaptiveConstraint::new("cputime/total", Operator::Adaptive, "9");
        for &v in &samples {
            c.observations.insert(v);
        }
        c.set_all_instances_valid(true);
        assert_eq!(c.operator(), Operator::Leq);

        let mut c = AdaptiveConstraint::new("cputime/total", Operator::Adaptive, "12");
        for &v in &samples {
            c.observations.insert(v);
        }
        c.set_all_instances_valid(true);
        assert_eq!(c.operator(), Operator::Lt);

        let mut c = AdaptiveConstraint::new("cputime/total", Operator::Adaptive, "3");
        for &v in &samples {
            c.observations.insert(v);
        }
        c.set_all_instances_valid(true);
        assert_eq!(c.operator(), Operator::Geq);

        let mut c = AdaptiveConstraint::new("cputime/total", Operator::Adaptive, "1");
        for &v in &samples {
            c.observations.insert(v);
        }
        c.set_all_instances_valid(true);
        assert_eq!(c.operator(), Operator::Gt);
    }

    #[test]
    fn test_all_valid_interior_literal_target_stays_unresolved() {
        // A target strictly inside the observed range contradicts the
        // all-instances-valid hint.
        let mut c = AdaptiveConstraint::new("cputime/total", Operator::Adaptive, "4");
        for v in [3.0, 5.0, 9.0] {
            c.observations.insert(v);
        }
        c.set_all_instances_valid(true);
        assert_eq!(c.operator(), Operator::Adaptive);
        assert!(!c.can_be_used());
    }

    #[test]
    fn test_all_valid_single_value_with_literal() {
        let mut c = AdaptiveConstraint::new("cputime/total", Operator::Adaptive, "7");
        c.observations.insert(7.0);
        c.set_all_instances_valid(true);
        assert_eq!(c.operator(), Operator::Eq);

        let mut c = AdaptiveConstraint::new("cputime/total", Operator::Adaptive, "8");
        c.observations.insert(7.0);
        c.set_all_instances_valid(true);
        assert_eq!(c.operator(), Operator::Neq);
        // No threshold can be derived for `!=`.
        assert_eq!(c.adaptive_value(), None);
    }

    #[test]
    fn test_literal_target_sides() {
        // Mass above the target: the variable lives over the value.
        let mut c = AdaptiveConstraint::new("cputime/total", Operator::Adaptive, "2");
        for v in [1.0, 5.0, 6.0, 7.0] {
            c.observations.insert(v);
        }
        assert_eq!(c.operator(), Operator::Geq);

        // Mass below the target.
        let mut c = AdaptiveConstraint::new("cputime/total", Operator::Adaptive, "8");
        for v in [1.0, 2.0, 3.0, 9.0] {
            c.observations.insert(v);
        }
        assert_eq!(c.operator(), Operator::Leq);
    }

    #[test]
    fn test_bimodal_population_gives_up() {
        let mut c = collected(&[1.0, 1.0, 2.0, 1.0, 50.0, 51.0, 49.0, 50.0]);
        assert_eq!(c.operator(), Operator::Adaptive);
        assert_eq!(c.adaptive_value(), None);
        assert!(!c.can_be_used());
    }

    #[test]
    fn test_skewed_population_decides_frontier() {
        // A dominant low cluster with a few stragglers above: the frontier
        // caps the cluster from above.
        let mut c = collected(&[
            10.0, 10.0, 11.0, 11.0, 12.0, 12.0, 13.0, 13.0, 14.0, 14.0, 500.0, 900.0,
        ]);
        assert_eq!(c.operator(), Operator::Leq);
        assert_eq!(c.adaptive_value(), Some(14.0));
    }

    #[test]
    fn test_imbalance_ratio_caps_middle_cluster() {
        // Clusters of 4 / 5 / 1: the biggest holds half the population,
        // short of the dominance bar, but the low side outweighs the high
        // side 4:1 and the frontier caps the middle cluster from above.
        let mut c = collected(&[
            10.0, 11.0, 12.0, 13.0, 100.0, 101.0, 102.0, 103.0, 104.0, 200.0,
        ]);
        assert_eq!(c.operator(), Operator::Leq);
        assert_eq!(c.adaptive_value(), Some(104.0));
    }

    #[test]
    fn test_imbalance_ratio_floors_middle_cluster() {
        // Mirror shape, 1 / 5 / 4: the high side outweighs the low side
        // and the frontier is the middle cluster's minimum.
        let mut c = collected(&[
            10.0, 100.0, 101.0, 102.0, 103.0, 104.0, 200.0, 201.0, 202.0, 203.0,
        ]);
        assert_eq!(c.operator(), Operator::Geq);
        assert_eq!(c.adaptive_value(), Some(100.0));
    }

    #[test]
    fn test_near_equal_gaps_merge_toward_heavier_low_side() {
        // 4 / 5 / 3 with identical 100-wide gaps on both sides of the
        // middle cluster: neither side rule decides, and the merge leans
        // toward the heavier low side. The enlarged low cluster then
        // dominates and caps at the middle cluster's maximum. Merging the
        // other way would leave the population undecidable.
        let mut c = collected(&[
            0.0, 1.0, 2.0, 3.0, 103.0, 104.0, 105.0, 106.0, 107.0, 207.0, 208.0, 209.0,
        ]);
        assert_eq!(c.operator(), Operator::Leq);
        assert_eq!(c.adaptive_value(), Some(107.0));
    }

    #[test]
    fn test_near_equal_gaps_merge_toward_heavier_high_side() {
        // 3 / 5 / 4 with near-identical gaps: the high side is heavier, so
        // the middle cluster merges upward and the frontier covers the
        // merged mass from above.
        let mut c = collected(&[
            0.0, 1.0, 2.0, 103.0, 104.0, 105.0, 106.0, 107.0, 207.0, 208.0, 209.0, 210.0,
        ]);
        assert_eq!(c.operator(), Operator::Leq);
        assert_eq!(c.adaptive_value(), Some(210.0));
    }

    #[test]
    fn test_extremity_gap_commits_to_dominant_low_cluster() {
        // Neither side rule decides (nothing before, too little after),
        // but the low cluster outweighs its far-away neighbor.
        let mut c = collected(&[1.0, 1.0, 1.0, 2.0, 2.0, 50.0, 51.0]);
        assert_eq!(c.operator(), Operator::Leq);
        assert_eq!(c.adaptive_value(), Some(2.0));
    }

    #[test]
    fn test_invalidation_forces_recompute() {
        let mut c = collected(&[3.0, 5.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0]);
        // 8 of 10 at 9.0: the dominance rule memoizes Eq.
        assert_eq!(c.operator(), Operator::Eq);
        assert_eq!(c.adaptive_value(), Some(9.0));
        // Flipping the mode invalidates the memo and changes the branch.
        c.set_all_instances_valid(true);
        assert_eq!(c.operator(), Operator::Leq);
        assert_eq!(c.adaptive_value(), Some(9.0));
    }

    #[test]
    fn test_set_all_instances_valid_idempotent() {
        let mut c = collected(&[3.0, 5.0, 9.0]);
        c.set_all_instances_valid(true);
        assert_eq!(c.operator(), Operator::Leq);
        // Same value again must not clear the memo.
        c.set_all_instances_valid(true);
        assert_eq!(c.saved_operator, Some(Operator::Leq));
    }

    #[test]
    fn test_new_observation_invalidates() {
        let mut c = collected(&[5.0, 5.0, 5.0]);
        assert_eq!(c.operator(), Operator::Eq);
        assert!(c.saved_operator.is_some());
        // verify() clears the memo; emulate its bookkeeping directly.
        c.observations.insert(6.0);
        c.invalidate();
        assert!(c.saved_operator.is_none());
    }

    #[test]
    fn test_counter_discrete_adjustment() {
        // Counter-kind variable, strict operator: the boundary moves one
        // step inside the valid region.
        let mut c = AdaptiveConstraint::new("preempt/count", Operator::Gt, "?");
        for v in [4.0, 5.0, 6.0] {
            c.observations.insert(v);
        }
        c.set_all_instances_valid(true);
        assert_eq!(c.adaptive_value(), Some(3.0));
    }

    #[test]
    fn test_timer_keeps_exact_boundary() {
        let mut c = AdaptiveConstraint::new("cputime/total", Operator::Gt, "?");
        for v in [4.0, 5.0, 6.0] {
            c.observations.insert(v);
        }
        c.set_all_instances_valid(true);
        assert_eq!(c.adaptive_value(), Some(4.0));
    }

    #[test]
    fn test_rendered_value_counter() {
        let mut c = AdaptiveConstraint::new("preempt/count", Operator::Adaptive, "?");
        for v in [2.0, 2.0, 2.0] {
            c.observations.insert(v);
        }
        assert_eq!(c.rendered_value(), "2");
    }

    #[test]
    fn test_rendered_value_duration_unit() {
        let mut c = AdaptiveConstraint::new("cputime/total", Operator::Adaptive, "?ms");
        for v in [12_500_000.0, 12_500_000.0, 12_500_000.0] {
            c.observations.insert(v);
        }
        assert_eq!(c.rendered_value(), "12.5000ms");
    }

    #[test]
    fn test_rendered_value_unresolved_keeps_marker() {
        let mut c = collected(&[1.0, 1.0, 2.0, 1.0, 50.0, 51.0, 49.0, 50.0]);
        assert_eq!(c.rendered_value(), "?");
    }

    #[test]
    fn test_revalidate_classifies_every_record() {
        let mut c = collected(&[5.0, 5.0, 5.0, 5.0, 7.0]);
        // 4 of 5 at 5.0: Eq(5.0) is inferred.
        c.revalidate();
        let classifications: Vec<Classification> =
            c.statuses().iter().map(|s| s.classification).collect();
        assert_eq!(
            classifications,
            vec![
                Classification::Valid,
                Classification::Valid,
                Classification::Valid,
                Classification::Valid,
                Classification::Invalid,
            ]
        );
        // Left values survive, right values carry the inferred frontier.
        for status in c.statuses() {
            assert!(status.actual_left.is_some());
            assert!(status.actual_right.is_some());
        }
    }

    #[test]
    fn test_revalidate_unresolved_marks_uncertain() {
        let mut c = collected(&[1.0, 1.0, 2.0, 1.0, 50.0, 51.0, 49.0, 50.0]);
        c.revalidate();
        assert!(c
            .statuses()
            .iter()
            .all(|s| s.classification == Classification::Uncertain));
    }
}
