//! Invariants that must hold for any population, not just hand-picked
//! ones: clustering is a deterministic exact partition, the split
//! threshold is non-negative, and observation bags are order-insensitive.

use proptest::prelude::*;

use vigil_analysis::clustering::{clusterize, split_threshold};
use vigil_analysis::ObservationSet;
use vigil_core::config::InferenceConfig;

fn sorted_population() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0..1.0e9f64, 0..64).prop_map(|mut v| {
        v.sort_by(f64::total_cmp);
        v
    })
}

proptest! {
    #[test]
    fn prop_clusterize_partitions_exactly(
        values in sorted_population(),
        threshold in 0.0..1.0e9f64,
        relative in any::<bool>(),
    ) {
        let clusters = clusterize(&values, threshold, relative);
        // Every element lands in exactly one cluster, in order.
        let flattened: Vec<f64> = clusters.iter().flatten().copied().collect();
        prop_assert_eq!(flattened, values.clone());
        // No empty clusters are ever produced.
        prop_assert!(clusters.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn prop_clusterize_is_deterministic(
        values in sorted_population(),
        threshold in 0.0..1.0e9f64,
    ) {
        let a = clusterize(&values, threshold, false);
        let b = clusterize(&values, threshold, false);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_clusterize_gap_bound(
        values in sorted_population(),
        threshold in 1.0..1.0e9f64,
    ) {
        // Within a cluster, consecutive absolute gaps stay under the
        // threshold.
        for cluster in clusterize(&values, threshold, false) {
            for pair in cluster.windows(2) {
                prop_assert!(pair[1] - pair[0] < threshold);
            }
        }
    }

    #[test]
    fn prop_split_threshold_non_negative(
        values in sorted_population(),
        discrete in any::<bool>(),
    ) {
        let config = InferenceConfig::default();
        let split = split_threshold(&values, discrete, &config);
        prop_assert!(split >= 0.0);
    }

    #[test]
    fn prop_observation_set_order_insensitive(values in prop::collection::vec(0.0..1.0e6f64, 0..64)) {
        let forward: ObservationSet = values.iter().copied().collect();
        let mut reversed = ObservationSet::new();
        for &v in values.iter().rev() {
            reversed.insert(v);
        }
        prop_assert_eq!(&forward, &reversed);
        prop_assert_eq!(forward.most_frequent(), reversed.most_frequent());
        prop_assert_eq!(forward.distinct(), reversed.distinct());
    }
}

#[test]
fn test_clusterize_boundary_cases() {
    assert!(clusterize(&[], 1.0, false).is_empty());
    assert_eq!(clusterize(&[42.0], 1.0, false), vec![vec![42.0]]);
    assert_eq!(clusterize(&[42.0], 0.0, true), vec![vec![42.0]]);
}
