//! Gap-based clustering of sorted numeric populations.
//!
//! Algorithm:
//! 1. Walk the sorted input pairwise, accumulating into the current cluster.
//! 2. When the gap between consecutive values reaches the threshold, start a
//!    new cluster (relative thresholds divide the gap by the earlier value).
//!
//! Used twice by the inference engine: on the adjacent differences of a
//! population to derive its split threshold, and on the raw population to
//! find the dominant cluster.

use statrs::statistics::Statistics;

use vigil_core::config::InferenceConfig;

/// Partition a sorted slice into contiguous runs separated by gaps of at
/// least `threshold`. Input must already be sorted ascending.
///
/// Empty input yields no clusters; a singleton yields one singleton cluster.
pub fn clusterize(values: &[f64], threshold: f64, relative: bool) -> Vec<Vec<f64>> {
    let mut clusters = Vec::new();
    if values.is_empty() {
        return clusters;
    }

    let mut current = Vec::new();
    for pair in values.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        current.push(prev);

        let mut gap = next - prev;
        if relative {
            gap /= prev;
        }
        if gap >= threshold {
            clusters.push(std::mem::take(&mut current));
        }
    }
    current.push(values[values.len() - 1]);
    clusters.push(current);
    clusters
}

/// Derive the split threshold for clustering a population.
///
/// Discrete populations use the fixed counter split. Otherwise the distinct
/// adjacent differences of the sorted population are themselves clustered
/// with a relative threshold: more than one difference cluster means the
/// population has a clear scale break, and the split falls midway between
/// the two topmost clusters' facing edges; a single cluster falls back to
/// the mean difference.
///
/// Callers must hand in at least two observations; with fewer there are no
/// differences and the split degenerates to 0.
pub fn split_threshold(values: &[f64], discrete: bool, config: &InferenceConfig) -> f64 {
    if discrete {
        return config.counter_split;
    }

    let mut diffs: Vec<f64> = values.windows(2).map(|pair| pair[1] - pair[0]).collect();
    diffs.sort_by(f64::total_cmp);
    diffs.dedup();
    if diffs.is_empty() {
        return 0.0;
    }

    let clusters = clusterize(&diffs, config.gap_threshold, true);
    if clusters.len() > 1 {
        let below = &clusters[clusters.len() - 2];
        let above = &clusters[clusters.len() - 1];
        (below[below.len() - 1] + above[0]) / 2.0
    } else {
        clusters[0].iter().mean()
    }
}
