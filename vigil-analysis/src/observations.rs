//! Sorted multiset of observed values.
//!
//! Semantically a bag, not a set: every observation counts, including exact
//! duplicates. Backed by a sorted `Vec` so the clustering passes can walk
//! the population in order without re-sorting.

/// Sorted bag of f64 observations with duplicates preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationSet {
    values: Vec<f64>,
}

impl ObservationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one observation, keeping the bag sorted.
    pub fn insert(&mut self, value: f64) {
        let idx = self.values.partition_point(|&v| v < value);
        self.values.insert(idx, value);
    }

    /// Total number of observations, duplicates included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The sorted observations, duplicates included.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn min(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn max(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Number of distinct values.
    pub fn distinct(&self) -> usize {
        let mut count = 0;
        let mut prev = None;
        for &v in &self.values {
            if prev != Some(v) {
                count += 1;
                prev = Some(v);
            }
        }
        count
    }

    /// The value with the highest duplicate count, with that count.
    /// Ties resolve to the smallest such value.
    pub fn most_frequent(&self) -> Option<(f64, usize)> {
        let mut best: Option<(f64, usize)> = None;
        let mut i = 0;
        while i < self.values.len() {
            let value = self.values[i];
            let mut j = i + 1;
            while j < self.values.len() && self.values[j] == value {
                j += 1;
            }
            let count = j - i;
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((value, count));
            }
            i = j;
        }
        best
    }
}

impl FromIterator<f64> for ObservationSet {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut values: Vec<f64> = iter.into_iter().collect();
        values.sort_by(f64::total_cmp);
        Self { values }
    }
}
