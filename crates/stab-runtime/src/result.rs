//! Stab results.

use std::collections::BTreeMap;

/// Point index to the indices of the intervals it stabs.
///
/// A point that stabs nothing has no entry. Interval lists are sorted and
/// free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StabResult {
    stabs: BTreeMap<usize, Vec<usize>>,
}

impl StabResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, point: usize, interval: usize) {
        let intervals = self.stabs.entry(point).or_default();
        if let Err(at) = intervals.binary_search(&interval) {
            intervals.insert(at, interval);
        }
    }

    /// Intervals stabbed by `point`, empty if none.
    pub fn intervals_for(&self, point: usize) -> &[usize] {
        self.stabs.get(&point).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entries in ascending point order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.stabs
            .iter()
            .map(|(&point, intervals)| (point, intervals.as_slice()))
    }

    /// Number of points that stab at least one interval.
    pub fn len(&self) -> usize {
        self.stabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stabs.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<usize, Vec<usize>> {
        self.stabs
    }
}

impl FromIterator<(usize, usize)> for StabResult {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        let mut result = Self::new();
        for (point, interval) in iter {
            result.record(point, interval);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sorts_and_deduplicates() {
        let result: StabResult = [(3, 2), (3, 0), (3, 2), (1, 5)].into_iter().collect();
        assert_eq!(result.intervals_for(3), &[0, 2]);
        assert_eq!(result.intervals_for(1), &[5]);
        assert!(result.intervals_for(0).is_empty());
        assert_eq!(result.iter().map(|(p, _)| p).collect::<Vec<_>>(), vec![1, 3]);
    }
}
