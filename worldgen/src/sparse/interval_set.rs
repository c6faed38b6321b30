//! Ordered integer set backed by closed intervals.

use std::ops::RangeInclusive;

/// A closed range `[min, max]`. Always `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub min: u64,
    pub max: u64,
}

impl Interval {
    fn singleton(value: u64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Number of integers covered.
    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        self.max - self.min + 1
    }

    #[inline]
    fn values(&self) -> RangeInclusive<u64> {
        self.min..=self.max
    }
}

/// Set of `u64` values stored as sorted, disjoint, non-adjacent intervals.
///
/// Values can only be added. `len()` is maintained as a running counter and
/// always equals the sum of the interval lengths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
    len: u64,
}

impl IntervalSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the first interval whose `max` is not below `value`.
    #[inline]
    fn lower_bound(&self, value: u64) -> usize {
        self.intervals.partition_point(|iv| iv.max < value)
    }

    /// Adds a value. Returns `false` if it was already present.
    ///
    /// O(log k) search plus a vector insert/remove, where k is the number
    /// of intervals. A value touching its left neighbour, its right
    /// neighbour, or both is absorbed so no two intervals end up adjacent.
    pub fn add(&mut self, value: u64) -> bool {
        let idx = self.lower_bound(value);
        if self.intervals.get(idx).is_some_and(|iv| iv.min <= value) {
            return false;
        }

        // intervals[idx - 1].max < value < intervals[idx].min, so neither
        // `+ 1` below can overflow.
        let joins_left = idx > 0 && self.intervals[idx - 1].max + 1 == value;
        let joins_right = self
            .intervals
            .get(idx)
            .is_some_and(|iv| value + 1 == iv.min);

        match (joins_left, joins_right) {
            (true, true) => {
                let right = self.intervals.remove(idx);
                self.intervals[idx - 1].max = right.max;
            }
            (true, false) => self.intervals[idx - 1].max = value,
            (false, true) => self.intervals[idx].min = value,
            (false, false) => self.intervals.insert(idx, Interval::singleton(value)),
        }

        self.len += 1;
        debug_assert!(self.check_invariants(), "interval set lost canonical form");
        true
    }

    /// Returns true if the value has been added.
    pub fn contains(&self, value: u64) -> bool {
        self.intervals
            .get(self.lower_bound(value))
            .is_some_and(|iv| iv.min <= value)
    }

    /// Number of distinct values added.
    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns true if nothing has been added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The underlying intervals, ascending.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Smallest value in the set.
    pub fn first(&self) -> Option<u64> {
        self.intervals.first().map(|iv| iv.min)
    }

    /// Ascending iterator over every value.
    ///
    /// A fresh iterator always starts at the current smallest value.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            intervals: self.intervals.iter(),
            current: empty_range(),
        }
    }

    /// Returns true if the representation is canonical: every interval is
    /// non-empty, intervals are strictly ordered with a gap of at least one
    /// value between neighbours, and the counter equals the sum of lengths.
    pub fn check_invariants(&self) -> bool {
        let ordered = self.intervals.iter().all(|iv| iv.min <= iv.max)
            && self
                .intervals
                .windows(2)
                .all(|pair| pair[0].max.checked_add(1).is_some_and(|end| end < pair[1].min));
        let total: u128 = self.intervals.iter().map(|iv| iv.len() as u128).sum();
        ordered && total == self.len as u128
    }
}

#[allow(clippy::reversed_empty_ranges)]
fn empty_range() -> RangeInclusive<u64> {
    1..=0
}

/// Borrowing ascending iterator over an [`IntervalSet`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    intervals: std::slice::Iter<'a, Interval>,
    current: RangeInclusive<u64>,
}

impl Iterator for Iter<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        loop {
            if let Some(value) = self.current.next() {
                return Some(value);
            }
            self.current = self.intervals.next()?.values();
        }
    }
}

/// Owning ascending iterator over an [`IntervalSet`].
#[derive(Debug, Clone)]
pub struct IntoIter {
    intervals: std::vec::IntoIter<Interval>,
    current: RangeInclusive<u64>,
}

impl Iterator for IntoIter {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        loop {
            if let Some(value) = self.current.next() {
                return Some(value);
            }
            self.current = self.intervals.next()?.values();
        }
    }
}

impl IntoIterator for IntervalSet {
    type Item = u64;
    type IntoIter = IntoIter;

    fn into_iter(self) -> IntoIter {
        IntoIter {
            intervals: self.intervals.into_iter(),
            current: empty_range(),
        }
    }
}

impl<'a> IntoIterator for &'a IntervalSet {
    type Item = u64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl FromIterator<u64> for IntervalSet {
    fn from_iter<T: IntoIterator<Item = u64>>(iter: T) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.add(value);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn spans(set: &IntervalSet) -> Vec<(u64, u64)> {
        set.intervals().iter().map(|iv| (iv.min, iv.max)).collect()
    }

    #[test]
    fn test_empty_set() {
        let set = IntervalSet::new();
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());
        assert!(set.intervals().is_empty());
        assert_eq!(set.iter().next(), None);
        assert_eq!(set.first(), None);
        assert!(!set.contains(0));
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut set = IntervalSet::new();
        assert!(set.add(7));
        assert!(!set.add(7));
        assert_eq!(set.len(), 1);
        assert_eq!(spans(&set), vec![(7, 7)]);
    }

    #[test]
    fn test_contiguous_run_in_any_order_is_one_interval() {
        let mut set = IntervalSet::new();
        set.add(5);
        set.add(3);
        set.add(4);
        assert_eq!(spans(&set), vec![(3, 5)]);
        assert_eq!(set.len(), 3);
        assert!(set.check_invariants());
    }

    #[test]
    fn test_bridging_insert_merges_both_sides() {
        let mut set = IntervalSet::new();
        for v in [0, 1, 2, 4, 5] {
            set.add(v);
        }
        assert_eq!(spans(&set), vec![(0, 2), (4, 5)]);

        set.add(3);
        assert_eq!(spans(&set), vec![(0, 5)]);
        assert_eq!(set.len(), 6);
        assert!(set.check_invariants());
    }

    #[test]
    fn test_extends_left_and_right() {
        let mut set = IntervalSet::new();
        set.add(10);
        set.add(9);
        set.add(11);
        set.add(20);
        assert_eq!(spans(&set), vec![(9, 11), (20, 20)]);
    }

    #[test]
    fn test_non_adjacent_values_stay_separate() {
        let mut set = IntervalSet::new();
        set.add(1);
        set.add(3);
        assert_eq!(spans(&set), vec![(1, 1), (3, 3)]);
        assert!(!set.contains(2));
    }

    #[test]
    fn test_extreme_values() {
        let mut set = IntervalSet::new();
        set.add(u64::MAX);
        set.add(0);
        set.add(u64::MAX - 1);
        assert_eq!(spans(&set), vec![(0, 0), (u64::MAX - 1, u64::MAX)]);
        assert!(set.contains(u64::MAX));
        assert!(set.check_invariants());
    }

    #[test]
    fn test_check_invariants_rejects_broken_forms() {
        let adjacent = IntervalSet {
            intervals: vec![Interval { min: 0, max: 2 }, Interval { min: 3, max: 4 }],
            len: 5,
        };
        assert!(!adjacent.check_invariants());

        let miscounted = IntervalSet {
            intervals: vec![Interval { min: 0, max: 2 }],
            len: 2,
        };
        assert!(!miscounted.check_invariants());

        let unordered = IntervalSet {
            intervals: vec![Interval { min: 8, max: 9 }, Interval { min: 1, max: 1 }],
            len: 3,
        };
        assert!(!unordered.check_invariants());
    }

    #[test]
    fn test_iteration_restarts_at_smallest_value() {
        let mut set = IntervalSet::new();
        set.add(1);
        set.add(2);
        set.add(0);
        set.add(4);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 1, 2, 4]);

        set.add(3);
        set.add(100);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 100]);
        assert_eq!(set.first(), Some(0));
    }

    #[test]
    fn test_owned_iteration() {
        let set: IntervalSet = [9, 2, 3, 7].into_iter().collect();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![2, 3, 7, 9]);
    }

    proptest! {
        /// len() counts distinct values and contains() agrees with a reference set.
        #[test]
        fn prop_matches_reference_set(values in prop::collection::vec(0u64..200, 0..300)) {
            let mut set = IntervalSet::new();
            let mut reference = BTreeSet::new();
            for v in &values {
                prop_assert_eq!(set.add(*v), reference.insert(*v));
            }

            prop_assert_eq!(set.len(), reference.len() as u64);
            prop_assert!(set.check_invariants());
            for v in 0u64..210 {
                prop_assert_eq!(set.contains(v), reference.contains(&v));
            }
        }

        /// Iteration is strictly ascending and yields exactly the contents.
        #[test]
        fn prop_iteration_is_sorted_contents(values in prop::collection::vec(any::<u64>(), 0..100)) {
            let set: IntervalSet = values.iter().copied().collect();
            let reference: BTreeSet<u64> = values.into_iter().collect();

            let yielded: Vec<u64> = set.iter().collect();
            prop_assert!(yielded.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(yielded, reference.into_iter().collect::<Vec<_>>());
        }
    }
}
