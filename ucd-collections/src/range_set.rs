//! A set of codepoints stored as disjoint inclusive ranges.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// A set of `u32` values stored as sorted, disjoint, non-adjacent
/// inclusive ranges.
///
/// Adding a range merges it with any range it overlaps or touches, and
/// removing a range trims or splits the ranges it intersects, so the stored
/// form is always canonical.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RangeSet {
    // start -> inclusive end
    ranges: BTreeMap<u32, u32>,
}

impl RangeSet {
    /// Create a new, empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if the set has no members.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The number of members in the set.
    pub fn len(&self) -> u64 {
        self.ranges
            .iter()
            .map(|(start, end)| (*end as u64) - (*start as u64) + 1)
            .sum()
    }

    /// The number of stored ranges.
    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    /// Add a single value.
    pub fn insert(&mut self, value: u32) {
        self.add(value..=value)
    }

    /// Add every value in `range`.
    pub fn add(&mut self, range: RangeInclusive<u32>) {
        let (mut start, mut end) = range.into_inner();
        if start > end {
            return;
        }

        // a predecessor that overlaps or touches absorbs the new range
        if let Some((&prev_start, &prev_end)) = self.ranges.range(..=start).next_back() {
            if prev_end as u64 + 1 >= start as u64 {
                if prev_end >= end {
                    return;
                }
                start = prev_start;
            }
        }

        let absorbed = self
            .ranges
            .range(start..=end.saturating_add(1))
            .map(|(start, end)| (*start, *end))
            .collect::<Vec<_>>();
        for (next_start, next_end) in absorbed {
            self.ranges.remove(&next_start);
            end = end.max(next_end);
        }
        self.ranges.insert(start, end);
    }

    /// Remove a single value.
    pub fn remove_value(&mut self, value: u32) {
        self.remove(value..=value)
    }

    /// Remove every value in `range`.
    pub fn remove(&mut self, range: RangeInclusive<u32>) {
        let (start, end) = range.into_inner();
        if start > end {
            return;
        }

        // split a predecessor that begins before the removed range
        if let Some((&prev_start, &prev_end)) = self.ranges.range(..start).next_back() {
            if prev_end >= start {
                self.ranges.insert(prev_start, start - 1);
                if prev_end > end {
                    self.ranges.insert(end + 1, prev_end);
                    return;
                }
            }
        }

        let overlapping = self
            .ranges
            .range(start..=end)
            .map(|(start, end)| (*start, *end))
            .collect::<Vec<_>>();
        for (inner_start, inner_end) in overlapping {
            self.ranges.remove(&inner_start);
            if inner_end > end {
                self.ranges.insert(end + 1, inner_end);
            }
        }
    }

    /// Returns the stored range that contains `value`, if any.
    pub fn range_containing(&self, value: u32) -> Option<RangeInclusive<u32>> {
        let (&start, &end) = self.ranges.range(..=value).next_back()?;
        (value <= end).then_some(start..=end)
    }

    /// `true` if `value` is a member of the set.
    pub fn contains(&self, value: u32) -> bool {
        self.range_containing(value).is_some()
    }

    /// Iterate over the stored ranges, in order.
    pub fn iter_ranges(&self) -> impl DoubleEndedIterator<Item = RangeInclusive<u32>> + '_ {
        self.ranges.iter().map(|(start, end)| *start..=*end)
    }

    /// Iterate over every member, in order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.iter_ranges().flatten()
    }
}

impl Extend<RangeInclusive<u32>> for RangeSet {
    fn extend<T: IntoIterator<Item = RangeInclusive<u32>>>(&mut self, iter: T) {
        for range in iter {
            self.add(range);
        }
    }
}

impl Extend<u32> for RangeSet {
    fn extend<T: IntoIterator<Item = u32>>(&mut self, iter: T) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl FromIterator<RangeInclusive<u32>> for RangeSet {
    fn from_iter<T: IntoIterator<Item = RangeInclusive<u32>>>(iter: T) -> Self {
        let mut set = RangeSet::new();
        set.extend(iter);
        set
    }
}

impl FromIterator<u32> for RangeSet {
    fn from_iter<T: IntoIterator<Item = u32>>(iter: T) -> Self {
        let mut set = RangeSet::new();
        set.extend(iter);
        set
    }
}
