//! A sparse map from codepoints to values, stored as maximal runs.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// An ordered sparse map from codepoints to values.
///
/// Values are stored in runs: a base codepoint and the values assigned to
/// `base, base + 1, ...`. Runs are always maximal, meaning no two stored
/// runs overlap or touch; setting a codepoint next to a run extends it, and
/// a codepoint that bridges two runs merges them.
///
/// Lookups and mutations find the relevant run with a floor/ceiling query
/// on the run starts, so they are `O(log run_count)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SparseCodepointMap<V> {
    runs: BTreeMap<u32, Vec<V>>,
}

impl<V> Default for SparseCodepointMap<V> {
    fn default() -> Self {
        SparseCodepointMap {
            runs: BTreeMap::new(),
        }
    }
}

impl<V> SparseCodepointMap<V> {
    /// Create a new, empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The highest assigned codepoint plus one, or zero if the map is empty.
    ///
    /// This is a `u64` so that a value at `u32::MAX` is representable.
    pub fn len(&self) -> u64 {
        self.runs
            .iter()
            .next_back()
            .map(|(base, run)| *base as u64 + run.len() as u64)
            .unwrap_or(0)
    }

    /// `true` if no codepoint has a value.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// The number of stored runs.
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Returns the value assigned to `cp`, if any.
    pub fn get(&self, cp: u32) -> Option<&V> {
        let (base, run) = self.runs.range(..=cp).next_back()?;
        run.get((cp - base) as usize)
    }

    /// `true` if `cp` has a value.
    pub fn contains(&self, cp: u32) -> bool {
        self.get(cp).is_some()
    }

    /// Assign `value` to `cp`, returning the previous value if there was one.
    pub fn set(&mut self, cp: u32, value: V) -> Option<V> {
        if let Some((&base, run)) = self.runs.range_mut(..=cp).next_back() {
            let offset = (cp - base) as usize;
            if offset < run.len() {
                return Some(std::mem::replace(&mut run[offset], value));
            }
            if offset == run.len() {
                run.push(value);
                let next = cp.checked_add(1).and_then(|next| self.runs.remove(&next));
                if let Some(next) = next {
                    if let Some(run) = self.runs.get_mut(&base) {
                        run.extend(next);
                    }
                }
                self.debug_check_near(cp);
                return None;
            }
        }

        // starts a new run, possibly absorbing the run that begins at cp + 1
        let run = match cp.checked_add(1).and_then(|next| self.runs.remove(&next)) {
            Some(mut next) => {
                next.insert(0, value);
                next
            }
            None => vec![value],
        };
        self.runs.insert(cp, run);
        self.debug_check_near(cp);
        None
    }

    /// Remove the value assigned to `cp`, splitting its run if necessary.
    pub fn delete(&mut self, cp: u32) -> Option<V> {
        let (&base, run) = self.runs.range_mut(..=cp).next_back()?;
        let offset = (cp - base) as usize;
        if offset >= run.len() {
            return None;
        }
        let after = run.split_off(offset + 1);
        let removed = run.pop();
        if run.is_empty() {
            self.runs.remove(&base);
        }
        if !after.is_empty() {
            self.runs.insert(cp + 1, after);
        }
        self.debug_check_near(cp);
        removed
    }

    /// Iterate over the runs, in codepoint order.
    ///
    /// Each item is the base codepoint and the values of the run.
    pub fn runs(&self) -> impl DoubleEndedIterator<Item = (u32, &[V])> + '_ {
        self.runs.iter().map(|(base, run)| (*base, run.as_slice()))
    }

    /// Iterate over every assigned `(codepoint, value)` pair, in order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &V)> + '_ {
        self.runs.iter().flat_map(|(base, run)| {
            run.iter()
                .enumerate()
                .map(move |(ofs, value)| (base + ofs as u32, value))
        })
    }

    /// Iterate over the codepoint ranges covered by each run.
    pub fn ranges(&self) -> impl Iterator<Item = RangeInclusive<u32>> + '_ {
        self.runs
            .iter()
            .map(|(base, run)| *base..=base + (run.len() as u32 - 1))
    }

    // Runs must be non-empty and separated by at least one unassigned
    // codepoint. Only the runs around `cp` can have changed.
    fn debug_check_near(&self, cp: u32) {
        if !cfg!(debug_assertions) {
            return;
        }
        let window = self
            .runs
            .range(..=cp)
            .rev()
            .take(2)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .chain(
                cp.checked_add(1)
                    .into_iter()
                    .flat_map(|next| self.runs.range(next..).take(1)),
            );
        let mut prev_end: Option<u64> = None;
        for (base, run) in window {
            assert!(!run.is_empty(), "empty run at U+{base:04X}");
            if let Some(prev_end) = prev_end {
                assert!(
                    prev_end + 1 < *base as u64,
                    "runs are not maximal: run ending at U+{prev_end:04X} touches U+{base:04X}"
                );
            }
            prev_end = Some(*base as u64 + run.len() as u64 - 1);
        }
    }
}

impl<V: Clone> SparseCodepointMap<V> {
    /// Assign `value` to every codepoint in `range`.
    pub fn set_range(&mut self, range: RangeInclusive<u32>, value: V) {
        for cp in range {
            self.set(cp, value.clone());
        }
    }
}

impl<V> FromIterator<(u32, V)> for SparseCodepointMap<V> {
    fn from_iter<T: IntoIterator<Item = (u32, V)>>(iter: T) -> Self {
        let mut map = SparseCodepointMap::new();
        map.extend(iter);
        map
    }
}

impl<V> Extend<(u32, V)> for SparseCodepointMap<V> {
    fn extend<T: IntoIterator<Item = (u32, V)>>(&mut self, iter: T) {
        for (cp, value) in iter {
            self.set(cp, value);
        }
    }
}
