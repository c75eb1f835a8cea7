//! Change-point tables.
//!
//! A change-point table is a sorted list of `(codepoint, value)` entries,
//! each giving the value for every codepoint up to the next entry. Gaps in
//! the input reset to a per-table default, and one sentinel entry at
//! `0x110000` ends the list, so a reader can binary search for the last
//! entry at or below a codepoint.
//!
//! The segmentation, East Asian width and Indic category tables store a
//! byte per entry, packed into the top of the codepoint field; they are all
//! [`PackedChangePointTable`]s. The quick check and bidi class tables use
//! the same shape with their own value types.

use std::fmt::Debug;

use ucd_collections::SparseCodepointMap;
use ucd_types::CODEPOINT_LIMIT;

use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// One entry in a change-point table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChangePoint<V> {
    /// The first codepoint with this value
    pub cp: u32,
    /// The value
    pub value: V,
}

impl<V> ChangePoint<V> {
    pub fn new(cp: u32, value: V) -> Self {
        ChangePoint { cp, value }
    }
}

/// Compute the change points of an ordered sequence of assignments.
///
/// `assignments` must be sorted by codepoint without duplicates, which is
/// what iterating a [`SparseCodepointMap`] produces. The result starts at
/// codepoint 0 (unless the input is empty) and always ends with a sentinel
/// at `0x110000` carrying `default`.
pub fn change_points<V>(
    assignments: impl IntoIterator<Item = (u32, V)>,
    default: V,
) -> Vec<ChangePoint<V>>
where
    V: Clone + PartialEq,
{
    let mut points = Vec::new();
    let mut current: Option<V> = None;
    let mut expected = 0u32;

    for (cp, value) in assignments {
        debug_assert!(cp >= expected, "assignments out of order at {cp:#x}");
        if cp != expected && current.as_ref() != Some(&default) {
            points.push(ChangePoint::new(expected, default.clone()));
            current = Some(default.clone());
        }
        if current.as_ref() != Some(&value) {
            points.push(ChangePoint::new(cp, value.clone()));
            current = Some(value);
        }
        expected = cp.saturating_add(1);
    }

    if expected < CODEPOINT_LIMIT && current.is_some() && current.as_ref() != Some(&default) {
        points.push(ChangePoint::new(expected, default.clone()));
    }
    points.push(ChangePoint::new(CODEPOINT_LIMIT, default));
    points
}

/// Report bad codepoints and ordering in a list of change points.
///
/// The final entry is the sentinel and is expected to be `0x110000`.
pub(crate) fn check_change_points<V>(ctx: &mut ValidationCtx, points: &[ChangePoint<V>]) {
    let Some((sentinel, entries)) = points.split_last() else {
        ctx.report("missing sentinel");
        return;
    };
    if sentinel.cp != CODEPOINT_LIMIT {
        ctx.report(format_args!("sentinel at {:#x}", sentinel.cp));
    }
    ctx.in_field("entries", |ctx| {
        ctx.in_array(|ctx| {
            let mut prev: Option<u32> = None;
            for point in entries {
                ctx.array_item(|ctx| {
                    ctx.check_codepoint(point.cp);
                    if prev.is_some_and(|prev| prev >= point.cp) {
                        ctx.report("change points must be strictly increasing");
                    }
                });
                prev = Some(point.cp);
            }
        })
    });
}

/// A value that packs into the top byte of a change-point entry.
pub trait PackedValue: Copy + PartialEq + Debug {
    /// The byte stored in bits 24..32 of the entry.
    fn to_packed(self) -> u8;
}

impl PackedValue for u8 {
    fn to_packed(self) -> u8 {
        self
    }
}

/// A change-point table of `u32` entries, each `cp | value << 24`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedChangePointTable<V> {
    points: Vec<ChangePoint<V>>,
}

impl<V: PackedValue> PackedChangePointTable<V> {
    /// Build a table from a map, resetting gaps to `default`.
    pub fn new(map: &SparseCodepointMap<V>, default: V) -> Self {
        let points = change_points(map.iter().map(|(cp, v)| (cp, *v)), default);
        for point in &points {
            log::debug!("{:08x} {:?}", point.cp, point.value);
        }
        PackedChangePointTable { points }
    }

    /// The entries of the table, including the sentinel.
    pub fn points(&self) -> &[ChangePoint<V>] {
        &self.points
    }
}

impl<V: PackedValue> UcdWrite for PackedChangePointTable<V> {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.points.len() as u32).write_into(writer);
        for point in &self.points {
            (point.cp | ((point.value.to_packed() as u32) << 24)).write_into(writer);
        }
    }
}

impl<V: PackedValue> Validate for PackedChangePointTable<V> {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("PackedChangePointTable", |ctx| {
            check_change_points(ctx, &self.points);
        })
    }
}

/// Unpack the entries of a compiled packed change-point table.
#[cfg(test)]
pub(crate) fn unpack(bytes: &[u8]) -> Vec<(u32, u8)> {
    let count = u32::from_le_bytes(bytes[..4].try_into().unwrap()) as usize;
    assert_eq!(bytes.len(), 4 + count * 4);
    bytes[4..]
        .chunks(4)
        .map(|chunk| {
            let entry = u32::from_le_bytes(chunk.try_into().unwrap());
            (entry & ucd_types::CODEPOINT_MASK, (entry >> 24) as u8)
        })
        .collect()
}

/// Look up `cp` in a list of change points, the way a reader would.
#[cfg(test)]
pub(crate) fn lookup<V: Copy>(points: &[(u32, V)], cp: u32) -> V {
    let idx = points.partition_point(|(start, _)| *start <= cp);
    points[idx - 1].1
}
