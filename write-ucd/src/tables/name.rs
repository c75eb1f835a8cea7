//! The [character name](https://www.unicode.org/reports/tr44/#Name) tables
//!
//! The `name` table holds every explicit name twice: once ordered by
//! codepoint and once ordered by name, so a reader can binary search in
//! either direction. Names that are derived from the codepoint (CJK
//! ideographs, Hangul syllables) are not stored; the table lists the ranges
//! they cover instead.
//!
//! The `u1nm` and `isoc` tables use the same entry shape, but only the
//! codepoint-ordered array.

use std::ops::RangeInclusive;

use ucd_collections::SparseCodepointMap;
use ucd_types::Tag;

use super::strn::{StringId, StringPool};
use super::TopLevelTable;
use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// How the names in a [`NameRange`] are derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum NameRangeKind {
    /// `CJK UNIFIED IDEOGRAPH-XXXX`
    CjkUnifiedIdeograph = 1,
    /// `CJK COMPATIBILITY IDEOGRAPH-XXXX`
    CjkCompatibilityIdeograph = 2,
    /// Composed from the jamo short names.
    HangulSyllable = 3,
}

impl NameRangeKind {
    /// The kind for a range label from `UnicodeData.txt`, such as the
    /// `CJK Ideograph Extension A` in `<CJK Ideograph Extension A, First>`.
    ///
    /// Returns `None` for ranges whose members have no derived name
    /// (private use, surrogates, and so on).
    pub fn from_label(label: &str) -> Option<Self> {
        if label.starts_with("CJK Ideograph") {
            Some(NameRangeKind::CjkUnifiedIdeograph)
        } else if label.starts_with("CJK Compatibility Ideograph") {
            Some(NameRangeKind::CjkCompatibilityIdeograph)
        } else if label == "Hangul Syllable" {
            Some(NameRangeKind::HangulSyllable)
        } else {
            None
        }
    }
}

/// A range of codepoints whose names are derived rather than stored.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NameRange {
    pub range: RangeInclusive<u32>,
    pub kind: NameRangeKind,
}

impl NameRange {
    pub fn new(range: RangeInclusive<u32>, kind: NameRangeKind) -> Self {
        NameRange { range, kind }
    }
}

impl UcdWrite for NameRange {
    fn write_into(&self, writer: &mut TableWriter) {
        self.range.start().write_into(writer);
        self.range.end().write_into(writer);
        (self.kind as u32).write_into(writer);
    }
}

impl Validate for NameRange {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.check_codepoint_range(*self.range.start(), *self.range.end());
    }
}

/// A codepoint and the id of a string attached to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameEntry {
    pub cp: u32,
    pub name: StringId,
}

impl UcdWrite for NameEntry {
    fn write_into(&self, writer: &mut TableWriter) {
        self.cp.write_into(writer);
        self.name.write_into(writer);
    }
}

impl Validate for NameEntry {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.check_codepoint(self.cp);
    }
}

/// The compiled `name` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameTable {
    by_codepoint: Vec<NameEntry>,
    by_name: Vec<NameEntry>,
    ranges: Vec<NameRange>,
    empty: Vec<u32>,
}

impl NameTable {
    /// Build the table, adding the names to `strings` in codepoint order.
    pub fn new(
        names: &SparseCodepointMap<String>,
        ranges: &[NameRange],
        strings: &mut StringPool,
    ) -> Self {
        let mut named = Vec::new();
        let mut empty = Vec::new();
        for (cp, name) in names.iter() {
            if name.is_empty() {
                empty.push(cp);
                continue;
            }
            named.push((name.as_str(), NameEntry { cp, name: strings.add(name) }));
        }
        let by_codepoint = named.iter().map(|(_, entry)| *entry).collect();
        named.sort_by(|(a_name, a), (b_name, b)| a_name.cmp(b_name).then(a.cp.cmp(&b.cp)));
        let by_name = named.into_iter().map(|(_, entry)| entry).collect();

        let mut ranges = ranges.to_vec();
        ranges.sort_by_key(|range| *range.range.start());
        for range in &ranges {
            log::debug!(
                "{:08x}..={:08x} {:?}",
                range.range.start(),
                range.range.end(),
                range.kind
            );
        }
        NameTable {
            by_codepoint,
            by_name,
            ranges,
            empty,
        }
    }

    /// The entries ordered by codepoint.
    pub fn by_codepoint(&self) -> &[NameEntry] {
        &self.by_codepoint
    }

    /// The same entries, ordered by the name strings.
    pub fn by_name(&self) -> &[NameEntry] {
        &self.by_name
    }

    pub fn ranges(&self) -> &[NameRange] {
        &self.ranges
    }
}

impl TopLevelTable for NameTable {
    const TAG: Tag = Tag::new(b"name");
}

impl UcdWrite for NameTable {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.by_codepoint.len() as u32).write_into(writer);
        self.by_codepoint.write_into(writer);
        self.by_name.write_into(writer);
        (self.ranges.len() as u32).write_into(writer);
        self.ranges.write_into(writer);
    }
}

impl Validate for NameTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("NameTable", |ctx| {
            ctx.in_field("by_codepoint", |ctx| {
                self.by_codepoint.validate_impl(ctx);
                for cp in &self.empty {
                    ctx.report(format_args!("empty name for 0x{cp:X}"));
                }
            });
            ctx.in_field("ranges", |ctx| {
                self.ranges.validate_impl(ctx);
                for pair in self.ranges.windows(2) {
                    if pair[0].range.end() >= pair[1].range.start() {
                        ctx.report(format_args!(
                            "name ranges at 0x{:X} and 0x{:X} overlap",
                            pair[0].range.start(),
                            pair[1].range.start()
                        ));
                    }
                }
                for entry in &self.by_codepoint {
                    if let Some(range) = self.ranges.iter().find(|r| r.range.contains(&entry.cp)) {
                        ctx.report(format_args!(
                            "0x{:X} has a stored name inside the {:?} range",
                            entry.cp, range.kind
                        ));
                    }
                }
            });
        })
    }
}

/// A table of per-codepoint strings, ordered by codepoint.
///
/// This is the layout of the `u1nm` (Unicode 1 name) and `isoc` (ISO
/// comment) tables; add it to a builder with the tag it stands for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodepointStringTable {
    entries: Vec<NameEntry>,
}

impl CodepointStringTable {
    /// Build the table, adding the strings to `strings`.
    ///
    /// Codepoints mapped to an empty string are left out.
    pub fn new(values: &SparseCodepointMap<String>, strings: &mut StringPool) -> Self {
        let entries = values
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(cp, value)| NameEntry {
                cp,
                name: strings.add(value),
            })
            .collect::<Vec<_>>();
        log::debug!("{} strings", entries.len());
        CodepointStringTable { entries }
    }

    pub fn entries(&self) -> &[NameEntry] {
        &self.entries
    }
}

impl UcdWrite for CodepointStringTable {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.entries.len() as u32).write_into(writer);
        self.entries.write_into(writer);
    }
}

impl Validate for CodepointStringTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("CodepointStringTable", |ctx| {
            ctx.in_field("entries", |ctx| self.entries.validate_impl(ctx))
        })
    }
}
