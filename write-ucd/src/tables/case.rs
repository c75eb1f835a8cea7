//! The case mapping tables: `CASE`, `case`, `Case`, `csef`, `kccf` and `nfkc`.
//!
//! One encoding serves all six tables. The encoder walks the runs of a
//! [`SparseCodepointMap`] in order and picks the most compact record shape
//! for each stretch of values:
//!
//! - contiguous scalar mappings become a single entry, a constant delta, a
//!   small inline table, or a table in side data;
//! - isolated scalar mappings two codepoints apart with a constant delta of
//!   ±1 are merged into one *stride* record, which requires holding the
//!   last isolated mapping back until we know whether the next one extends
//!   it;
//! - multi-codepoint mappings are packed inline as UTF-16 when they fit, and
//!   otherwise stored as NUL-terminated UTF-16 in side data;
//! - explicit "maps to nothing" values are merged into empty ranges.

use std::fmt::Display;

use ucd_collections::SparseCodepointMap;
use ucd_types::codepoint::encode_utf16;

use crate::offsets::{DataOffset, Record, RecordTable, SideData};
use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// The value a case mapping assigns to one codepoint.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CaseMapping {
    /// Maps to one codepoint.
    Single(u32),
    /// Maps to a sequence of codepoints.
    Multiple(Vec<u32>),
    /// Has both a simple (one codepoint) and a full mapping.
    ///
    /// Only the case folding table has these.
    SimpleFull {
        /// The simple mapping
        simple: u32,
        /// The full mapping
        full: Vec<u32>,
    },
    /// Maps to nothing; the codepoint is removed.
    Empty,
}

/// The kind discriminant stored in the top byte of every case record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CaseRangeKind {
    Single = 0,
    Delta = 1,
    Even = 2,
    Odd = 3,
    EvenUp = 4,
    OddDown = 5,
    Packed = 6,
    External = 7,
    Table = 8,
    Ucs4Table = 9,
    Ucs2Table3 = 10,
    Ucs2Table4 = 11,
    SimpleFullPacked = 12,
    SimpleFullExternal = 13,
    Empty = 14,
}

/// One 12-byte record in a case table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaseRecord {
    /// `cp` maps to `mapped`.
    Single { cp: u32, mapped: u32 },
    /// Every codepoint in the range maps to itself plus `delta`.
    Delta { first: u32, last: u32, delta: i32 },
    /// Every codepoint in the range maps to `cp & !1`.
    Even { first: u32, last: u32 },
    /// Every codepoint in the range maps to `cp | 1`.
    Odd { first: u32, last: u32 },
    /// Every codepoint in the range maps to `cp + (cp & 1)`.
    EvenUp { first: u32, last: u32 },
    /// Every codepoint in the range maps to `cp - (!cp & 1)`.
    OddDown { first: u32, last: u32 },
    /// Up to four UTF-16 code units, zero padded.
    Packed { cp: u32, units: [u16; 4] },
    /// NUL-terminated UTF-16 in side data.
    External { cp: u32, offset: DataOffset },
    /// An array of `last - first + 1` codepoints in side data.
    Table {
        first: u32,
        last: u32,
        offset: DataOffset,
    },
    /// Two codepoints, inline.
    Ucs4Table { first: u32, values: [u32; 2] },
    /// Three BMP codepoints, inline.
    Ucs2Table3 { first: u32, values: [u16; 3] },
    /// Four BMP codepoints, inline.
    Ucs2Table4 { first: u32, values: [u16; 4] },
    /// A simple mapping plus up to two UTF-16 code units of full mapping.
    SimpleFullPacked { cp: u32, simple: u32, full: [u16; 2] },
    /// A simple mapping plus a full mapping in side data.
    SimpleFullExternal {
        cp: u32,
        simple: u32,
        offset: DataOffset,
    },
    /// Every codepoint in the range maps to nothing.
    Empty { first: u32, last: u32 },
}

impl CaseRecord {
    /// The kind discriminant of this record.
    pub fn kind(&self) -> CaseRangeKind {
        match self {
            CaseRecord::Single { .. } => CaseRangeKind::Single,
            CaseRecord::Delta { .. } => CaseRangeKind::Delta,
            CaseRecord::Even { .. } => CaseRangeKind::Even,
            CaseRecord::Odd { .. } => CaseRangeKind::Odd,
            CaseRecord::EvenUp { .. } => CaseRangeKind::EvenUp,
            CaseRecord::OddDown { .. } => CaseRangeKind::OddDown,
            CaseRecord::Packed { .. } => CaseRangeKind::Packed,
            CaseRecord::External { .. } => CaseRangeKind::External,
            CaseRecord::Table { .. } => CaseRangeKind::Table,
            CaseRecord::Ucs4Table { .. } => CaseRangeKind::Ucs4Table,
            CaseRecord::Ucs2Table3 { .. } => CaseRangeKind::Ucs2Table3,
            CaseRecord::Ucs2Table4 { .. } => CaseRangeKind::Ucs2Table4,
            CaseRecord::SimpleFullPacked { .. } => CaseRangeKind::SimpleFullPacked,
            CaseRecord::SimpleFullExternal { .. } => CaseRangeKind::SimpleFullExternal,
            CaseRecord::Empty { .. } => CaseRangeKind::Empty,
        }
    }

    /// The first and last codepoints covered by this record.
    pub fn range(&self) -> (u32, u32) {
        match *self {
            CaseRecord::Single { cp, .. }
            | CaseRecord::Packed { cp, .. }
            | CaseRecord::External { cp, .. }
            | CaseRecord::SimpleFullPacked { cp, .. }
            | CaseRecord::SimpleFullExternal { cp, .. } => (cp, cp),
            CaseRecord::Delta { first, last, .. }
            | CaseRecord::Even { first, last }
            | CaseRecord::Odd { first, last }
            | CaseRecord::EvenUp { first, last }
            | CaseRecord::OddDown { first, last }
            | CaseRecord::Table { first, last, .. }
            | CaseRecord::Empty { first, last } => (first, last),
            CaseRecord::Ucs4Table { first, .. } => (first, first.saturating_add(1)),
            CaseRecord::Ucs2Table3 { first, .. } => (first, first.saturating_add(2)),
            CaseRecord::Ucs2Table4 { first, .. } => (first, first.saturating_add(3)),
        }
    }

    fn entry(&self) -> u32 {
        self.range().0 | ((self.kind() as u32) << 24)
    }
}

impl Display for CaseRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseRecord::Single { cp, mapped } => write!(f, "single {cp:08x} -> {mapped:08x}"),
            CaseRecord::Delta { first, last, delta } => {
                write!(f, "delta {first:08x}..{last:08x} {delta}")
            }
            CaseRecord::Even { first, last } => write!(f, "even- {first:08x}..{last:08x}"),
            CaseRecord::Odd { first, last } => write!(f, "odd+ {first:08x}..{last:08x}"),
            CaseRecord::EvenUp { first, last } => write!(f, "even+ {first:08x}..{last:08x}"),
            CaseRecord::OddDown { first, last } => write!(f, "odd- {first:08x}..{last:08x}"),
            CaseRecord::Packed { cp, units } => write!(f, "packed {cp:08x}: {units:04x?}"),
            CaseRecord::External { cp, .. } => write!(f, "utf16table {cp:08x}"),
            CaseRecord::Table { first, last, .. } => write!(f, "table {first:08x}..{last:08x}"),
            CaseRecord::Ucs4Table { first, values } => {
                write!(f, "ucs4tbl {first:08x}: {values:08x?}")
            }
            CaseRecord::Ucs2Table3 { first, values } => {
                write!(f, "ucs2t3 {first:08x}: {values:04x?}")
            }
            CaseRecord::Ucs2Table4 { first, values } => {
                write!(f, "ucs2t4 {first:08x}: {values:04x?}")
            }
            CaseRecord::SimpleFullPacked { cp, simple, full } => {
                write!(f, "sf_packed {cp:08x}: {simple:08x}, {full:04x?}")
            }
            CaseRecord::SimpleFullExternal { cp, simple, .. } => {
                write!(f, "sf_ext {cp:08x}: {simple:08x}, ...")
            }
            CaseRecord::Empty { first, last } => write!(f, "empty {first:08x}..{last:08x}"),
        }
    }
}

impl UcdWrite for CaseRecord {
    fn write_into(&self, writer: &mut TableWriter) {
        self.entry().write_into(writer);
        match self {
            CaseRecord::Single { mapped, .. } => {
                mapped.write_into(writer);
                0u32.write_into(writer);
            }
            CaseRecord::Delta { last, delta, .. } => {
                last.write_into(writer);
                delta.write_into(writer);
            }
            CaseRecord::Even { last, .. }
            | CaseRecord::Odd { last, .. }
            | CaseRecord::EvenUp { last, .. }
            | CaseRecord::OddDown { last, .. }
            | CaseRecord::Empty { last, .. } => {
                last.write_into(writer);
                0u32.write_into(writer);
            }
            CaseRecord::Packed { units, .. } => units.write_into(writer),
            CaseRecord::External { offset, .. } => {
                offset.write_into(writer);
                0u32.write_into(writer);
            }
            CaseRecord::Table { last, offset, .. } => {
                last.write_into(writer);
                offset.write_into(writer);
            }
            CaseRecord::Ucs4Table { values, .. } => values.write_into(writer),
            CaseRecord::Ucs2Table3 { values, .. } => {
                values.write_into(writer);
                0u16.write_into(writer);
            }
            CaseRecord::Ucs2Table4 { values, .. } => values.write_into(writer),
            CaseRecord::SimpleFullPacked { simple, full, .. } => {
                simple.write_into(writer);
                full.write_into(writer);
            }
            CaseRecord::SimpleFullExternal { simple, offset, .. } => {
                simple.write_into(writer);
                offset.write_into(writer);
            }
        }
    }
}

impl Record for CaseRecord {
    const RECORD_LEN: usize = 12;

    fn data_offset_mut(&mut self) -> Option<&mut DataOffset> {
        match self {
            CaseRecord::External { offset, .. }
            | CaseRecord::Table { offset, .. }
            | CaseRecord::SimpleFullExternal { offset, .. } => Some(offset),
            _ => None,
        }
    }
}

impl Validate for CaseRecord {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        let (first, last) = self.range();
        ctx.check_codepoint_range(first, last);
        match self {
            CaseRecord::Single { mapped, .. } => ctx.check_codepoint(*mapped),
            CaseRecord::SimpleFullPacked { simple, .. }
            | CaseRecord::SimpleFullExternal { simple, .. } => ctx.check_codepoint(*simple),
            CaseRecord::Ucs4Table { values, .. } => {
                values.iter().for_each(|v| ctx.check_codepoint(*v))
            }
            _ => (),
        }
    }
}

/// A compiled case mapping table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseTable {
    table: RecordTable<CaseRecord>,
}

impl CaseTable {
    /// Encode the mappings in `map`.
    pub fn new(map: &SparseCodepointMap<CaseMapping>) -> Self {
        let mut encoder = CaseEncoder::default();
        for (base, values) in map.runs() {
            encoder.add_run(base, values);
        }
        encoder.finish()
    }

    /// The records of the table, with offsets resolved.
    pub fn records(&self) -> &[CaseRecord] {
        self.table.records()
    }
}

impl UcdWrite for CaseTable {
    fn write_into(&self, writer: &mut TableWriter) {
        self.table.write_into(writer)
    }
}

impl Validate for CaseTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("CaseTable", |ctx| self.table.validate_impl(ctx))
    }
}

/// The classification pass.
#[derive(Default)]
struct CaseEncoder {
    records: Vec<CaseRecord>,
    data: SideData,
    // isolated (cp, mapped) pairs that may still grow into a stride
    stride: Vec<(u32, u32)>,
}

impl CaseEncoder {
    fn add_run(&mut self, base: u32, values: &[CaseMapping]) {
        let mut chunk_start = base;
        let mut chunk: Vec<u32> = Vec::new();
        let mut empty: Option<(u32, u32)> = None;

        for (cp, value) in (base..).zip(values) {
            match value {
                CaseMapping::Single(mapped) => {
                    self.finish_empty(&mut empty);
                    if chunk.is_empty() {
                        chunk_start = cp;
                    }
                    chunk.push(*mapped);
                }
                CaseMapping::Empty => match empty.as_mut() {
                    Some((_, last)) => *last = cp,
                    None => {
                        self.finish_chunk(chunk_start, &mut chunk);
                        self.finish_stride();
                        empty = Some((cp, cp));
                    }
                },
                CaseMapping::Multiple(cps) => {
                    self.finish_empty(&mut empty);
                    self.finish_chunk(chunk_start, &mut chunk);
                    self.finish_stride();
                    self.add_multiple(cp, cps);
                }
                CaseMapping::SimpleFull { simple, full } => {
                    self.finish_empty(&mut empty);
                    self.finish_chunk(chunk_start, &mut chunk);
                    self.finish_stride();
                    self.add_simple_full(cp, *simple, full);
                }
            }
        }
        self.finish_empty(&mut empty);
        self.finish_chunk(chunk_start, &mut chunk);
    }

    fn finish(mut self) -> CaseTable {
        self.finish_stride();
        CaseTable {
            table: RecordTable::new(self.records, self.data),
        }
    }

    fn push(&mut self, record: CaseRecord) {
        log::debug!("{record}");
        self.records.push(record);
    }

    fn finish_empty(&mut self, empty: &mut Option<(u32, u32)>) {
        if let Some((first, last)) = empty.take() {
            self.push(CaseRecord::Empty { first, last });
        }
    }

    fn add_multiple(&mut self, cp: u32, cps: &[u32]) {
        let units = encode_utf16(cps);
        if units.len() <= 4 {
            let mut packed = [0u16; 4];
            packed[..units.len()].copy_from_slice(&units);
            self.push(CaseRecord::Packed { cp, units: packed });
        } else {
            let offset = self.push_utf16(&units);
            self.push(CaseRecord::External { cp, offset });
        }
    }

    fn add_simple_full(&mut self, cp: u32, simple: u32, full: &[u32]) {
        let units = encode_utf16(full);
        if units.len() <= 2 {
            let mut packed = [0u16; 2];
            packed[..units.len()].copy_from_slice(&units);
            self.push(CaseRecord::SimpleFullPacked {
                cp,
                simple,
                full: packed,
            });
        } else {
            let offset = self.push_utf16(&units);
            self.push(CaseRecord::SimpleFullExternal { cp, simple, offset });
        }
    }

    fn push_utf16(&mut self, units: &[u16]) -> DataOffset {
        let offset = self.data.push(units);
        self.data.push(&0u16);
        offset
    }

    /// Classify a contiguous run of scalar mappings starting at `first`.
    fn finish_chunk(&mut self, first: u32, chunk: &mut Vec<u32>) {
        match chunk.as_slice() {
            [] => return,
            [mapped] => self.add_isolated(first, *mapped),
            values => {
                self.finish_stride();
                let record = self.classify_chunk(first, values);
                self.push(record);
            }
        }
        chunk.clear();
    }

    fn classify_chunk(&mut self, first: u32, values: &[u32]) -> CaseRecord {
        let last = first + (values.len() as u32 - 1);
        let step = delta(first, values[0]);
        if (first..).zip(values).all(|(cp, mapped)| delta(cp, *mapped) == step) {
            if let Ok(delta) = i32::try_from(step) {
                return CaseRecord::Delta { first, last, delta };
            }
        }

        let bmp = values.iter().all(|v| *v <= 0xFFFF);
        match values {
            [v0, v1] => CaseRecord::Ucs4Table {
                first,
                values: [*v0, *v1],
            },
            [v0, v1, v2] if bmp => CaseRecord::Ucs2Table3 {
                first,
                values: [*v0 as u16, *v1 as u16, *v2 as u16],
            },
            [v0, v1, v2, v3] if bmp => CaseRecord::Ucs2Table4 {
                first,
                values: [*v0 as u16, *v1 as u16, *v2 as u16, *v3 as u16],
            },
            _ => CaseRecord::Table {
                first,
                last,
                offset: self.data.push(values),
            },
        }
    }

    /// Handle a scalar mapping with no scalar neighbours.
    ///
    /// Mappings with a delta of ±1 are held back in the stride buffer while
    /// each new one lands two codepoints after the last with the same delta.
    fn add_isolated(&mut self, cp: u32, mapped: u32) {
        if let Some(&(prev_cp, prev_mapped)) = self.stride.last() {
            if Some(cp) == prev_cp.checked_add(2)
                && delta(cp, mapped) == delta(prev_cp, prev_mapped)
            {
                self.stride.push((cp, mapped));
                return;
            }
            self.finish_stride();
        }
        self.stride.push((cp, mapped));
        if cp.abs_diff(mapped) != 1 {
            self.finish_stride();
        }
    }

    fn finish_stride(&mut self) {
        let record = match self.stride.as_slice() {
            [] => return,
            [(cp, mapped)] => CaseRecord::Single {
                cp: *cp,
                mapped: *mapped,
            },
            [(first, mapped), .., (last, _)] => {
                let (first, last) = (*first, *last);
                let record = match (mapped & 1 == 1, mapped > &first) {
                    (true, true) => CaseRecord::Odd { first, last },
                    (false, false) => CaseRecord::Even { first, last },
                    (false, true) => CaseRecord::EvenUp { first, last },
                    (true, false) => CaseRecord::OddDown { first, last },
                };
                debug_assert!(
                    self.stride
                        .iter()
                        .all(|(cp, mapped)| stride_mapping(&record, *cp) == Some(*mapped)),
                    "stride {record} does not reproduce its members"
                );
                record
            }
        };
        self.stride.clear();
        self.push(record);
    }
}

fn delta(cp: u32, mapped: u32) -> i64 {
    mapped as i64 - cp as i64
}

/// The mapping a stride record gives `cp`.
fn stride_mapping(record: &CaseRecord, cp: u32) -> Option<u32> {
    match record {
        CaseRecord::Even { .. } => Some(cp & !1),
        CaseRecord::Odd { .. } => Some(cp | 1),
        CaseRecord::EvenUp { .. } => Some(cp + (cp & 1)),
        CaseRecord::OddDown { .. } => Some(cp - (!cp & 1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use ucd_types::codepoint::decode_utf16;

    use super::*;

    fn u32_at(bytes: &[u8], pos: usize) -> u32 {
        u32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap())
    }

    fn u16_at(bytes: &[u8], pos: usize) -> u16 {
        u16::from_le_bytes(bytes[pos..pos + 2].try_into().unwrap())
    }

    fn utf16_at(bytes: &[u8], pos: usize) -> Vec<u32> {
        let units = (pos..bytes.len())
            .step_by(2)
            .map(|p| u16_at(bytes, p))
            .take_while(|u| *u != 0)
            .collect::<Vec<_>>();
        decode_utf16(&units)
    }

    /// Decode a compiled table back into per-codepoint mappings.
    ///
    /// Stride records cover the codepoints between their members, which map
    /// to themselves; those are left out.
    fn decode(bytes: &[u8]) -> (Vec<CaseRangeKind>, BTreeMap<u32, CaseMapping>) {
        let count = u32_at(bytes, 0) as usize;
        let mut kinds = Vec::new();
        let mut out = BTreeMap::new();
        for i in 0..count {
            let pos = 4 + i * 12;
            let entry = u32_at(bytes, pos);
            let first = entry & 0xFF_FFFF;
            let (a, b) = (u32_at(bytes, pos + 4), u32_at(bytes, pos + 8));
            let kind = entry >> 24;
            let mut set = |cp: u32, value: CaseMapping| {
                out.insert(cp, value);
            };
            let kind = match kind {
                0 => {
                    set(first, CaseMapping::Single(a));
                    CaseRangeKind::Single
                }
                1 => {
                    for cp in first..=a {
                        set(cp, CaseMapping::Single((cp as i64 + b as i32 as i64) as u32));
                    }
                    CaseRangeKind::Delta
                }
                2..=5 => {
                    for cp in first..=a {
                        let mapped = match kind {
                            2 => cp & !1,
                            3 => cp | 1,
                            4 => cp + (cp & 1),
                            _ => cp - (!cp & 1),
                        };
                        if mapped != cp {
                            set(cp, CaseMapping::Single(mapped));
                        }
                    }
                    [
                        CaseRangeKind::Even,
                        CaseRangeKind::Odd,
                        CaseRangeKind::EvenUp,
                        CaseRangeKind::OddDown,
                    ][kind as usize - 2]
                }
                6 => {
                    let units = (0..4).map(|j| u16_at(bytes, pos + 4 + j * 2)).collect::<Vec<_>>();
                    set(first, CaseMapping::Multiple(decode_utf16(&units)));
                    CaseRangeKind::Packed
                }
                7 => {
                    set(first, CaseMapping::Multiple(utf16_at(bytes, a as usize)));
                    CaseRangeKind::External
                }
                8 => {
                    for (j, cp) in (first..=a).enumerate() {
                        set(cp, CaseMapping::Single(u32_at(bytes, b as usize + j * 4)));
                    }
                    CaseRangeKind::Table
                }
                9 => {
                    set(first, CaseMapping::Single(a));
                    set(first + 1, CaseMapping::Single(b));
                    CaseRangeKind::Ucs4Table
                }
                10 | 11 => {
                    let n = if kind == 10 { 3 } else { 4 };
                    for j in 0..n {
                        let value = u16_at(bytes, pos + 4 + j * 2) as u32;
                        set(first + j as u32, CaseMapping::Single(value));
                    }
                    if kind == 10 {
                        CaseRangeKind::Ucs2Table3
                    } else {
                        CaseRangeKind::Ucs2Table4
                    }
                }
                12 => {
                    let full = decode_utf16(&[u16_at(bytes, pos + 8), u16_at(bytes, pos + 10)]);
                    set(first, CaseMapping::SimpleFull { simple: a, full });
                    CaseRangeKind::SimpleFullPacked
                }
                13 => {
                    let full = utf16_at(bytes, b as usize);
                    set(first, CaseMapping::SimpleFull { simple: a, full });
                    CaseRangeKind::SimpleFullExternal
                }
                14 => {
                    for cp in first..=a {
                        set(cp, CaseMapping::Empty);
                    }
                    CaseRangeKind::Empty
                }
                other => panic!("unknown case record kind {other}"),
            };
            kinds.push(kind);
        }
        (kinds, out)
    }

    fn compile(map: &SparseCodepointMap<CaseMapping>) -> Vec<u8> {
        crate::dump_table(&CaseTable::new(map)).unwrap()
    }

    fn scalar_map(pairs: &[(u32, u32)]) -> SparseCodepointMap<CaseMapping> {
        pairs
            .iter()
            .map(|(cp, mapped)| (*cp, CaseMapping::Single(*mapped)))
            .collect()
    }

    fn assert_round_trip(map: &SparseCodepointMap<CaseMapping>) -> Vec<CaseRangeKind> {
        let bytes = compile(map);
        let (kinds, decoded) = decode(&bytes);
        let expected = map
            .iter()
            .map(|(cp, v)| (cp, v.clone()))
            .collect::<BTreeMap<_, _>>();
        assert_eq!(decoded, expected);
        kinds
    }

    #[rstest]
    #[case::single(&[(0x41, 0x61)], CaseRangeKind::Single)]
    #[case::delta(&[(0x41, 0x61), (0x42, 0x62), (0x43, 0x63)], CaseRangeKind::Delta)]
    #[case::negative_delta(&[(0x61, 0x41), (0x62, 0x42)], CaseRangeKind::Delta)]
    #[case::odd_stride(&[(0x100, 0x101), (0x102, 0x103), (0x104, 0x105)], CaseRangeKind::Odd)]
    #[case::even_stride(&[(0x101, 0x100), (0x103, 0x102), (0x105, 0x104)], CaseRangeKind::Even)]
    #[case::even_up_stride(&[(0x101, 0x102), (0x103, 0x104), (0x105, 0x106)], CaseRangeKind::EvenUp)]
    #[case::odd_down_stride(&[(0x102, 0x101), (0x104, 0x103)], CaseRangeKind::OddDown)]
    #[case::ucs4_pair(&[(0x1E9E, 0xDF), (0x1E9F, 0x1F600)], CaseRangeKind::Ucs4Table)]
    #[case::ucs2_three(&[(0x10, 0x50), (0x11, 0x70), (0x12, 0x60)], CaseRangeKind::Ucs2Table3)]
    #[case::ucs2_four(&[(0x10, 0x50), (0x11, 0x70), (0x12, 0x60), (0x13, 0x90)], CaseRangeKind::Ucs2Table4)]
    #[case::wide_three(&[(0x10, 0x50), (0x11, 0x10400), (0x12, 0x60)], CaseRangeKind::Table)]
    #[case::five(&[(0x10, 0x50), (0x11, 0x70), (0x12, 0x60), (0x13, 0x90), (0x14, 0x20)], CaseRangeKind::Table)]
    fn scalar_shapes(#[case] pairs: &[(u32, u32)], #[case] expected: CaseRangeKind) {
        let map = scalar_map(pairs);
        let kinds = assert_round_trip(&map);
        assert_eq!(kinds, vec![expected]);
    }

    #[rstest]
    #[case::packed(CaseMapping::Multiple(vec![0x53, 0x53]), CaseRangeKind::Packed)]
    #[case::packed_four_units(CaseMapping::Multiple(vec![0x1F600, 0x1F601]), CaseRangeKind::Packed)]
    #[case::external(CaseMapping::Multiple(vec![0x399, 0x308, 0x301, 0x41, 0x42]), CaseRangeKind::External)]
    #[case::simple_full_packed(CaseMapping::SimpleFull { simple: 0x3B9, full: vec![0x3B9, 0x308] }, CaseRangeKind::SimpleFullPacked)]
    #[case::simple_full_external(CaseMapping::SimpleFull { simple: 0x3C5, full: vec![0x3C5, 0x313, 0x300] }, CaseRangeKind::SimpleFullExternal)]
    #[case::empty(CaseMapping::Empty, CaseRangeKind::Empty)]
    fn sequence_shapes(#[case] value: CaseMapping, #[case] expected: CaseRangeKind) {
        let mut map = SparseCodepointMap::new();
        map.set(0x1F52, value);
        let kinds = assert_round_trip(&map);
        assert_eq!(kinds, vec![expected]);
    }

    #[test]
    fn ucs2_table4_uses_its_own_discriminant() {
        let map = scalar_map(&[(0x10, 0x50), (0x11, 0x70), (0x12, 0x60), (0x13, 0x90)]);
        let bytes = compile(&map);
        assert_eq!(u32_at(&bytes, 4) >> 24, 11);
    }

    #[test]
    fn delta_is_preferred() {
        let map = scalar_map(&[(0x41, 0x61), (0x42, 0x62), (0x43, 0x63)]);
        let table = CaseTable::new(&map);
        assert_eq!(
            table.records(),
            [CaseRecord::Delta {
                first: 0x41,
                last: 0x43,
                delta: 0x20
            }]
        );
    }

    #[test]
    fn ascending_stride_from_even() {
        let map = scalar_map(&[(0x100, 0x101), (0x102, 0x103), (0x104, 0x105)]);
        let table = CaseTable::new(&map);
        assert_eq!(
            table.records(),
            [CaseRecord::Odd {
                first: 0x100,
                last: 0x104
            }]
        );
    }

    #[test]
    fn stride_breaks_on_delta_change() {
        let map = scalar_map(&[(0x100, 0x101), (0x102, 0x103), (0x105, 0x104), (0x107, 0x106)]);
        let table = CaseTable::new(&map);
        assert_eq!(
            table.records(),
            [
                CaseRecord::Odd {
                    first: 0x100,
                    last: 0x102
                },
                CaseRecord::Even {
                    first: 0x105,
                    last: 0x107
                }
            ]
        );
    }

    #[test]
    fn stride_flushed_by_sequence_mapping() {
        let mut map = scalar_map(&[(0x100, 0x101), (0x104, 0x105)]);
        map.set(0x102, CaseMapping::Multiple(vec![0x41, 0x42]));
        let kinds = assert_round_trip(&map);
        assert_eq!(
            kinds,
            [
                CaseRangeKind::Single,
                CaseRangeKind::Packed,
                CaseRangeKind::Single
            ]
        );
    }

    #[test]
    fn isolated_non_unit_delta_is_single() {
        let map = scalar_map(&[(0x100, 0x200), (0x102, 0x202)]);
        let kinds = assert_round_trip(&map);
        assert_eq!(kinds, [CaseRangeKind::Single, CaseRangeKind::Single]);
    }

    #[test]
    fn empty_range_is_one_record() {
        let mut map = SparseCodepointMap::new();
        map.set_range(0x500..=0x5FF, CaseMapping::Empty);
        let table = CaseTable::new(&map);
        assert_eq!(
            table.records(),
            [CaseRecord::Empty {
                first: 0x500,
                last: 0x5FF
            }]
        );
    }

    #[test]
    fn empty_splits_scalar_chunks() {
        let mut map = scalar_map(&[(0x10, 0x20), (0x11, 0x21), (0x14, 0x24), (0x15, 0x25)]);
        map.set(0x12, CaseMapping::Empty);
        map.set(0x13, CaseMapping::Empty);
        let kinds = assert_round_trip(&map);
        assert_eq!(
            kinds,
            [
                CaseRangeKind::Delta,
                CaseRangeKind::Empty,
                CaseRangeKind::Delta
            ]
        );
    }

    #[test]
    fn offsets_point_at_payloads() {
        let mut map = SparseCodepointMap::new();
        map.set(0x10, CaseMapping::Multiple(vec![0x41, 0x42, 0x43, 0x44, 0x45]));
        map.set(0x20, CaseMapping::Single(0x30));
        map.set(0x21, CaseMapping::Single(0x10300));
        map.set(0x22, CaseMapping::Single(0x31));
        map.set(
            0x30,
            CaseMapping::SimpleFull {
                simple: 0x61,
                full: vec![0x61, 0x62, 0x63],
            },
        );

        let mut encoder = CaseEncoder::default();
        for (base, values) in map.runs() {
            encoder.add_run(base, values);
        }
        encoder.finish_stride();
        let relative = encoder
            .records
            .iter_mut()
            .filter_map(|r| r.data_offset_mut().and_then(|o| o.relative()))
            .collect::<Vec<_>>();
        let record_count = encoder.records.len();
        assert_eq!(relative, [0, 12, 24]);

        let table = CaseTable::new(&map);
        let bytes = crate::dump_table(&table).unwrap();
        let base = (4 + 12 * record_count) as u32;
        let resolved = table
            .records()
            .iter()
            .filter_map(|r| r.clone().data_offset_mut().and_then(|o| o.resolved()))
            .collect::<Vec<_>>();
        assert_eq!(resolved, relative.iter().map(|r| r + base).collect::<Vec<_>>());

        assert_eq!(utf16_at(&bytes, resolved[0] as usize), [0x41, 0x42, 0x43, 0x44, 0x45]);
        assert_eq!(u32_at(&bytes, resolved[1] as usize), 0x30);
        assert_eq!(u32_at(&bytes, resolved[1] as usize + 4), 0x10300);
        assert_eq!(utf16_at(&bytes, resolved[2] as usize), [0x61, 0x62, 0x63]);
        assert_eq!(bytes.len(), base as usize + 12 + 12 + 8);
    }

    #[test]
    fn mixed_map_round_trips() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut map = SparseCodepointMap::new();
        for cp in 0x41..=0x5A {
            map.set(cp, CaseMapping::Single(cp + 0x20));
        }
        for cp in (0x100..0x130).step_by(2) {
            map.set(cp, CaseMapping::Single(cp + 1));
        }
        map.set(0xDF, CaseMapping::SimpleFull {
            simple: 0xDF,
            full: vec![0x73, 0x73],
        });
        map.set(0x149, CaseMapping::Multiple(vec![0x2BC, 0x4E]));
        map.set(0x1F80, CaseMapping::Multiple(vec![0x1F00, 0x3B9, 0x300, 0x301, 0x302]));
        map.set_range(0x180B..=0x180D, CaseMapping::Empty);
        map.set(0x180E, CaseMapping::Single(0x20));
        map.set(0x10400, CaseMapping::Single(0x10428));
        map.set(0x10401, CaseMapping::Single(0x10429));
        map.set(0x10402, CaseMapping::Single(0x41));
        assert_round_trip(&map);
    }

    #[test]
    fn compilation_is_deterministic() {
        let mut map = scalar_map(&[(0x41, 0x61), (0x100, 0x101), (0x102, 0x103)]);
        map.set(0x300, CaseMapping::Multiple(vec![1, 2, 3, 4, 5, 6]));
        assert_eq!(compile(&map), compile(&map));
    }

    #[test]
    fn out_of_range_codepoint_fails_validation() {
        let map = scalar_map(&[(0x110000, 0x41)]);
        assert!(crate::dump_table(&CaseTable::new(&map)).is_err());
    }
}
