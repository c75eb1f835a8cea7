//! The [decomposition](https://www.unicode.org/reports/tr44/#Character_Decomposition_Mappings) table

use ucd_collections::SparseCodepointMap;
use ucd_types::{codepoint::encode_utf16, Tag};

use super::TopLevelTable;
use crate::offsets::{DataOffset, Record, RecordTable, SideData};
use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// The formatting tag of a decomposition; canonical decompositions have none.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum DecompositionTag {
    #[default]
    Canonical = 0,
    Font = 1,
    NoBreak = 2,
    Initial = 3,
    Medial = 4,
    Final = 5,
    Isolated = 6,
    Circle = 7,
    Super = 8,
    Sub = 9,
    Vertical = 10,
    Wide = 11,
    Narrow = 12,
    Small = 13,
    Square = 14,
    Fraction = 15,
    Compat = 16,
}

impl DecompositionTag {
    /// Parse a tag as written in `UnicodeData.txt`, e.g. `<noBreak>`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "<font>" => DecompositionTag::Font,
            "<noBreak>" => DecompositionTag::NoBreak,
            "<initial>" => DecompositionTag::Initial,
            "<medial>" => DecompositionTag::Medial,
            "<final>" => DecompositionTag::Final,
            "<isolated>" => DecompositionTag::Isolated,
            "<circle>" => DecompositionTag::Circle,
            "<super>" => DecompositionTag::Super,
            "<sub>" => DecompositionTag::Sub,
            "<vertical>" => DecompositionTag::Vertical,
            "<wide>" => DecompositionTag::Wide,
            "<narrow>" => DecompositionTag::Narrow,
            "<small>" => DecompositionTag::Small,
            "<square>" => DecompositionTag::Square,
            "<fraction>" => DecompositionTag::Fraction,
            "<compat>" => DecompositionTag::Compat,
            _ => return None,
        })
    }
}

/// The decomposition of one codepoint.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decomposition {
    pub tag: DecompositionTag,
    pub mapping: Vec<u32>,
}

impl Decomposition {
    pub fn new(tag: DecompositionTag, mapping: impl Into<Vec<u32>>) -> Self {
        Decomposition {
            tag,
            mapping: mapping.into(),
        }
    }

    /// A canonical decomposition.
    pub fn canonical(mapping: impl Into<Vec<u32>>) -> Self {
        Self::new(DecompositionTag::Canonical, mapping)
    }
}

/// The kind byte of a decomposition record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DecoKind {
    Single = 0,
    Packed = 1,
    External = 2,
}

/// Where a decomposition's codepoints are stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecoPayload {
    /// One codepoint
    Single(u32),
    /// Two BMP codepoints
    Packed([u16; 2]),
    /// NUL-terminated UTF-16 in side data
    External(DataOffset),
}

/// One 10-byte record of the `deco` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoRecord {
    pub cp: u32,
    pub tag: DecompositionTag,
    pub payload: DecoPayload,
    // the source mapping, checked by validation
    mapping: Vec<u32>,
}

impl DecoRecord {
    pub fn kind(&self) -> DecoKind {
        match self.payload {
            DecoPayload::Single(_) => DecoKind::Single,
            DecoPayload::Packed(_) => DecoKind::Packed,
            DecoPayload::External(_) => DecoKind::External,
        }
    }
}

impl UcdWrite for DecoRecord {
    fn write_into(&self, writer: &mut TableWriter) {
        self.cp.write_into(writer);
        (self.kind() as u8).write_into(writer);
        (self.tag as u8).write_into(writer);
        match &self.payload {
            DecoPayload::Single(mapped) => mapped.write_into(writer),
            DecoPayload::Packed(units) => units.write_into(writer),
            DecoPayload::External(offset) => offset.write_into(writer),
        }
    }
}

impl Record for DecoRecord {
    const RECORD_LEN: usize = 10;

    fn data_offset_mut(&mut self) -> Option<&mut DataOffset> {
        match &mut self.payload {
            DecoPayload::External(offset) => Some(offset),
            _ => None,
        }
    }
}

impl Validate for DecoRecord {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.check_codepoint(self.cp);
        for cp in &self.mapping {
            ctx.check_codepoint(*cp);
        }
    }
}

/// The compiled `deco` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecompositionTable {
    table: RecordTable<DecoRecord>,
    // mappings that can't be encoded, found while building
    empty: Vec<u32>,
}

impl DecompositionTable {
    pub fn new(decompositions: &SparseCodepointMap<Decomposition>) -> Self {
        let mut records = Vec::new();
        let mut data = SideData::new();
        let mut empty = Vec::new();
        for (cp, decomposition) in decompositions.iter() {
            let tag = decomposition.tag;
            let payload = match decomposition.mapping.as_slice() {
                [] => {
                    empty.push(cp);
                    continue;
                }
                [mapped] => DecoPayload::Single(*mapped),
                [a, b] if *a <= 0xFFFF && *b <= 0xFFFF => DecoPayload::Packed([*a as u16, *b as u16]),
                mapping => {
                    let offset = data.push(encode_utf16(mapping).as_slice());
                    data.push(&0u16);
                    DecoPayload::External(offset)
                }
            };
            let record = DecoRecord {
                cp,
                tag,
                payload,
                mapping: decomposition.mapping.clone(),
            };
            log::debug!("{cp:08x} {:?} {:?}", record.tag, record.payload);
            records.push(record);
        }
        DecompositionTable {
            table: RecordTable::new(records, data),
            empty,
        }
    }

    pub fn records(&self) -> &[DecoRecord] {
        self.table.records()
    }
}

impl TopLevelTable for DecompositionTable {
    const TAG: Tag = Tag::new(b"deco");
}

impl UcdWrite for DecompositionTable {
    fn write_into(&self, writer: &mut TableWriter) {
        self.table.write_into(writer)
    }
}

impl Validate for DecompositionTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("DecompositionTable", |ctx| {
            self.table.validate_impl(ctx);
            for cp in &self.empty {
                ctx.report(format_args!("empty decomposition for {cp:#06X}"));
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ucd_types::codepoint::decode_utf16;

    use super::*;

    fn decode(bytes: &[u8]) -> Vec<(u32, u8, Vec<u32>)> {
        let u32_at = |pos: usize| u32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap());
        let u16_at = |pos: usize| u16::from_le_bytes(bytes[pos..pos + 2].try_into().unwrap());
        let count = u32_at(0) as usize;
        (0..count)
            .map(|i| {
                let pos = 4 + i * 10;
                let mapping = match bytes[pos + 4] {
                    0 => vec![u32_at(pos + 6)],
                    1 => vec![u16_at(pos + 6) as u32, u16_at(pos + 8) as u32],
                    2 => {
                        let start = u32_at(pos + 6) as usize;
                        let units = (start..bytes.len())
                            .step_by(2)
                            .map(u16_at)
                            .take_while(|u| *u != 0)
                            .collect::<Vec<_>>();
                        decode_utf16(&units)
                    }
                    other => panic!("unknown deco kind {other}"),
                };
                (u32_at(pos), bytes[pos + 5], mapping)
            })
            .collect()
    }

    #[test]
    fn every_kind_round_trips() {
        let mut map = SparseCodepointMap::new();
        map.set(0xC0, Decomposition::canonical([0x41, 0x300]));
        map.set(0x212B, Decomposition::canonical([0xC5]));
        map.set(0xA0, Decomposition::new(DecompositionTag::NoBreak, [0x20]));
        map.set(0xFDFA, Decomposition::new(DecompositionTag::Isolated, [0x635, 0x644, 0x649, 0x20]));
        map.set(0x1D15E, Decomposition::canonical([0x1D157, 0x1D165]));
        map.set(0xBD, Decomposition::new(DecompositionTag::Fraction, [0x31, 0x2044, 0x32]));

        let table = DecompositionTable::new(&map);
        let kinds = table.records().iter().map(DecoRecord::kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            [
                DecoKind::Single,
                DecoKind::External,
                DecoKind::Packed,
                DecoKind::Single,
                DecoKind::External,
                DecoKind::External
            ]
        );

        let bytes = crate::dump_table(&table).unwrap();
        let decoded = decode(&bytes);
        let expected = map
            .iter()
            .map(|(cp, d)| (cp, d.tag as u8, d.mapping.clone()))
            .collect::<Vec<_>>();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn external_offsets_follow_records() {
        let mut map = SparseCodepointMap::new();
        map.set(0x10, Decomposition::canonical([1, 2, 3]));
        map.set(0x20, Decomposition::canonical([4, 5, 6]));
        let table = DecompositionTable::new(&map);
        let offsets = table
            .records()
            .iter()
            .map(|r| match r.payload {
                DecoPayload::External(offset) => offset.resolved(),
                _ => None,
            })
            .collect::<Vec<_>>();
        // three units plus a terminator each
        assert_eq!(offsets, [Some(24), Some(32)]);
    }

    #[test]
    fn tags_parse() {
        assert_eq!(DecompositionTag::from_name("<super>"), Some(DecompositionTag::Super));
        assert_eq!(DecompositionTag::from_name("<compat>").map(|t| t as u8), Some(16));
        assert_eq!(DecompositionTag::from_name("super"), None);
    }

    #[test]
    fn bad_mapped_codepoint_fails_validation() {
        let mut map = SparseCodepointMap::new();
        map.set(0x41, Decomposition::canonical([0x42, 0x43, 0x110000]));
        assert!(crate::dump_table(&DecompositionTable::new(&map)).is_err());
    }

    #[test]
    fn empty_mapping_fails_validation() {
        let mut map = SparseCodepointMap::new();
        map.set(0x41, Decomposition::canonical(Vec::new()));
        assert!(crate::dump_table(&DecompositionTable::new(&map)).is_err());
    }
}
