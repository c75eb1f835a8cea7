//! The [paired bracket](https://www.unicode.org/reports/tr9/#Paired_Brackets) table

use ucd_collections::SparseCodepointMap;
use ucd_types::Tag;

use super::TopLevelTable;
use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// The `Bidi_Paired_Bracket_Type` property.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum BracketKind {
    #[default]
    None = 0,
    Open = 1,
    Close = 2,
}

impl BracketKind {
    /// Parse the one-letter value used in `BidiBrackets.txt`.
    pub fn from_abbreviation(s: &str) -> Option<Self> {
        match s {
            "n" => Some(BracketKind::None),
            "o" => Some(BracketKind::Open),
            "c" => Some(BracketKind::Close),
            _ => None,
        }
    }
}

/// A bracket and the codepoint it pairs with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BracketPair {
    pub paired: u32,
    pub kind: BracketKind,
}

impl BracketPair {
    pub fn new(paired: u32, kind: BracketKind) -> Self {
        BracketPair { paired, kind }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BracketRecord {
    pub cp: u32,
    pub pair: BracketPair,
}

impl UcdWrite for BracketRecord {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.cp | ((self.pair.kind as u32) << 24)).write_into(writer);
        self.pair.paired.write_into(writer);
    }
}

impl Validate for BracketRecord {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.check_codepoint(self.cp);
        ctx.check_codepoint(self.pair.paired);
    }
}

/// The compiled `brak` table, sorted by codepoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BracketTable {
    records: Vec<BracketRecord>,
}

impl BracketTable {
    pub fn new(map: &SparseCodepointMap<BracketPair>) -> Self {
        let records = map
            .iter()
            .map(|(cp, pair)| {
                log::debug!("{cp:08x} {:?} {:08x}", pair.kind, pair.paired);
                BracketRecord { cp, pair: *pair }
            })
            .collect();
        BracketTable { records }
    }

    pub fn records(&self) -> &[BracketRecord] {
        &self.records
    }
}

impl TopLevelTable for BracketTable {
    const TAG: Tag = Tag::new(b"brak");
}

impl UcdWrite for BracketTable {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.records.len() as u32).write_into(writer);
        self.records.write_into(writer);
    }
}

impl Validate for BracketTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("BracketTable", |ctx| {
            ctx.in_field("records", |ctx| self.records.validate_impl(ctx))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex_diff::assert_hex_eq;

    #[test]
    fn kind_packs_above_codepoint() {
        let mut map = SparseCodepointMap::new();
        // inserted out of order; the table is sorted
        map.set(0x29, BracketPair::new(0x28, BracketKind::Close));
        map.set(0x28, BracketPair::new(0x29, BracketKind::Open));
        let bytes = crate::dump_table(&BracketTable::new(&map)).unwrap();
        let expected = [
            0x02u8, 0, 0, 0,
            0x28, 0, 0, 0x01, 0x29, 0, 0, 0,
            0x29, 0, 0, 0x02, 0x28, 0, 0, 0,
        ];
        assert_hex_eq!(bytes, expected);
    }

    #[test]
    fn abbreviations() {
        assert_eq!(BracketKind::from_abbreviation("o"), Some(BracketKind::Open));
        assert_eq!(BracketKind::from_abbreviation("c"), Some(BracketKind::Close));
        assert_eq!(BracketKind::from_abbreviation("x"), None);
    }
}
