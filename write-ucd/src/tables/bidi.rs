//! The [bidi class](https://www.unicode.org/reports/tr9/#Bidirectional_Character_Types) table

use ucd_collections::SparseCodepointMap;
use ucd_types::Tag;

use super::change_point::{PackedChangePointTable, PackedValue};
use super::TopLevelTable;

/// A `Bidi_Class` value, numbered as the reader expects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[allow(clippy::upper_case_acronyms)]
pub enum BidiClass {
    #[default]
    L = 1,
    R = 2,
    AL = 3,
    EN = 4,
    ES = 5,
    ET = 6,
    AN = 7,
    CS = 8,
    NSM = 9,
    BN = 10,
    B = 11,
    S = 12,
    WS = 13,
    ON = 14,
    LRE = 15,
    LRO = 16,
    RLE = 17,
    RLO = 18,
    PDF = 19,
    LRI = 20,
    RLI = 21,
    FSI = 22,
    PDI = 23,
}

impl BidiClass {
    /// Parse a short property value alias, as in `UnicodeData.txt`.
    pub fn from_short_name(name: &str) -> Option<Self> {
        Some(match name {
            "L" => BidiClass::L,
            "R" => BidiClass::R,
            "AL" => BidiClass::AL,
            "EN" => BidiClass::EN,
            "ES" => BidiClass::ES,
            "ET" => BidiClass::ET,
            "AN" => BidiClass::AN,
            "CS" => BidiClass::CS,
            "NSM" => BidiClass::NSM,
            "BN" => BidiClass::BN,
            "B" => BidiClass::B,
            "S" => BidiClass::S,
            "WS" => BidiClass::WS,
            "ON" => BidiClass::ON,
            "LRE" => BidiClass::LRE,
            "LRO" => BidiClass::LRO,
            "RLE" => BidiClass::RLE,
            "RLO" => BidiClass::RLO,
            "PDF" => BidiClass::PDF,
            "LRI" => BidiClass::LRI,
            "RLI" => BidiClass::RLI,
            "FSI" => BidiClass::FSI,
            "PDI" => BidiClass::PDI,
            _ => return None,
        })
    }
}

impl PackedValue for BidiClass {
    fn to_packed(self) -> u8 {
        self as u8
    }
}

/// The compiled `bidi` table.
pub type BidiTable = PackedChangePointTable<BidiClass>;

impl PackedChangePointTable<BidiClass> {
    /// Build the bidi table; unlisted codepoints are `L`.
    pub fn bidi(map: &SparseCodepointMap<BidiClass>) -> Self {
        Self::new(map, BidiClass::L)
    }
}

impl TopLevelTable for PackedChangePointTable<BidiClass> {
    const TAG: Tag = Tag::new(b"bidi");
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tables::change_point::{lookup, unpack};

    #[test]
    fn default_is_left_to_right() {
        let mut map = SparseCodepointMap::new();
        map.set_range(0x5D0..=0x5EA, BidiClass::R);
        map.set_range(0x5EB..=0x5EE, BidiClass::L);
        map.set_range(0x600..=0x605, BidiClass::AN);
        let table = BidiTable::bidi(&map);
        let entries = unpack(&crate::dump_table(&table).unwrap());
        assert_eq!(
            entries,
            [
                (0, 1),
                (0x5D0, 2),
                (0x5EB, 1),
                (0x600, 7),
                (0x606, 1),
                (0x110000, 1)
            ]
        );
        assert_eq!(lookup(&entries, 0x5EF), BidiClass::L as u8);
        assert_eq!(lookup(&entries, 0x603), BidiClass::AN as u8);
    }

    #[test]
    fn short_names() {
        assert_eq!(BidiClass::from_short_name("NSM"), Some(BidiClass::NSM));
        assert_eq!(BidiClass::from_short_name("PDI").map(|c| c as u8), Some(23));
        assert_eq!(BidiClass::from_short_name("Left"), None);
    }
}
