//! The normalization quick check tables: `cqc `, `kcqc`, `dqc ` and `kdqc`

use ucd_collections::SparseCodepointMap;

use super::change_point::{PackedChangePointTable, PackedValue};

/// A [quick check](https://www.unicode.org/reports/tr15/#Quick_Check_Table) value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum QuickCheck {
    No = 0,
    Maybe = 1,
    /// Codepoints not listed in the data have this value.
    #[default]
    Yes = 2,
}

impl QuickCheck {
    /// Parse the abbreviation used in `DerivedNormalizationProps.txt`.
    pub fn from_abbreviation(s: &str) -> Option<Self> {
        match s {
            "N" | "No" => Some(QuickCheck::No),
            "M" | "Maybe" => Some(QuickCheck::Maybe),
            "Y" | "Yes" => Some(QuickCheck::Yes),
            _ => None,
        }
    }
}

impl PackedValue for QuickCheck {
    fn to_packed(self) -> u8 {
        self as u8
    }
}

/// A compiled quick check table.
pub type QuickCheckTable = PackedChangePointTable<QuickCheck>;

impl PackedChangePointTable<QuickCheck> {
    /// Build a quick check table; unlisted codepoints are `Yes`.
    pub fn quick_check(map: &SparseCodepointMap<QuickCheck>) -> Self {
        Self::new(map, QuickCheck::Yes)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tables::change_point::{lookup, unpack};

    #[test]
    fn gaps_are_yes() {
        let mut map = SparseCodepointMap::new();
        map.set_range(0x300..=0x304, QuickCheck::Maybe);
        map.set(0x340, QuickCheck::No);
        map.set(0x341, QuickCheck::No);
        let table = QuickCheckTable::quick_check(&map);
        let entries = unpack(&crate::dump_table(&table).unwrap());
        assert_eq!(
            entries,
            [
                (0, 2),
                (0x300, 1),
                (0x305, 2),
                (0x340, 0),
                (0x342, 2),
                (0x110000, 2)
            ]
        );
        assert_eq!(lookup(&entries, 0x302), QuickCheck::Maybe as u8);
        assert_eq!(lookup(&entries, 0x10FFFF), QuickCheck::Yes as u8);
    }

    #[test]
    fn abbreviations() {
        assert_eq!(QuickCheck::from_abbreviation("M"), Some(QuickCheck::Maybe));
        assert_eq!(QuickCheck::from_abbreviation("No"), Some(QuickCheck::No));
        assert_eq!(QuickCheck::from_abbreviation("x"), None);
    }
}
