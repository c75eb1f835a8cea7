//! The [Arabic shaping](https://www.unicode.org/reports/tr44/#ArabicShaping.txt) table

use std::fmt;

use ucd_collections::SparseCodepointMap;
use ucd_types::Tag;

use super::TopLevelTable;
use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// The `Joining_Type` property.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum JoiningType {
    #[default]
    NonJoining = 0,
    Transparent = 1,
    Right = 2,
    Left = 3,
    Dual = 4,
    JoinCausing = 5,
}

impl JoiningType {
    /// Parse the one-letter value used in `ArabicShaping.txt`.
    pub fn from_abbreviation(s: &str) -> Option<Self> {
        Some(match s {
            "U" => JoiningType::NonJoining,
            "T" => JoiningType::Transparent,
            "R" => JoiningType::Right,
            "L" => JoiningType::Left,
            "D" => JoiningType::Dual,
            "C" => JoiningType::JoinCausing,
            _ => return None,
        })
    }
}

/// Joining group names, indexed by their encoded value.
///
/// New groups are appended, so existing values never change.
const JOINING_GROUP_NAMES: &[&str] = &[
    "No_Joining_Group",
    "Ain",
    "Alaph",
    "Alef",
    "Beh",
    "Beth",
    "Burushaski_Yeh_Barree",
    "Dal",
    "Dalath_Rish",
    "E",
    "Farsi_Yeh",
    "Fe",
    "Feh",
    "Final_Semkath",
    "Gaf",
    "Gamal",
    "Hah",
    "He",
    "Heh",
    "Heh_Goal",
    "Heth",
    "Kaf",
    "Kaph",
    "Khaph",
    "Knotted_Heh",
    "Lam",
    "Lamadh",
    "Manichaean_Aleph",
    "Manichaean_Ayin",
    "Manichaean_Beth",
    "Manichaean_Daleth",
    "Manichaean_Dhamedh",
    "Manichaean_Five",
    "Manichaean_Gimel",
    "Manichaean_Heth",
    "Manichaean_Hundred",
    "Manichaean_Kaph",
    "Manichaean_Lamedh",
    "Manichaean_Mem",
    "Manichaean_Nun",
    "Manichaean_One",
    "Manichaean_Pe",
    "Manichaean_Qoph",
    "Manichaean_Resh",
    "Manichaean_Sadhe",
    "Manichaean_Samekh",
    "Manichaean_Taw",
    "Manichaean_Ten",
    "Manichaean_Teth",
    "Manichaean_Thamedh",
    "Manichaean_Twenty",
    "Manichaean_Waw",
    "Manichaean_Yodh",
    "Manichaean_Zayin",
    "Meem",
    "Mim",
    "Noon",
    "Nun",
    "Nya",
    "Pe",
    "Qaf",
    "Qaph",
    "Reh",
    "Reversed_Pe",
    "Rohingya_Yeh",
    "Sad",
    "Sadhe",
    "Seen",
    "Semkath",
    "Shin",
    "Straight_Waw",
    "Swash_Kaf",
    "Syriac_Waw",
    "Tah",
    "Taw",
    "Teh_Marbuta",
    "Teh_Marbuta_Goal",
    "Teth",
    "Waw",
    "Yeh",
    "Yeh_Barree",
    "Yeh_With_Tail",
    "Yudh",
    "Yudh_He",
    "Zain",
    "Zhain",
    "African_Feh",
    "African_Qaf",
    "African_Noon",
];

/// A `Joining_Group` value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JoiningGroup(u8);

impl JoiningGroup {
    pub const NONE: JoiningGroup = JoiningGroup(0);

    /// Look up a group by its name in `ArabicShaping.txt`.
    ///
    /// Names are matched ignoring case, spaces and underscores, so both
    /// `TEH MARBUTA` and `Teh_Marbuta` work.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = loose_name(name);
        JOINING_GROUP_NAMES
            .iter()
            .position(|candidate| loose_name(candidate) == wanted)
            .map(|idx| JoiningGroup(idx as u8))
    }

    pub fn name(self) -> &'static str {
        JOINING_GROUP_NAMES
            .get(self.0 as usize)
            .copied()
            .unwrap_or("<unknown>")
    }

    pub fn to_u8(self) -> u8 {
        self.0
    }
}

impl fmt::Display for JoiningGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn loose_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// The joining properties of one codepoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Joining {
    pub joining_type: JoiningType,
    pub group: JoiningGroup,
}

impl Joining {
    pub fn new(joining_type: JoiningType, group: JoiningGroup) -> Self {
        Joining {
            joining_type,
            group,
        }
    }
}

/// One 6-byte entry of the `join` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JoiningRecord {
    pub cp: u32,
    pub joining: Joining,
}

impl UcdWrite for JoiningRecord {
    fn write_into(&self, writer: &mut TableWriter) {
        self.cp.write_into(writer);
        (self.joining.joining_type as u8).write_into(writer);
        self.joining.group.to_u8().write_into(writer);
    }
}

impl Validate for JoiningRecord {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.check_codepoint(self.cp);
    }
}

/// The compiled `join` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoiningTable {
    records: Vec<JoiningRecord>,
}

impl JoiningTable {
    pub fn new(map: &SparseCodepointMap<Joining>) -> Self {
        let records = map
            .iter()
            .map(|(cp, joining)| {
                log::debug!("{cp:08x} {:?} {}", joining.joining_type, joining.group);
                JoiningRecord {
                    cp,
                    joining: *joining,
                }
            })
            .collect();
        JoiningTable { records }
    }

    pub fn records(&self) -> &[JoiningRecord] {
        &self.records
    }
}

impl TopLevelTable for JoiningTable {
    const TAG: Tag = Tag::new(b"join");
}

impl UcdWrite for JoiningTable {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.records.len() as u32).write_into(writer);
        self.records.write_into(writer);
    }
}

impl Validate for JoiningTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("JoiningTable", |ctx| {
            ctx.in_field("records", |ctx| self.records.validate_impl(ctx))
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::hex_diff::assert_hex_eq;

    #[rstest]
    #[case("No_Joining_Group", 0)]
    #[case("Beh", 4)]
    #[case("TEH MARBUTA", 75)]
    #[case("African_Noon", 88)]
    fn group_values(#[case] name: &str, #[case] expected: u8) {
        let group = JoiningGroup::from_name(name).unwrap();
        assert_eq!(group.to_u8(), expected);
    }

    #[test]
    fn group_names_round_trip() {
        for (idx, name) in JOINING_GROUP_NAMES.iter().enumerate() {
            let group = JoiningGroup::from_name(name).unwrap();
            assert_eq!(group.to_u8() as usize, idx);
            assert_eq!(group.name(), *name);
        }
        assert_eq!(JoiningGroup::from_name("Klingon"), None);
    }

    #[test]
    fn six_byte_entries() {
        let beh = JoiningGroup::from_name("Beh").unwrap();
        let mut map = SparseCodepointMap::new();
        map.set(0x628, Joining::new(JoiningType::Dual, beh));
        map.set(0x200D, Joining::new(JoiningType::JoinCausing, JoiningGroup::NONE));
        let bytes = crate::dump_table(&JoiningTable::new(&map)).unwrap();
        let expected = [
            0x02u8, 0, 0, 0,
            0x28, 0x06, 0, 0, 4, 4,
            0x0D, 0x20, 0, 0, 5, 0,
        ];
        assert_hex_eq!(bytes, expected);
    }
}
