//! The [Hangul syllable type](https://www.unicode.org/reports/tr44/#Hangul_Syllable_Type) table
//!
//! LV and LVT syllables share one run kind. A reader tells them apart
//! arithmetically: an LV syllable is one where `(cp - 0xAC00) % 28 == 0`.

use ucd_collections::SparseCodepointMap;
use ucd_types::Tag;

use super::TopLevelTable;
use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// The `Hangul_Syllable_Type` property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HangulSyllableType {
    LeadingJamo,
    VowelJamo,
    TrailingJamo,
    LvSyllable,
    LvtSyllable,
}

impl HangulSyllableType {
    /// Parse a short property value alias.
    pub fn from_abbreviation(s: &str) -> Option<Self> {
        Some(match s {
            "L" => HangulSyllableType::LeadingJamo,
            "V" => HangulSyllableType::VowelJamo,
            "T" => HangulSyllableType::TrailingJamo,
            "LV" => HangulSyllableType::LvSyllable,
            "LVT" => HangulSyllableType::LvtSyllable,
            _ => return None,
        })
    }

    /// The encoded run kind: a bitmask of the jamo the syllable contains.
    pub fn run_kind(self) -> u16 {
        const L: u16 = 1;
        const V: u16 = 2;
        const T: u16 = 4;
        match self {
            HangulSyllableType::LeadingJamo => L,
            HangulSyllableType::VowelJamo => V,
            HangulSyllableType::TrailingJamo => T,
            HangulSyllableType::LvSyllable | HangulSyllableType::LvtSyllable => L | V | T,
        }
    }
}

/// A run of codepoints sharing a run kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JamoRun {
    // kept wide so that astral input is reported rather than truncated
    pub first: u32,
    pub last: u32,
    pub kind: u16,
}

impl UcdWrite for JamoRun {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.first as u16).write_into(writer);
        (self.last as u16).write_into(writer);
        self.kind.write_into(writer);
    }
}

impl Validate for JamoRun {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        if self.last > 0xFFFF {
            ctx.report(format_args!(
                "run 0x{:X}..=0x{:X} is outside the BMP",
                self.first, self.last
            ));
        }
    }
}

/// The compiled `jamo` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JamoTable {
    runs: Vec<JamoRun>,
}

impl JamoTable {
    pub fn new(map: &SparseCodepointMap<HangulSyllableType>) -> Self {
        let mut runs: Vec<JamoRun> = Vec::new();
        for (cp, syllable_type) in map.iter() {
            let kind = syllable_type.run_kind();
            match runs.last_mut() {
                Some(run) if run.kind == kind && run.last + 1 == cp => run.last = cp,
                _ => runs.push(JamoRun {
                    first: cp,
                    last: cp,
                    kind,
                }),
            }
        }
        for run in &runs {
            log::debug!("{:04x}..={:04x} {}", run.first, run.last, run.kind);
        }
        JamoTable { runs }
    }

    pub fn runs(&self) -> &[JamoRun] {
        &self.runs
    }
}

impl TopLevelTable for JamoTable {
    const TAG: Tag = Tag::new(b"jamo");
}

impl UcdWrite for JamoTable {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.runs.len() as u32).write_into(writer);
        self.runs.write_into(writer);
    }
}

impl Validate for JamoTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("JamoTable", |ctx| {
            ctx.in_field("runs", |ctx| self.runs.validate_impl(ctx))
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::hex_diff::assert_hex_eq;

    fn hangul_map() -> SparseCodepointMap<HangulSyllableType> {
        let mut map = SparseCodepointMap::new();
        map.set_range(0x1100..=0x115F, HangulSyllableType::LeadingJamo);
        map.set_range(0x1160..=0x11A7, HangulSyllableType::VowelJamo);
        map.set_range(0x11A8..=0x11FF, HangulSyllableType::TrailingJamo);
        // the first two syllables: GA is LV, GAG is LVT
        map.set(0xAC00, HangulSyllableType::LvSyllable);
        map.set_range(0xAC01..=0xAC1B, HangulSyllableType::LvtSyllable);
        map.set(0xAC1C, HangulSyllableType::LvSyllable);
        map
    }

    #[test]
    fn lv_folds_into_lvt() {
        let table = JamoTable::new(&hangul_map());
        let runs = table
            .runs()
            .iter()
            .map(|r| (r.first, r.last, r.kind))
            .collect::<Vec<_>>();
        assert_eq!(
            runs,
            [
                (0x1100, 0x115F, 1),
                (0x1160, 0x11A7, 2),
                (0x11A8, 0x11FF, 4),
                (0xAC00, 0xAC1C, 7),
            ]
        );
    }

    #[test]
    fn gaps_split_runs() {
        let mut map = SparseCodepointMap::new();
        map.set(0xA960, HangulSyllableType::LeadingJamo);
        map.set(0xA962, HangulSyllableType::LeadingJamo);
        let bytes = crate::dump_table(&JamoTable::new(&map)).unwrap();
        let expected = [
            0x02u8, 0, 0, 0,
            0x60, 0xA9, 0x60, 0xA9, 0x01, 0x00,
            0x62, 0xA9, 0x62, 0xA9, 0x01, 0x00,
        ];
        assert_hex_eq!(bytes, expected);
    }

    #[test]
    fn astral_input_fails_validation() {
        let mut map = SparseCodepointMap::new();
        map.set(0x1_1100, HangulSyllableType::LeadingJamo);
        assert!(crate::dump_table(&JamoTable::new(&map)).is_err());
    }
}
