//! The [general category](https://www.unicode.org/reports/tr44/#General_Category_Values) table

use ucd_collections::SparseCodepointMap;
use ucd_types::Tag;

use super::change_point::{change_points, check_change_points, ChangePoint};
use super::TopLevelTable;
use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// A `General_Category` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeneralCategory {
    Lu,
    Ll,
    Lt,
    Lm,
    Lo,
    Mn,
    Mc,
    Me,
    Nd,
    Nl,
    No,
    Pc,
    Pd,
    Ps,
    Pe,
    Pi,
    Pf,
    Po,
    Sm,
    Sc,
    Sk,
    So,
    Zs,
    Zl,
    Zp,
    Cc,
    Cf,
    Cs,
    Co,
    Cn,
}

impl GeneralCategory {
    const ALL: [GeneralCategory; 30] = [
        GeneralCategory::Lu,
        GeneralCategory::Ll,
        GeneralCategory::Lt,
        GeneralCategory::Lm,
        GeneralCategory::Lo,
        GeneralCategory::Mn,
        GeneralCategory::Mc,
        GeneralCategory::Me,
        GeneralCategory::Nd,
        GeneralCategory::Nl,
        GeneralCategory::No,
        GeneralCategory::Pc,
        GeneralCategory::Pd,
        GeneralCategory::Ps,
        GeneralCategory::Pe,
        GeneralCategory::Pi,
        GeneralCategory::Pf,
        GeneralCategory::Po,
        GeneralCategory::Sm,
        GeneralCategory::Sc,
        GeneralCategory::Sk,
        GeneralCategory::So,
        GeneralCategory::Zs,
        GeneralCategory::Zl,
        GeneralCategory::Zp,
        GeneralCategory::Cc,
        GeneralCategory::Cf,
        GeneralCategory::Cs,
        GeneralCategory::Co,
        GeneralCategory::Cn,
    ];

    /// The two-letter abbreviation, e.g. `"Lu"`.
    pub fn code(self) -> &'static str {
        match self {
            GeneralCategory::Lu => "Lu",
            GeneralCategory::Ll => "Ll",
            GeneralCategory::Lt => "Lt",
            GeneralCategory::Lm => "Lm",
            GeneralCategory::Lo => "Lo",
            GeneralCategory::Mn => "Mn",
            GeneralCategory::Mc => "Mc",
            GeneralCategory::Me => "Me",
            GeneralCategory::Nd => "Nd",
            GeneralCategory::Nl => "Nl",
            GeneralCategory::No => "No",
            GeneralCategory::Pc => "Pc",
            GeneralCategory::Pd => "Pd",
            GeneralCategory::Ps => "Ps",
            GeneralCategory::Pe => "Pe",
            GeneralCategory::Pi => "Pi",
            GeneralCategory::Pf => "Pf",
            GeneralCategory::Po => "Po",
            GeneralCategory::Sm => "Sm",
            GeneralCategory::Sc => "Sc",
            GeneralCategory::Sk => "Sk",
            GeneralCategory::So => "So",
            GeneralCategory::Zs => "Zs",
            GeneralCategory::Zl => "Zl",
            GeneralCategory::Zp => "Zp",
            GeneralCategory::Cc => "Cc",
            GeneralCategory::Cf => "Cf",
            GeneralCategory::Cs => "Cs",
            GeneralCategory::Co => "Co",
            GeneralCategory::Cn => "Cn",
        }
    }

    /// Parse a two-letter abbreviation.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cat| cat.code() == code)
    }

    /// The abbreviation as a big-endian `u16`, as stored in the table.
    pub fn to_u16(self) -> u16 {
        let code = self.code().as_bytes();
        u16::from_be_bytes([code[0], code[1]])
    }
}

/// The compiled `genc` table.
///
/// Entries are 6 bytes: a `u32` first codepoint and the `u16` category.
/// Unassigned codepoints are `Cn`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneralCategoryTable {
    points: Vec<ChangePoint<GeneralCategory>>,
}

impl GeneralCategoryTable {
    pub fn new(categories: &SparseCodepointMap<GeneralCategory>) -> Self {
        let points = change_points(
            categories.iter().map(|(cp, cat)| (cp, *cat)),
            GeneralCategory::Cn,
        );
        for point in &points {
            log::debug!("{:08x} {}", point.cp, point.value.code());
        }
        GeneralCategoryTable { points }
    }

    pub fn points(&self) -> &[ChangePoint<GeneralCategory>] {
        &self.points
    }
}

impl TopLevelTable for GeneralCategoryTable {
    const TAG: Tag = Tag::new(b"genc");
}

impl UcdWrite for GeneralCategoryTable {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.points.len() as u32).write_into(writer);
        for point in &self.points {
            point.cp.write_into(writer);
            point.value.to_u16().write_into(writer);
        }
    }
}

impl Validate for GeneralCategoryTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("GeneralCategoryTable", |ctx| {
            check_change_points(ctx, &self.points)
        })
    }
}
