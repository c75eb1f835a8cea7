//! The [bidi mirroring](https://www.unicode.org/reports/tr9/#Mirroring) table

use ucd_collections::{RangeSet, SparseCodepointMap};
use ucd_types::Tag;

use super::TopLevelTable;
use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// The glyph value of a mirrored codepoint with no mirroring glyph.
pub const NO_MIRRORING_GLYPH: u32 = 0xFFFF_FFFF;

/// A `Bidi_Mirrored` codepoint and its `Bidi_Mirroring_Glyph`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MirrorRecord {
    pub cp: u32,
    pub glyph: Option<u32>,
}

impl UcdWrite for MirrorRecord {
    fn write_into(&self, writer: &mut TableWriter) {
        self.cp.write_into(writer);
        self.glyph.unwrap_or(NO_MIRRORING_GLYPH).write_into(writer);
    }
}

impl Validate for MirrorRecord {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.check_codepoint(self.cp);
        if let Some(glyph) = self.glyph {
            ctx.check_codepoint(glyph);
        }
    }
}

/// The compiled `mirr` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MirroringTable {
    records: Vec<MirrorRecord>,
}

impl MirroringTable {
    /// Build the table from the set of mirrored codepoints and their glyphs.
    ///
    /// Glyphs for codepoints that aren't mirrored are ignored.
    pub fn new(mirrored: &RangeSet, glyphs: &SparseCodepointMap<u32>) -> Self {
        let records = mirrored
            .iter()
            .map(|cp| {
                let glyph = glyphs.get(cp).copied();
                log::debug!("{cp:08x} {glyph:08x?}");
                MirrorRecord { cp, glyph }
            })
            .collect();
        MirroringTable { records }
    }

    pub fn records(&self) -> &[MirrorRecord] {
        &self.records
    }
}

impl TopLevelTable for MirroringTable {
    const TAG: Tag = Tag::new(b"mirr");
}

impl UcdWrite for MirroringTable {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.records.len() as u32).write_into(writer);
        self.records.write_into(writer);
    }
}

impl Validate for MirroringTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("MirroringTable", |ctx| {
            ctx.in_field("records", |ctx| self.records.validate_impl(ctx))
        })
    }
}
