//! The [block](https://www.unicode.org/reports/tr44/#Block) table
//!
//! Block names live in the [string pool](super::strn); this table holds
//! the ranges and string ids.

use std::ops::RangeInclusive;

use ucd_types::Tag;

use super::strn::{StringId, StringPool};
use super::TopLevelTable;
use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// A block as listed in `Blocks.txt`, with an optional alias from
/// `PropertyValueAliases.txt`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub range: RangeInclusive<u32>,
    pub name: String,
    pub alias: Option<String>,
}

impl Block {
    pub fn new(range: RangeInclusive<u32>, name: impl Into<String>) -> Self {
        Block {
            range,
            name: name.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// One 16-byte entry of the `blok` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockRecord {
    pub first: u32,
    pub last: u32,
    pub name: StringId,
    pub alias: Option<StringId>,
}

impl UcdWrite for BlockRecord {
    fn write_into(&self, writer: &mut TableWriter) {
        self.first.write_into(writer);
        self.last.write_into(writer);
        self.name.write_into(writer);
        self.alias.unwrap_or(StringId::NONE).write_into(writer);
    }
}

impl Validate for BlockRecord {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.check_codepoint_range(self.first, self.last);
    }
}

/// The compiled `blok` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockTable {
    records: Vec<BlockRecord>,
}

impl BlockTable {
    /// Build the table, adding the block names to `strings`.
    ///
    /// The blocks are sorted by their first codepoint.
    pub fn new(blocks: &[Block], strings: &mut StringPool) -> Self {
        let mut records = blocks
            .iter()
            .map(|block| BlockRecord {
                first: *block.range.start(),
                last: *block.range.end(),
                name: strings.add(&block.name),
                alias: block.alias.as_deref().map(|alias| strings.add(alias)),
            })
            .collect::<Vec<_>>();
        records.sort_by_key(|record| record.first);
        for record in &records {
            log::debug!(
                "{:08x}..={:08x} {} {:?}",
                record.first,
                record.last,
                record.name,
                record.alias
            );
        }
        BlockTable { records }
    }

    pub fn records(&self) -> &[BlockRecord] {
        &self.records
    }
}

impl TopLevelTable for BlockTable {
    const TAG: Tag = Tag::new(b"blok");
}

impl UcdWrite for BlockTable {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.records.len() as u32).write_into(writer);
        self.records.write_into(writer);
    }
}

impl Validate for BlockTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("BlockTable", |ctx| {
            ctx.in_field("records", |ctx| {
                self.records.validate_impl(ctx);
                for pair in self.records.windows(2) {
                    if pair[0].last >= pair[1].first {
                        ctx.report(format_args!(
                            "blocks at 0x{:X} and 0x{:X} overlap",
                            pair[0].first, pair[1].first
                        ));
                    }
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex_diff::assert_hex_eq;

    #[test]
    fn names_go_to_the_pool() {
        let blocks = [
            Block::new(0x80..=0xFF, "Latin-1 Supplement").with_alias("Latin_1_Sup"),
            Block::new(0..=0x7F, "Basic Latin").with_alias("ASCII"),
            Block::new(0x10000..=0x1007F, "Linear B Syllabary"),
        ];
        let mut strings = StringPool::new();
        let table = BlockTable::new(&blocks, &mut strings);

        let bytes = crate::dump_table(&table).unwrap();
        let expected = [
            0x03u8, 0, 0, 0,
            // Basic Latin: name at 31, alias at 43
            0x00, 0, 0, 0, 0x7F, 0, 0, 0, 31, 0, 0, 0, 43, 0, 0, 0,
            // Latin-1 Supplement: name at 0, alias at 19
            0x80, 0, 0, 0, 0xFF, 0, 0, 0, 0, 0, 0, 0, 19, 0, 0, 0,
            // Linear B Syllabary, no alias
            0x00, 0, 0x01, 0, 0x7F, 0, 0x01, 0, 49, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF,
        ];
        assert_hex_eq!(bytes, expected);
        assert_eq!(strings.get("ASCII").map(StringId::to_u32), Some(43));
    }

    #[test]
    fn overlapping_blocks_fail_validation() {
        let blocks = [Block::new(0..=0x7F, "A"), Block::new(0x70..=0xFF, "B")];
        let table = BlockTable::new(&blocks, &mut StringPool::new());
        assert!(crate::dump_table(&table).is_err());
    }
}
