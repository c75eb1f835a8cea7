//! The [script](https://www.unicode.org/reports/tr24/) table
//!
//! This holds both `Script` and `Script_Extensions`. The script list is a
//! change-point list of four-character script codes; it is followed by a
//! second change-point list whose entries carry a count and an offset to
//! that many script codes, stored after both lists.

use ucd_collections::SparseCodepointMap;
use ucd_types::Tag;

use super::change_point::{change_points, check_change_points, ChangePoint};
use super::TopLevelTable;
use crate::offsets::{self, DataOffset, Record, SideData, COUNT_HEADER_LEN};
use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// `u32` codepoint, `u32` script tag.
const SCRIPT_ENTRY_LEN: usize = 8;

/// The script of unassigned codepoints.
pub const UNKNOWN_SCRIPT: Tag = Tag::new(b"Zzzz");

/// One entry of the script extensions list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptExtensionRecord {
    /// The first codepoint with these extensions
    pub cp: u32,
    /// The number of scripts; zero for gaps and the sentinel
    pub count: u8,
    /// The location of the scripts, if there are any
    pub offset: Option<DataOffset>,
}

impl UcdWrite for ScriptExtensionRecord {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.cp | ((self.count as u32) << 24)).write_into(writer);
        match &self.offset {
            Some(offset) => offset.write_into(writer),
            None => 0u32.write_into(writer),
        }
    }
}

impl Record for ScriptExtensionRecord {
    const RECORD_LEN: usize = 8;

    fn data_offset_mut(&mut self) -> Option<&mut DataOffset> {
        self.offset.as_mut()
    }
}

/// The compiled `scpt` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptTable {
    scripts: Vec<ChangePoint<Tag>>,
    extensions: Vec<ScriptExtensionRecord>,
    // the script tags of every extension, in order; kept for validation
    extension_scripts: Vec<Vec<Tag>>,
    data: SideData,
}

impl ScriptTable {
    /// Build the table from the `Script` and `Script_Extensions` properties.
    ///
    /// Codepoints without a script are `Zzzz`; codepoints without
    /// extensions get an empty entry.
    pub fn new(
        scripts: &SparseCodepointMap<Tag>,
        extensions: &SparseCodepointMap<Vec<Tag>>,
    ) -> Self {
        let scripts = change_points(scripts.iter().map(|(cp, s)| (cp, *s)), UNKNOWN_SCRIPT);
        for point in &scripts {
            log::debug!("{:08x} {}", point.cp, point.value);
        }

        let mut data = SideData::new();
        let mut records = Vec::new();
        let mut extension_scripts = Vec::new();
        for point in change_points(
            extensions.iter().map(|(cp, s)| (cp, s.clone())),
            Vec::new(),
        ) {
            log::debug!("{:08x} ext {:?}", point.cp, point.value);
            let offset = (!point.value.is_empty()).then(|| data.push(point.value.as_slice()));
            records.push(ScriptExtensionRecord {
                cp: point.cp,
                count: point.value.len().min(u8::MAX as usize) as u8,
                offset,
            });
            extension_scripts.push(point.value);
        }

        let header_len = COUNT_HEADER_LEN + scripts.len() * SCRIPT_ENTRY_LEN + COUNT_HEADER_LEN;
        offsets::rebase(&mut records, header_len);

        ScriptTable {
            scripts,
            extensions: records,
            extension_scripts,
            data,
        }
    }

    pub fn scripts(&self) -> &[ChangePoint<Tag>] {
        &self.scripts
    }

    pub fn extensions(&self) -> &[ScriptExtensionRecord] {
        &self.extensions
    }
}

impl TopLevelTable for ScriptTable {
    const TAG: Tag = Tag::new(b"scpt");
}

impl UcdWrite for ScriptTable {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.scripts.len() as u32).write_into(writer);
        for point in &self.scripts {
            point.cp.write_into(writer);
            point.value.write_into(writer);
        }
        (self.extensions.len() as u32).write_into(writer);
        self.extensions.write_into(writer);
        self.data.write_into(writer);
    }
}

impl Validate for ScriptTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("ScriptTable", |ctx| {
            ctx.in_field("scripts", |ctx| {
                check_change_points(ctx, &self.scripts);
                for point in &self.scripts {
                    ctx.check_tag(point.value);
                }
            });
            ctx.in_field("extensions", |ctx| {
                let points = self
                    .extensions
                    .iter()
                    .map(|record| ChangePoint::new(record.cp, record.count))
                    .collect::<Vec<_>>();
                check_change_points(ctx, &points);
                for scripts in &self.extension_scripts {
                    if scripts.len() > u8::MAX as usize {
                        ctx.report(format_args!("{} script extensions", scripts.len()));
                    }
                    scripts.iter().for_each(|tag| ctx.check_tag(*tag));
                }
            });
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tables::change_point::lookup;

    fn u32_at(bytes: &[u8], pos: usize) -> u32 {
        u32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap())
    }

    struct Decoded {
        scripts: Vec<(u32, Tag)>,
        extensions: Vec<(u32, Vec<Tag>)>,
    }

    fn decode(bytes: &[u8]) -> Decoded {
        let num_scripts = u32_at(bytes, 0) as usize;
        let scripts = (0..num_scripts)
            .map(|i| {
                let pos = 4 + i * 8;
                (u32_at(bytes, pos), Tag::from_u32(u32_at(bytes, pos + 4)))
            })
            .collect();
        let ext_start = 4 + num_scripts * 8;
        let num_ext = u32_at(bytes, ext_start) as usize;
        let extensions = (0..num_ext)
            .map(|i| {
                let pos = ext_start + 4 + i * 8;
                let entry = u32_at(bytes, pos);
                let count = (entry >> 24) as usize;
                let offset = u32_at(bytes, pos + 4) as usize;
                let tags = (0..count)
                    .map(|j| Tag::from_u32(u32_at(bytes, offset + j * 4)))
                    .collect();
                (entry & 0xFF_FFFF, tags)
            })
            .collect();
        Decoded {
            scripts,
            extensions,
        }
    }

    #[test]
    fn scripts_and_extensions() {
        let latn = Tag::new(b"Latn");
        let grek = Tag::new(b"Grek");
        let mut scripts = SparseCodepointMap::new();
        scripts.set_range(0x41..=0x5A, latn);
        scripts.set_range(0x370..=0x373, grek);

        let mut extensions = SparseCodepointMap::new();
        extensions.set_range(0x342..=0x342, vec![grek]);
        extensions.set_range(0x363..=0x36F, vec![latn]);
        extensions.set(0x485, vec![Tag::new(b"Cyrl"), Tag::new(b"Latn")]);

        let table = ScriptTable::new(&scripts, &extensions);
        let bytes = crate::dump_table(&table).unwrap();
        let decoded = decode(&bytes);

        assert_eq!(lookup(&decoded.scripts, 0x40), UNKNOWN_SCRIPT);
        assert_eq!(lookup(&decoded.scripts, 0x50), latn);
        assert_eq!(lookup(&decoded.scripts, 0x372), grek);
        assert_eq!(lookup(&decoded.scripts, 0x374), UNKNOWN_SCRIPT);
        assert_eq!(decoded.scripts.last(), Some(&(0x110000, UNKNOWN_SCRIPT)));

        assert_eq!(
            decoded.extensions,
            vec![
                (0, vec![]),
                (0x342, vec![grek]),
                (0x343, vec![]),
                (0x363, vec![latn]),
                (0x370, vec![]),
                (0x485, vec![Tag::new(b"Cyrl"), latn]),
                (0x486, vec![]),
                (0x110000, vec![]),
            ]
        );
    }

    #[test]
    fn extension_offsets_skip_both_lists() {
        let mut scripts = SparseCodepointMap::new();
        scripts.set(0x41, Tag::new(b"Latn"));
        let mut extensions = SparseCodepointMap::new();
        extensions.set(0x300, vec![Tag::new(b"Zinh")]);
        let table = ScriptTable::new(&scripts, &extensions);

        let num_scripts = table.scripts().len();
        let num_ext = table.extensions().len();
        let expected = (4 + num_scripts * 8 + 4 + num_ext * 8) as u32;
        let resolved = table
            .extensions()
            .iter()
            .filter_map(|r| r.offset.and_then(|o| o.resolved()))
            .collect::<Vec<_>>();
        assert_eq!(resolved, [expected]);
        let bytes = crate::dump_table(&table).unwrap();
        assert_eq!(bytes.len(), expected as usize + 4);
        assert_eq!(&bytes[expected as usize..], b"hniZ");
    }

    #[test]
    fn empty_inputs() {
        let table = ScriptTable::new(&SparseCodepointMap::new(), &SparseCodepointMap::new());
        let bytes = crate::dump_table(&table).unwrap();
        assert_eq!(bytes.len(), 4 + 8 + 4 + 8);
    }

    #[test]
    fn bad_script_tag_fails_validation() {
        let mut scripts = SparseCodepointMap::new();
        scripts.set(0x41, Tag::new(b"\0\0\0\0"));
        let table = ScriptTable::new(&scripts, &SparseCodepointMap::new());
        assert!(crate::dump_table(&table).is_err());
    }
}
