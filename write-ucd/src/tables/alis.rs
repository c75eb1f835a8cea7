//! The [name alias](https://www.unicode.org/reports/tr44/#NameAliases.txt) table
//!
//! Like the `name` table this stores every entry twice, ordered by
//! codepoint and then by alias. The alias kind is packed into the top byte
//! of the codepoint field.

use ucd_types::Tag;

use super::strn::{StringId, StringPool};
use super::TopLevelTable;
use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// The type field of `NameAliases.txt`.
///
/// The values are bit flags so that readers can filter by a set of kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum AliasKind {
    Correction = 0x01,
    Control = 0x02,
    Alternate = 0x04,
    Figment = 0x08,
    Abbreviation = 0x10,
}

impl AliasKind {
    /// Parse the lowercase type name used in `NameAliases.txt`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "correction" => Some(AliasKind::Correction),
            "control" => Some(AliasKind::Control),
            "alternate" => Some(AliasKind::Alternate),
            "figment" => Some(AliasKind::Figment),
            "abbreviation" => Some(AliasKind::Abbreviation),
            _ => None,
        }
    }
}

/// One line of `NameAliases.txt`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alias {
    pub cp: u32,
    pub kind: AliasKind,
    pub name: String,
}

impl Alias {
    pub fn new(cp: u32, kind: AliasKind, name: impl Into<String>) -> Self {
        Alias {
            cp,
            kind,
            name: name.into(),
        }
    }
}

/// One 8-byte entry of the `alis` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AliasEntry {
    pub cp: u32,
    pub kind: AliasKind,
    pub name: StringId,
}

impl AliasEntry {
    fn packed(&self) -> u32 {
        self.cp | ((self.kind as u32) << 24)
    }
}

impl UcdWrite for AliasEntry {
    fn write_into(&self, writer: &mut TableWriter) {
        self.packed().write_into(writer);
        self.name.write_into(writer);
    }
}

impl Validate for AliasEntry {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.check_codepoint(self.cp);
    }
}

/// The compiled `alis` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AliasTable {
    by_codepoint: Vec<AliasEntry>,
    by_name: Vec<AliasEntry>,
    duplicates: Vec<Alias>,
}

impl AliasTable {
    /// Build the table, adding the aliases to `strings` in input order.
    pub fn new(aliases: &[Alias], strings: &mut StringPool) -> Self {
        let mut sorted = aliases
            .iter()
            .map(|alias| {
                let entry = AliasEntry {
                    cp: alias.cp,
                    kind: alias.kind,
                    name: strings.add(&alias.name),
                };
                (alias, entry)
            })
            .collect::<Vec<_>>();

        sorted.sort_by(|(a, _), (b, _)| (a.cp, a.kind, &a.name).cmp(&(b.cp, b.kind, &b.name)));
        let duplicates = sorted
            .windows(2)
            .filter(|pair| pair[0].0 == pair[1].0)
            .map(|pair| pair[1].0.clone())
            .collect();
        let by_codepoint = sorted.iter().map(|(_, entry)| *entry).collect();

        sorted.sort_by(|(a, _), (b, _)| (&a.name, a.cp, a.kind).cmp(&(&b.name, b.cp, b.kind)));
        let by_name = sorted.iter().map(|(_, entry)| *entry).collect();

        log::debug!("{} aliases", aliases.len());
        AliasTable {
            by_codepoint,
            by_name,
            duplicates,
        }
    }

    /// The entries ordered by codepoint, then kind.
    pub fn by_codepoint(&self) -> &[AliasEntry] {
        &self.by_codepoint
    }

    /// The same entries, ordered by the alias strings.
    pub fn by_name(&self) -> &[AliasEntry] {
        &self.by_name
    }
}

impl TopLevelTable for AliasTable {
    const TAG: Tag = Tag::new(b"alis");
}

impl UcdWrite for AliasTable {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.by_codepoint.len() as u32).write_into(writer);
        self.by_codepoint.write_into(writer);
        self.by_name.write_into(writer);
    }
}

impl Validate for AliasTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("AliasTable", |ctx| {
            ctx.in_field("by_codepoint", |ctx| {
                self.by_codepoint.validate_impl(ctx);
                for alias in &self.duplicates {
                    ctx.report(format_args!(
                        "alias {:?} for 0x{:X} is listed twice",
                        alias.name, alias.cp
                    ));
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::hex_diff::assert_hex_eq;

    #[test]
    fn kind_in_top_byte() {
        let aliases = [
            Alias::new(0x00, AliasKind::Abbreviation, "NUL"),
            Alias::new(0x1A2, AliasKind::Correction, "LATIN CAPITAL LETTER GHA"),
            Alias::new(0x00, AliasKind::Control, "NULL"),
        ];
        let mut strings = StringPool::new();
        let table = AliasTable::new(&aliases, &mut strings);

        let bytes = crate::dump_table(&table).unwrap();
        let expected = [
            0x03u8, 0, 0, 0,
            // by codepoint, then kind: NULL at 29, NUL at 0, GHA at 4
            0x00, 0, 0, 0x02, 29, 0, 0, 0,
            0x00, 0, 0, 0x10, 0, 0, 0, 0,
            0xA2, 0x01, 0, 0x01, 4, 0, 0, 0,
            // by name
            0xA2, 0x01, 0, 0x01, 4, 0, 0, 0,
            0x00, 0, 0, 0x10, 0, 0, 0, 0,
            0x00, 0, 0, 0x02, 29, 0, 0, 0,
        ];
        assert_hex_eq!(bytes, expected);
    }

    #[test]
    fn type_names() {
        assert_eq!(AliasKind::from_name("figment"), Some(AliasKind::Figment));
        assert_eq!(AliasKind::from_name("Figment"), None);
    }

    #[test]
    fn repeated_alias_fails_validation() {
        let aliases = [
            Alias::new(0x80, AliasKind::Figment, "PADDING CHARACTER"),
            Alias::new(0x80, AliasKind::Figment, "PADDING CHARACTER"),
            Alias::new(0x80, AliasKind::Abbreviation, "PAD"),
        ];
        let table = AliasTable::new(&aliases, &mut StringPool::new());
        assert_eq!(table.by_codepoint().len(), 3);
        let report = crate::dump_table(&table).unwrap_err();
        assert_eq!(report.len(), 1);
    }
}
