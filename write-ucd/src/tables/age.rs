//! The [age](https://www.unicode.org/reports/tr44/#Character_Age) table

use std::collections::BTreeSet;

use ucd_collections::SparseCodepointMap;
use ucd_types::{Tag, UnicodeVersion};

use super::change_point::{change_points, check_change_points, ChangePoint};
use super::TopLevelTable;
use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// The version index of unassigned codepoints.
pub const UNASSIGNED: u8 = 0xff;

/// The compiled `age ` table.
///
/// The table starts with the sorted list of versions that occur, packed as
/// `major << 16 | minor`, followed by a change-point list whose values are
/// indices into that list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgeTable {
    versions: Vec<u32>,
    points: Vec<ChangePoint<u8>>,
}

impl AgeTable {
    /// Build the table from the version each codepoint was assigned in.
    ///
    /// Only the major and minor components are recorded.
    pub fn new(ages: &SparseCodepointMap<UnicodeVersion>) -> Self {
        let versions = ages
            .iter()
            .map(|(_, version)| version.to_age_u32())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        let index_of = |version: &UnicodeVersion| {
            let idx = versions
                .binary_search(&version.to_age_u32())
                .unwrap_or_default();
            // validation reports tables with too many versions
            u8::try_from(idx).unwrap_or(UNASSIGNED)
        };
        let points = change_points(
            ages.iter().map(|(cp, version)| (cp, index_of(version))),
            UNASSIGNED,
        );
        for point in &points {
            log::debug!("{:08x} {}", point.cp, point.value);
        }
        AgeTable { versions, points }
    }

    /// The packed versions, in index order.
    pub fn versions(&self) -> &[u32] {
        &self.versions
    }

    pub fn points(&self) -> &[ChangePoint<u8>] {
        &self.points
    }
}

impl TopLevelTable for AgeTable {
    const TAG: Tag = Tag::new(b"age ");
}

impl UcdWrite for AgeTable {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.versions.len() as u32).write_into(writer);
        self.versions.write_into(writer);
        (self.points.len() as u32).write_into(writer);
        for point in &self.points {
            (point.cp | ((point.value as u32) << 24)).write_into(writer);
        }
    }
}

impl Validate for AgeTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("AgeTable", |ctx| {
            ctx.in_field("versions", |ctx| {
                if self.versions.len() >= UNASSIGNED as usize {
                    ctx.report(format_args!(
                        "{} versions can't be indexed by a byte",
                        self.versions.len()
                    ));
                }
            });
            check_change_points(ctx, &self.points);
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tables::change_point::lookup;

    fn v(major: u16, minor: u16) -> UnicodeVersion {
        UnicodeVersion::new(major, minor, 0)
    }

    fn read(bytes: &[u8]) -> (Vec<u32>, Vec<(u32, u8)>) {
        let words = bytes
            .chunks(4)
            .map(|c| u32::from_le_bytes(c.try_into().unwrap()))
            .collect::<Vec<_>>();
        let num_versions = words[0] as usize;
        let versions = words[1..1 + num_versions].to_vec();
        let num_entries = words[1 + num_versions] as usize;
        let entries = words[2 + num_versions..]
            .iter()
            .map(|e| (e & 0xFF_FFFF, (e >> 24) as u8))
            .collect::<Vec<_>>();
        assert_eq!(entries.len(), num_entries);
        (versions, entries)
    }

    #[test]
    fn versions_are_sorted_and_indexed() {
        let mut ages = SparseCodepointMap::new();
        ages.set_range(0x0..=0x1F, v(1, 1));
        ages.set_range(0x20AC..=0x20AC, v(2, 1));
        ages.set_range(0x20B9..=0x20B9, v(6, 0));
        ages.set_range(0x20BA..=0x20BA, v(6, 2));
        ages.set(0x1F600, UnicodeVersion::new(6, 1, 3));

        let table = AgeTable::new(&ages);
        let (versions, entries) = read(&crate::dump_table(&table).unwrap());
        assert_eq!(versions, [0x0001_0001, 0x0002_0001, 0x0006_0000, 0x0006_0001, 0x0006_0002]);
        assert_eq!(entries.first(), Some(&(0, 0)));
        assert_eq!(entries.last(), Some(&(0x110000, UNASSIGNED)));

        assert_eq!(lookup(&entries, 0x10), 0);
        assert_eq!(lookup(&entries, 0x20), UNASSIGNED);
        assert_eq!(lookup(&entries, 0x20AC), 1);
        assert_eq!(lookup(&entries, 0x20B9), 2);
        assert_eq!(lookup(&entries, 0x20BA), 4);
        assert_eq!(lookup(&entries, 0x1F600), 3);
        assert_eq!(lookup(&entries, 0x1F601), UNASSIGNED);
    }

    #[test]
    fn too_many_versions_fail_validation() {
        let ages = (0..300u32)
            .map(|i| (i * 2, v(1 + (i / 100) as u16, (i % 100) as u16)))
            .collect::<SparseCodepointMap<_>>();
        let table = AgeTable::new(&ages);
        assert_eq!(table.versions().len(), 300);
        assert!(crate::dump_table(&table).is_err());
    }
}
