//! The [canonical combining class](https://www.unicode.org/reports/tr44/#Canonical_Combining_Class_Values) table

use std::fmt::Display;

use ucd_collections::SparseCodepointMap;
use ucd_types::Tag;

use super::TopLevelTable;
use crate::offsets::{DataOffset, Record, RecordTable, SideData};
use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// The most classes one table record can describe; its count is a `u8`.
const MAX_TABLE_COUNT: usize = u8::MAX as usize;

/// Tables this short are stored inline in the record.
const MAX_INLINE_COUNT: usize = 4;

/// The kind discriminant stored in the top byte of each record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CccRangeKind {
    Run = 0,
    Inline = 1,
    Table = 2,
}

/// One 10-byte record in the `ccc ` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CccRecord {
    /// Every codepoint in `first..=last` has `class`.
    Run { first: u32, last: u32, class: u8 },
    /// Up to four consecutive codepoints, one class each.
    Inline {
        first: u32,
        count: u8,
        classes: [u8; 4],
    },
    /// `count` consecutive codepoints with one class byte each in side data.
    Table {
        first: u32,
        count: u8,
        offset: DataOffset,
    },
}

impl CccRecord {
    pub fn kind(&self) -> CccRangeKind {
        match self {
            CccRecord::Run { .. } => CccRangeKind::Run,
            CccRecord::Inline { .. } => CccRangeKind::Inline,
            CccRecord::Table { .. } => CccRangeKind::Table,
        }
    }

    /// The first and last codepoints covered by this record.
    pub fn range(&self) -> (u32, u32) {
        match *self {
            CccRecord::Run { first, last, .. } => (first, last),
            CccRecord::Inline { first, count, .. } | CccRecord::Table { first, count, .. } => {
                (first, first.saturating_add(count as u32).saturating_sub(1))
            }
        }
    }
}

impl Display for CccRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CccRecord::Run { first, last, class } => {
                write!(f, "run {first:08x}..{last:08x} = {class}")
            }
            CccRecord::Inline {
                first,
                count,
                classes,
            } => write!(f, "inline {first:08x} {:?}", &classes[..*count as usize]),
            CccRecord::Table { first, count, .. } => write!(f, "table {first:08x} ({count})"),
        }
    }
}

impl UcdWrite for CccRecord {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.range().0 | ((self.kind() as u32) << 24)).write_into(writer);
        match self {
            CccRecord::Run { last, class, .. } => {
                last.write_into(writer);
                class.write_into(writer);
            }
            CccRecord::Inline { count, classes, .. } => {
                count.write_into(writer);
                classes.write_into(writer);
            }
            CccRecord::Table { count, offset, .. } => {
                count.write_into(writer);
                offset.write_into(writer);
            }
        }
        // reserved
        0u8.write_into(writer);
    }
}

impl Record for CccRecord {
    const RECORD_LEN: usize = 10;

    fn data_offset_mut(&mut self) -> Option<&mut DataOffset> {
        match self {
            CccRecord::Table { offset, .. } => Some(offset),
            _ => None,
        }
    }
}

impl Validate for CccRecord {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        let (first, last) = self.range();
        ctx.check_codepoint_range(first, last);
        match self {
            CccRecord::Inline { count, .. } if *count as usize > MAX_INLINE_COUNT => {
                ctx.report(format_args!("{count} classes don't fit inline"))
            }
            CccRecord::Inline { count: 0, .. } | CccRecord::Table { count: 0, .. } => {
                ctx.report("empty class table")
            }
            _ => (),
        }
    }
}

/// The compiled `ccc ` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CccTable {
    table: RecordTable<CccRecord>,
}

impl CccTable {
    /// Encode a map from codepoints to combining classes.
    ///
    /// Repeated classes become runs. Codepoints whose class differs from
    /// both neighbours are collected into a table that starts at the first
    /// of them.
    pub fn new(classes: &SparseCodepointMap<u8>) -> Self {
        let mut encoder = CccEncoder::default();
        for (base, run) in classes.runs() {
            encoder.add_run(base, run);
        }
        CccTable {
            table: RecordTable::new(encoder.records, encoder.data),
        }
    }

    pub fn records(&self) -> &[CccRecord] {
        self.table.records()
    }
}

impl TopLevelTable for CccTable {
    const TAG: Tag = Tag::new(b"ccc ");
}

impl UcdWrite for CccTable {
    fn write_into(&self, writer: &mut TableWriter) {
        self.table.write_into(writer)
    }
}

impl Validate for CccTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("CccTable", |ctx| self.table.validate_impl(ctx))
    }
}

#[derive(Clone, Copy)]
struct Pending {
    base: u32,
    class: u8,
    len: u32,
}

impl Pending {
    fn new(base: u32, class: u8) -> Self {
        Pending {
            base,
            class,
            len: 1,
        }
    }
}

#[derive(Default)]
struct CccEncoder {
    records: Vec<CccRecord>,
    data: SideData,
}

impl CccEncoder {
    fn add_run(&mut self, base: u32, classes: &[u8]) {
        let mut pending: Option<Pending> = None;
        let mut table_base = base;
        let mut table = Vec::new();

        for (cp, &class) in (base..).zip(classes) {
            pending = Some(match pending {
                Some(run) if run.class == class => {
                    self.finish_table(table_base, &mut table);
                    Pending {
                        len: run.len + 1,
                        ..run
                    }
                }
                Some(run) if run.len == 1 => {
                    if table.is_empty() {
                        table_base = run.base;
                    }
                    table.push(run.class);
                    Pending::new(cp, class)
                }
                Some(run) => {
                    self.push_run(run);
                    Pending::new(cp, class)
                }
                None => Pending::new(cp, class),
            });
        }

        match pending {
            Some(run) if run.len == 1 => {
                if table.is_empty() {
                    table_base = run.base;
                }
                table.push(run.class);
                self.finish_table(table_base, &mut table);
            }
            Some(run) => self.push_run(run),
            None => (),
        }
    }

    fn push(&mut self, record: CccRecord) {
        log::debug!("{record}");
        self.records.push(record);
    }

    fn push_run(&mut self, run: Pending) {
        self.push(CccRecord::Run {
            first: run.base,
            last: run.base + run.len - 1,
            class: run.class,
        });
    }

    fn finish_table(&mut self, base: u32, table: &mut Vec<u8>) {
        for (first, chunk) in (base..)
            .step_by(MAX_TABLE_COUNT)
            .zip(table.chunks(MAX_TABLE_COUNT))
        {
            let count = chunk.len() as u8;
            let record = if chunk.len() <= MAX_INLINE_COUNT {
                let mut classes = [0u8; 4];
                classes[..chunk.len()].copy_from_slice(chunk);
                CccRecord::Inline {
                    first,
                    count,
                    classes,
                }
            } else {
                CccRecord::Table {
                    first,
                    count,
                    offset: self.data.push(chunk),
                }
            };
            self.push(record);
        }
        table.clear();
    }
}
