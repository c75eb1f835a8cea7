//! Offsets into side data, and the rebase pass that resolves them.
//!
//! Tables in a compiled file are a fixed-width record array followed by a
//! variable-length side-data region. While records are being classified we
//! don't yet know how many there will be, so any payload that doesn't fit a
//! record's fixed slot is appended to [`SideData`] and the record keeps a
//! [`DataOffset::Relative`] offset, measured from the start of the side
//! data.
//!
//! Once classification is finished, a single [`rebase`] pass adds the size
//! of the header and record array to every relative offset, producing
//! offsets from the start of the table's own blob.

use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// The width of the `u32` record count at the start of most tables.
pub const COUNT_HEADER_LEN: usize = 4;

/// An offset from a record to its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataOffset {
    /// Offset from the start of the side-data region.
    Relative(u32),
    /// Offset from the start of the table.
    Resolved(u32),
}

impl DataOffset {
    /// Convert a relative offset into a resolved one.
    ///
    /// # Panics
    ///
    /// Panics if the offset is already resolved, or if the result would
    /// overflow a `u32`. Both indicate a bug in an encoder.
    pub fn rebase(&mut self, base: u32) {
        match *self {
            DataOffset::Relative(rel) => {
                let abs = rel
                    .checked_add(base)
                    .expect("side data offset overflows u32");
                *self = DataOffset::Resolved(abs);
            }
            DataOffset::Resolved(abs) => panic!("offset {abs} rebased twice"),
        }
    }

    /// The resolved offset, or `None` if it has not been rebased yet.
    pub fn resolved(&self) -> Option<u32> {
        match self {
            DataOffset::Resolved(abs) => Some(*abs),
            DataOffset::Relative(_) => None,
        }
    }

    /// The offset as recorded during classification, or `None` once it has
    /// been rebased.
    pub fn relative(&self) -> Option<u32> {
        match self {
            DataOffset::Relative(rel) => Some(*rel),
            DataOffset::Resolved(_) => None,
        }
    }
}

impl UcdWrite for DataOffset {
    fn write_into(&self, writer: &mut TableWriter) {
        match self {
            DataOffset::Resolved(abs) => abs.write_into(writer),
            DataOffset::Relative(rel) => panic!("unresolved side data offset {rel}"),
        }
    }
}

/// The append-only variable-length region that trails a record array.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SideData {
    bytes: Vec<u8>,
}

impl SideData {
    /// Create a new, empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `data`, returning the relative offset at which it starts.
    pub fn push<T: UcdWrite + ?Sized>(&mut self, data: &T) -> DataOffset {
        let offset = self.current_offset();
        let mut writer = TableWriter::default();
        data.write_into(&mut writer);
        self.bytes.extend(writer.into_data());
        offset
    }

    /// The offset at which the next payload will start.
    pub fn current_offset(&self) -> DataOffset {
        DataOffset::Relative(self.bytes.len() as u32)
    }

    /// The number of bytes in the region.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The raw bytes of the region.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl UcdWrite for SideData {
    fn write_into(&self, writer: &mut TableWriter) {
        writer.write_slice(&self.bytes)
    }
}

/// A fixed-width record that may reference side data.
pub trait Record: UcdWrite {
    /// The encoded size of one record, in bytes.
    const RECORD_LEN: usize;

    /// The offset this record holds, if its kind has one.
    fn data_offset_mut(&mut self) -> Option<&mut DataOffset>;
}

/// Resolve the side-data offsets of a finished record array.
///
/// `header_len` is the number of bytes in the table before the first record.
/// Returns the base that was added, which is also the position of the side
/// data in the finished table.
pub fn rebase<R: Record>(records: &mut [R], header_len: usize) -> u32 {
    let base = u32::try_from(header_len + records.len() * R::RECORD_LEN)
        .expect("record array larger than u32::MAX");
    for offset in records.iter_mut().filter_map(Record::data_offset_mut) {
        offset.rebase(base);
    }
    base
}

/// A compiled table: a `u32` record count, the records, then side data.
///
/// This is the shape shared by every table that uses side data. The
/// offsets are resolved when the table is constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordTable<R> {
    records: Vec<R>,
    data: SideData,
}

impl<R: Record> RecordTable<R> {
    /// Rebase the offsets in `records` and pair them with their side data.
    pub fn new(mut records: Vec<R>, data: SideData) -> Self {
        rebase(&mut records, COUNT_HEADER_LEN);
        RecordTable { records, data }
    }

    /// The finished records.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// The side data that trails the records.
    pub fn side_data(&self) -> &SideData {
        &self.data
    }

    /// The size of the encoded table, in bytes.
    pub fn compiled_len(&self) -> usize {
        COUNT_HEADER_LEN + self.records.len() * R::RECORD_LEN + self.data.len()
    }
}

impl<R: Record> UcdWrite for RecordTable<R> {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.records.len() as u32).write_into(writer);
        let start = writer.len();
        self.records.write_into(writer);
        debug_assert_eq!(
            writer.len() - start,
            self.records.len() * R::RECORD_LEN,
            "record length mismatch"
        );
        self.data.write_into(writer);
    }
}

impl<R: Record + Validate> Validate for RecordTable<R> {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_field("records", |ctx| self.records.validate_impl(ctx));
    }
}
