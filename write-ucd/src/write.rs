use ucd_types::Tag;

use crate::validate::{Validate, ValidationReport};

/// A type that can be written out as part of a compiled `.ucd` file.
///
/// Every multi-byte field in the format is little-endian and fixed width.
pub trait UcdWrite {
    /// Write our data into this [TableWriter].
    fn write_into(&self, writer: &mut TableWriter);
}

/// A buffer that accumulates the bytes of a single table.
///
/// Tables in this format reference their variable-length data with offsets
/// that are resolved before writing (see [`crate::offsets`]), so the writer
/// is just a byte sink.
#[derive(Debug, Default, Clone)]
pub struct TableWriter {
    bytes: Vec<u8>,
}

/// Attempt to serialize a table.
///
/// If the table is malformed, this will return an Err([`ValidationReport`]),
/// otherwise it will return the bytes encoding the table.
pub fn dump_table<T: UcdWrite + Validate>(table: &T) -> Result<Vec<u8>, ValidationReport> {
    table.validate()?;
    let mut writer = TableWriter::default();
    table.write_into(&mut writer);
    Ok(writer.into_data())
}

impl TableWriter {
    /// Write raw bytes into this table.
    ///
    /// The caller is responsible for ensuring bytes are in little-endian order.
    #[inline]
    pub fn write_slice(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes)
    }

    /// The number of bytes written so far.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Finish writing, returning the bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.bytes
    }
}

macro_rules! write_le_bytes {
    ($ty:ty) => {
        impl UcdWrite for $ty {
            #[inline]
            fn write_into(&self, writer: &mut TableWriter) {
                writer.write_slice(&self.to_le_bytes())
            }
        }
    };
}

//NOTE: not implemented for DataOffset's inner value! write the offset itself,
//so unresolved offsets are caught.
write_le_bytes!(u8);
write_le_bytes!(i8);
write_le_bytes!(u16);
write_le_bytes!(i16);
write_le_bytes!(u32);
write_le_bytes!(i32);

impl UcdWrite for Tag {
    #[inline]
    fn write_into(&self, writer: &mut TableWriter) {
        self.to_u32().write_into(writer)
    }
}

impl<T: UcdWrite> UcdWrite for [T] {
    fn write_into(&self, writer: &mut TableWriter) {
        self.iter().for_each(|item| item.write_into(writer))
    }
}

impl<T: UcdWrite, const N: usize> UcdWrite for [T; N] {
    fn write_into(&self, writer: &mut TableWriter) {
        self.as_slice().write_into(writer)
    }
}
