//! The shared string pool
//!
//! Tables that carry names (the block table, for one) store a string id
//! instead of the string. An id is the byte offset of the string in the
//! pool, so a reader finds a string without any index.

use std::fmt;

use indexmap::IndexMap;
use ucd_types::Tag;

use super::TopLevelTable;
use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// The offset of a string in the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StringId(u32);

impl StringId {
    /// The value written for an optional string that is absent.
    pub const NONE: StringId = StringId(0xFFFF_FFFF);

    pub fn to_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sid {}", self.0)
    }
}

impl UcdWrite for StringId {
    fn write_into(&self, writer: &mut TableWriter) {
        self.0.write_into(writer)
    }
}

/// A deduplicating pool of NUL-terminated ASCII strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StringPool {
    strings: IndexMap<String, StringId>,
    len: u32,
}

impl StringPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string, returning its id.
    ///
    /// Adding a string that is already in the pool returns the existing id.
    pub fn add(&mut self, s: &str) -> StringId {
        if let Some(id) = self.strings.get(s) {
            return *id;
        }
        let id = StringId(self.len);
        self.len = self
            .len
            .checked_add(s.len() as u32 + 1)
            .expect("string pool larger than u32::MAX");
        log::debug!("{id}: {s:?}");
        self.strings.insert(s.to_owned(), id);
        id
    }

    /// Look up the id of a string that was added earlier.
    pub fn get(&self, s: &str) -> Option<StringId> {
        self.strings.get(s).copied()
    }

    /// The number of distinct strings.
    pub fn count(&self) -> usize {
        self.strings.len()
    }

    /// The size of the pool in bytes, including terminators.
    pub fn byte_len(&self) -> u32 {
        self.len
    }
}

impl TopLevelTable for StringPool {
    const TAG: Tag = Tag::new(b"strn");
}

impl UcdWrite for StringPool {
    fn write_into(&self, writer: &mut TableWriter) {
        self.len.write_into(writer);
        for s in self.strings.keys() {
            writer.write_slice(s.as_bytes());
            0u8.write_into(writer);
        }
    }
}

impl Validate for StringPool {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("StringPool", |ctx| {
            ctx.in_field("strings", |ctx| {
                for (s, id) in &self.strings {
                    if !s.is_ascii() {
                        ctx.report(format_args!("{id} {s:?} is not ASCII"));
                    }
                    if s.contains('\0') {
                        ctx.report(format_args!("{id} {s:?} contains NUL"));
                    }
                }
            })
        })
    }
}
