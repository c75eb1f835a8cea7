//! Common scalar data types used in compiled Unicode Character Database files
//!
//! A compiled `.ucd` file is a directory of tables, each identified by a
//! four-character [`Tag`], preceded by a header carrying the Unicode and
//! emoji [versions][UnicodeVersion] the data was built from.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod codepoint;
mod tag;
mod version;


pub use codepoint::{CODEPOINT_LIMIT, CODEPOINT_MASK, MAX_CODEPOINT};
pub use tag::{InvalidTag, Tag};
pub use version::{InvalidVersion, UnicodeVersion};

/// The magic number at the start of every compiled file.
pub const UCD_MAGIC: Tag = Tag::new(b"ucd2");
