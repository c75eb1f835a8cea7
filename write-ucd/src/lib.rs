//! Compiling Unicode Character Database tables.
//!
//! This crate turns per-codepoint property data, held in
//! [`SparseCodepointMap`][collections::SparseCodepointMap]s and
//! [`RangeSet`][collections::RangeSet]s, into the tables of a compiled
//! `.ucd` file, and assembles those tables into a file with [`UcdBuilder`].
//!
//! Each table module in [`tables`] exposes a type that is constructed from
//! the property data. Construction is where the interesting work happens:
//! the encoder walks the runs of the map and picks a compact record shape
//! for each stretch of values, spilling anything that doesn't fit a record
//! into the table's side data. The resulting type can then be validated
//! and written.
//!
//! # Example
//!
//! ```
//! use write_ucd::{
//!     tables::{binprop::BinaryPropertyTable, ccc::CccTable},
//!     BuildContext, TableSpec, UcdBuilder,
//! };
//! use write_ucd::types::{Tag, UnicodeVersion};
//! use write_ucd::collections::{RangeSet, SparseCodepointMap};
//!
//! let mut ccc = SparseCodepointMap::new();
//! ccc.set_range(0x300..=0x314, 230u8);
//! let mut alphabetic = RangeSet::new();
//! alphabetic.add(0x41..=0x5A);
//!
//! let context = BuildContext::with_tables(
//!     UnicodeVersion::new(15, 1, 0),
//!     [
//!         TableSpec::required(b"ccc ", "Canonical_Combining_Class"),
//!         TableSpec::required(b"Alp?", "Alphabetic"),
//!     ],
//! );
//!
//! let mut builder = UcdBuilder::new();
//! builder.add_table(&CccTable::new(&ccc)).unwrap();
//! builder
//!     .add_table_as(Tag::new(b"Alp?"), &BinaryPropertyTable::new(&alphabetic))
//!     .unwrap();
//! let bytes = builder.build(&context).unwrap();
//! assert_eq!(&bytes[..4], b"2dcu");
//! ```

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod context;
pub mod error;
#[cfg(test)]
mod hex_diff;
pub mod offsets;
pub mod tables;
mod ucd_builder;
pub mod validate;
mod write;

pub use context::{BuildContext, Requirement, TableSpec, STANDARD_TABLES};
pub use error::Error;
pub use ucd_builder::{BuilderError, DirectoryEntry, UcdBuilder, UcdHeader};
pub use write::{dump_table, TableWriter, UcdWrite};

/// Public re-export of the ucd-types crate.
pub extern crate ucd_types as types;

/// Public re-export of the ucd-collections crate.
pub extern crate ucd_collections as collections;
