//! Codepoint-indexed collections used while compiling UCD tables.
//!
//! [`SparseCodepointMap`] maps codepoints to property values and exposes
//! them as maximal runs of consecutive codepoints, which is the shape every
//! table encoder consumes. [`RangeSet`] is a set of codepoints stored as
//! disjoint inclusive ranges, used for binary properties and exclusion
//! lists.

#![forbid(unsafe_code)]

mod range_set;
mod sparse_map;

pub use range_set::RangeSet;
pub use sparse_map::SparseCodepointMap;
