//! Binary property tables
//!
//! Every binary property (`Alphabetic`, `White_Space`, the emoji
//! properties, ...) is stored as its own table of codepoint ranges. The
//! tag of each table comes from the
//! [`BuildContext`][crate::BuildContext] registry.

use std::ops::RangeInclusive;

use ucd_collections::RangeSet;

use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// The compiled ranges of one binary property.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BinaryPropertyTable {
    ranges: Vec<RangeInclusive<u32>>,
}

impl BinaryPropertyTable {
    pub fn new(set: &RangeSet) -> Self {
        let ranges = set.iter_ranges().collect::<Vec<_>>();
        for range in &ranges {
            log::debug!("{:08x}..={:08x}", range.start(), range.end());
        }
        BinaryPropertyTable { ranges }
    }

    pub fn ranges(&self) -> &[RangeInclusive<u32>] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl UcdWrite for BinaryPropertyTable {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.ranges.len() as u32).write_into(writer);
        for range in &self.ranges {
            range.start().write_into(writer);
            range.end().write_into(writer);
        }
    }
}

impl Validate for BinaryPropertyTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("BinaryPropertyTable", |ctx| {
            ctx.in_field("ranges", |ctx| {
                ctx.in_array(|ctx| {
                    for range in &self.ranges {
                        ctx.array_item(|ctx| {
                            ctx.check_codepoint_range(*range.start(), *range.end())
                        });
                    }
                })
            })
        })
    }
}
