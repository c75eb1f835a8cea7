//! The primary composites table
//!
//! Canonical composition needs the inverse of the canonical decomposition
//! mapping, restricted to the pairs that may recompose. Hangul syllables
//! compose algorithmically and are not listed.

use ucd_collections::{RangeSet, SparseCodepointMap};
use ucd_types::Tag;

use super::deco::{Decomposition, DecompositionTag};
use super::TopLevelTable;
use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// A pair of codepoints and the primary composite they form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Composition {
    pub starter: u32,
    pub composing: u32,
    pub composite: u32,
}

impl UcdWrite for Composition {
    fn write_into(&self, writer: &mut TableWriter) {
        self.starter.write_into(writer);
        self.composing.write_into(writer);
        self.composite.write_into(writer);
    }
}

impl Validate for Composition {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.check_codepoint(self.starter);
        ctx.check_codepoint(self.composing);
        ctx.check_codepoint(self.composite);
    }
}

/// The compiled `prmc` table, sorted by `(starter, composing)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimaryCompositeTable {
    compositions: Vec<Composition>,
}

impl PrimaryCompositeTable {
    /// Build the table from the decomposition mappings.
    ///
    /// Every canonical decomposition to exactly two codepoints is included
    /// unless its composite has `Full_Composition_Exclusion`.
    pub fn new(decompositions: &SparseCodepointMap<Decomposition>, exclusions: &RangeSet) -> Self {
        let mut compositions = decompositions
            .iter()
            .filter(|(cp, _)| !exclusions.contains(*cp))
            .filter_map(|(composite, decomposition)| {
                match (decomposition.tag, decomposition.mapping.as_slice()) {
                    (DecompositionTag::Canonical, [starter, composing]) => Some(Composition {
                        starter: *starter,
                        composing: *composing,
                        composite,
                    }),
                    _ => None,
                }
            })
            .collect::<Vec<_>>();
        compositions.sort_unstable();
        for c in &compositions {
            log::debug!("{:08x} {:08x} -> {:08x}", c.starter, c.composing, c.composite);
        }
        PrimaryCompositeTable { compositions }
    }

    pub fn compositions(&self) -> &[Composition] {
        &self.compositions
    }
}

impl TopLevelTable for PrimaryCompositeTable {
    const TAG: Tag = Tag::new(b"prmc");
}

impl UcdWrite for PrimaryCompositeTable {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.compositions.len() as u32).write_into(writer);
        self.compositions.write_into(writer);
    }
}

impl Validate for PrimaryCompositeTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("PrimaryCompositeTable", |ctx| {
            ctx.in_field("compositions", |ctx| {
                self.compositions.validate_impl(ctx);
                if self
                    .compositions
                    .windows(2)
                    .any(|w| (w[0].starter, w[0].composing) == (w[1].starter, w[1].composing))
                {
                    ctx.report("a pair composes to more than one codepoint");
                }
            })
        })
    }
}
