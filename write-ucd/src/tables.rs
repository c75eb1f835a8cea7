//! A directory of all the table encoders.

pub mod age;
pub mod alis;
pub mod bidi;
pub mod binprop;
pub mod blok;
pub mod brak;
pub mod case;
pub mod ccc;
pub mod change_point;
pub mod deco;
pub mod genc;
pub mod jamo;
pub mod join;
pub mod mirr;
pub mod name;
pub mod numb;
pub mod prmc;
pub mod quick_check;
pub mod rads;
pub mod scpt;
pub mod strn;

use ucd_types::Tag;

/// A table with a single fixed tag.
///
/// Encoders that serve several tables (the case mappings, the change-point
/// tables, the per-codepoint strings, the binary properties) don't
/// implement this; add them to a
/// [`UcdBuilder`][crate::UcdBuilder] with an explicit tag.
pub trait TopLevelTable {
    /// The table's tag.
    const TAG: Tag;
}
