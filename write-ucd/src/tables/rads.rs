//! The [radical-stroke](https://www.unicode.org/reports/tr38/#kRSUnicode) table

use ucd_collections::SparseCodepointMap;
use ucd_types::Tag;

use super::TopLevelTable;
use crate::offsets::{DataOffset, Record, RecordTable, SideData};
use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// Set in the stroke byte when the radical is the simplified form.
const SIMPLIFIED_FLAG: u8 = 0x80;
const STROKE_MASK: u8 = 0x7f;

/// A `kRSUnicode` value: a radical number and a residual stroke count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RadicalStroke {
    pub radical: u8,
    /// `true` for the simplified form of the radical (written `'`)
    pub simplified: bool,
    /// Residual strokes; this can be negative
    pub strokes: i8,
}

impl RadicalStroke {
    pub fn new(radical: u8, simplified: bool, strokes: i8) -> Self {
        RadicalStroke {
            radical,
            simplified,
            strokes,
        }
    }

    /// Parse a single `kRSUnicode` value, such as `120'.3`.
    pub fn parse(value: &str) -> Option<Self> {
        let (radical, strokes) = value.split_once('.')?;
        let (radical, simplified) = match radical.strip_suffix('\'') {
            Some(radical) => (radical, true),
            None => (radical, false),
        };
        Some(RadicalStroke {
            radical: radical.parse().ok()?,
            simplified,
            strokes: strokes.parse().ok()?,
        })
    }

    /// `true` if the stroke count survives the seven-bit encoding.
    pub fn fits(&self) -> bool {
        (-64..=63).contains(&self.strokes)
    }

    fn stroke_byte(&self) -> u8 {
        let flag = if self.simplified { SIMPLIFIED_FLAG } else { 0 };
        (self.strokes as u8 & STROKE_MASK) | flag
    }
}

impl UcdWrite for RadicalStroke {
    fn write_into(&self, writer: &mut TableWriter) {
        self.radical.write_into(writer);
        self.stroke_byte().write_into(writer);
    }
}

/// A run of consecutive codepoints and the location of their values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RadicalRun {
    pub first: u32,
    pub last: u32,
    pub offset: DataOffset,
    values: Vec<RadicalStroke>,
}

impl RadicalRun {
    pub fn values(&self) -> &[RadicalStroke] {
        &self.values
    }
}

impl UcdWrite for RadicalRun {
    fn write_into(&self, writer: &mut TableWriter) {
        self.first.write_into(writer);
        self.last.write_into(writer);
        self.offset.write_into(writer);
    }
}

impl Record for RadicalRun {
    const RECORD_LEN: usize = 12;

    fn data_offset_mut(&mut self) -> Option<&mut DataOffset> {
        Some(&mut self.offset)
    }
}

impl Validate for RadicalRun {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.check_codepoint_range(self.first, self.last);
        for (cp, value) in (self.first..).zip(&self.values) {
            if !value.fits() {
                ctx.report(format_args!(
                    "stroke count {} for 0x{cp:X} does not fit seven bits",
                    value.strokes
                ));
            }
        }
    }
}

/// The compiled `rads` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RadicalStrokeTable {
    table: RecordTable<RadicalRun>,
}

impl RadicalStrokeTable {
    pub fn new(map: &SparseCodepointMap<RadicalStroke>) -> Self {
        let mut data = SideData::new();
        let runs = map
            .runs()
            .map(|(first, values)| {
                let last = first + (values.len() as u32 - 1);
                log::debug!("{first:08x}..={last:08x} {} values", values.len());
                RadicalRun {
                    first,
                    last,
                    offset: data.push(values),
                    values: values.to_vec(),
                }
            })
            .collect();
        RadicalStrokeTable {
            table: RecordTable::new(runs, data),
        }
    }

    pub fn runs(&self) -> &[RadicalRun] {
        self.table.records()
    }
}

impl TopLevelTable for RadicalStrokeTable {
    const TAG: Tag = Tag::new(b"rads");
}

impl UcdWrite for RadicalStrokeTable {
    fn write_into(&self, writer: &mut TableWriter) {
        self.table.write_into(writer)
    }
}

impl Validate for RadicalStrokeTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("RadicalStrokeTable", |ctx| self.table.validate_impl(ctx))
    }
}
