//! The [numeric value](https://www.unicode.org/reports/tr44/#Numeric_Value) table
//!
//! Values are stored as `multiplier * base ^ exponent`. That covers every
//! value in the database: fractions use the denominator as the base with
//! an exponent of -1, and large integers push their trailing zeros into a
//! power of ten.

use std::fmt;

use ucd_collections::SparseCodepointMap;
use ucd_types::Tag;

use super::TopLevelTable;
use crate::validate::{Validate, ValidationCtx};
use crate::write::{TableWriter, UcdWrite};

/// The `Numeric_Type` property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum NumericType {
    Decimal = 1,
    Digit = 2,
    Numeric = 3,
}

impl NumericType {
    /// Parse a long or short property value alias.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "De" | "Decimal" => Some(NumericType::Decimal),
            "Di" | "Digit" => Some(NumericType::Digit),
            "Nu" | "Numeric" => Some(NumericType::Numeric),
            _ => None,
        }
    }
}

/// A numeric value, as `multiplier * base ^ exponent`.
///
/// The components are kept wide so that out-of-range values are reported
/// by validation rather than silently truncated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumericValue {
    pub multiplier: i64,
    pub base: u64,
    pub exponent: i8,
}

/// An error parsing a numeric value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidNumericValue(String);

impl fmt::Display for InvalidNumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid numeric value '{}'", self.0)
    }
}

impl std::error::Error for InvalidNumericValue {}

impl NumericValue {
    pub fn new(multiplier: i64, base: u64, exponent: i8) -> Self {
        NumericValue {
            multiplier,
            base,
            exponent,
        }
    }

    /// Parse a value as written in `UnicodeData.txt`, e.g. `-1/2` or `1000`.
    pub fn parse(value: &str) -> Result<Self, InvalidNumericValue> {
        let err = || InvalidNumericValue(value.to_owned());
        let (negative, digits) = match value.as_bytes().first() {
            Some(b'-') => (true, &value[1..]),
            Some(b'+') => (false, &value[1..]),
            _ => (false, value),
        };
        let sign = if negative { -1 } else { 1 };

        if let Some((num, den)) = digits.split_once('/') {
            let num: i64 = num.parse().map_err(|_| err())?;
            let den: u64 = den.parse().map_err(|_| err())?;
            return Ok(NumericValue::new(sign * num, den, -1));
        }
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let significant = digits.trim_end_matches('0');
        if significant.is_empty() {
            return Ok(NumericValue::new(0, 10, 0));
        }
        let exponent = i8::try_from(digits.len() - significant.len()).map_err(|_| err())?;
        let multiplier: i64 = significant.parse().map_err(|_| err())?;
        Ok(NumericValue::new(sign * multiplier, 10, exponent))
    }

    /// The value as a float, for comparisons in tests and debug output.
    pub fn to_f64(&self) -> f64 {
        self.multiplier as f64 * (self.base as f64).powi(self.exponent as i32)
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*{}^{}", self.multiplier, self.base, self.exponent)
    }
}

/// One 8-byte entry of the `numb` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumericRecord {
    pub cp: u32,
    pub numeric_type: NumericType,
    pub value: NumericValue,
}

impl UcdWrite for NumericRecord {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.cp | ((self.numeric_type as u32) << 24)).write_into(writer);
        (self.value.multiplier as i16).write_into(writer);
        (self.value.base as u8).write_into(writer);
        self.value.exponent.write_into(writer);
    }
}

impl Validate for NumericRecord {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.check_codepoint(self.cp);
        if i16::try_from(self.value.multiplier).is_err() {
            ctx.report(format_args!(
                "multiplier of 0x{:X} ({}) does not fit an i16",
                self.cp, self.value
            ));
        }
        if u8::try_from(self.value.base).is_err() {
            ctx.report(format_args!(
                "base of 0x{:X} ({}) does not fit a u8",
                self.cp, self.value
            ));
        }
    }
}

/// The compiled `numb` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumericTable {
    records: Vec<NumericRecord>,
}

impl NumericTable {
    pub fn new(map: &SparseCodepointMap<(NumericType, NumericValue)>) -> Self {
        let records = map
            .iter()
            .map(|(cp, (numeric_type, value))| {
                log::debug!("{cp:08x} {numeric_type:?} {value}");
                NumericRecord {
                    cp,
                    numeric_type: *numeric_type,
                    value: *value,
                }
            })
            .collect();
        NumericTable { records }
    }

    pub fn records(&self) -> &[NumericRecord] {
        &self.records
    }
}

impl TopLevelTable for NumericTable {
    const TAG: Tag = Tag::new(b"numb");
}

impl UcdWrite for NumericTable {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.records.len() as u32).write_into(writer);
        self.records.write_into(writer);
    }
}

impl Validate for NumericTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("NumericTable", |ctx| {
            ctx.in_field("records", |ctx| self.records.validate_impl(ctx))
        })
    }
}
