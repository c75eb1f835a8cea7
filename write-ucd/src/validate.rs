//! The pre-compilation validation pass

use std::fmt::{Debug, Display};

use ucd_types::{codepoint, Tag, UnicodeVersion};

/// Pre-compilation validation of tables.
///
/// Many of the fields in the compiled format are narrower than the values
/// that feed them: codepoints share a `u32` with a kind byte, numeric
/// multipliers are `i16`, version components are bytes. These requirements
/// are enforced via a validation pass before any bytes are written.
pub trait Validate {
    /// Ensure that this table is well-formed, reporting any errors.
    ///
    /// This calls [validate_impl][Self::validate_impl] and collects any
    /// errors.
    fn validate(&self) -> Result<(), ValidationReport> {
        let mut ctx = ValidationCtx::default();
        self.validate_impl(&mut ctx);
        ctx.finish()
    }

    /// Validate this table.
    ///
    /// If you need to implement this directly, it should look something like:
    ///
    /// ```rust
    /// # use write_ucd::validate::{Validate, ValidationCtx};
    /// struct MyRecord {
    ///     my_values: Vec<u16>,
    /// }
    ///
    /// impl Validate for MyRecord {
    ///     fn validate_impl(&self, ctx: &mut ValidationCtx) {
    ///         ctx.in_table("MyRecord", |ctx| {
    ///             ctx.in_field("my_values", |ctx| {
    ///                 if self.my_values.len() > (u16::MAX as usize) {
    ///                     ctx.report("array is too long");
    ///                 }
    ///             })
    ///         })
    ///     }
    /// }
    /// ```
    fn validate_impl(&self, ctx: &mut ValidationCtx);
}

/// A context for collecting validation error.
///
/// This is responsible for tracking the position in the tree at which
/// a given error is reported.
///
/// ## paths/locations
///
/// As validation travels down through a table, the path is recorded
/// via appropriate calls to methods like [in_table][Self::in_table] and [in_field][Self::in_field].
#[derive(Clone, Debug, Default)]
pub struct ValidationCtx {
    cur_location: Vec<LocationElem>,
    errors: Vec<ValidationError>,
}

#[derive(Debug, Clone)]
struct ValidationError {
    error: String,
    location: Vec<LocationElem>,
}

/// One or more validation errors.
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

#[derive(Debug, Clone)]
enum LocationElem {
    Table(&'static str),
    Field(&'static str),
    Index(usize),
}

impl ValidationCtx {
    /// Run the provided closure in the context of a new table.
    ///
    /// Errors reported in the closure will include the provided identifer
    /// in their path.
    pub fn in_table(&mut self, name: &'static str, f: impl FnOnce(&mut ValidationCtx)) {
        self.with_elem(LocationElem::Table(name), f);
    }

    /// Run the provided closure in the context of a new field.
    ///
    /// Errors reported in the closure will be associated with the field.
    pub fn in_field(&mut self, name: &'static str, f: impl FnOnce(&mut ValidationCtx)) {
        self.with_elem(LocationElem::Field(name), f);
    }

    /// Run the provided closure in the context of an array.
    pub fn in_array(&mut self, f: impl FnOnce(&mut ValidationCtx)) {
        self.with_elem(LocationElem::Index(0), f);
    }

    /// Run the provided closure in the context of a new array item.
    ///
    /// This must only be called in a closure passed to [in_array][Self::in_array].
    pub fn array_item(&mut self, f: impl FnOnce(&mut ValidationCtx)) {
        assert!(matches!(
            self.cur_location.last(),
            Some(LocationElem::Index(_))
        ));
        f(self);
        match self.cur_location.last_mut() {
            Some(LocationElem::Index(i)) => *i += 1,
            _ => panic!("array_item called outside of array"),
        }
    }

    /// Report a new error, associating it with the current path.
    pub fn report(&mut self, msg: impl Display) {
        self.errors.push(ValidationError {
            location: self.cur_location.clone(),
            error: msg.to_string(),
        });
    }

    /// Report an error if `cp` is not a valid codepoint.
    pub fn check_codepoint(&mut self, cp: u32) {
        if !codepoint::is_valid(cp) {
            self.report(format_args!("codepoint 0x{cp:X} is out of range"));
        }
    }

    /// Report an error unless `first..=last` is a non-empty range of valid codepoints.
    pub fn check_codepoint_range(&mut self, first: u32, last: u32) {
        self.check_codepoint(first);
        self.check_codepoint(last);
        if first > last {
            self.report(format_args!("range 0x{first:X}..=0x{last:X} is empty"));
        }
    }

    /// Report an error if `tag` is malformed.
    pub fn check_tag(&mut self, tag: Tag) {
        if let Err(e) = tag.validate() {
            self.report(format_args!("invalid tag '{tag}': {e}"));
        }
    }

    /// Report an error if `version` can't be packed into a header field.
    pub fn check_version(&mut self, version: UnicodeVersion) {
        if !version.fits_header() {
            self.report(format_args!(
                "version {version} has a component larger than 255"
            ));
        }
    }

    /// Consume the context, returning a report if any errors were recorded.
    pub fn finish(self) -> Result<(), ValidationReport> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationReport {
                errors: self.errors,
            })
        }
    }

    fn with_elem(&mut self, elem: LocationElem, f: impl FnOnce(&mut ValidationCtx)) {
        self.cur_location.push(elem);
        f(self);
        self.cur_location.pop();
    }
}

impl ValidationReport {
    /// The number of errors in this report.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// `true` if there are no errors. A report returned from
    /// [`Validate::validate`] is never empty.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let [error] = self.errors.as_slice() {
            return writeln!(f, "Validation error:\n{error}");
        }

        writeln!(f, "{} validation errors:", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "#{}\n{error}", i + 1)?;
        }
        Ok(())
    }
}

impl Debug for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl std::error::Error for ValidationReport {}

static MANY_SPACES: &str = "                                                                                                        ";

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\"{}\"", self.error)?;
        let mut indent = 0;

        if let [LocationElem::Table(name)] = self.location.as_slice() {
            write!(f, "in: {name}")?;
        }

        for (i, window) in self.location.windows(2).enumerate() {
            let prev = &window[0];
            let current = &window[1];
            if i == 0 {
                match prev {
                    LocationElem::Table(name) => write!(f, "in: {name}")?,
                    LocationElem::Field(name) => write!(f, "in: .{name}")?,
                    LocationElem::Index(idx) => write!(f, "in: [{idx}]")?,
                }
            }

            match current {
                LocationElem::Table(name) => {
                    indent += 1;
                    let indent_str = &MANY_SPACES[..(indent * 2).min(MANY_SPACES.len())];
                    write!(f, "\n{indent_str}{name}")
                }
                LocationElem::Field(name) => write!(f, ".{name}"),
                LocationElem::Index(idx) => write!(f, "[{idx}]"),
            }?;
        }
        writeln!(f)
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        self.as_slice().validate_impl(ctx)
    }
}

impl<T: Validate> Validate for [T] {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_array(|ctx| {
            for item in self.iter() {
                ctx.array_item(|ctx| {
                    item.validate_impl(ctx);
                })
            }
        });
    }
}

impl<T: Validate> Validate for Option<T> {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        if let Some(t) = self {
            t.validate_impl(ctx)
        }
    }
}
