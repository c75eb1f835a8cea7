//!  A builder for compiled `.ucd` files

use std::borrow::Cow;
use std::fmt::Display;

use indexmap::IndexMap;
use ucd_types::{Tag, UnicodeVersion, UCD_MAGIC};

use crate::context::{BuildContext, Requirement};
use crate::error::Error;
use crate::tables::TopLevelTable;
use crate::validate::{Validate, ValidationCtx, ValidationReport};
use crate::write::{TableWriter, UcdWrite};

/// The size of the fixed file header.
pub const HEADER_LEN: usize = 16;
/// The size of one directory entry.
pub const DIRECTORY_ENTRY_LEN: usize = 8;

/// Build a compiled file from some set of tables.
///
/// Tables are collected by tag and only arranged when the file is built,
/// at which point the [`BuildContext`] decides their order and which of
/// them must be present.
#[derive(Debug, Clone, Default)]
pub struct UcdBuilder<'a> {
    tables: IndexMap<Tag, Cow<'a, [u8]>>,
}

/// An error returned when attempting to add a table to the builder.
///
/// This wraps a validation error, adding the tag of the table where it was
/// encountered.
#[derive(Debug)]
#[non_exhaustive]
pub struct BuilderError {
    /// The tag of the table where the error occurred
    pub tag: Tag,
    /// The underlying error
    pub inner: ValidationReport,
}

/// The fixed header at the start of every compiled file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UcdHeader {
    /// The version of the Unicode Character Database
    pub unicode_version: UnicodeVersion,
    /// The version of the emoji data, if any was included
    pub emoji_version: Option<UnicodeVersion>,
    /// The number of tables in the directory
    pub num_tables: u32,
}

/// One entry in the table directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// The table identifier
    pub tag: Tag,
    /// Offset of the table from the start of the file
    pub offset: u32,
}

impl UcdWrite for UcdHeader {
    fn write_into(&self, writer: &mut TableWriter) {
        UCD_MAGIC.write_into(writer);
        self.unicode_version.to_header_u32().write_into(writer);
        self.emoji_version
            .map(UnicodeVersion::to_header_u32)
            .unwrap_or(0)
            .write_into(writer);
        self.num_tables.write_into(writer);
    }
}

impl UcdWrite for DirectoryEntry {
    fn write_into(&self, writer: &mut TableWriter) {
        self.tag.write_into(writer);
        self.offset.write_into(writer);
    }
}

impl Validate for UcdHeader {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("UcdHeader", |ctx| {
            ctx.in_field("unicode_version", |ctx| ctx.check_version(self.unicode_version));
            if let Some(version) = self.emoji_version {
                ctx.in_field("emoji_version", |ctx| ctx.check_version(version));
            }
        })
    }
}

impl<'a> UcdBuilder<'a> {
    /// Create a new builder to compile a `.ucd` file
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table to the builder.
    ///
    /// The table can be any top-level table defined in this crate. This function
    /// will attempt to compile the table and then add it to the builder if
    /// successful, returning an error otherwise.
    pub fn add_table<T>(&mut self, table: &T) -> Result<&mut Self, BuilderError>
    where
        T: UcdWrite + Validate + TopLevelTable,
    {
        self.add_table_as(T::TAG, table)
    }

    /// Add a table that can be stored under more than one tag.
    ///
    /// The case mapping, change-point and binary property tables share an
    /// encoding between many tags; this is how they get added.
    pub fn add_table_as<T>(&mut self, tag: Tag, table: &T) -> Result<&mut Self, BuilderError>
    where
        T: UcdWrite + Validate,
    {
        let bytes = crate::dump_table(table).map_err(|inner| BuilderError { inner, tag })?;
        Ok(self.add_raw(tag, bytes))
    }

    /// A builder method to add raw data for the provided tag
    pub fn add_raw(&mut self, tag: Tag, data: impl Into<Cow<'a, [u8]>>) -> &mut Self {
        if self.tables.insert(tag, data.into()).is_some() {
            log::warn!("replacing existing data for '{tag}'");
        }
        self
    }

    /// Returns `true` if the builder contains a table with this tag.
    pub fn contains(&self, tag: Tag) -> bool {
        self.tables.contains_key(&tag)
    }

    /// Returns the compiled bytes for `tag`, if present.
    pub fn data_for_tag(&self, tag: Tag) -> Option<&[u8]> {
        self.tables.get(&tag).map(|data| data.as_ref())
    }

    /// Assemble the tables into a compiled file.
    ///
    /// Tables appear in the order of the context's registry, followed by any
    /// unregistered tables in the order they were added. A required table
    /// with no data fails the whole build; an optional one is skipped.
    pub fn build(&self, context: &BuildContext) -> Result<Vec<u8>, Error> {
        context.validate()?;
        let order = self.table_order(context)?;

        let header = UcdHeader {
            unicode_version: context.unicode_version(),
            emoji_version: context.emoji_version(),
            num_tables: order.len() as u32,
        };
        header.validate()?;

        let header_len = HEADER_LEN + order.len() * DIRECTORY_ENTRY_LEN;
        let mut position = header_len;
        let mut directory = Vec::with_capacity(order.len());
        let mut ctx = ValidationCtx::default();
        for (tag, data) in &order {
            match u32::try_from(position) {
                Ok(offset) => directory.push(DirectoryEntry { tag: *tag, offset }),
                Err(_) => ctx.report(format_args!("table '{tag}' starts beyond u32::MAX")),
            }
            position += data.len();
        }
        ctx.finish()?;

        let mut writer = TableWriter::default();
        header.write_into(&mut writer);
        directory.write_into(&mut writer);
        debug_assert_eq!(writer.len(), header_len);
        for (_, data) in &order {
            writer.write_slice(data);
        }

        log_table_sizes(&order, writer.len());
        Ok(writer.into_data())
    }

    /// Assemble the tables and write the result to `out`.
    ///
    /// Nothing is written if the build fails.
    pub fn write_to(
        &self,
        context: &BuildContext,
        mut out: impl std::io::Write,
    ) -> Result<(), Error> {
        let bytes = self.build(context)?;
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(())
    }

    fn table_order(&self, context: &BuildContext) -> Result<Vec<(Tag, &[u8])>, Error> {
        let mut order = Vec::with_capacity(self.tables.len());
        for spec in context.tables() {
            match (self.tables.get(&spec.tag), spec.requirement) {
                (Some(data), _) => order.push((spec.tag, data.as_ref())),
                (None, Requirement::Required) => {
                    return Err(Error::MissingTable {
                        tag: spec.tag,
                        property: spec.property,
                    })
                }
                (None, Requirement::Optional) => {
                    log::warn!("no data for optional table '{}' ({})", spec.tag, spec.property)
                }
            }
        }
        for (tag, data) in &self.tables {
            if context.table_for_tag(*tag).is_none() {
                log::debug!("adding unregistered table '{tag}'");
                order.push((*tag, data.as_ref()));
            }
        }
        Ok(order)
    }
}

fn log_table_sizes(order: &[(Tag, &[u8])], total: usize) {
    if !log::log_enabled!(log::Level::Info) {
        return;
    }
    log::info!("Table usage");
    for (tag, data) in order {
        log::info!("{tag}  {}", data.len());
    }
    log::info!("total {total} bytes in {} tables", order.len());
}

impl Display for BuilderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to build '{}' table: '{}'", self.tag, self.inner)
    }
}

impl std::error::Error for BuilderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.inner)
    }
}
