//! Errors that occur during compilation

use ucd_types::Tag;

use crate::validate::ValidationReport;

/// An error occured while building a compiled file
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// A table marked as required had no data.
    ///
    /// This aborts the build; no partial output is produced.
    MissingTable {
        /// The tag of the missing table
        tag: Tag,
        /// The property the table is built from
        property: &'static str,
    },
    /// The header or one of the tables failed validation
    ValidationFailed(ValidationReport),
    /// Writing the finished file failed
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingTable { tag, property } => {
                write!(f, "no data for required table '{tag}' ({property})")
            }
            Error::ValidationFailed(report) => report.fmt(f),
            Error::Io(error) => write!(f, "failed to write output: {error}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ValidationFailed(report) => Some(report),
            Error::Io(error) => Some(error),
            Error::MissingTable { .. } => None,
        }
    }
}

impl From<ValidationReport> for Error {
    fn from(report: ValidationReport) -> Self {
        Error::ValidationFailed(report)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(error)
    }
}
