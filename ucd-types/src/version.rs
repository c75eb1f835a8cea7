//! Unicode version numbers

use std::{fmt::Display, str::FromStr};

/// A Unicode (or emoji data) version, such as `15.1.0`.
///
/// The container header packs this as `major << 16 | minor << 8 | update`,
/// so each component must fit in a byte. The `age ` table stores only the
/// major and minor parts, as `major << 16 | minor`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnicodeVersion {
    /// The major version number
    pub major: u16,
    /// The minor version number
    pub minor: u16,
    /// The update (micro) version number
    pub update: u16,
}

/// An error returned when parsing a version string fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidVersion(String);

impl UnicodeVersion {
    /// Create a new version from its parts.
    pub const fn new(major: u16, minor: u16, update: u16) -> Self {
        UnicodeVersion {
            major,
            minor,
            update,
        }
    }

    /// `true` if every component fits the 8-bit fields of the header.
    pub const fn fits_header(self) -> bool {
        self.major <= 0xff && self.minor <= 0xff && self.update <= 0xff
    }

    /// The packed representation used in the container header.
    ///
    /// `00070102` is 7.1.2. Components wider than 8 bits are truncated;
    /// check [`fits_header`][Self::fits_header] first.
    pub const fn to_header_u32(self) -> u32 {
        ((self.major as u32 & 0xff) << 16)
            | ((self.minor as u32 & 0xff) << 8)
            | (self.update as u32 & 0xff)
    }

    /// The packed major/minor representation used by the `age ` table.
    pub const fn to_age_u32(self) -> u32 {
        ((self.major as u32) << 16) | self.minor as u32
    }
}

impl FromStr for UnicodeVersion {
    type Err = InvalidVersion;

    /// Parse `major.minor` or `major.minor.update`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidVersion(s.to_owned());
        let mut parts = s.trim().split('.');
        let mut next = |required: bool| match parts.next() {
            Some(part) => part.parse::<u16>().map_err(|_| err()),
            None if required => Err(err()),
            None => Ok(0),
        };
        let major = next(true)?;
        let minor = next(true)?;
        let update = next(false)?;
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(UnicodeVersion::new(major, minor, update))
    }
}

impl Display for UnicodeVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.update)
    }
}

impl Display for InvalidVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid version string '{}'", self.0)
    }
}

impl std::error::Error for InvalidVersion {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing() {
        let version = UnicodeVersion::new(7, 1, 2);
        assert_eq!(version.to_header_u32(), 0x0007_0102);
        assert_eq!(version.to_age_u32(), 0x0007_0001);
        assert!(version.fits_header());
        assert!(!UnicodeVersion::new(256, 0, 0).fits_header());
    }

    #[test]
    fn parse() {
        assert_eq!("15.1.0".parse(), Ok(UnicodeVersion::new(15, 1, 0)));
        assert_eq!("3.1".parse(), Ok(UnicodeVersion::new(3, 1, 0)));
        assert!("3".parse::<UnicodeVersion>().is_err());
        assert!("1.2.3.4".parse::<UnicodeVersion>().is_err());
        assert!("a.b".parse::<UnicodeVersion>().is_err());
    }

    #[test]
    fn ordering() {
        let mut versions = vec![
            UnicodeVersion::new(2, 1, 0),
            UnicodeVersion::new(1, 1, 0),
            UnicodeVersion::new(2, 0, 0),
        ];
        versions.sort();
        assert_eq!(versions[0], UnicodeVersion::new(1, 1, 0));
        assert_eq!(versions[2].to_string(), "2.1.0");
    }
}
