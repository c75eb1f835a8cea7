use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

/// The identifier of a table in the file directory.
///
/// Tags are four ASCII characters, like `CASE`, `ccc ` or `Alp?`. Names
/// shorter than four characters are right-padded with spaces.
///
/// The file stores a tag as a `u32` whose most significant byte is the
/// first character (the value of the C constant `'ccc '`), written
/// little-endian like every other field. See [`Tag::to_u32`].
///
/// [`Tag::new`] accepts any bytes so that tags can be built in `const`
/// context; tables are checked with [`Tag::validate`] before a file is
/// written.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Tag([u8; 4]);

impl Tag {
    /// A tag with exactly these four bytes.
    pub const fn new(bytes: &[u8; 4]) -> Tag {
        Tag(*bytes)
    }

    /// Build a tag from a name of one to four characters, padding it with
    /// spaces, and check that the result is well formed.
    pub fn new_checked(name: &[u8]) -> Result<Tag, InvalidTag> {
        if name.len() > 4 {
            return Err(InvalidTag::TooLong(name.len()));
        }
        let mut bytes = [b' '; 4];
        bytes[..name.len()].copy_from_slice(name);
        let tag = Tag(bytes);
        tag.validate()?;
        Ok(tag)
    }

    /// The tag whose first character is the high byte of `value`.
    pub const fn from_u32(value: u32) -> Tag {
        Tag(value.to_be_bytes())
    }

    /// The numeric value written to the directory.
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    pub const fn into_bytes(self) -> [u8; 4] {
        self.0
    }

    /// Check that the tag is printable ASCII with no leading or interior
    /// spaces.
    pub fn validate(self) -> Result<(), InvalidTag> {
        if self.0[0] == b' ' {
            return Err(if self.0 == [b' '; 4] {
                InvalidTag::Empty
            } else {
                InvalidTag::LeadingSpace
            });
        }
        let mut padding = false;
        for (pos, byte) in self.0.into_iter().enumerate() {
            match byte {
                b' ' => padding = true,
                0x21..=0x7E if padding => return Err(InvalidTag::InteriorSpace { pos }),
                0x21..=0x7E => (),
                _ => return Err(InvalidTag::NotPrintable { pos, byte }),
            }
        }
        Ok(())
    }
}

/// Why a tag is malformed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidTag {
    /// The tag is all spaces.
    Empty,
    /// The name had this many bytes, more than four.
    TooLong(usize),
    /// The first character is a space.
    LeadingSpace,
    /// A character follows the space padding.
    InteriorSpace { pos: usize },
    /// A byte outside `0x20..=0x7E`.
    NotPrintable { pos: usize, byte: u8 },
}

impl Display for InvalidTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            InvalidTag::Empty => f.write_str("empty tag"),
            InvalidTag::TooLong(len) => write!(f, "tag is {len} bytes long"),
            InvalidTag::LeadingSpace => f.write_str("tag starts with a space"),
            InvalidTag::InteriorSpace { pos } => {
                write!(f, "character at index {pos} follows a space")
            }
            InvalidTag::NotPrintable { pos, byte } => {
                write!(f, "byte 0x{byte:02X} at index {pos} is not printable ASCII")
            }
        }
    }
}

impl std::error::Error for InvalidTag {}

impl FromStr for Tag {
    type Err = InvalidTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::new_checked(s.as_bytes())
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            match byte {
                0x20..=0x7E => write!(f, "{}", byte as char)?,
                _ => write!(f, "\\x{byte:02X}")?,
            }
        }
        Ok(())
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Tag('{self}')")
    }
}

// human-readable formats get the four characters, binary ones the raw bytes
#[cfg(feature = "serde")]
impl serde::Serialize for Tag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !serializer.is_human_readable() {
            return serde::Serialize::serialize(&self.0, serializer);
        }
        if !self.0.iter().all(|byte| (0x20..=0x7E).contains(byte)) {
            return Err(serde::ser::Error::custom(format_args!(
                "tag '{self}' is not printable"
            )));
        }
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Tag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let name = <String as serde::Deserialize>::deserialize(deserializer)?;
            name.parse().map_err(serde::de::Error::custom)
        } else {
            <[u8; 4] as serde::Deserialize>::deserialize(deserializer).map(Tag)
        }
    }
}
