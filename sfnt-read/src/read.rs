//! Decoding structures from font data

use types::{BigEndian, Scalar, Tag};

use crate::font_data::FontData;

/// A structure that can be decoded from the start of some font data.
///
/// Implementations check everything needed to make later field access
/// infallible: the fixed-size header, and any arrays whose length the header
/// declares. Data past the end of the structure is ignored.
pub trait FontRead<'a>: Sized {
    fn read(data: FontData<'a>) -> Result<Self, ReadError>;
}

// lets arrays of raw scalars share the record machinery
impl<'a, T: Scalar> FontRead<'a> for BigEndian<T> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        data.read_be_at(0)
    }
}

/// An error that occurs when reading font data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// A read, offset, or array extended past the end of the data.
    OutOfBounds,
    /// The data is too short to tell a font from a font collection.
    UnknownContainer,
    // i64 is flexible enough to store any value we might encounter
    InvalidFormat(i64),
    InvalidTtc(Tag),
    NullOffset,
    TableIsMissing(Tag),
    MalformedData(&'static str),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::OutOfBounds => f.write_str("read past the end of the data"),
            ReadError::UnknownContainer => {
                f.write_str("data is too short to be a font or font collection")
            }
            ReadError::InvalidFormat(x) => write!(f, "invalid format '{x}'"),
            ReadError::InvalidTtc(tag) => write!(f, "invalid collection tag '{tag}'"),
            ReadError::NullOffset => f.write_str("an offset was unexpectedly null"),
            ReadError::TableIsMissing(tag) => write!(f, "the '{tag}' table is missing"),
            ReadError::MalformedData(msg) => write!(f, "malformed data: {msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ReadError {}
