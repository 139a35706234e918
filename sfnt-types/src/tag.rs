use std::fmt::{Debug, Display, Formatter};

/// A four byte table identifier, such as `MATH` or `ttcf`.
///
/// Tags compare as raw bytes, so `MATH` and `math` are different tags. The
/// [`Display`] impl prints printable ASCII as-is and writes any other byte
/// as `{0xNN}`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Make a tag from four bytes; any bytes are accepted.
    pub const fn new(src: &[u8; 4]) -> Tag {
        Tag(*src)
    }

    /// Make a tag from the bytes as they are stored in a file.
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// The bytes of the tag, in file order.
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0
    }
}

impl crate::raw::Scalar for Tag {
    type Raw = [u8; 4];

    fn to_raw(self) -> Self::Raw {
        self.to_be_bytes()
    }

    fn from_raw(raw: Self::Raw) -> Self {
        Self::from_be_bytes(raw)
    }
}

impl PartialEq<[u8; 4]> for Tag {
    fn eq(&self, other: &[u8; 4]) -> bool {
        self.0 == *other
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.iter().try_for_each(|&byte| match byte {
            0x20..=0x7E => write!(f, "{}", byte as char),
            _ => write!(f, "{{0x{byte:02X}}}"),
        })
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag({self})")
    }
}

/// Four spaces, the tag of nothing in particular.
impl Default for Tag {
    fn default() -> Self {
        Tag(*b"    ")
    }
}
