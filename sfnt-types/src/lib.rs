//! Common [scalar data types][data types] used in font files
//!
//! Everything in this crate is decoded from big-endian bytes by value; no
//! type here is ever overlaid on top of a byte buffer.
//!
//! [data types]: https://docs.microsoft.com/en-us/typography/opentype/spec/otff#data-types

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(all(not(feature = "std"), not(test)))]
#[macro_use]
extern crate core as std;

mod glyph_id;
mod offset;
mod raw;
mod tag;
mod version;

pub use glyph_id::GlyphId16;
pub use offset::{Offset16, Offset32};
pub use raw::{BigEndian, FixedSize, Scalar};
pub use tag::Tag;
pub use version::MajorMinor;

/// The header tag for a font collection file.
pub const TTC_HEADER_TAG: Tag = Tag::new(b"ttcf");

/// The SFNT version for fonts containing TrueType outlines.
pub const TT_SFNT_VERSION: u32 = 0x00010000;
/// The SFNT version for fonts containing CFF outlines.
pub const CFF_SFNT_VERSION: u32 = 0x4F54544F;
/// The SFNT version used by some legacy Apple fonts.
pub const TRUE_SFNT_VERSION: u32 = 0x74727565;
