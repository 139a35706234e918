//! a trait for things that can serve font tables

use types::Tag;

use crate::{tables, FontData, FontRead, ReadError};

/// A table that has an associated tag.
///
/// This is true of top-level tables, but not their various subtables.
pub trait TopLevelTable {
    /// The table's tag.
    const TAG: Tag;
}

/// An interface for accessing tables from a font (or font-like object)
pub trait TableProvider<'a> {
    /// Returns the data for the table with the given tag.
    ///
    /// This is `None` if the font has no such table, and an error if the
    /// table's record points outside of the font data.
    fn data_for_tag(&self, tag: Tag) -> Option<Result<FontData<'a>, ReadError>>;

    fn expect_data_for_tag(&self, tag: Tag) -> Result<FontData<'a>, ReadError> {
        self.data_for_tag(tag)
            .unwrap_or(Err(ReadError::TableIsMissing(tag)))
    }

    fn math(&self) -> Result<tables::math::Math<'a>, ReadError> {
        self.expect_data_for_tag(tables::math::Math::TAG)
            .and_then(FontRead::read)
    }
}
