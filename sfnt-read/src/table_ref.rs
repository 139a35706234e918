//! Typed font tables

use super::read::{FontRead, ReadError};
use crate::{
    font_data::FontData,
    offset::{Offset, ResolveNullableOffset},
};

#[derive(Clone)]
/// Typed access to raw table data.
///
/// `T` is a marker type that knows where each field lives; the accessors
/// for a particular table are implemented on `TableRef<'a, TheMarker>`.
pub struct TableRef<'a, T> {
    pub(crate) shape: T,
    pub(crate) data: FontData<'a>,
}

impl<'a, T> TableRef<'a, T> {
    /// Resolve the provided offset from the start of this table, treating
    /// a null offset as absent.
    pub fn resolve_nullable_offset<O: Offset, R: FontRead<'a>>(
        &self,
        offset: O,
    ) -> Option<Result<R, ReadError>> {
        offset.resolve_nullable(self.data)
    }

    /// The position of the start of this table in the file.
    pub fn position(&self) -> u32 {
        self.data.position()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for TableRef<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableRef")
            .field("shape", &self.shape)
            .field("position", &self.data.position())
            .field("len", &self.data.len())
            .finish()
    }
}
