//! Following offsets to subtables

use super::read::{FontRead, ReadError};
use crate::font_data::FontData;
use types::{Offset16, Offset32};

/// An offset field of any width.
pub trait Offset: Copy {
    fn to_usize(self) -> usize;

    /// The offset, or `None` for the null offset.
    fn non_null(self) -> Option<usize> {
        Some(self.to_usize()).filter(|off| *off != 0)
    }
}

impl Offset for Offset16 {
    #[inline]
    fn to_usize(self) -> usize {
        self.to_u32() as usize
    }
}

impl Offset for Offset32 {
    #[inline]
    fn to_usize(self) -> usize {
        self.to_u32() as usize
    }
}

/// Decode the subtable an offset points to.
pub trait ResolveOffset {
    /// Read a `T` at this offset from the start of `data`.
    ///
    /// The null offset is [`ReadError::NullOffset`]; an offset past the end
    /// of `data` is [`ReadError::OutOfBounds`].
    fn resolve<'a, T: FontRead<'a>>(&self, data: FontData<'a>) -> Result<T, ReadError>;
}

/// Decode the subtable an optional offset points to.
pub trait ResolveNullableOffset {
    /// Like [`ResolveOffset::resolve`], but the null offset is `None`.
    fn resolve_nullable<'a, T: FontRead<'a>>(
        &self,
        data: FontData<'a>,
    ) -> Option<Result<T, ReadError>>;
}

impl<O: Offset> ResolveOffset for O {
    fn resolve<'a, T: FontRead<'a>>(&self, data: FontData<'a>) -> Result<T, ReadError> {
        let offset = self.non_null().ok_or(ReadError::NullOffset)?;
        let subtable = data.split_off(offset).ok_or(ReadError::OutOfBounds)?;
        T::read(subtable)
    }
}

impl<O: Offset> ResolveNullableOffset for O {
    fn resolve_nullable<'a, T: FontRead<'a>>(
        &self,
        data: FontData<'a>,
    ) -> Option<Result<T, ReadError>> {
        self.non_null()?;
        Some(self.resolve(data))
    }
}
