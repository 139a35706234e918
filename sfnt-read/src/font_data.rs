//! raw font bytes

use std::ops::{Bound, RangeBounds};

use types::{BigEndian, FixedSize, Scalar};

use crate::array::RecordArray;
use crate::read::{FontRead, ReadError};
use crate::table_ref::TableRef;

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that provides convenience methods
/// for parsing and validating that data. Every read is bounds checked; a
/// read that would run past the end of the slice is a
/// [`ReadError::OutOfBounds`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    total_pos: u32,
    bytes: &'a [u8],
}

/// A cursor for validating bytes during parsing.
///
/// Fields are read in order, each one advancing the cursor by its width.
///
/// # Note
///
/// call `finish` when you're done to ensure you're in bounds
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    ///
    /// This is generally the entire contents of a font file.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData {
            total_pos: 0,
            bytes,
        }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The position of the start of this data, relative to the start of
    /// the file it was split from.
    pub fn position(&self) -> u32 {
        self.total_pos
    }

    // positions past u32::MAX saturate
    fn offset_position(&self, pos: usize) -> u32 {
        self.total_pos
            .saturating_add(u32::try_from(pos).unwrap_or(u32::MAX))
    }

    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(|bytes| FontData {
            bytes,
            total_pos: self.offset_position(pos),
        })
    }

    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let start = match range.start_bound() {
            Bound::Unbounded => 0,
            Bound::Included(i) => *i,
            Bound::Excluded(i) => i.saturating_add(1),
        };

        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        let total_pos = self.offset_position(start);
        self.bytes
            .get(bounds)
            .map(|bytes| FontData { bytes, total_pos })
    }

    /// Read a scalar value out of the buffer at `offset`.
    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        let end = offset
            .checked_add(T::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        self.bytes
            .get(offset..end)
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Read a scalar at `offset`, keeping its raw big-endian representation.
    pub fn read_be_at<T: Scalar>(&self, offset: usize) -> Result<BigEndian<T>, ReadError> {
        let end = offset
            .checked_add(T::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        self.bytes
            .get(offset..end)
            .and_then(BigEndian::from_slice)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Validate and return an array of `len` fixed-size items starting at `offset`.
    pub fn read_array<T>(&self, offset: usize, len: usize) -> Result<RecordArray<'a, T>, ReadError>
    where
        T: FixedSize + FontRead<'a> + 'a,
    {
        self.split_off(offset)
            .ok_or(ReadError::OutOfBounds)
            .and_then(|data| RecordArray::new(data, len))
    }

    pub(crate) fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    /// The underlying bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    fn check_in_bounds(&self, offset: usize) -> Result<(), ReadError> {
        self.bytes
            .get(..offset)
            .ok_or(ReadError::OutOfBounds)
            .map(|_| ())
    }
}

impl<'a> Cursor<'a> {
    pub(crate) fn advance<T: Scalar>(&mut self) {
        self.pos = self.pos.saturating_add(T::RAW_BYTE_LEN);
    }

    pub(crate) fn read<T: Scalar>(&mut self) -> Result<T, ReadError> {
        let temp = self.data.read_at(self.pos);
        self.advance::<T>();
        temp
    }

    pub(crate) fn read_array<T>(&mut self, len: usize) -> Result<RecordArray<'a, T>, ReadError>
    where
        T: FixedSize + FontRead<'a> + 'a,
    {
        let temp = self.data.read_array(self.pos, len)?;
        self.pos = self.pos.saturating_add(temp.byte_len());
        Ok(temp)
    }

    pub(crate) fn finish<T>(self, shape: T) -> Result<TableRef<'a, T>, ReadError> {
        let data = self.data;
        data.check_in_bounds(self.pos)?;
        Ok(TableRef { data, shape })
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for FontData<'a> {
    fn from(src: &'a [u8]) -> FontData<'a> {
        FontData::new(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_at_respects_bounds() {
        let data = FontData::new(&[0x00, 0x01, 0xFF, 0xFE, 0x12]);
        assert_eq!(data.read_at::<u8>(4).unwrap(), 0x12);
        assert_eq!(data.read_at::<u16>(0).unwrap(), 1);
        assert_eq!(data.read_at::<i16>(2).unwrap(), -2);
        assert_eq!(data.read_at::<u32>(1).unwrap(), 0x01FF_FE12);
        assert!(matches!(data.read_at::<u32>(2), Err(ReadError::OutOfBounds)));
        assert!(matches!(data.read_at::<u8>(5), Err(ReadError::OutOfBounds)));
        assert!(matches!(
            data.read_at::<u16>(usize::MAX),
            Err(ReadError::OutOfBounds)
        ));
    }

    #[test]
    fn sub_views_track_position() {
        let bytes = [0u8; 32];
        let data = FontData::new(&bytes);
        let tail = data.split_off(12).unwrap();
        assert_eq!(tail.position(), 12);
        assert_eq!(tail.len(), 20);
        let inner = tail.slice(4..8).unwrap();
        assert_eq!(inner.position(), 16);
        assert_eq!(inner.len(), 4);
        assert!(tail.slice(4..21).is_none());
        assert!(data.split_off(33).is_none());
        // splitting at the very end is allowed, and yields nothing
        assert!(data.split_off(32).unwrap().is_empty());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn positions_saturate() {
        let bytes = [0u8; 8];
        let data = FontData {
            bytes: &bytes,
            total_pos: 16,
        };
        assert_eq!(data.offset_position(4), 20);
        // truncating to 32 bits first would give 16 + 3
        let past_u32 = u32::MAX as usize + 4;
        assert_eq!(data.offset_position(past_u32), u32::MAX);
        let near_end = FontData {
            bytes: &bytes,
            total_pos: u32::MAX - 2,
        };
        assert_eq!(near_end.split_off(4).unwrap().position(), u32::MAX);
        assert_eq!(near_end.slice(1..3).unwrap().position(), u32::MAX - 1);
    }

    #[test]
    fn cursor_finish_checks_bounds() {
        let data = FontData::new(&[0, 1, 0, 2]);
        let mut cursor = data.cursor();
        assert_eq!(cursor.read::<u16>().unwrap(), 1);
        cursor.advance::<u16>();
        assert!(cursor.finish(()).is_ok());

        let mut cursor = data.cursor();
        cursor.advance::<u32>();
        cursor.advance::<u8>();
        assert!(cursor.finish(()).is_err());
    }
}
