//! Custom array types

use std::marker::PhantomData;

use types::FixedSize;

use crate::{FontData, FontRead, ReadError};

/// An array of fixed-size records.
///
/// The array is validated when it is created: the data must contain
/// `len * T::RAW_BYTE_LEN` bytes. Items are decoded on access.
pub struct RecordArray<'a, T> {
    data: FontData<'a>,
    len: usize,
    phantom: PhantomData<fn() -> T>,
}

impl<'a, T> RecordArray<'a, T>
where
    T: FixedSize + FontRead<'a> + 'a,
{
    /// Create a new array of `len` items at the start of `data`.
    pub fn new(data: FontData<'a>, len: usize) -> Result<Self, ReadError> {
        let byte_len = len
            .checked_mul(T::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        let data = data.slice(..byte_len).ok_or(ReadError::OutOfBounds)?;
        Ok(RecordArray {
            data,
            len,
            phantom: PhantomData,
        })
    }

    /// The number of items in the array.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The total length of the array, in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Return the item at `idx`, or `None` if `idx` is out of range.
    pub fn get(&self, idx: usize) -> Option<T> {
        if idx >= self.len {
            return None;
        }
        self.data
            .split_off(idx * T::RAW_BYTE_LEN)
            .and_then(|data| T::read(data).ok())
    }

    /// Return an iterator over the items in the array.
    pub fn iter(&self) -> impl Iterator<Item = T> + 'a + Clone {
        let this = *self;
        (0..self.len).filter_map(move |idx| this.get(idx))
    }
}

// manual impls, so that we don't require `T: Clone`
impl<T> Clone for RecordArray<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RecordArray<'_, T> {}

impl<T> Default for RecordArray<'_, T> {
    fn default() -> Self {
        RecordArray {
            data: FontData::default(),
            len: 0,
            phantom: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for RecordArray<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("RecordArray")
            .field("len", &self.len)
            .field("position", &self.data.position())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use types::BigEndian;

    use super::*;

    #[test]
    fn validates_length_up_front() {
        let bytes = [0, 1, 0, 2, 0, 3, 0xFF];
        let data = FontData::new(&bytes);
        let array = RecordArray::<BigEndian<u16>>::new(data, 3).unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(array.byte_len(), 6);
        assert_eq!(
            array.iter().map(|x| x.get()).collect::<Vec<_>>(),
            [1, 2, 3]
        );
        assert!(array.get(3).is_none());
        assert!(matches!(
            RecordArray::<BigEndian<u16>>::new(data, 4),
            Err(ReadError::OutOfBounds)
        ));
    }

    #[test]
    fn overflowing_length() {
        let data = FontData::new(&[0; 4]);
        assert!(RecordArray::<BigEndian<u32>>::new(data, usize::MAX).is_err());
    }

    #[test]
    fn empty() {
        let array = RecordArray::<BigEndian<u32>>::new(FontData::new(&[]), 0).unwrap();
        assert!(array.is_empty());
        assert_eq!(array.iter().count(), 0);
    }
}
