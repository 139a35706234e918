//! OpenType Layout common table formats
//!
//! Only the [coverage table] is needed here.
//!
//! [coverage table]: https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-table

use std::ops::Range;

use types::{BigEndian, FixedSize, GlyphId16};

use crate::array::RecordArray;
use crate::font_data::FontData;
use crate::read::{FontRead, ReadError};
use crate::table_ref::TableRef;

/// [Coverage Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-format-1): Individual glyph indices
pub type CoverageFormat1<'a> = TableRef<'a, CoverageFormat1Marker>;

#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct CoverageFormat1Marker {
    glyph_array_byte_len: usize,
}

impl CoverageFormat1Marker {
    pub const FORMAT: u16 = 1;

    pub fn coverage_format_byte_range(&self) -> Range<usize> {
        let start = 0;
        start..start + u16::RAW_BYTE_LEN
    }

    pub fn glyph_count_byte_range(&self) -> Range<usize> {
        let start = self.coverage_format_byte_range().end;
        start..start + u16::RAW_BYTE_LEN
    }

    pub fn glyph_array_byte_range(&self) -> Range<usize> {
        let start = self.glyph_count_byte_range().end;
        start..start + self.glyph_array_byte_len
    }
}

impl<'a> FontRead<'a> for CoverageFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        let glyph_count: u16 = cursor.read()?;
        let glyph_array = cursor.read_array::<BigEndian<GlyphId16>>(glyph_count as usize)?;
        cursor.finish(CoverageFormat1Marker {
            glyph_array_byte_len: glyph_array.byte_len(),
        })
    }
}

impl<'a> CoverageFormat1<'a> {
    /// Format identifier, format = 1
    pub fn coverage_format(&self) -> u16 {
        let range = self.shape.coverage_format_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    /// Number of glyphs in the glyph array
    pub fn glyph_count(&self) -> u16 {
        let range = self.shape.glyph_count_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    /// Array of glyph IDs, in numerical order
    pub fn glyph_array(&self) -> RecordArray<'a, BigEndian<GlyphId16>> {
        let range = self.shape.glyph_array_byte_range();
        self.data
            .read_array(range.start, self.glyph_count() as usize)
            .unwrap_or_default()
    }
}

/// [Coverage Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-format-2): Range of glyphs
pub type CoverageFormat2<'a> = TableRef<'a, CoverageFormat2Marker>;

#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct CoverageFormat2Marker {
    range_records_byte_len: usize,
}

impl CoverageFormat2Marker {
    pub const FORMAT: u16 = 2;

    pub fn coverage_format_byte_range(&self) -> Range<usize> {
        let start = 0;
        start..start + u16::RAW_BYTE_LEN
    }

    pub fn range_count_byte_range(&self) -> Range<usize> {
        let start = self.coverage_format_byte_range().end;
        start..start + u16::RAW_BYTE_LEN
    }

    pub fn range_records_byte_range(&self) -> Range<usize> {
        let start = self.range_count_byte_range().end;
        start..start + self.range_records_byte_len
    }
}

impl<'a> FontRead<'a> for CoverageFormat2<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        let range_count: u16 = cursor.read()?;
        let range_records = cursor.read_array::<RangeRecord>(range_count as usize)?;
        cursor.finish(CoverageFormat2Marker {
            range_records_byte_len: range_records.byte_len(),
        })
    }
}

impl<'a> CoverageFormat2<'a> {
    /// Format identifier, format = 2
    pub fn coverage_format(&self) -> u16 {
        let range = self.shape.coverage_format_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    /// Number of RangeRecords
    pub fn range_count(&self) -> u16 {
        let range = self.shape.range_count_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    /// Array of glyph ranges, ordered by startGlyphID.
    pub fn range_records(&self) -> RecordArray<'a, RangeRecord> {
        let range = self.shape.range_records_byte_range();
        self.data
            .read_array(range.start, self.range_count() as usize)
            .unwrap_or_default()
    }
}

/// Used in [CoverageFormat2]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeRecord {
    /// First glyph ID in the range
    pub start_glyph_id: BigEndian<GlyphId16>,
    /// Last glyph ID in the range
    pub end_glyph_id: BigEndian<GlyphId16>,
    /// Coverage Index of first glyph ID in range
    pub start_coverage_index: BigEndian<u16>,
}

impl RangeRecord {
    /// First glyph ID in the range
    pub fn start_glyph_id(&self) -> GlyphId16 {
        self.start_glyph_id.get()
    }

    /// Last glyph ID in the range
    pub fn end_glyph_id(&self) -> GlyphId16 {
        self.end_glyph_id.get()
    }

    /// Coverage Index of first glyph ID in range
    pub fn start_coverage_index(&self) -> u16 {
        self.start_coverage_index.get()
    }

    /// The number of glyphs in the range.
    ///
    /// Returns an error if the range ends before it starts.
    pub fn glyph_count(&self) -> Result<u32, ReadError> {
        let start = self.start_glyph_id().to_u16();
        let end = self.end_glyph_id().to_u16();
        end.checked_sub(start)
            .map(|delta| delta as u32 + 1)
            .ok_or(ReadError::MalformedData("range record end precedes start"))
    }

    /// One past the last coverage index assigned by this range.
    fn coverage_end(&self) -> Result<u32, ReadError> {
        self.glyph_count()
            .map(|count| self.start_coverage_index() as u32 + count)
    }

    /// Iterate the glyphs in this range.
    ///
    /// This is empty if the range ends before it starts.
    pub fn iter(&self) -> impl Iterator<Item = GlyphId16> {
        (self.start_glyph_id().to_u16()..=self.end_glyph_id().to_u16()).map(GlyphId16::new)
    }
}

impl FixedSize for RangeRecord {
    const RAW_BYTE_LEN: usize = GlyphId16::RAW_BYTE_LEN + GlyphId16::RAW_BYTE_LEN + u16::RAW_BYTE_LEN;
}

impl<'a> FontRead<'a> for RangeRecord {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(RangeRecord {
            start_glyph_id: data.read_be_at(0)?,
            end_glyph_id: data.read_be_at(2)?,
            start_coverage_index: data.read_be_at(4)?,
        })
    }
}

/// [Coverage Table](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-table)
#[derive(Clone)]
pub enum CoverageTable<'a> {
    Format1(CoverageFormat1<'a>),
    Format2(CoverageFormat2<'a>),
}

impl<'a> FontRead<'a> for CoverageTable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            CoverageFormat1Marker::FORMAT => Ok(Self::Format1(FontRead::read(data)?)),
            CoverageFormat2Marker::FORMAT => Ok(Self::Format2(FontRead::read(data)?)),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl<'a> CoverageTable<'a> {
    /// Format identifier
    pub fn coverage_format(&self) -> u16 {
        match self {
            Self::Format1(item) => item.coverage_format(),
            Self::Format2(item) => item.coverage_format(),
        }
    }

    /// The number of records that follow the header: glyph ids for format
    /// 1, range records for format 2.
    pub fn record_count(&self) -> u16 {
        match self {
            Self::Format1(item) => item.glyph_count(),
            Self::Format2(item) => item.range_count(),
        }
    }

    /// The position of the table in the file.
    pub fn position(&self) -> u32 {
        match self {
            Self::Format1(item) => item.position(),
            Self::Format2(item) => item.position(),
        }
    }

    /// The number of glyphs this table assigns coverage indices to.
    ///
    /// For format 1 this is the length of the glyph array; ids are not
    /// deduplicated. For format 2 it is the largest coverage index any range
    /// reaches, so ranges may overlap or leave gaps between their indices.
    pub fn coverage_size(&self) -> Result<u32, ReadError> {
        match self {
            Self::Format1(item) => Ok(item.glyph_array().len() as u32),
            Self::Format2(item) => item
                .range_records()
                .iter()
                .try_fold(0u32, |size, record| {
                    record.coverage_end().map(|end| size.max(end))
                }),
        }
    }

    /// Iterate the glyphs in the table, in the order they are stored.
    pub fn iter(&self) -> impl Iterator<Item = GlyphId16> + 'a {
        // all one expression so that we have a single return type
        let (iter1, iter2) = match self {
            CoverageTable::Format1(t) => (Some(t.glyph_array().iter().map(|g| g.get())), None),
            CoverageTable::Format2(t) => {
                let iter = t.range_records().iter().flat_map(|record| record.iter());
                (None, Some(iter))
            }
        };

        iter1
            .into_iter()
            .flatten()
            .chain(iter2.into_iter().flatten())
    }
}

impl std::fmt::Debug for CoverageTable<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Format1(table) => std::fmt::Debug::fmt(table, f),
            Self::Format2(table) => std::fmt::Debug::fmt(table, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::{bebuffer::BeBuffer, coverage_format1, coverage_format2};

    use super::*;

    fn read(bytes: &[u8]) -> Result<CoverageTable, ReadError> {
        CoverageTable::read(FontData::new(bytes))
    }

    #[test]
    fn format1_size_is_glyph_count() {
        let cases: [&[u16]; 4] = [&[], &[7], &[3, 1, 2], &[5, 5, 5, 5]];
        for glyphs in cases {
            let data = coverage_format1(glyphs);
            let coverage = read(&data).unwrap();
            assert_eq!(coverage.coverage_format(), 1);
            assert_eq!(coverage.coverage_size(), Ok(glyphs.len() as u32));
        }
    }

    #[test]
    fn format1_iter_keeps_order() {
        let data = coverage_format1(&[9, 2, 4]);
        let coverage = read(&data).unwrap();
        assert_eq!(
            coverage.iter().map(|gid| gid.to_u16()).collect::<Vec<_>>(),
            [9, 2, 4]
        );
    }

    #[test]
    fn format2_empty() {
        let data = coverage_format2(&[]);
        let coverage = read(&data).unwrap();
        assert_eq!(coverage.record_count(), 0);
        assert_eq!(coverage.coverage_size(), Ok(0));
        assert_eq!(coverage.iter().count(), 0);
    }

    #[test]
    fn format2_single_range() {
        let data = coverage_format2(&[(10, 14, 0)]);
        let coverage = read(&data).unwrap();
        assert_eq!(coverage.coverage_size(), Ok(5));
        assert_eq!(
            coverage.iter().map(|gid| gid.to_u16()).collect::<Vec<_>>(),
            [10, 11, 12, 13, 14]
        );
    }

    #[test]
    fn format2_gap_between_indices() {
        let data = coverage_format2(&[(10, 14, 0), (20, 20, 10)]);
        let coverage = read(&data).unwrap();
        assert_eq!(coverage.coverage_size(), Ok(11));
    }

    #[test]
    fn format2_unordered_and_overlapping() {
        let data = coverage_format2(&[(20, 20, 10), (10, 14, 0), (12, 13, 2)]);
        assert_eq!(read(&data).unwrap().coverage_size(), Ok(11));
    }

    #[test]
    fn format2_no_overflow() {
        let data = coverage_format2(&[(0, 0xFFFF, 0xFFFF)]);
        assert_eq!(read(&data).unwrap().coverage_size(), Ok(0x1FFFF));
    }

    #[test]
    fn format2_inverted_range() {
        let data = coverage_format2(&[(10, 14, 0), (8, 4, 5)]);
        let coverage = read(&data).unwrap();
        assert!(matches!(
            coverage.coverage_size(),
            Err(ReadError::MalformedData(_))
        ));
        let CoverageTable::Format2(table) = coverage else {
            panic!("expected format 2");
        };
        let inverted = table.range_records().get(1).unwrap();
        assert!(inverted.glyph_count().is_err());
        assert_eq!(inverted.iter().count(), 0);
    }

    #[test]
    fn unsupported_format() {
        let data = BeBuffer::new().push(3u16).push(0u16);
        assert!(matches!(read(&data), Err(ReadError::InvalidFormat(3))));
    }

    #[test]
    fn truncated_arrays() {
        let data = BeBuffer::new().push(1u16).push(3u16).push(1u16).push(2u16);
        assert!(matches!(read(&data), Err(ReadError::OutOfBounds)));
        let data = BeBuffer::new()
            .push(2u16)
            .push(1u16)
            .extend([10u16, 14]);
        assert!(matches!(read(&data), Err(ReadError::OutOfBounds)));
        assert!(matches!(read(&[0]), Err(ReadError::OutOfBounds)));
    }
}
