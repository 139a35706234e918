//! The table directory and collection header.
//!
//! See the [OpenType font file] chapter for details of these structures.
//!
//! [OpenType font file]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff

use std::ops::Range;

use types::{BigEndian, FixedSize, MajorMinor, Offset32, Tag};

use crate::array::RecordArray;
use crate::font_data::FontData;
use crate::read::{FontRead, ReadError};
use crate::table_ref::TableRef;

/// The [Table Directory](https://docs.microsoft.com/en-us/typography/opentype/spec/otff#table-directory)
pub type TableDirectory<'a> = TableRef<'a, TableDirectoryMarker>;

/// Marker for [`TableDirectory`]; records the byte positions of its fields.
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct TableDirectoryMarker {
    table_records_byte_len: usize,
}

impl TableDirectoryMarker {
    pub fn sfnt_version_byte_range(&self) -> Range<usize> {
        let start = 0;
        start..start + u32::RAW_BYTE_LEN
    }

    pub fn num_tables_byte_range(&self) -> Range<usize> {
        let start = self.sfnt_version_byte_range().end;
        start..start + u16::RAW_BYTE_LEN
    }

    pub fn search_range_byte_range(&self) -> Range<usize> {
        let start = self.num_tables_byte_range().end;
        start..start + u16::RAW_BYTE_LEN
    }

    pub fn entry_selector_byte_range(&self) -> Range<usize> {
        let start = self.search_range_byte_range().end;
        start..start + u16::RAW_BYTE_LEN
    }

    pub fn range_shift_byte_range(&self) -> Range<usize> {
        let start = self.entry_selector_byte_range().end;
        start..start + u16::RAW_BYTE_LEN
    }

    pub fn table_records_byte_range(&self) -> Range<usize> {
        let start = self.range_shift_byte_range().end;
        start..start + self.table_records_byte_len
    }
}

impl<'a> FontRead<'a> for TableDirectory<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u32>();
        let num_tables: u16 = cursor.read()?;
        cursor.advance::<u16>();
        cursor.advance::<u16>();
        cursor.advance::<u16>();
        let table_records = cursor.read_array::<TableRecord>(num_tables as usize)?;
        cursor.finish(TableDirectoryMarker {
            table_records_byte_len: table_records.byte_len(),
        })
    }
}

impl<'a> TableDirectory<'a> {
    pub fn sfnt_version(&self) -> u32 {
        let range = self.shape.sfnt_version_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    pub fn num_tables(&self) -> u16 {
        let range = self.shape.num_tables_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    pub fn search_range(&self) -> u16 {
        let range = self.shape.search_range_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    pub fn entry_selector(&self) -> u16 {
        let range = self.shape.entry_selector_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    pub fn range_shift(&self) -> u16 {
        let range = self.shape.range_shift_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    /// The table records, in directory order.
    pub fn table_records(&self) -> RecordArray<'a, TableRecord> {
        let range = self.shape.table_records_byte_range();
        self.data
            .read_array(range.start, self.num_tables() as usize)
            .unwrap_or_default()
    }
}

/// Record for a table in a font.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableRecord {
    /// Table identifier.
    pub tag: BigEndian<Tag>,
    /// Checksum for the table.
    pub checksum: BigEndian<u32>,
    /// Offset from the beginning of the font data.
    pub offset: BigEndian<Offset32>,
    /// Length of the table.
    pub length: BigEndian<u32>,
}

impl TableRecord {
    /// Table identifier.
    pub fn tag(&self) -> Tag {
        self.tag.get()
    }

    /// Checksum for the table.
    pub fn checksum(&self) -> u32 {
        self.checksum.get()
    }

    /// Offset from the beginning of the font data.
    pub fn offset(&self) -> Offset32 {
        self.offset.get()
    }

    /// Length of the table.
    pub fn length(&self) -> u32 {
        self.length.get()
    }

    /// The range of bytes in the file covered by this table, or `None` if
    /// computing the end overflows.
    pub fn data_range(&self) -> Option<Range<usize>> {
        let start = self.offset().to_u32() as usize;
        start
            .checked_add(self.length() as usize)
            .map(|end| start..end)
    }
}

impl FixedSize for TableRecord {
    const RAW_BYTE_LEN: usize =
        Tag::RAW_BYTE_LEN + u32::RAW_BYTE_LEN + Offset32::RAW_BYTE_LEN + u32::RAW_BYTE_LEN;
}

impl<'a> FontRead<'a> for TableRecord {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(TableRecord {
            tag: data.read_be_at(0)?,
            checksum: data.read_be_at(4)?,
            offset: data.read_be_at(8)?,
            length: data.read_be_at(12)?,
        })
    }
}

/// [TTC Header](https://learn.microsoft.com/en-us/typography/opentype/spec/otff#ttc-header)
pub type TTCHeader<'a> = TableRef<'a, TTCHeaderMarker>;

/// Marker for [`TTCHeader`]
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct TTCHeaderMarker {
    table_directory_offsets_byte_len: usize,
}

impl TTCHeaderMarker {
    pub fn ttc_tag_byte_range(&self) -> Range<usize> {
        let start = 0;
        start..start + Tag::RAW_BYTE_LEN
    }

    pub fn version_byte_range(&self) -> Range<usize> {
        let start = self.ttc_tag_byte_range().end;
        start..start + MajorMinor::RAW_BYTE_LEN
    }

    pub fn num_fonts_byte_range(&self) -> Range<usize> {
        let start = self.version_byte_range().end;
        start..start + u32::RAW_BYTE_LEN
    }

    pub fn table_directory_offsets_byte_range(&self) -> Range<usize> {
        let start = self.num_fonts_byte_range().end;
        start..start + self.table_directory_offsets_byte_len
    }
}

impl<'a> FontRead<'a> for TTCHeader<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<Tag>();
        cursor.advance::<MajorMinor>();
        let num_fonts: u32 = cursor.read()?;
        let offsets = cursor.read_array::<BigEndian<u32>>(num_fonts as usize)?;
        cursor.finish(TTCHeaderMarker {
            table_directory_offsets_byte_len: offsets.byte_len(),
        })
    }
}

impl<'a> TTCHeader<'a> {
    /// Font Collection ID string: "ttcf"
    pub fn ttc_tag(&self) -> Tag {
        let range = self.shape.ttc_tag_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    /// Major/minor version of the TTC Header
    pub fn version(&self) -> MajorMinor {
        let range = self.shape.version_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    /// Number of fonts in TTC
    pub fn num_fonts(&self) -> u32 {
        let range = self.shape.num_fonts_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    /// Offsets to the table directory of each font, from the beginning of the file
    pub fn table_directory_offsets(&self) -> RecordArray<'a, BigEndian<u32>> {
        let range = self.shape.table_directory_offsets_byte_range();
        self.data
            .read_array(range.start, self.num_fonts() as usize)
            .unwrap_or_default()
    }
}
