//! The [MATH](https://learn.microsoft.com/en-us/typography/opentype/spec/math) table
//!
//! Only the path from the header to the top accent attachment is decoded;
//! constants, variants, italics correction and kerning are exposed as raw
//! offsets.

use std::ops::Range;

use types::{BigEndian, FixedSize, MajorMinor, Offset16, Tag};

use crate::array::RecordArray;
use crate::font_data::FontData;
use crate::read::{FontRead, ReadError};
use crate::table_provider::TopLevelTable;
use crate::table_ref::TableRef;

use super::layout::CoverageTable;

/// 'MATH'
pub const TAG: Tag = Tag::new(b"MATH");

/// The [Mathematical Typesetting](https://learn.microsoft.com/en-us/typography/opentype/spec/math#math-header) table header
pub type Math<'a> = TableRef<'a, MathMarker>;

#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct MathMarker {}

impl MathMarker {
    pub fn version_byte_range(&self) -> Range<usize> {
        let start = 0;
        start..start + MajorMinor::RAW_BYTE_LEN
    }

    pub fn math_constants_offset_byte_range(&self) -> Range<usize> {
        let start = self.version_byte_range().end;
        start..start + Offset16::RAW_BYTE_LEN
    }

    pub fn math_glyph_info_offset_byte_range(&self) -> Range<usize> {
        let start = self.math_constants_offset_byte_range().end;
        start..start + Offset16::RAW_BYTE_LEN
    }

    pub fn math_variants_offset_byte_range(&self) -> Range<usize> {
        let start = self.math_glyph_info_offset_byte_range().end;
        start..start + Offset16::RAW_BYTE_LEN
    }
}

impl TopLevelTable for Math<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Math<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<MajorMinor>();
        cursor.advance::<Offset16>();
        cursor.advance::<Offset16>();
        cursor.advance::<Offset16>();
        cursor.finish(MathMarker {})
    }
}

impl<'a> Math<'a> {
    /// Major/minor version of the MATH table, = 1.0.
    pub fn version(&self) -> MajorMinor {
        let range = self.shape.version_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    /// Offset to MathConstants table, from the beginning of the MATH table.
    pub fn math_constants_offset(&self) -> Offset16 {
        let range = self.shape.math_constants_offset_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    /// Offset to MathGlyphInfo table, from the beginning of the MATH table.
    pub fn math_glyph_info_offset(&self) -> Offset16 {
        let range = self.shape.math_glyph_info_offset_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    /// Attempt to resolve [`math_glyph_info_offset`][Self::math_glyph_info_offset].
    ///
    /// Returns `None` if the offset is null.
    pub fn math_glyph_info(&self) -> Option<Result<MathGlyphInfo<'a>, ReadError>> {
        self.resolve_nullable_offset(self.math_glyph_info_offset())
    }

    /// Offset to MathVariants table, from the beginning of the MATH table.
    pub fn math_variants_offset(&self) -> Offset16 {
        let range = self.shape.math_variants_offset_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }
}

/// The [MathGlyphInfo](https://learn.microsoft.com/en-us/typography/opentype/spec/math#mathglyphinfo-table) table
pub type MathGlyphInfo<'a> = TableRef<'a, MathGlyphInfoMarker>;

#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct MathGlyphInfoMarker {}

impl MathGlyphInfoMarker {
    pub fn math_italics_correction_info_offset_byte_range(&self) -> Range<usize> {
        let start = 0;
        start..start + Offset16::RAW_BYTE_LEN
    }

    pub fn math_top_accent_attachment_offset_byte_range(&self) -> Range<usize> {
        let start = self.math_italics_correction_info_offset_byte_range().end;
        start..start + Offset16::RAW_BYTE_LEN
    }

    pub fn extended_shape_coverage_offset_byte_range(&self) -> Range<usize> {
        let start = self.math_top_accent_attachment_offset_byte_range().end;
        start..start + Offset16::RAW_BYTE_LEN
    }

    pub fn math_kern_info_offset_byte_range(&self) -> Range<usize> {
        let start = self.extended_shape_coverage_offset_byte_range().end;
        start..start + Offset16::RAW_BYTE_LEN
    }
}

impl<'a> FontRead<'a> for MathGlyphInfo<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<Offset16>();
        cursor.advance::<Offset16>();
        cursor.advance::<Offset16>();
        cursor.advance::<Offset16>();
        cursor.finish(MathGlyphInfoMarker {})
    }
}

impl<'a> MathGlyphInfo<'a> {
    /// Offset to MathItalicsCorrectionInfo table, from the beginning of the
    /// MathGlyphInfo table.
    pub fn math_italics_correction_info_offset(&self) -> Offset16 {
        let range = self.shape.math_italics_correction_info_offset_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    /// Offset to MathTopAccentAttachment table, from the beginning of the
    /// MathGlyphInfo table.
    pub fn math_top_accent_attachment_offset(&self) -> Offset16 {
        let range = self.shape.math_top_accent_attachment_offset_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    /// Attempt to resolve [`math_top_accent_attachment_offset`][Self::math_top_accent_attachment_offset].
    ///
    /// Returns `None` if the offset is null.
    pub fn math_top_accent_attachment(
        &self,
    ) -> Option<Result<MathTopAccentAttachment<'a>, ReadError>> {
        self.resolve_nullable_offset(self.math_top_accent_attachment_offset())
    }

    /// Offset to ExtendedShapes coverage table, from the beginning of the
    /// MathGlyphInfo table.
    pub fn extended_shape_coverage_offset(&self) -> Offset16 {
        let range = self.shape.extended_shape_coverage_offset_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    /// Attempt to resolve [`extended_shape_coverage_offset`][Self::extended_shape_coverage_offset].
    ///
    /// Returns `None` if the offset is null.
    pub fn extended_shape_coverage(&self) -> Option<Result<CoverageTable<'a>, ReadError>> {
        self.resolve_nullable_offset(self.extended_shape_coverage_offset())
    }

    /// Offset to MathKernInfo table, from the beginning of the MathGlyphInfo
    /// table.
    pub fn math_kern_info_offset(&self) -> Offset16 {
        let range = self.shape.math_kern_info_offset_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }
}

/// The [MathTopAccentAttachment](https://learn.microsoft.com/en-us/typography/opentype/spec/math#mathtopaccentattachment-table) table
///
/// Only the coverage offset and the count are required to be present when
/// the table is read; the value records are checked when they are accessed.
pub type MathTopAccentAttachment<'a> = TableRef<'a, MathTopAccentAttachmentMarker>;

#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct MathTopAccentAttachmentMarker {}

impl MathTopAccentAttachmentMarker {
    pub fn top_accent_coverage_offset_byte_range(&self) -> Range<usize> {
        let start = 0;
        start..start + Offset16::RAW_BYTE_LEN
    }

    pub fn top_accent_attachment_count_byte_range(&self) -> Range<usize> {
        let start = self.top_accent_coverage_offset_byte_range().end;
        start..start + u16::RAW_BYTE_LEN
    }

    pub fn top_accent_attachment_byte_start(&self) -> usize {
        self.top_accent_attachment_count_byte_range().end
    }
}

impl<'a> FontRead<'a> for MathTopAccentAttachment<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<Offset16>();
        cursor.advance::<u16>();
        cursor.finish(MathTopAccentAttachmentMarker {})
    }
}

impl<'a> MathTopAccentAttachment<'a> {
    /// Offset to Coverage table, from the beginning of the
    /// MathTopAccentAttachment table.
    pub fn top_accent_coverage_offset(&self) -> Offset16 {
        let range = self.shape.top_accent_coverage_offset_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    /// Attempt to resolve [`top_accent_coverage_offset`][Self::top_accent_coverage_offset].
    ///
    /// Returns `None` if the offset is null.
    pub fn top_accent_coverage(&self) -> Option<Result<CoverageTable<'a>, ReadError>> {
        self.resolve_nullable_offset(self.top_accent_coverage_offset())
    }

    /// Number of MathValueRecords in the topAccentAttachment array; should
    /// match the number of glyphs in the coverage table.
    pub fn top_accent_attachment_count(&self) -> u16 {
        let range = self.shape.top_accent_attachment_count_byte_range();
        self.data.read_at(range.start).unwrap_or_default()
    }

    /// Array of MathValueRecords defining top accent attachment points for
    /// each covered glyph.
    pub fn top_accent_attachment(&self) -> Result<RecordArray<'a, MathValueRecord>, ReadError> {
        self.data.read_array(
            self.shape.top_accent_attachment_byte_start(),
            self.top_accent_attachment_count() as usize,
        )
    }
}

/// [MathValueRecord](https://learn.microsoft.com/en-us/typography/opentype/spec/math#mathvaluerecord)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MathValueRecord {
    /// The X or Y value in design units.
    pub value: BigEndian<i16>,
    /// Offset to the device table, from the beginning of the parent table.
    pub device_offset: BigEndian<Offset16>,
}

impl MathValueRecord {
    /// The X or Y value in design units.
    pub fn value(&self) -> i16 {
        self.value.get()
    }

    /// Offset to the device table, from the beginning of the parent table.
    /// May be null.
    pub fn device_offset(&self) -> Offset16 {
        self.device_offset.get()
    }
}

impl FixedSize for MathValueRecord {
    const RAW_BYTE_LEN: usize = i16::RAW_BYTE_LEN + Offset16::RAW_BYTE_LEN;
}

impl<'a> FontRead<'a> for MathValueRecord {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(MathValueRecord {
            value: data.read_be_at(0)?,
            device_offset: data.read_be_at(2)?,
        })
    }
}
