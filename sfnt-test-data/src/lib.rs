//! Test data shared between the sfnt crates.
//!
//! Fixtures are assembled in code with [`BeBuffer`] rather than checked in as
//! binary files, so that each test states the exact structure it exercises.

pub mod bebuffer;

use bebuffer::BeBuffer;
use sfnt_types::{MajorMinor, Tag, TTC_HEADER_TAG, TT_SFNT_VERSION};

/// The `MATH` table tag.
pub const MATH_TAG: Tag = Tag::new(b"MATH");

const TABLE_DIRECTORY_LEN: usize = 12;
const TABLE_RECORD_LEN: usize = 16;
const MATH_HEADER_LEN: u16 = 10;
const MATH_GLYPH_INFO_LEN: u16 = 8;
const MATH_VALUE_RECORD_LEN: u16 = 4;

/// A coverage table in format 1, listing `glyphs`.
pub fn coverage_format1(glyphs: &[u16]) -> Vec<u8> {
    BeBuffer::new()
        .push(1u16)
        .push(glyphs.len() as u16)
        .extend(glyphs.iter().copied())
        .into_vec()
}

/// A coverage table in format 2, with `(start, end, start_coverage_index)` ranges.
pub fn coverage_format2(ranges: &[(u16, u16, u16)]) -> Vec<u8> {
    ranges
        .iter()
        .fold(
            BeBuffer::new().push(2u16).push(ranges.len() as u16),
            |buf, (start, end, index)| buf.push(*start).push(*end).push(*index),
        )
        .into_vec()
}

/// The shape of the top accent attachment subtable in a generated `MATH` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopAccent {
    /// MathGlyphInfo has a null top accent attachment offset.
    Absent,
    /// The subtable exists but its coverage offset is null.
    MissingCoverage { count: u16 },
    /// The subtable declares `count` value records followed by `coverage`.
    WithCoverage { count: u16, coverage: Vec<u8> },
}

/// Build a `MATH` table.
///
/// With `glyph_info` set to `None` the header's MathGlyphInfo offset is
/// null. Otherwise the MathGlyphInfo subtable directly follows the header,
/// and the top accent attachment (if any) directly follows that. Coverage
/// tables are placed after the top accent attachment's value records.
pub fn math_table(glyph_info: Option<TopAccent>) -> Vec<u8> {
    let header = BeBuffer::new()
        .push(MajorMinor::VERSION_1_0)
        .push(0u16) // MathConstants
        .push(if glyph_info.is_some() { MATH_HEADER_LEN } else { 0 })
        .push(0u16); // MathVariants
    let Some(top_accent) = glyph_info else {
        return header.into_vec();
    };
    let top_accent_offset = match top_accent {
        TopAccent::Absent => 0u16,
        _ => MATH_GLYPH_INFO_LEN,
    };
    let buf = header
        .push(0u16) // MathItalicsCorrectionInfo
        .push(top_accent_offset)
        .push(0u16) // extendedShapeCoverage
        .push(0u16); // MathKernInfo
    match top_accent {
        TopAccent::Absent => buf,
        TopAccent::MissingCoverage { count } => buf
            .push(0u16)
            .push(count)
            .extend(std::iter::repeat(0u16).take(count as usize * 2)),
        TopAccent::WithCoverage { count, coverage } => buf
            .push(MATH_VALUE_RECORD_LEN + count * MATH_VALUE_RECORD_LEN)
            .push(count)
            .extend(std::iter::repeat(0u16).take(count as usize * 2))
            .append(&coverage),
    }
    .into_vec()
}

/// Build a font from raw tables.
///
/// Unlike a real font compiler this keeps tables in insertion order and
/// allows repeated tags, so that malformed directories can be produced.
#[derive(Debug, Clone, Default)]
pub struct FontBuilder {
    tables: Vec<(Tag, Vec<u8>)>,
}

impl FontBuilder {
    /// Create a new builder to compile a binary font
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder method to add raw data for the provided tag
    pub fn add_raw(&mut self, tag: Tag, data: impl Into<Vec<u8>>) -> &mut Self {
        self.tables.push((tag, data.into()));
        self
    }

    /// Assemble the tables into a font whose table directory starts at the
    /// beginning of the data.
    pub fn build(&self) -> Vec<u8> {
        self.build_at(0)
    }

    /// Assemble the tables into a font that will be placed at `base` in a
    /// larger file.
    ///
    /// Table offsets are measured from the start of the file, so they all
    /// include `base`.
    pub fn build_at(&self, base: u32) -> Vec<u8> {
        let header_len = TABLE_DIRECTORY_LEN + self.tables.len() * TABLE_RECORD_LEN;
        let num_tables = self.tables.len() as u16;
        let (search_range, entry_selector, range_shift) = search_range(num_tables);

        let mut directory = BeBuffer::new()
            .push(TT_SFNT_VERSION)
            .push(num_tables)
            .push(search_range)
            .push(entry_selector)
            .push(range_shift);
        let mut position = base + header_len as u32;
        for (tag, data) in &self.tables {
            let (checksum, padding) = checksum_and_padding(data);
            directory = directory
                .push(*tag)
                .push(checksum)
                .push(position)
                .push(data.len() as u32);
            position += data.len() as u32 + padding;
        }

        let mut data = directory.into_vec();
        for (_, table) in &self.tables {
            data.extend_from_slice(table);
            data.resize(round4(data.len()), 0);
        }
        data
    }
}

/// Build a font collection containing `fonts`, in order.
pub fn collection(fonts: &[FontBuilder]) -> Vec<u8> {
    let header_len = 12 + fonts.len() * 4;
    let mut offsets = Vec::with_capacity(fonts.len());
    let mut body = Vec::new();
    for font in fonts {
        let base = (header_len + body.len()) as u32;
        offsets.push(base);
        body.extend(font.build_at(base));
        body.resize(round4(body.len()), 0);
    }
    let mut data = BeBuffer::new()
        .push(TTC_HEADER_TAG)
        .push(MajorMinor::VERSION_1_0)
        .push(fonts.len() as u32)
        .extend(offsets)
        .into_vec();
    data.extend(body);
    data
}

/// A font with a single `MATH` table.
pub fn math_font(glyph_info: Option<TopAccent>) -> Vec<u8> {
    FontBuilder::new()
        .add_raw(MATH_TAG, math_table(glyph_info))
        .build()
}

fn search_range(num_tables: u16) -> (u16, u16, u16) {
    if num_tables == 0 {
        return (0, 0, 0);
    }
    let entry_selector = 15 - num_tables.leading_zeros() as u16;
    let search_range = (1u32 << entry_selector) * TABLE_RECORD_LEN as u32;
    let range_shift = (num_tables as u32 * TABLE_RECORD_LEN as u32).saturating_sub(search_range);
    (search_range as u16, entry_selector, range_shift as u16)
}

fn round4(sz: usize) -> usize {
    (sz + 3) & !3
}

fn checksum_and_padding(table: &[u8]) -> (u32, u32) {
    let checksum = table.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    });
    let padding = round4(table.len()) - table.len();
    (checksum, padding as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_search_assists() {
        // Based on Roboto's num tables
        assert_eq!(search_range(0x16), (256, 4, 96));
        assert_eq!(search_range(1), (16, 0, 0));
        assert_eq!(search_range(0), (0, 0, 0));
    }

    #[test]
    fn pad4() {
        for i in 0..10 {
            let pad = checksum_and_padding(&vec![0; i]).1;
            assert!(pad < 4);
            assert!((i + pad as usize) % 4 == 0, "pad {i} +{pad} bytes");
        }
    }

    #[test]
    fn checksum_pads_last_word() {
        assert_eq!(checksum_and_padding(&[0, 0, 0, 1, 2]).0, 0x0200_0001);
    }

    #[test]
    fn tables_follow_directory() {
        let font = FontBuilder::new()
            .add_raw(MATH_TAG, vec![1, 2, 3])
            .add_raw(Tag::new(b"post"), vec![4])
            .build();
        // 12 byte header, two records, then each table padded to 4 bytes
        assert_eq!(font.len(), 12 + 32 + 4 + 4);
        assert_eq!(&font[44..47], &[1, 2, 3]);
        assert_eq!(font[48], 4);
    }

    #[test]
    fn collection_offsets_are_absolute() {
        let font = FontBuilder::new().add_raw(MATH_TAG, vec![0; 4]).clone();
        let data = collection(&[font.clone(), font]);
        assert_eq!(&data[..4], b"ttcf");
        assert_eq!(&data[8..12], &2u32.to_be_bytes());
        assert_eq!(&data[12..16], &20u32.to_be_bytes());
        // each font: 12 + 16 + 4 bytes
        assert_eq!(&data[16..20], &52u32.to_be_bytes());
        // first font's only table record points past its own directory
        assert_eq!(&data[20 + 20..20 + 24], &48u32.to_be_bytes());
    }

    #[test]
    fn math_table_layout() {
        assert_eq!(math_table(None).len(), 10);
        let table = math_table(Some(TopAccent::WithCoverage {
            count: 2,
            coverage: coverage_format1(&[5, 6]),
        }));
        // header, glyph info, top accent header, two value records, coverage
        assert_eq!(table.len(), 10 + 8 + 4 + 8 + 8);
        // top accent offset in glyph info
        assert_eq!(&table[12..14], &8u16.to_be_bytes());
        // coverage offset in top accent attachment
        assert_eq!(&table[18..20], &12u16.to_be_bytes());
    }
}
