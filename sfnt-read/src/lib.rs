//! Reading sfnt font files
//!
//! This crate provides memory safe, zero-allocation parsing of the parts of
//! OpenType font files needed to inspect the `MATH` table: the container
//! (a single font or a [font collection]), each font's [table directory],
//! the `MATH` table header chain, and [coverage tables].
//!
//! All reads go through [`FontData`], which rejects any access outside the
//! underlying byte slice with [`ReadError::OutOfBounds`]. No structure is
//! ever reinterpreted in place.
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use sfnt_read::{FileRef, TableProvider};
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! let file = FileRef::new(&font_bytes).expect("failed to read font data");
//! for (offset, font) in file.fonts() {
//!     let font = font.expect("malformed table directory");
//!     if let Ok(math) = font.math() {
//!         println!("font at {offset} has MATH version {}", math.version());
//!     }
//! }
//! ```
//!
//! [font collection]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#font-collections
//! [table directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory
//! [coverage tables]: https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-table

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(all(not(feature = "std"), not(test)))]
#[macro_use]
extern crate core as std;

pub mod array;
mod directory;
mod font_data;
mod offset;
mod read;
mod table_provider;
mod table_ref;
pub mod tables;

pub use array::RecordArray;
pub use directory::{TTCHeader, TTCHeaderMarker, TableDirectory, TableDirectoryMarker, TableRecord};
pub use font_data::FontData;
pub use offset::{Offset, ResolveNullableOffset, ResolveOffset};
pub use read::{FontRead, ReadError};
pub use table_provider::{TableProvider, TopLevelTable};
pub use table_ref::TableRef;

/// Public re-export of the sfnt-types crate.
pub extern crate sfnt_types as types;

use types::{Tag, CFF_SFNT_VERSION, TRUE_SFNT_VERSION, TTC_HEADER_TAG, TT_SFNT_VERSION};

/// Whether a file holds one font or a collection of fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FontKind {
    Single,
    Collection,
}

#[derive(Clone)]
/// Reference to the content of a font or font collection file.
pub enum FileRef<'a> {
    /// A single font, whose table directory starts at the beginning of the data.
    ///
    /// The directory is not decoded until the font is requested, so that a
    /// malformed directory is reported against the font rather than the file.
    Font(FontData<'a>),
    /// A collection of fonts.
    Collection(CollectionRef<'a>),
}

impl<'a> FileRef<'a> {
    /// Creates a new reference to a file representing a font or font collection.
    ///
    /// The file is a collection if it starts with the `ttcf` tag, and a single
    /// font otherwise. Data too short to hold a tag is rejected with
    /// [`ReadError::UnknownContainer`].
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        let tag: Tag = data
            .read_at(0)
            .map_err(|_| ReadError::UnknownContainer)?;
        if tag == TTC_HEADER_TAG {
            CollectionRef::from_data(data).map(Self::Collection)
        } else {
            Ok(Self::Font(data))
        }
    }

    pub fn kind(&self) -> FontKind {
        match self {
            Self::Font(_) => FontKind::Single,
            Self::Collection(_) => FontKind::Collection,
        }
    }

    /// The number of fonts in the file.
    pub fn len(&self) -> u32 {
        match self {
            Self::Font(_) => 1,
            Self::Collection(collection) => collection.len(),
        }
    }

    /// Returns `true` if the file contains no fonts (an empty collection).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The whole file.
    pub fn data(&self) -> FontData<'a> {
        match self {
            Self::Font(data) => *data,
            Self::Collection(collection) => collection.data,
        }
    }

    /// Returns the offset of each font's table directory, from the start of the file.
    ///
    /// This is `[0]` for a single font.
    pub fn font_offsets(&self) -> impl Iterator<Item = u32> + 'a + Clone {
        // all one expression so that we have a single return type
        let (iter_one, iter_two) = match self {
            Self::Font(_) => (Some(0), None),
            Self::Collection(collection) => (
                None,
                Some(
                    collection
                        .header
                        .table_directory_offsets()
                        .iter()
                        .map(|off| off.get()),
                ),
            ),
        };
        iter_one.into_iter().chain(iter_two.into_iter().flatten())
    }

    /// Returns an iterator over the fonts contained in the file, paired with
    /// the offset of each font's table directory.
    ///
    /// Each font is decoded independently; a malformed font does not stop
    /// the iteration.
    pub fn fonts(
        &self,
    ) -> impl Iterator<Item = (u32, Result<FontRef<'a>, ReadError>)> + 'a + Clone {
        let data = self.data();
        self.font_offsets()
            .map(move |offset| (offset, FontRef::from_offset(data, offset)))
    }
}

/// Reference to the content of a font collection file.
#[derive(Clone)]
pub struct CollectionRef<'a> {
    data: FontData<'a>,
    header: TTCHeader<'a>,
}

impl<'a> CollectionRef<'a> {
    /// Creates a new reference to a font collection.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        Self::from_data(FontData::new(data))
    }

    fn from_data(data: FontData<'a>) -> Result<Self, ReadError> {
        let header = TTCHeader::read(data)?;
        if header.ttc_tag() != TTC_HEADER_TAG {
            Err(ReadError::InvalidTtc(header.ttc_tag()))
        } else {
            Ok(Self { data, header })
        }
    }

    /// The decoded collection header.
    pub fn header(&self) -> &TTCHeader<'a> {
        &self.header
    }

    /// Returns the number of fonts in the collection.
    pub fn len(&self) -> u32 {
        self.header.num_fonts()
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the font in the collection at the specified index, or `None`
    /// if the index is out of range.
    pub fn get(&self, index: u32) -> Option<Result<FontRef<'a>, ReadError>> {
        let offset = self
            .header
            .table_directory_offsets()
            .get(index as usize)?
            .get();
        Some(FontRef::from_offset(self.data, offset))
    }

    /// Returns an iterator over the fonts in the collection.
    pub fn iter(&self) -> impl Iterator<Item = Result<FontRef<'a>, ReadError>> + 'a + Clone {
        let copy = self.clone();
        (0..self.len()).filter_map(move |ix| copy.get(ix))
    }
}

/// Reference to an in-memory font.
///
/// Table offsets in the directory are absolute, so this keeps a reference to
/// the whole file along with the position of its own table directory.
#[derive(Clone)]
pub struct FontRef<'a> {
    data: FontData<'a>,
    offset: u32,
    pub table_directory: TableDirectory<'a>,
}

impl<'a> FontRef<'a> {
    /// Creates a new reference to an in-memory font backed by the given data.
    ///
    /// The data must be a single font (not a font collection) and must begin with a
    /// [table directory] to be considered valid.
    ///
    /// [table directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        Self::from_offset(FontData::new(data), 0)
    }

    /// Creates a reference to the font whose table directory starts at
    /// `offset` in the file `data`.
    pub fn from_offset(data: FontData<'a>, offset: u32) -> Result<Self, ReadError> {
        let directory_data = data
            .split_off(offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let table_directory = TableDirectory::read(directory_data)?;
        let sfnt_version = table_directory.sfnt_version();
        if ![TT_SFNT_VERSION, CFF_SFNT_VERSION, TRUE_SFNT_VERSION].contains(&sfnt_version) {
            log::warn!("unrecognized sfnt version 0x{sfnt_version:08X} for font at {offset}");
        }
        Ok(FontRef {
            data,
            offset,
            table_directory,
        })
    }

    /// Returns the underlying file data.
    ///
    /// This is the base from which tables are loaded, meaning that for
    /// collection files, this will be the entire file.
    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    /// The offset of this font's table directory in the file.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Returns the associated table directory.
    pub fn table_directory(&self) -> &TableDirectory<'a> {
        &self.table_directory
    }

    /// Returns the record for the table with the specified tag, if present.
    ///
    /// Records are scanned in directory order and the first match wins, so a
    /// repeated tag resolves to its first occurrence.
    pub fn locate_table(&self, tag: Tag) -> Option<TableRecord> {
        let record = self
            .table_directory
            .table_records()
            .iter()
            .find(|record| record.tag() == tag)?;
        log::trace!(
            "found '{tag}' at {} ({} bytes)",
            record.offset().to_u32(),
            record.length()
        );
        Some(record)
    }

    /// Returns the data covered by a table record.
    pub fn record_data(&self, record: &TableRecord) -> Result<FontData<'a>, ReadError> {
        record
            .data_range()
            .and_then(|range| self.data.slice(range))
            .ok_or(ReadError::OutOfBounds)
    }

    /// Returns the data from the start of a table record to the end of the
    /// file.
    ///
    /// Unlike [`record_data`][Self::record_data] this ignores the record's
    /// length, so offsets inside the table are bounded only by the file.
    pub fn record_start_data(&self, record: &TableRecord) -> Result<FontData<'a>, ReadError> {
        let start = record.offset().to_u32() as usize;
        let data = self.data.split_off(start).ok_or(ReadError::OutOfBounds)?;
        let past_end = record
            .data_range()
            .is_none_or(|range| range.end > self.data.len());
        if past_end {
            log::warn!(
                "'{}' record claims {} bytes, only {} remain in the file",
                record.tag(),
                record.length(),
                data.len()
            );
        }
        Ok(data)
    }

    /// Returns the data for the table with the specified tag, if present.
    pub fn table_data(&self, tag: Tag) -> Option<Result<FontData<'a>, ReadError>> {
        self.locate_table(tag)
            .map(|record| self.record_data(&record))
    }
}

impl<'a> TableProvider<'a> for FontRef<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<Result<FontData<'a>, ReadError>> {
        self.table_data(tag)
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::{bebuffer::BeBuffer, FontBuilder};
    use types::{Offset32, Tag, TT_SFNT_VERSION};

    use crate::{FileRef, FontKind, FontRef, ReadError, TableProvider, TableRecord};

    const MATH: Tag = Tag::new(b"MATH");

    fn two_table_font() -> Vec<u8> {
        FontBuilder::new()
            .add_raw(Tag::new(b"head"), vec![1, 2, 3, 4])
            .add_raw(MATH, vec![5, 6, 7, 8, 9, 10])
            .build()
    }

    #[cfg(feature = "serde")]
    #[test]
    fn font_kind_serde() {
        let dumped = serde_json::to_string(&[FontKind::Single, FontKind::Collection]).unwrap();
        assert_eq!(dumped, r#"["single","collection"]"#);
        let loaded: FontKind = serde_json::from_str(r#""collection""#).unwrap();
        assert_eq!(loaded, FontKind::Collection);
    }

    #[test]
    fn file_ref_non_collection() {
        let font = two_table_font();
        let file = FileRef::new(&font).unwrap();
        assert!(matches!(file, FileRef::Font(_)));
        assert_eq!(file.kind(), FontKind::Single);
        assert_eq!(file.font_offsets().collect::<Vec<_>>(), [0]);
    }

    #[test]
    fn file_ref_collection() {
        let one = two_table_font();
        let collection = sfnt_test_data::collection(&[
            FontBuilder::new().add_raw(MATH, vec![0; 4]).clone(),
            FontBuilder::new().add_raw(Tag::new(b"post"), vec![0; 4]).clone(),
        ]);
        let Ok(FileRef::Collection(ttc)) = FileRef::new(&collection) else {
            panic!("Expected a collection");
        };
        assert_eq!(2, ttc.len());
        assert!(!ttc.is_empty());
        assert_eq!(ttc.header().num_fonts(), 2);

        let file = FileRef::new(&collection).unwrap();
        assert_eq!(file.kind(), FontKind::Collection);
        let offsets = file.font_offsets().collect::<Vec<_>>();
        assert_eq!(offsets.len(), 2);
        // header (12 bytes) plus two offsets
        assert_eq!(offsets[0], 20);
        for (offset, font) in file.fonts() {
            assert_eq!(font.unwrap().offset(), offset);
        }
        assert!(ttc.get(2).is_none());
        let second = ttc.get(1).unwrap().unwrap();
        assert!(second.locate_table(MATH).is_none());
        assert_eq!(ttc.iter().filter(Result::is_ok).count(), 2);
        // sanity check that a single font is not mistaken for a collection
        assert_eq!(FileRef::new(&one).unwrap().len(), 1);
    }

    #[test]
    fn too_short_to_classify() {
        assert!(matches!(
            FileRef::new(b"OTT"),
            Err(ReadError::UnknownContainer)
        ));
        assert!(matches!(FileRef::new(b""), Err(ReadError::UnknownContainer)));
    }

    #[test]
    fn truncated_collection_header() {
        let data = BeBuffer::new()
            .push(Tag::new(b"ttcf"))
            .push(1u16)
            .push(0u16)
            .push(3u32) // three fonts, but only one offset follows
            .push(20u32);
        assert!(matches!(
            FileRef::new(data.as_slice()),
            Err(ReadError::OutOfBounds)
        ));
    }

    #[test]
    fn malformed_font_in_collection_is_local() {
        let font = FontBuilder::new().add_raw(MATH, vec![0; 4]).clone();
        let mut data = sfnt_test_data::collection(&[font.clone(), font]);
        // point the second font past the end of the file
        data[16..20].copy_from_slice(&0xFFFF_u32.to_be_bytes());

        let file = FileRef::new(&data).unwrap();
        let fonts = file.fonts().collect::<Vec<_>>();
        assert_eq!(fonts.len(), 2);
        assert!(fonts[0].1.is_ok());
        assert_eq!(fonts[1].0, 0xFFFF);
        assert!(matches!(fonts[1].1, Err(ReadError::OutOfBounds)));
    }

    #[test]
    fn locate_table() {
        let data = two_table_font();
        let font = FontRef::new(&data).unwrap();
        let record = font.locate_table(MATH).unwrap();
        assert_eq!(record.length(), 6);
        assert_eq!(
            font.table_data(MATH).unwrap().unwrap().as_bytes(),
            &[5, 6, 7, 8, 9, 10]
        );
        assert!(font.locate_table(Tag::new(b"GSUB")).is_none());
        assert!(font.table_data(Tag::new(b"GSUB")).is_none());
        assert!(matches!(
            font.expect_data_for_tag(Tag::new(b"GSUB")),
            Err(ReadError::TableIsMissing(_))
        ));
    }

    #[test]
    fn math_from_table_provider() {
        let data = sfnt_test_data::math_font(None);
        let font = FontRef::new(&data).unwrap();
        let math = font.math().unwrap();
        assert_eq!(math.version(), types::MajorMinor::VERSION_1_0);
        // the table starts after the directory
        assert_eq!(math.position(), 12 + 16);

        let short_math = two_table_font();
        let font = FontRef::new(&short_math).unwrap();
        // 'MATH' here is six arbitrary bytes, too short for the header
        assert!(matches!(font.math(), Err(ReadError::OutOfBounds)));
    }

    #[test]
    fn duplicate_tags_first_wins() {
        let data = FontBuilder::new()
            .add_raw(MATH, vec![1, 1])
            .add_raw(MATH, vec![2, 2, 2])
            .build();
        let font = FontRef::new(&data).unwrap();
        assert_eq!(font.table_directory.num_tables(), 2);
        assert_eq!(font.table_data(MATH).unwrap().unwrap().as_bytes(), &[1, 1]);
    }

    #[test]
    fn table_record_past_end_of_file() {
        let data = BeBuffer::new()
            .push(TT_SFNT_VERSION)
            .push(1u16) // num tables
            .push(16u16) // search range
            .push(0u16) // entry selector
            .push(0u16) // range shift
            .push(MATH)
            .push(0u32) // checksum
            .push(0x1000u32) // offset
            .push(10u32); // length
        let font = FontRef::new(data.as_slice()).unwrap();
        assert!(font.locate_table(MATH).is_some());
        assert!(matches!(
            font.table_data(MATH),
            Some(Err(ReadError::OutOfBounds))
        ));
    }

    #[test]
    fn record_start_data_ignores_length() {
        let data = FontBuilder::new()
            .add_raw(Tag::new(b"head"), vec![1, 2, 3, 4])
            .add_raw(MATH, vec![5, 6, 7, 8, 9, 10])
            .build();
        let font = FontRef::new(&data).unwrap();
        let record = font.locate_table(MATH).unwrap();
        let start = record.offset().to_u32() as usize;

        let understated = TableRecord {
            length: 2u32.into(),
            ..record
        };
        let overstated = TableRecord {
            length: 0x1000u32.into(),
            ..record
        };
        for record in [record, understated, overstated] {
            let table = font.record_start_data(&record).unwrap();
            assert_eq!(table.position() as usize, start);
            assert_eq!(table.as_bytes(), &data[start..]);
        }
        assert!(font.record_data(&overstated).is_err());

        let past_end = TableRecord {
            offset: Offset32::new(data.len() as u32 + 1).into(),
            ..record
        };
        assert!(matches!(
            font.record_start_data(&past_end),
            Err(ReadError::OutOfBounds)
        ));
    }

    #[test]
    fn truncated_table_directory() {
        let data = BeBuffer::new()
            .push(TT_SFNT_VERSION)
            .push(4u16) // num tables, but no records follow
            .push(0u16)
            .push(0u16)
            .push(0u16);
        assert!(matches!(
            FontRef::new(data.as_slice()),
            Err(ReadError::OutOfBounds)
        ));
    }

    #[test]
    fn unknown_sfnt_version_is_not_fatal() {
        let _ = env_logger::builder().is_test(true).try_init();
        let data = BeBuffer::new()
            .push(0xDEADBEEFu32)
            .push(0u16)
            .push(0u16)
            .push(0u16)
            .push(0u16);
        let font = FontRef::new(data.as_slice()).unwrap();
        assert_eq!(font.table_directory.sfnt_version(), 0xDEADBEEF);
        assert!(font.locate_table(MATH).is_none());
    }
}
