//! Header sections: prologue, index table and data store.

use std::io::{Read, Seek};

use binrw::{BinRead, BinWrite};
use tracing::{debug, instrument};

use crate::cursor::ByteCursor;
use crate::error::{is_bad_magic, Error, MagicError, Result, Section};

/// Magic number every header section starts with
pub const HEADER_MAGIC: [u8; 3] = [0x8e, 0xad, 0xe8];

/// Size of the section prologue in bytes
pub const PROLOGUE_SIZE: usize = 16;

/// Size of a single index entry in bytes
pub const INDEX_ENTRY_SIZE: usize = 16;

/// Header section prologue
///
/// Starts with the magic `8E AD E8` followed by a version byte, which is always 1. All data
/// is stored in big endian format
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq)]
#[brw(big, magic = b"\x8e\xad\xe8")]
pub struct SectionPrologue {
    /// Version of the header structure
    pub version: u8,

    /// Unused
    pub reserved: [u8; 4],

    /// The number of index entries following the prologue
    pub index_count: i32,

    /// The size in bytes of the data store following the index entries
    pub store_size: i32,
}

impl Default for SectionPrologue {
    fn default() -> Self {
        Self {
            version: 1,
            reserved: [0; 4],
            index_count: 0,
            store_size: 0,
        }
    }
}

/// Header index entry
///
/// Names a tag and where its value lives in the data store.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct IndexEntry {
    /// The tag id
    pub tag: i32,

    /// The raw type id, see [`crate::value::ValueType`]
    pub kind: i32,

    /// Offset of the value from the start of the data store
    pub offset: i32,

    /// Number of elements in the value
    pub count: i32,
}

/// A raw header section
///
/// The index entries are read verbatim, their values are decoded by
/// [`crate::store::TagStore`] once the whole store is available.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderSection {
    /// The section prologue
    pub prologue: SectionPrologue,

    /// Index entries in the order they are stored
    pub entries: Vec<IndexEntry>,

    /// The data store the entries point into
    pub store: Vec<u8>,
}

impl HeaderSection {
    /// Locate the next header section in `cursor` and read it.
    #[instrument(skip(cursor), err)]
    pub fn locate<R: Read + Seek>(cursor: &mut ByteCursor<R>, section: Section) -> Result<Self> {
        if !cursor.find_magic(&HEADER_MAGIC)? {
            return Err(Error::SectionNotFound(section));
        }
        debug!(position = cursor.position(), "located {section} section");

        Self::read_from(cursor)
    }

    /// Read a header section starting at the current position of `reader`.
    #[instrument(skip(reader), err)]
    pub fn read_from<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let prologue = match SectionPrologue::read(reader) {
            Ok(prologue) => prologue,
            Err(e) if is_bad_magic(&e) => return Err(MagicError::Header.into()),
            Err(e) => return Err(e.into()),
        };

        let index_count = u32::try_from(prologue.index_count).map_err(|_| Error::TruncatedInput)?;
        let store_size = u64::try_from(prologue.store_size).map_err(|_| Error::TruncatedInput)?;
        debug!(index_count, store_size, "read section prologue");

        // Declared sizes are untrusted, so nothing is allocated up front
        let mut entries = Vec::new();
        for _ in 0..index_count {
            entries.push(IndexEntry::read(reader)?);
        }

        let mut store = Vec::new();
        reader.by_ref().take(store_size).read_to_end(&mut store)?;
        if store.len() as u64 != store_size {
            return Err(Error::TruncatedInput);
        }

        Ok(HeaderSection {
            prologue,
            entries,
            store,
        })
    }

    /// Size of the section in bytes, including prologue and index table
    pub fn size(&self) -> usize {
        PROLOGUE_SIZE + self.entries.len() * INDEX_ENTRY_SIZE + self.store.len()
    }
}
