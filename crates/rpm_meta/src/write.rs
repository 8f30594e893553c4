//! Types for encoding header sections and assembling packages
//!
//! These are the inverse of the readers and exist to produce packages for tests and
//! benchmarks. The payload is written as opaque bytes, nothing is compressed or signed
//! beyond the MD5 and size digests of the signature section.

use std::io::{self, Cursor, Seek, Write};

use binrw::BinWrite;
use bon::Builder;
use byteorder::{BigEndian, WriteBytesExt};
use md5::{Digest, Md5};
use tracing::{instrument, trace};

use crate::error::{Error, Result};
use crate::header::{HeaderSection, IndexEntry, SectionPrologue};
use crate::lead::Lead;
use crate::tags;
use crate::value::Value;

/// Header section generator
///
/// ```
/// # fn doit() -> rpm_meta::error::Result<()>
/// # {
/// use rpm_meta::store::TagStore;
/// use rpm_meta::value::Value;
/// use rpm_meta::write::HeaderBuilder;
///
/// let section = HeaderBuilder::new()
///     .add(1000, Value::String("hello".into()))
///     .add(1028, Value::Int32(vec![12, 40]))
///     .to_section()?;
///
/// let store = TagStore::from_section(&section)?;
/// assert_eq!(store.string(1000), Some("hello"));
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderBuilder {
    entries: Vec<(i32, Value)>,
}

impl HeaderBuilder {
    /// Start an empty header
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tag, entries are written in the order they are added
    pub fn add(mut self, tag: i32, value: Value) -> Self {
        self.push(tag, value);
        self
    }

    /// Append a tag in place
    pub fn push(&mut self, tag: i32, value: Value) {
        self.entries.push((tag, value));
    }

    /// Number of entries added so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries have been added
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lay out the index table and data store.
    ///
    /// Integer values are aligned to their width inside the store. Strings must not contain
    /// zero bytes, they would be cut short when read back.
    #[instrument(skip(self), fields(entries = self.entries.len()), err)]
    pub fn to_section(&self) -> Result<HeaderSection> {
        let mut store = Vec::new();
        let mut entries = Vec::with_capacity(self.entries.len());

        for (tag, value) in &self.entries {
            let alignment = value.value_type().alignment();
            let padding = (alignment - store.len() % alignment) % alignment;
            store.resize(store.len() + padding, 0);

            let entry = IndexEntry {
                tag: *tag,
                kind: value.value_type() as i32,
                offset: to_i32(store.len())?,
                count: to_i32(value.count())?,
            };
            encode_value(&mut store, value)?;

            trace!(?entry, "encoded entry");
            entries.push(entry);
        }

        Ok(HeaderSection {
            prologue: SectionPrologue {
                index_count: to_i32(entries.len())?,
                store_size: to_i32(store.len())?,
                ..Default::default()
            },
            entries,
            store,
        })
    }

    /// Encode the complete section, prologue included
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let section = self.to_section()?;

        let mut out = Cursor::new(Vec::with_capacity(section.size()));
        section.prologue.write(&mut out)?;
        for entry in &section.entries {
            entry.write(&mut out)?;
        }
        out.write_all(&section.store)?;

        Ok(out.into_inner())
    }
}

fn to_i32(value: usize) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::SectionTooLarge(value))
}

fn encode_value(store: &mut Vec<u8>, value: &Value) -> io::Result<()> {
    match value {
        Value::Char(v) | Value::Binary(v) => store.write_all(v)?,
        Value::Int8(v) => v.iter().try_for_each(|i| store.write_i8(*i))?,
        Value::Int16(v) => v.iter().try_for_each(|i| store.write_i16::<BigEndian>(*i))?,
        Value::Int32(v) => v.iter().try_for_each(|i| store.write_i32::<BigEndian>(*i))?,
        Value::Int64(v) => v.iter().try_for_each(|i| store.write_i64::<BigEndian>(*i))?,
        Value::String(s) | Value::I18nString(s) => {
            store.write_all(s.as_bytes())?;
            store.write_u8(0)?;
        }
        Value::StringArray(strings) => {
            for s in strings {
                store.write_all(s.as_bytes())?;
                store.write_u8(0)?;
            }
        }
    }
    Ok(())
}

/// Package generator
///
/// Writes the lead, a signature section carrying the size and MD5 of everything after it,
/// the main header and the payload bytes verbatim.
///
/// ```
/// # fn doit() -> rpm_meta::error::Result<()>
/// # {
/// use rpm_meta::lead::{Lead, PackageType};
/// use rpm_meta::value::Value;
/// use rpm_meta::write::{HeaderBuilder, PackageWriter};
/// use rpm_meta::RpmPackage;
///
/// let data = PackageWriter::builder()
///     .lead(Lead::builder().package_type(PackageType::Binary).name("hello-1.0-1").build())
///     .header(HeaderBuilder::new().add(1000, Value::String("hello".into())))
///     .build()
///     .to_bytes()?;
///
/// let package = RpmPackage::from_bytes(&data)?;
/// assert_eq!(package.name(), Some("hello"));
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Clone, Builder)]
pub struct PackageWriter {
    /// The lead to start the package with
    lead: Lead,

    /// The main metadata header
    header: HeaderBuilder,

    /// Opaque bytes following the main header
    #[builder(default)]
    payload: Vec<u8>,

    /// Extra tags for the signature section, written after the size and MD5
    #[builder(default)]
    signature: HeaderBuilder,
}

impl PackageWriter {
    /// Write the package to `writer`
    #[instrument(skip_all, err)]
    pub fn write<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        let header = self.header.to_bytes()?;

        let mut digest = Md5::new();
        digest.update(&header);
        digest.update(&self.payload);

        let mut signature = HeaderBuilder::new()
            .add(
                tags::signature::SIZE,
                Value::Int32(vec![to_i32(header.len() + self.payload.len())?]),
            )
            .add(tags::signature::MD5, Value::Binary(digest.finalize().to_vec()));
        signature.entries.extend(self.signature.entries.iter().cloned());
        let signature = signature.to_bytes()?;

        self.lead.write(writer)?;
        writer.write_all(&signature)?;
        // The main header starts on an 8 byte boundary
        let padding = (8 - signature.len() % 8) % 8;
        writer.write_all(&[0u8; 8][..padding])?;
        writer.write_all(&header)?;
        writer.write_all(&self.payload)?;

        Ok(())
    }

    /// Write the package into a new buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        self.write(&mut out)?;
        Ok(out.into_inner())
    }
}
