//! Decoded header sections.

use indexmap::IndexMap;
use tracing::{debug, instrument, trace};

use crate::error::Result;
use crate::header::{HeaderSection, IndexEntry};
use crate::value::Value;

/// A decoded tag and its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    /// The tag id
    pub tag: i32,

    /// The decoded value
    pub value: Value,
}

/// The decoded entries of one header section
///
/// Entries are kept in index order. The format allows a tag to appear more than once, in
/// which case lookups return the first occurrence while iteration yields all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagStore {
    entries: Vec<TagEntry>,
    index: IndexMap<i32, usize>,
}

impl TagStore {
    /// Decode every entry of a header section
    #[instrument(
        skip_all,
        fields(entries = section.entries.len(), store = section.store.len()),
        err
    )]
    pub fn from_section(section: &HeaderSection) -> Result<Self> {
        Self::decode(&section.entries, &section.store)
    }

    /// Decode `entries` in order against `store`
    pub fn decode(entries: &[IndexEntry], store: &[u8]) -> Result<Self> {
        let mut decoded = Vec::with_capacity(entries.len());
        let mut index = IndexMap::with_capacity(entries.len());

        for entry in entries {
            let value = Value::decode(entry, store)?;

            let position = decoded.len();
            if *index.entry(entry.tag).or_insert(position) != position {
                trace!(tag = entry.tag, "duplicate tag, lookups keep the first value");
            }
            decoded.push(TagEntry {
                tag: entry.tag,
                value,
            });
        }

        debug!(entries = decoded.len(), tags = index.len(), "decoded tag store");
        Ok(TagStore {
            entries: decoded,
            index,
        })
    }

    /// Number of decoded entries, duplicates included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the section had no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `tag` is present
    pub fn contains(&self, tag: i32) -> bool {
        self.index.contains_key(&tag)
    }

    /// Get the first value stored for `tag`
    pub fn get(&self, tag: i32) -> Option<&Value> {
        self.index.get(&tag).map(|i| &self.entries[*i].value)
    }

    /// Get a string value, `None` when absent or not a string
    pub fn string(&self, tag: i32) -> Option<&str> {
        self.get(tag).and_then(Value::as_str)
    }

    /// Get a string array value
    pub fn string_array(&self, tag: i32) -> Option<&[String]> {
        self.get(tag).and_then(Value::as_string_array)
    }

    /// Get a binary value
    pub fn binary(&self, tag: i32) -> Option<&[u8]> {
        self.get(tag).and_then(Value::as_bytes)
    }

    /// Get an integer array value of any width
    pub fn integer_array(&self, tag: i32) -> Option<Vec<i64>> {
        self.get(tag).and_then(Value::as_integers)
    }

    /// Get the first element of an integer value of any width
    pub fn integer(&self, tag: i32) -> Option<i64> {
        self.integer_array(tag)
            .and_then(|values| values.first().copied())
    }

    /// Iterate over all entries in index order, duplicates included
    pub fn iter(&self) -> std::slice::Iter<'_, TagEntry> {
        self.entries.iter()
    }

    /// Iterate over the distinct tags in the order they first appear
    pub fn tags(&self) -> impl Iterator<Item = i32> + '_ {
        self.index.keys().copied()
    }
}

impl<'a> IntoIterator for &'a TagStore {
    type Item = &'a TagEntry;
    type IntoIter = std::slice::Iter<'a, TagEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
