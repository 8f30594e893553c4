//! Typed values referenced by index entries.

use std::io;

use byteorder::{BigEndian, ReadBytesExt};
#[cfg(feature = "serde")]
use serde::Serialize;
use tracing::{instrument, trace};

use crate::error::{Error, Result};
use crate::header::IndexEntry;

/// Type id of an index entry
///
/// Type `0` (null) is part of the format but never carries data, so it is rejected along
/// with every other id outside of this set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Single byte characters
    Char = 1,
    /// Signed 8 bit integers
    Int8 = 2,
    /// Big endian 16 bit integers
    Int16 = 3,
    /// Big endian 32 bit integers
    Int32 = 4,
    /// Big endian 64 bit integers
    Int64 = 5,
    /// A single zero terminated string
    String = 6,
    /// Raw bytes
    Binary = 7,
    /// Consecutive zero terminated strings
    StringArray = 8,
    /// A translatable string, stored like [`ValueType::String`]
    I18nString = 9,
}

impl ValueType {
    /// Alignment the format requires for values of this type inside the store
    pub fn alignment(&self) -> usize {
        match self {
            ValueType::Int16 => 2,
            ValueType::Int32 => 4,
            ValueType::Int64 => 8,
            _ => 1,
        }
    }
}

impl TryFrom<i32> for ValueType {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        Ok(match value {
            1 => ValueType::Char,
            2 => ValueType::Int8,
            3 => ValueType::Int16,
            4 => ValueType::Int32,
            5 => ValueType::Int64,
            6 => ValueType::String,
            7 => ValueType::Binary,
            8 => ValueType::StringArray,
            9 => ValueType::I18nString,
            other => return Err(Error::UnknownTypeTag(other)),
        })
    }
}

/// A decoded header value
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// Single byte characters
    Char(Vec<u8>),
    /// Signed bytes
    Int8(Vec<i8>),
    /// 16 bit integers
    Int16(Vec<i16>),
    /// 32 bit integers
    Int32(Vec<i32>),
    /// 64 bit integers
    Int64(Vec<i64>),
    /// A string
    String(String),
    /// Raw bytes
    Binary(Vec<u8>),
    /// A list of strings
    StringArray(Vec<String>),
    /// A translatable string
    I18nString(String),
}

impl Value {
    /// Decode the value an index entry points at inside a store.
    ///
    /// Strings determine their own length by scanning for the terminator, the entry's count
    /// is only consulted for arrays. Reads never leave `store`.
    #[instrument(level = "trace", skip(store), err)]
    pub fn decode(entry: &IndexEntry, store: &[u8]) -> Result<Value> {
        let value_type = ValueType::try_from(entry.kind)?;
        let offset = usize::try_from(entry.offset).map_err(|_| Error::TruncatedInput)?;
        let count = usize::try_from(entry.count).map_err(|_| Error::TruncatedInput)?;

        let mut input = store.get(offset..).ok_or(Error::TruncatedInput)?;
        let input = &mut input;

        let value = match value_type {
            ValueType::Char => Value::Char(read_array(input, count, 1, |r| r.read_u8())?),
            ValueType::Int8 => Value::Int8(read_array(input, count, 1, |r| r.read_i8())?),
            ValueType::Int16 => Value::Int16(read_array(input, count, 2, |r| {
                r.read_i16::<BigEndian>()
            })?),
            ValueType::Int32 => Value::Int32(read_array(input, count, 4, |r| {
                r.read_i32::<BigEndian>()
            })?),
            ValueType::Int64 => Value::Int64(read_array(input, count, 8, |r| {
                r.read_i64::<BigEndian>()
            })?),
            ValueType::String => Value::String(read_string(input)?),
            ValueType::I18nString => Value::I18nString(read_string(input)?),
            ValueType::Binary => Value::Binary(read_array(input, count, 1, |r| r.read_u8())?),
            ValueType::StringArray => {
                let mut strings = Vec::new();
                for _ in 0..count {
                    strings.push(read_string(input)?);
                }
                Value::StringArray(strings)
            }
        };

        trace!(tag = entry.tag, ?value_type, "decoded entry");
        Ok(value)
    }

    /// The type id this value is stored as
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Char(_) => ValueType::Char,
            Value::Int8(_) => ValueType::Int8,
            Value::Int16(_) => ValueType::Int16,
            Value::Int32(_) => ValueType::Int32,
            Value::Int64(_) => ValueType::Int64,
            Value::String(_) => ValueType::String,
            Value::Binary(_) => ValueType::Binary,
            Value::StringArray(_) => ValueType::StringArray,
            Value::I18nString(_) => ValueType::I18nString,
        }
    }

    /// Number of elements, as written to the count field of an index entry
    pub fn count(&self) -> usize {
        match self {
            Value::Char(v) | Value::Binary(v) => v.len(),
            Value::Int8(v) => v.len(),
            Value::Int16(v) => v.len(),
            Value::Int32(v) => v.len(),
            Value::Int64(v) => v.len(),
            Value::String(_) | Value::I18nString(_) => 1,
            Value::StringArray(v) => v.len(),
        }
    }

    /// The value as a string, for string and translatable string values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::I18nString(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a list of strings
    pub fn as_string_array(&self) -> Option<&[String]> {
        match self {
            Value::StringArray(v) => Some(v),
            _ => None,
        }
    }

    /// The raw bytes of a binary value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(v) => Some(v),
            _ => None,
        }
    }

    /// Integer values widened to `i64`, sign extended
    pub fn as_integers(&self) -> Option<Vec<i64>> {
        match self {
            Value::Int8(v) => Some(v.iter().map(|i| *i as i64).collect()),
            Value::Int16(v) => Some(v.iter().map(|i| *i as i64).collect()),
            Value::Int32(v) => Some(v.iter().map(|i| *i as i64).collect()),
            Value::Int64(v) => Some(v.clone()),
            _ => None,
        }
    }
}

fn read_array<'a, T>(
    input: &mut &'a [u8],
    count: usize,
    width: usize,
    read: impl Fn(&mut &'a [u8]) -> io::Result<T>,
) -> Result<Vec<T>> {
    let size = count.checked_mul(width).ok_or(Error::TruncatedInput)?;
    if size > input.len() {
        return Err(Error::TruncatedInput);
    }

    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        values.push(read(input)?);
    }
    Ok(values)
}

fn read_string(input: &mut &[u8]) -> Result<String> {
    let len = input
        .iter()
        .position(|b| *b == 0)
        .ok_or(Error::TruncatedInput)?;

    let value = String::from_utf8_lossy(&input[..len]).into_owned();
    *input = &input[len + 1..];
    Ok(value)
}
