//! Error types that can be emitted from this library

use std::io::ErrorKind;

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(binrw::Error),

    /// a structure boundary did not start with the expected magic number
    #[error("invalid magic number")]
    InvalidMagic(#[from] MagicError),

    /// the lead declares a package type other than binary or source
    #[error("invalid package type {0}, expected 0 (binary) or 1 (source)")]
    InvalidPackageType(i16),

    /// the stream ended before a header section was found
    #[error("{0} section not found")]
    SectionNotFound(Section),

    /// a declared size exceeds the bytes that are available
    #[error("input is truncated")]
    #[diagnostic(help("the file may be incomplete or is not an rpm package"))]
    TruncatedInput,

    /// an index entry declares a type id outside the known set
    #[error("unknown type tag {0}")]
    UnknownTypeTag(i32),

    /// parallel arrays feeding a relation disagree in length
    #[error("{relation}: tag {tag} has {found} elements, expected {expected}")]
    InconsistentArrayLength {
        /// The relation being rebuilt
        relation: &'static str,
        /// The tag whose array had the wrong length
        tag: i32,
        /// The length of the leading array
        expected: usize,
        /// The length of the offending array
        found: usize,
    },

    /// a file references a directory that is not in the directory table
    #[error("directory index {index} is out of range for {len} directories")]
    DirectoryIndexOutOfRange {
        /// The offending directory index
        index: u32,
        /// The number of entries in the directory table
        len: usize,
    },

    /// a written header section does not fit the format's signed 32 bit sizes
    #[error("{0} exceeds the signed 32 bit limit of a header section")]
    SectionTooLarge(usize),
}

/// Error type to provide further information when a magic number does not match
#[derive(Error, Diagnostic, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagicError {
    /// in the lead, the file is not an rpm package
    #[error("in the lead, this is not an rpm package")]
    Lead,

    /// in a header section prologue
    #[error("in a header section prologue")]
    Header,
}

/// The two header sections of a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Section {
    /// The signature section following the lead
    #[display("signature")]
    Signature,

    /// The main metadata section
    #[display("header")]
    Header,
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        match value.kind() {
            ErrorKind::UnexpectedEof => Error::TruncatedInput,
            _ => Error::IOError(value),
        }
    }
}

impl From<binrw::Error> for Error {
    fn from(value: binrw::Error) -> Self {
        // Fields validated with `try_map` come back wrapped in a binrw custom error
        if let Some(Error::InvalidPackageType(package_type)) = value.custom_err::<Error>() {
            return Error::InvalidPackageType(*package_type);
        }

        match value {
            binrw::Error::Io(e) => Error::from(e),
            e if e.is_eof() => Error::TruncatedInput,
            e => Error::BinRWError(e),
        }
    }
}

/// Whether a binrw error was caused by a magic number mismatch
pub(crate) fn is_bad_magic(err: &binrw::Error) -> bool {
    match err {
        binrw::Error::BadMagic { .. } => true,
        binrw::Error::Backtrace(backtrace) => is_bad_magic(&backtrace.error),
        _ => false,
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
