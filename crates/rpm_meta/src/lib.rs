//! This library reads the metadata of **RPM** packages, the binary container used by Fedora, RHEL,
//! openSUSE and other Linux distributions, for tools that generate repository indexes.
//!
//! # RPM Package Format Documentation
//!
//! A package is a lead, two header sections and a compressed payload. Only the lead and the
//! header sections are decoded by this crate, the payload is read solely to complete the package
//! checksum.
//!
//! ## File Structure
//!
//! | Part             | Size               | Description                                              |
//! |------------------|--------------------|----------------------------------------------------------|
//! | Lead             | 96 bytes           | Magic, format version and package type                   |
//! | Signature        | variable           | Header section with digests of the rest of the file      |
//! | Padding          | 0-7 bytes          | Aligns the main header to 8 bytes                        |
//! | Header           | variable           | Header section with all package metadata                 |
//! | Payload          | remainder          | Compressed archive of the package files                  |
//!
//! All multi-byte integers are big-endian.
//!
//! ### Lead
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: `ED AB EE DB`                                     |
//! | 0x0004         | Major version          | 1 byte: usually 3                                          |
//! | 0x0005         | Minor version          | 1 byte: usually 0                                          |
//! | 0x0006         | Type                   | 2 bytes: `0` for binary, `1` for source packages           |
//! | 0x0008         | Architecture           | 2 bytes: legacy architecture number                        |
//! | 0x000A         | Name                   | 66 bytes: zero padded `name-version-release`               |
//! | 0x004C         | OS                     | 2 bytes: legacy operating system number                    |
//! | 0x004E         | Signature type         | 2 bytes: `5` for header-style signatures                   |
//! | 0x0050         | Reserved               | 16 bytes                                                   |
//!
//! ### Header Section
//!
//! Both the signature and the main header share one layout: a prologue, a table of index entries
//! and a data store the entries point into.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 3 bytes: `8E AD E8`                                        |
//! | 0x0003         | Version                | 1 byte: always 1                                           |
//! | 0x0004         | Reserved               | 4 bytes                                                    |
//! | 0x0008         | Index count            | 4 bytes: number of index entries                           |
//! | 0x000C         | Store size             | 4 bytes: size of the data store in bytes                   |
//!
//! Each index entry is 16 bytes:
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Tag                    | 4 bytes: what the value means, see [`tags`]                |
//! | 0x0004         | Type                   | 4 bytes: how the value is encoded                          |
//! | 0x0008         | Offset                 | 4 bytes: offset of the value in the data store             |
//! | 0x000C         | Count                  | 4 bytes: number of elements in the value                   |
//!
//! - **Type**: one of
//!   - `1`: char, `count` bytes
//!   - `2`: int8, `count` bytes
//!   - `3`: int16, `count` values aligned to 2 bytes
//!   - `4`: int32, `count` values aligned to 4 bytes
//!   - `5`: int64, `count` values aligned to 8 bytes
//!   - `6`: string, a single zero terminated string
//!   - `7`: binary, `count` raw bytes
//!   - `8`: string array, `count` zero terminated strings
//!   - `9`: i18n string, stored like a string
//!
//! ### Relations
//!
//! Lists of records are stored as parallel arrays under separate tags. Dependencies, for example,
//! are a name array, a flags array and a version array of equal length. The file manifest splits
//! each path into a base name and an index into a table of directory names. See [`relation`].
//!
//! ## Additional Information
//!
//! - **File Extension**: `.rpm`, `.src.rpm` for source packages
//! - **Endianness**: Big-endian for all multi-byte integers
//! - **Strings**: UTF-8, older packages may carry Latin-1 which is decoded lossily
//!

pub mod cursor;
pub mod error;
pub mod header;
pub mod lead;
pub mod package;
pub mod relation;
pub mod store;
pub mod tags;
pub mod value;
pub mod write;

pub use package::RpmPackage;
pub use store::TagStore;
pub use write::{HeaderBuilder, PackageWriter};
