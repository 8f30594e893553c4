//! Well known tag ids.
//!
//! Only the tags this crate promotes to named accessors are listed, every other tag is still
//! reachable through [`crate::store::TagStore::get`].

/// Tags of the main metadata section
pub mod header {
    /// Region trailer covering the signed part of the header
    pub const HEADER_IMMUTABLE: i32 = 63;
    /// Locales of the translated string tags
    pub const HEADER_I18NTABLE: i32 = 100;

    /// Package name
    pub const NAME: i32 = 1000;
    /// Upstream version
    pub const VERSION: i32 = 1001;
    /// Distribution release
    pub const RELEASE: i32 = 1002;
    /// Epoch, absent for most packages
    pub const EPOCH: i32 = 1003;
    /// One-line summary, translatable
    pub const SUMMARY: i32 = 1004;
    /// Long description, translatable
    pub const DESCRIPTION: i32 = 1005;
    /// Build time in seconds since the epoch
    pub const BUILDTIME: i32 = 1006;
    /// Host the package was built on
    pub const BUILDHOST: i32 = 1007;
    /// Installed size, 32 bit
    pub const SIZE: i32 = 1009;
    /// Distributing organization
    pub const VENDOR: i32 = 1011;
    /// License expression
    pub const LICENSE: i32 = 1014;
    /// Person or team that built the package
    pub const PACKAGER: i32 = 1015;
    /// Package group
    pub const GROUP: i32 = 1016;
    /// Upstream project page
    pub const URL: i32 = 1020;
    /// Target operating system
    pub const OS: i32 = 1021;
    /// Target architecture
    pub const ARCH: i32 = 1022;

    /// Full file paths, used before compressed file names
    pub const OLDFILENAMES: i32 = 1027;
    /// File sizes, 32 bit
    pub const FILESIZES: i32 = 1028;
    /// File modes
    pub const FILEMODES: i32 = 1030;
    /// File attributes
    pub const FILEFLAGS: i32 = 1037;

    /// Source package a binary package was built from
    pub const SOURCERPM: i32 = 1044;
    /// Uncompressed payload size
    pub const ARCHIVESIZE: i32 = 1046;

    /// Provided capability names
    pub const PROVIDENAME: i32 = 1047;
    /// Sense flags of the requirements
    pub const REQUIREFLAGS: i32 = 1048;
    /// Required capability names
    pub const REQUIRENAME: i32 = 1049;
    /// Versions of the requirements
    pub const REQUIREVERSION: i32 = 1050;
    /// Sense flags of the conflicts
    pub const CONFLICTFLAGS: i32 = 1053;
    /// Conflicting capability names
    pub const CONFLICTNAME: i32 = 1054;
    /// Versions of the conflicts
    pub const CONFLICTVERSION: i32 = 1055;

    /// Changelog entry times
    pub const CHANGELOGTIME: i32 = 1080;
    /// Changelog entry authors
    pub const CHANGELOGNAME: i32 = 1081;
    /// Changelog entry bodies
    pub const CHANGELOGTEXT: i32 = 1082;

    /// Obsoleted package names
    pub const OBSOLETENAME: i32 = 1090;
    /// Sense flags of the provides
    pub const PROVIDEFLAGS: i32 = 1112;
    /// Versions of the provides
    pub const PROVIDEVERSION: i32 = 1113;
    /// Sense flags of the obsoletes
    pub const OBSOLETEFLAGS: i32 = 1114;
    /// Versions of the obsoletes
    pub const OBSOLETEVERSION: i32 = 1115;

    /// Index into [`DIRNAMES`] for every base name
    pub const DIRINDEXES: i32 = 1116;
    /// File names without their directory
    pub const BASENAMES: i32 = 1117;
    /// Directory table, each ending in `/`
    pub const DIRNAMES: i32 = 1118;

    /// File sizes, 64 bit
    pub const LONGFILESIZES: i32 = 5008;
    /// Installed size, 64 bit
    pub const LONGSIZE: i32 = 5009;
}

/// Tags of the signature section
pub mod signature {
    /// Region trailer of the signature section
    pub const HEADER_SIGNATURES: i32 = 62;
    /// RSA signature of the main header
    pub const RSA: i32 = 268;
    /// Hex SHA-1 of the main header
    pub const SHA1: i32 = 269;
    /// Hex SHA-256 of the main header
    pub const SHA256: i32 = 273;

    /// Size of the main header and payload
    pub const SIZE: i32 = 1000;
    /// PGP signature of the main header and payload
    pub const PGP: i32 = 1002;
    /// MD5 of the main header and payload
    pub const MD5: i32 = 1004;
    /// GPG signature of the main header and payload
    pub const GPG: i32 = 1005;
    /// Uncompressed size of the payload
    pub const PAYLOADSIZE: i32 = 1007;
}
