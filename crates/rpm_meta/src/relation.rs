//! Relations rebuilt from the parallel arrays of the main header.
//!
//! The header never stores a list of records. A dependency list, for example, is three
//! arrays of equal length under separate tags: names, flags and versions. The functions in
//! this module zip those arrays back together by position and reject headers where the
//! arrays disagree in length.

use std::fmt;

use bitflags::bitflags;
use itertools::multizip;
#[cfg(feature = "serde")]
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::store::TagStore;
use crate::tags::header as tag;

bitflags! {
    /// Sense flags attached to a dependency
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize))]
    pub struct DependencyFlags: u32 {
        const LESS = 1 << 1;
        const GREATER = 1 << 2;
        const EQUAL = 1 << 3;
        const POSTTRANS = 1 << 5;
        const PREREQ = 1 << 6;
        const PRETRANS = 1 << 7;
        const INTERP = 1 << 8;
        const SCRIPT_PRE = 1 << 9;
        const SCRIPT_POST = 1 << 10;
        const SCRIPT_PREUN = 1 << 11;
        const SCRIPT_POSTUN = 1 << 12;
        const SCRIPT_VERIFY = 1 << 13;
        const RPMLIB = 1 << 24;
        const CONFIG = 1 << 28;

        const _ = !0;
    }
}

impl DependencyFlags {
    /// Bits marking a requirement that must be satisfied before installation
    pub const PRE: Self = Self::PREREQ
        .union(Self::SCRIPT_PRE)
        .union(Self::SCRIPT_POST);
}

bitflags! {
    /// Attributes of a file in the manifest
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize))]
    pub struct FileFlags: u32 {
        const CONFIG = 1 << 0;
        const DOC = 1 << 1;
        const ICON = 1 << 2;
        const MISSINGOK = 1 << 3;
        const NOREPLACE = 1 << 4;
        const SPECFILE = 1 << 5;
        const GHOST = 1 << 6;
        const LICENSE = 1 << 7;
        const README = 1 << 8;
        const PUBKEY = 1 << 11;
        const ARTIFACT = 1 << 12;

        const _ = !0;
    }
}

/// File type bits of a mode
pub const S_IFMT: u16 = 0o170000;
/// Directory
pub const S_IFDIR: u16 = 0o040000;
/// Character device
pub const S_IFCHR: u16 = 0o020000;
/// Block device
pub const S_IFBLK: u16 = 0o060000;

/// Version comparison of a dependency
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// `LT`, only the `LESS` bit
    Less,
    /// `LE`
    LessOrEqual,
    /// `EQ`
    Equal,
    /// `GE`
    GreaterOrEqual,
    /// `GT`, only the `GREATER` bit
    Greater,
}

impl Comparison {
    /// Decode the comparison from the `LESS`, `GREATER` and `EQUAL` bits
    pub fn from_flags(flags: DependencyFlags) -> Option<Self> {
        let sense = flags
            & (DependencyFlags::LESS | DependencyFlags::GREATER | DependencyFlags::EQUAL);

        match sense.bits() {
            2 => Some(Comparison::Less),
            4 => Some(Comparison::Greater),
            8 => Some(Comparison::Equal),
            10 => Some(Comparison::LessOrEqual),
            12 => Some(Comparison::GreaterOrEqual),
            _ => None,
        }
    }

    /// Short name used by repository metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Less => "LT",
            Comparison::LessOrEqual => "LE",
            Comparison::Equal => "EQ",
            Comparison::GreaterOrEqual => "GE",
            Comparison::Greater => "GT",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An `[epoch:]version[-release]` triple
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Version {
    /// Epoch, `"0"` when the packed string has none
    pub epoch: Option<String>,

    /// Upstream version
    pub version: Option<String>,

    /// Everything after the first `-`
    pub release: Option<String>,
}

impl Version {
    /// Split a packed version string.
    ///
    /// A version without an epoch, or with an empty one as in `:1.0`, reports epoch `0`.
    /// The empty string carries no version at all and yields `None` for every part.
    ///
    /// ```
    /// use rpm_meta::relation::Version;
    ///
    /// let version = Version::parse("2:1.0-3.el9");
    /// assert_eq!(version.epoch.as_deref(), Some("2"));
    /// assert_eq!(version.version.as_deref(), Some("1.0"));
    /// assert_eq!(version.release.as_deref(), Some("3.el9"));
    /// ```
    pub fn parse(packed: &str) -> Self {
        if packed.is_empty() {
            return Self::default();
        }

        let (epoch, rest) = match packed.split_once(':') {
            Some((epoch, rest)) if !epoch.is_empty() => (epoch, rest),
            Some((_, rest)) => ("0", rest),
            None => ("0", packed),
        };
        let (version, release) = match rest.split_once('-') {
            Some((version, release)) => (version, Some(release)),
            None => (rest, None),
        };

        Self {
            epoch: Some(epoch.to_string()),
            version: Some(version).filter(|v| !v.is_empty()).map(str::to_string),
            release: release.map(str::to_string),
        }
    }

    /// Whether no part is set
    pub fn is_empty(&self) -> bool {
        self.epoch.is_none() && self.version.is_none() && self.release.is_none()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(epoch) = &self.epoch {
            write!(f, "{epoch}:")?;
        }
        if let Some(version) = &self.version {
            f.write_str(version)?;
        }
        if let Some(release) = &self.release {
            write!(f, "-{release}")?;
        }
        Ok(())
    }
}

/// One provides, requires, conflicts or obsoletes record
///
/// Ordering compares name, then flags, then version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Dependency {
    /// Capability name, a package name, a path or something like `libc.so.6()(64bit)`
    pub name: String,

    /// Raw sense flags
    pub flags: DependencyFlags,

    /// Version the comparison applies to, empty for unversioned dependencies
    pub version: Version,
}

impl Dependency {
    /// The version comparison, `None` for unversioned dependencies
    pub fn comparison(&self) -> Option<Comparison> {
        Comparison::from_flags(self.flags)
    }

    /// The comparison as `LT`, `GT`, `EQ`, `LE` or `GE`, empty when unversioned
    pub fn str_flags(&self) -> &'static str {
        self.comparison().map(|c| c.as_str()).unwrap_or_default()
    }

    /// Whether the requirement must hold before the package's scripts run
    pub fn is_pre(&self) -> bool {
        self.flags.intersects(DependencyFlags::PRE)
    }

    /// Whether this is one of the `rpmlib(...)` feature dependencies
    pub fn is_rpmlib(&self) -> bool {
        self.name.starts_with("rpmlib(")
    }
}

/// The four dependency relations
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DependencyKind {
    /// Capabilities the package offers
    #[display("provides")]
    Provides,
    /// Capabilities the package needs
    #[display("requires")]
    Requires,
    /// Capabilities that cannot be installed alongside
    #[display("conflicts")]
    Conflicts,
    /// Packages this one replaces
    #[display("obsoletes")]
    Obsoletes,
}

impl DependencyKind {
    /// The name, flags and version tags of this relation
    pub fn tags(&self) -> (i32, i32, i32) {
        match self {
            DependencyKind::Provides => (
                tag::PROVIDENAME,
                tag::PROVIDEFLAGS,
                tag::PROVIDEVERSION,
            ),
            DependencyKind::Requires => (
                tag::REQUIRENAME,
                tag::REQUIREFLAGS,
                tag::REQUIREVERSION,
            ),
            DependencyKind::Conflicts => (
                tag::CONFLICTNAME,
                tag::CONFLICTFLAGS,
                tag::CONFLICTVERSION,
            ),
            DependencyKind::Obsoletes => (
                tag::OBSOLETENAME,
                tag::OBSOLETEFLAGS,
                tag::OBSOLETEVERSION,
            ),
        }
    }

    fn relation(&self) -> &'static str {
        match self {
            DependencyKind::Provides => "provides",
            DependencyKind::Requires => "requires",
            DependencyKind::Conflicts => "conflicts",
            DependencyKind::Obsoletes => "obsoletes",
        }
    }
}

/// How a manifest entry is listed in repository metadata
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum FileKind {
    /// Anything that is neither a ghost nor a directory
    #[display("file")]
    #[cfg_attr(feature = "serde", serde(rename = "file"))]
    Regular,
    /// A directory owned by the package
    #[display("dir")]
    #[cfg_attr(feature = "serde", serde(rename = "dir"))]
    Directory,
    /// Listed but not shipped in the payload
    #[display("ghost")]
    #[cfg_attr(feature = "serde", serde(rename = "ghost"))]
    Ghost,
}

/// One entry of the file manifest
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FileEntry {
    /// Path of the file, absolute for binary packages
    pub path: String,

    /// Size in bytes
    pub size: u64,

    /// Raw mode, type and permission bits
    pub mode: u16,

    /// Attributes recorded by the build
    pub flags: FileFlags,

    /// Listing kind
    pub kind: FileKind,

    /// Whether the file is listed in the primary metadata
    pub primary: bool,
}

impl FileEntry {
    fn new(path: String, size: u64, mode: u16, flags: FileFlags) -> Self {
        let kind = if flags.contains(FileFlags::GHOST) {
            FileKind::Ghost
        } else if mode & S_IFMT == S_IFDIR {
            FileKind::Directory
        } else {
            FileKind::Regular
        };

        let device = matches!(mode & S_IFMT, S_IFCHR | S_IFBLK);
        let primary = is_primary_path(&path)
            && !flags.intersects(FileFlags::CONFIG | FileFlags::DOC)
            && !device;

        Self {
            path,
            size,
            mode,
            flags,
            kind,
            primary,
        }
    }

    /// Whether the file is marked as configuration
    pub fn is_config(&self) -> bool {
        self.flags.contains(FileFlags::CONFIG)
    }

    /// Whether the file is marked as documentation
    pub fn is_doc(&self) -> bool {
        self.flags.contains(FileFlags::DOC)
    }
}

fn is_primary_path(path: &str) -> bool {
    path.starts_with("/etc/") || path.contains("/bin/") || path == "/usr/lib/sendmail"
}

/// One changelog record
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ChangelogEntry {
    /// Author line, usually `name <email> - version`
    pub name: String,

    /// Seconds since the epoch
    pub time: i64,

    /// Body text
    pub text: String,
}

/// Every relation of a package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relations {
    /// Provided capabilities in stored order
    pub provides: Vec<Dependency>,
    /// Required capabilities in stored order
    pub requires: Vec<Dependency>,
    /// Conflicting capabilities in stored order
    pub conflicts: Vec<Dependency>,
    /// Obsoleted packages in stored order
    pub obsoletes: Vec<Dependency>,
    /// File manifest
    pub files: Vec<FileEntry>,
    /// Changelog, most recent entry first
    pub changelog: Vec<ChangelogEntry>,
}

impl Relations {
    /// Rebuild all relations from the main header
    #[instrument(skip_all, err)]
    pub fn reconstruct(store: &TagStore) -> Result<Self> {
        Ok(Self {
            provides: dependencies(store, DependencyKind::Provides)?,
            requires: dependencies(store, DependencyKind::Requires)?,
            conflicts: dependencies(store, DependencyKind::Conflicts)?,
            obsoletes: dependencies(store, DependencyKind::Obsoletes)?,
            files: files(store)?,
            changelog: changelog(store)?,
        })
    }
}

fn check_len(relation: &'static str, tag: i32, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(Error::InconsistentArrayLength {
            relation,
            tag,
            expected,
            found,
        });
    }
    Ok(())
}

/// An array that must be present with exactly `len` elements
fn required_integers(
    store: &TagStore,
    relation: &'static str,
    tag: i32,
    len: usize,
) -> Result<Vec<i64>> {
    let values = store.integer_array(tag).unwrap_or_default();
    check_len(relation, tag, len, values.len())?;
    Ok(values)
}

fn required_strings<'a>(
    store: &'a TagStore,
    relation: &'static str,
    tag: i32,
    len: usize,
) -> Result<&'a [String]> {
    let values = store.string_array(tag).unwrap_or_default();
    check_len(relation, tag, len, values.len())?;
    Ok(values)
}

/// Rebuild one dependency relation.
///
/// Without a name array the relation is empty. Old packages omit the flags and version
/// arrays of unversioned provides, those are read as zero flags and empty versions.
#[instrument(skip(store), err)]
pub fn dependencies(store: &TagStore, kind: DependencyKind) -> Result<Vec<Dependency>> {
    let (names_tag, flags_tag, versions_tag) = kind.tags();
    let relation = kind.relation();

    let Some(names) = store.string_array(names_tag) else {
        return Ok(Vec::new());
    };

    let flags = match store.integer_array(flags_tag) {
        Some(flags) => {
            check_len(relation, flags_tag, names.len(), flags.len())?;
            flags
        }
        None => vec![0; names.len()],
    };
    let empty = vec![String::new(); names.len()];
    let versions = match store.string_array(versions_tag) {
        Some(versions) => {
            check_len(relation, versions_tag, names.len(), versions.len())?;
            versions
        }
        None => &empty[..],
    };

    let dependencies = multizip((names, flags, versions))
        .map(|(name, flags, version)| Dependency {
            name: name.clone(),
            flags: DependencyFlags::from_bits_retain(flags as u32),
            version: Version::parse(version),
        })
        .collect::<Vec<_>>();

    debug!(count = dependencies.len(), "rebuilt {kind}");
    Ok(dependencies)
}

/// Rebuild the file manifest.
///
/// Paths come from the base name and directory tables, or from the full path list of
/// packages built without compressed file names.
#[instrument(skip(store), err)]
pub fn files(store: &TagStore) -> Result<Vec<FileEntry>> {
    const RELATION: &str = "files";

    let paths = match store.string_array(tag::BASENAMES) {
        Some(basenames) => {
            let dirnames = store.string_array(tag::DIRNAMES).unwrap_or_default();
            let indexes =
                required_integers(store, RELATION, tag::DIRINDEXES, basenames.len())?;

            multizip((basenames, indexes))
                .map(|(basename, index)| -> Result<String> {
                    let index = index as u32;
                    let dirname = dirnames
                        .get(index as usize)
                        .ok_or(Error::DirectoryIndexOutOfRange {
                            index,
                            len: dirnames.len(),
                        })?;
                    Ok(format!("{dirname}{basename}"))
                })
                .collect::<Result<Vec<_>>>()?
        }
        None => store
            .string_array(tag::OLDFILENAMES)
            .map(<[String]>::to_vec)
            .unwrap_or_default(),
    };
    let len = paths.len();

    // Sizes are unsigned on disk, the 32 bit array is only read without the 64 bit one
    let sizes = match store.integer_array(tag::LONGFILESIZES) {
        Some(sizes) => {
            check_len(RELATION, tag::LONGFILESIZES, len, sizes.len())?;
            sizes.into_iter().map(|size| size as u64).collect::<Vec<_>>()
        }
        None => required_integers(store, RELATION, tag::FILESIZES, len)?
            .into_iter()
            .map(|size| size as u32 as u64)
            .collect(),
    };
    let modes = required_integers(store, RELATION, tag::FILEMODES, len)?;
    let flags = required_integers(store, RELATION, tag::FILEFLAGS, len)?;

    let files = multizip((paths, sizes, modes, flags))
        .map(|(path, size, mode, flags)| {
            FileEntry::new(
                path,
                size,
                mode as u16,
                FileFlags::from_bits_retain(flags as u32),
            )
        })
        .collect::<Vec<_>>();

    debug!(count = files.len(), "rebuilt files");
    Ok(files)
}

/// Rebuild the changelog, most recent entry first as stored
#[instrument(skip(store), err)]
pub fn changelog(store: &TagStore) -> Result<Vec<ChangelogEntry>> {
    const RELATION: &str = "changelog";

    let names = store.string_array(tag::CHANGELOGNAME).unwrap_or_default();
    let times = required_integers(store, RELATION, tag::CHANGELOGTIME, names.len())?;
    let texts = required_strings(store, RELATION, tag::CHANGELOGTEXT, names.len())?;

    let changelog = multizip((names, times, texts))
        .map(|(name, time, text)| ChangelogEntry {
            name: name.clone(),
            time,
            text: text.clone(),
        })
        .collect::<Vec<_>>();

    debug!(count = changelog.len(), "rebuilt changelog");
    Ok(changelog)
}
