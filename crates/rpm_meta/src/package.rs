//! The package model handed to repository metadata generators

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use tracing::{debug, instrument};

use crate::cursor::{ByteCursor, StreamDigest};
use crate::error::{Error, Result, Section};
use crate::header::{HeaderSection, HEADER_MAGIC};
use crate::lead::{Lead, PackageType};
use crate::relation::{ChangelogEntry, Dependency, FileEntry, Relations};
use crate::store::TagStore;
use crate::tags;
use crate::value::Value;

/// Metadata of a single package
///
/// Built in one forward pass over the package: the lead, the signature section, the main
/// header and finally the payload, which is only read to complete the checksum. Every
/// relation is rebuilt up front so the model is read-only afterwards.
///
/// ```no_run
/// fn describe(path: &str) -> rpm_meta::error::Result<()> {
///     let package = rpm_meta::RpmPackage::open(path)?;
///
///     println!("{} ({})", package.canonical_filename(), package.checksum());
///     for dependency in package.requires() {
///         let (name, flags) = (&dependency.name, dependency.str_flags());
///         println!("  requires {name} {flags} {}", dependency.version);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RpmPackage {
    lead: Lead,
    signature: TagStore,
    header: TagStore,
    relations: Relations,
    digest: StreamDigest,
}

impl RpmPackage {
    /// Read a package from the current position of `reader` to its end
    #[instrument(skip(reader), err)]
    pub fn new<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut cursor = ByteCursor::new(reader)?;

        let lead = Lead::parse(&mut cursor)?;
        let signature = HeaderSection::locate(&mut cursor, Section::Signature)?;
        let signature = TagStore::from_section(&signature)?;

        // The signature MD5 covers everything from the main header onward
        if !cursor.find_magic(&HEADER_MAGIC)? {
            return Err(Error::SectionNotFound(Section::Header));
        }
        cursor.start_digest();
        let header = HeaderSection::read_from(&mut cursor)?;
        let header = TagStore::from_section(&header)?;

        let relations = Relations::reconstruct(&header)?;
        let digest = cursor.finish()?;

        debug!(
            name = header.string(tags::header::NAME),
            files = relations.files.len(),
            size = digest.length,
            "read package"
        );
        Ok(Self {
            lead,
            signature,
            header,
            relations,
            digest,
        })
    }

    /// Read the package at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }

    /// Read a package held in memory
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::new(Cursor::new(data))
    }

    /// The lead of the package
    pub fn lead(&self) -> &Lead {
        &self.lead
    }

    /// All tags of the signature section
    pub fn signature(&self) -> &TagStore {
        &self.signature
    }

    /// All tags of the main header
    pub fn header(&self) -> &TagStore {
        &self.header
    }

    /// Look up a tag of the main header
    pub fn tag(&self, tag: i32) -> Option<&Value> {
        self.header.get(tag)
    }

    /// Look up a tag of the signature section
    pub fn signature_tag(&self, tag: i32) -> Option<&Value> {
        self.signature.get(tag)
    }

    /// Whether this is a binary package
    pub fn is_binary(&self) -> bool {
        self.lead.package_type() == PackageType::Binary
    }

    /// Whether this is a source package
    pub fn is_source(&self) -> bool {
        self.lead.package_type() == PackageType::Source
    }

    /// Package name
    pub fn name(&self) -> Option<&str> {
        self.header.string(tags::header::NAME)
    }

    /// The epoch, `0` when the package does not declare one
    pub fn epoch(&self) -> i64 {
        self.header.integer(tags::header::EPOCH).unwrap_or(0)
    }

    /// Upstream version
    pub fn version(&self) -> Option<&str> {
        self.header.string(tags::header::VERSION)
    }

    /// Distribution release of this build
    pub fn release(&self) -> Option<&str> {
        self.header.string(tags::header::RELEASE)
    }

    /// Target architecture, `noarch` for architecture independent packages
    pub fn arch(&self) -> Option<&str> {
        self.header.string(tags::header::ARCH)
    }

    /// License expression
    pub fn license(&self) -> Option<&str> {
        self.header.string(tags::header::LICENSE)
    }

    /// Organization that distributes the package
    pub fn vendor(&self) -> Option<&str> {
        self.header.string(tags::header::VENDOR)
    }

    /// Package group, mostly `Unspecified` in current distributions
    pub fn group(&self) -> Option<&str> {
        self.header.string(tags::header::GROUP)
    }

    /// One-line summary
    pub fn summary(&self) -> Option<&str> {
        self.header.string(tags::header::SUMMARY)
    }

    /// Long description
    pub fn description(&self) -> Option<&str> {
        self.header.string(tags::header::DESCRIPTION)
    }

    /// Person or team that built the package
    pub fn packager(&self) -> Option<&str> {
        self.header.string(tags::header::PACKAGER)
    }

    /// Upstream project page
    pub fn url(&self) -> Option<&str> {
        self.header.string(tags::header::URL)
    }

    /// Build time in seconds since the epoch
    pub fn build_time(&self) -> Option<i64> {
        self.header.integer(tags::header::BUILDTIME)
    }

    /// Host the package was built on
    pub fn build_host(&self) -> Option<&str> {
        self.header.string(tags::header::BUILDHOST)
    }

    /// File name of the source package this package was built from, absent for source
    /// packages
    pub fn source_rpm(&self) -> Option<&str> {
        self.header.string(tags::header::SOURCERPM)
    }

    /// Uncompressed size of the payload archive
    pub fn archive_size(&self) -> Option<u64> {
        self.header
            .integer(tags::header::ARCHIVESIZE)
            .or_else(|| self.signature.integer(tags::signature::PAYLOADSIZE))
            .map(|size| size as u32 as u64)
    }

    /// Installed size as recorded by the build
    pub fn size(&self) -> Option<u64> {
        match self.header.integer(tags::header::LONGSIZE) {
            Some(size) => Some(size as u64),
            None => self
                .header
                .integer(tags::header::SIZE)
                .map(|size| size as u32 as u64),
        }
    }

    /// Sum of the sizes of every file in the manifest, saturating at [`u64::MAX`]
    pub fn installed_size(&self) -> u64 {
        self.relations
            .files
            .iter()
            .fold(0u64, |total, file| total.saturating_add(file.size))
    }

    /// Size of the package file in bytes
    pub fn package_size(&self) -> u64 {
        self.digest.length
    }

    /// `name-version`
    pub fn package(&self) -> String {
        format!(
            "{}-{}",
            self.name().unwrap_or_default(),
            self.version().unwrap_or_default()
        )
    }

    /// `name-version-release`
    pub fn nvr(&self) -> String {
        format!(
            "{}-{}",
            self.package(),
            self.release().unwrap_or_default()
        )
    }

    /// The conventional file name, `name-version-release.arch.rpm` or
    /// `name-version-release.src.rpm` for source packages
    pub fn canonical_filename(&self) -> String {
        let arch = if self.is_source() {
            "src"
        } else {
            self.arch().unwrap_or_default()
        };
        format!("{}.{arch}.rpm", self.nvr())
    }

    /// Hex encoded checksum of the whole package file
    pub fn checksum(&self) -> &str {
        &self.digest.sha256
    }

    /// Algorithm of [`RpmPackage::checksum`]
    pub fn checksum_type(&self) -> &'static str {
        "sha256"
    }

    /// Compare the MD5 recorded in the signature section against the main header and
    /// payload.
    ///
    /// `None` when the signature section carries no MD5.
    pub fn header_digest_matches(&self) -> Option<bool> {
        let expected = self.signature.binary(tags::signature::MD5)?;
        Some(
            self.digest
                .md5
                .as_ref()
                .is_some_and(|actual| actual[..] == *expected),
        )
    }

    /// Capabilities this package provides, in stored order
    pub fn provides(&self) -> &[Dependency] {
        &self.relations.provides
    }

    /// Capabilities this package requires, `rpmlib(...)` entries included
    pub fn requires(&self) -> &[Dependency] {
        &self.relations.requires
    }

    /// Capabilities that conflict with this package
    pub fn conflicts(&self) -> &[Dependency] {
        &self.relations.conflicts
    }

    /// Packages this package replaces
    pub fn obsoletes(&self) -> &[Dependency] {
        &self.relations.obsoletes
    }

    /// Every entry of the file manifest
    pub fn files(&self) -> &[FileEntry] {
        &self.relations.files
    }

    /// Files listed in the primary metadata
    pub fn primary_files(&self) -> impl Iterator<Item = &FileEntry> {
        self.relations.files.iter().filter(|file| file.primary)
    }

    /// Changelog entries, most recent first
    pub fn changelog(&self) -> &[ChangelogEntry] {
        &self.relations.changelog
    }
}
