//! The fixed 96 byte prologue of a package.

use std::io::{Read, Seek};

use binrw::{BinRead, BinWrite};
use bon::bon;
use tracing::{debug, instrument};

use crate::error::{is_bad_magic, Error, MagicError, Result};

/// Magic number every package starts with
pub const LEAD_MAGIC: [u8; 4] = [0xed, 0xab, 0xee, 0xdb];

/// Size of the lead in bytes
pub const LEAD_SIZE: usize = 96;

/// The kind of package declared in the lead
#[derive(Debug, Copy, Clone, PartialEq, Eq, derive_more::Display)]
pub enum PackageType {
    /// A compiled package installing files
    #[display("binary")]
    Binary = 0,

    /// A package carrying sources and a spec file
    #[display("source")]
    Source = 1,
}

impl TryFrom<i16> for PackageType {
    type Error = Error;

    fn try_from(value: i16) -> Result<Self> {
        match value {
            0 => Ok(PackageType::Binary),
            1 => Ok(PackageType::Source),
            other => Err(Error::InvalidPackageType(other)),
        }
    }
}

/// Package lead
///
/// Starts with the magic `ED AB EE DB`. Most of its fields have been superseded by the
/// header, only the package type is still authoritative. All data is big endian.
#[derive(BinRead, BinWrite, Debug, Clone, PartialEq)]
#[brw(big, magic = b"\xed\xab\xee\xdb")]
pub struct Lead {
    /// Major version of the file format
    pub major: u8,

    /// Minor version of the file format
    pub minor: u8,

    /// Binary or source, stored as a 16 bit integer
    #[br(try_map = |raw: i16| PackageType::try_from(raw))]
    #[bw(map = |package_type: &PackageType| *package_type as i16)]
    pub package_type: PackageType,

    /// Legacy architecture number
    pub archnum: i16,

    /// Zero padded `name-version-release` of the package
    pub name: [u8; 66],

    /// Legacy operating system number
    pub osnum: i16,

    /// Layout of the signature section, 5 for header-style signatures
    pub signature_type: i16,

    /// Unused
    pub reserved: [u8; 16],
}

#[bon]
impl Lead {
    /// Create a lead for a package, used when building packages from scratch
    #[builder]
    pub fn new(
        package_type: PackageType,
        #[builder(into)] name: String,
        #[builder(default = 1)] archnum: i16,
        #[builder(default = 1)] osnum: i16,
    ) -> Self {
        let mut padded = [0u8; 66];
        let len = name.len().min(65);
        padded[..len].copy_from_slice(&name.as_bytes()[..len]);

        Self {
            major: 3,
            minor: 0,
            package_type,
            archnum,
            name: padded,
            osnum,
            signature_type: 5,
            reserved: [0; 16],
        }
    }
}

impl Lead {
    /// Read and validate the lead from the start of a package
    #[instrument(skip(reader), err)]
    pub fn parse<R: Read + Seek>(reader: &mut R) -> Result<Lead> {
        let lead = match Lead::read(reader) {
            Ok(lead) => lead,
            Err(e) if is_bad_magic(&e) => return Err(MagicError::Lead.into()),
            Err(e) => return Err(e.into()),
        };

        debug!(
            version = %format_args!("{}.{}", lead.major, lead.minor),
            package_type = %lead.package_type,
            name = lead.name(),
            "read lead"
        );
        Ok(lead)
    }

    /// Whether this is a binary or a source package
    pub fn package_type(&self) -> PackageType {
        self.package_type
    }

    /// Name stored in the lead, up to the first zero byte
    pub fn name(&self) -> &str {
        let end = self
            .name
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(self.name.len());
        std::str::from_utf8(&self.name[..end]).unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::{BinRead, BinWrite};
    use pretty_assertions::assert_eq;

    use crate::error::{Error, MagicError, Result};
    use crate::lead::{Lead, PackageType, LEAD_MAGIC, LEAD_SIZE};

    fn encoded(lead: &Lead) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        lead.write(&mut Cursor::new(&mut data))?;
        Ok(data)
    }

    #[test]
    fn read_source_lead() -> Result<()> {
        #[rustfmt::skip]
        let mut input = vec![
            0xED, 0xAB, 0xEE, 0xDB, // Magic
            0x03, 0x00,             // Version
            0x00, 0x01,             // Type
            0x00, 0x01,             // Architecture
            b'E', b't', b'e', b'r', b'm',
        ];
        input.resize(76, 0);
        input.extend_from_slice(&[0x00, 0x01, 0x00, 0x05]);
        input.resize(LEAD_SIZE, 0);

        let lead = Lead::parse(&mut Cursor::new(input))?;
        assert_eq!(lead.package_type(), PackageType::Source);
        assert_eq!(lead.name(), "Eterm");
        assert_eq!((lead.major, lead.minor), (3, 0));
        assert_eq!(lead.signature_type, 5);

        Ok(())
    }

    #[test]
    fn write_lead_is_96_bytes() -> Result<()> {
        let lead = Lead::builder()
            .package_type(PackageType::Binary)
            .name("hello-1.0-1")
            .build();

        let data = encoded(&lead)?;
        assert_eq!(data.len(), LEAD_SIZE);
        assert!(data.starts_with(&LEAD_MAGIC));
        assert_eq!(Lead::parse(&mut Cursor::new(data))?, lead);

        Ok(())
    }

    #[test]
    fn reject_invalid_magic() -> Result<()> {
        let lead = Lead::builder()
            .package_type(PackageType::Binary)
            .name("hello")
            .build();
        let mut data = encoded(&lead)?;
        data[0] = 0xEE;

        let result = Lead::parse(&mut Cursor::new(data));
        assert!(matches!(result, Err(Error::InvalidMagic(MagicError::Lead))));

        Ok(())
    }

    #[test]
    fn reject_invalid_package_type() -> Result<()> {
        let lead = Lead::builder()
            .package_type(PackageType::Binary)
            .name("hello")
            .build();
        let mut data = encoded(&lead)?;
        data[7] = 0x02;

        let result = Lead::parse(&mut Cursor::new(data.clone()));
        assert!(matches!(result, Err(Error::InvalidPackageType(2))));

        // Reading the struct directly rejects it as well
        let result = Lead::read(&mut Cursor::new(data)).map_err(Error::from);
        assert!(matches!(result, Err(Error::InvalidPackageType(2))));

        Ok(())
    }

    #[test]
    fn package_type_written_as_integer() -> Result<()> {
        let lead = Lead::builder()
            .package_type(PackageType::Source)
            .name("hello")
            .build();
        let data = encoded(&lead)?;

        assert_eq!(&data[6..8], &[0x00, 0x01]);
        assert_eq!(lead.package_type(), PackageType::Source);

        Ok(())
    }

    #[test]
    fn reject_short_lead() {
        let input = vec![0xED, 0xAB, 0xEE, 0xDB, 0x03, 0x00];
        let result = Lead::parse(&mut Cursor::new(input));
        assert!(matches!(result, Err(Error::TruncatedInput)));
    }
}
