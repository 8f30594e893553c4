#![allow(dead_code)]

use rpm_meta::error::Result;
use rpm_meta::lead::{Lead, PackageType};
use rpm_meta::tags::{header as tag, signature};
use rpm_meta::value::Value;
use rpm_meta::{HeaderBuilder, PackageWriter};

pub fn strings(values: &[&str]) -> Value {
    Value::StringArray(values.iter().map(|s| s.to_string()).collect())
}

pub fn string(value: &str) -> Value {
    Value::String(value.to_string())
}

/// Main header of a small binary package with every relation populated
pub fn hello_header() -> HeaderBuilder {
    HeaderBuilder::new()
        .add(tag::HEADER_I18NTABLE, strings(&["C"]))
        .add(tag::NAME, string("hello"))
        .add(tag::VERSION, string("2.10"))
        .add(tag::RELEASE, string("1.fc40"))
        .add(tag::EPOCH, Value::Int32(vec![1]))
        .add(tag::SUMMARY, Value::I18nString("Prints a familiar greeting".into()))
        .add(
            tag::DESCRIPTION,
            Value::I18nString(
                "The GNU hello program produces a familiar, friendly greeting.".into(),
            ),
        )
        .add(tag::BUILDTIME, Value::Int32(vec![1_706_745_600]))
        .add(tag::BUILDHOST, string("buildvm-x86-01.example.org"))
        .add(tag::SIZE, Value::Int32(vec![5346]))
        .add(tag::VENDOR, string("Example Project"))
        .add(tag::LICENSE, string("GPL-3.0-or-later"))
        .add(tag::PACKAGER, string("Example Packagers <packagers@example.org>"))
        .add(tag::GROUP, string("Unspecified"))
        .add(tag::URL, string("https://www.gnu.org/software/hello/"))
        .add(tag::OS, string("linux"))
        .add(tag::ARCH, string("x86_64"))
        .add(tag::FILESIZES, Value::Int32(vec![1000, 200, 50, 4096]))
        .add(
            tag::FILEMODES,
            Value::Int16(vec![
                0o100755u16 as i16,
                0o100644u16 as i16,
                0o100644u16 as i16,
                0o040755,
            ]),
        )
        .add(tag::FILEFLAGS, Value::Int32(vec![0, 2, 1 | 16, 0]))
        .add(tag::SOURCERPM, string("hello-2.10-1.fc40.src.rpm"))
        .add(tag::ARCHIVESIZE, Value::Int32(vec![6000]))
        .add(tag::PROVIDENAME, strings(&["hello", "hello(x86-64)"]))
        .add(tag::REQUIREFLAGS, Value::Int32(vec![0, 16777216 | 64 | 8 | 2, 64 | 512]))
        .add(
            tag::REQUIRENAME,
            strings(&["libc.so.6()(64bit)", "rpmlib(CompressedFileNames)", "/bin/sh"]),
        )
        .add(tag::REQUIREVERSION, strings(&["", "3.0.4-1", ""]))
        .add(tag::CONFLICTFLAGS, Value::Int32(vec![2]))
        .add(tag::CONFLICTNAME, strings(&["hello-legacy"]))
        .add(tag::CONFLICTVERSION, strings(&["2.0"]))
        .add(
            tag::CHANGELOGTIME,
            Value::Int32(vec![1_706_745_600, 1_690_000_000]),
        )
        .add(
            tag::CHANGELOGNAME,
            strings(&[
                "Jane Doe <jane@example.org> - 1:2.10-1",
                "John Doe <john@example.org> - 1:2.9-1",
            ]),
        )
        .add(tag::CHANGELOGTEXT, strings(&["- Update to 2.10", "- Initial package"]))
        .add(tag::OBSOLETENAME, strings(&["hello-old"]))
        .add(tag::PROVIDEFLAGS, Value::Int32(vec![8, 8]))
        .add(tag::PROVIDEVERSION, strings(&["1:2.10-1.fc40", "1:2.10-1.fc40"]))
        .add(tag::OBSOLETEFLAGS, Value::Int32(vec![2]))
        .add(tag::OBSOLETEVERSION, strings(&["1.0"]))
        .add(tag::DIRINDEXES, Value::Int32(vec![0, 1, 2, 3]))
        .add(tag::BASENAMES, strings(&["hello", "README", "hello.conf", "hello"]))
        .add(
            tag::DIRNAMES,
            strings(&["/usr/bin/", "/usr/share/doc/hello/", "/etc/", "/usr/share/"]),
        )
}

pub fn hello_package() -> Result<Vec<u8>> {
    PackageWriter::builder()
        .lead(
            Lead::builder()
                .package_type(PackageType::Binary)
                .name("hello-1:2.10-1.fc40")
                .build(),
        )
        .header(hello_header())
        .payload(b"\xfd7zXZ\0 not really compressed".to_vec())
        .signature(HeaderBuilder::new().add(signature::PAYLOADSIZE, Value::Int32(vec![6000])))
        .build()
        .to_bytes()
}

pub fn hello_source_package() -> Result<Vec<u8>> {
    let header = HeaderBuilder::new()
        .add(tag::NAME, string("hello"))
        .add(tag::VERSION, string("2.10"))
        .add(tag::RELEASE, string("1.fc40"))
        .add(tag::ARCH, string("x86_64"))
        .add(tag::OLDFILENAMES, strings(&["hello-2.10.tar.gz", "hello.spec"]))
        .add(tag::FILESIZES, Value::Int32(vec![1_046_722, 1_873]))
        .add(
            tag::FILEMODES,
            Value::Int16(vec![0o100644u16 as i16, 0o100644u16 as i16]),
        )
        .add(tag::FILEFLAGS, Value::Int32(vec![0, 32]));

    PackageWriter::builder()
        .lead(
            Lead::builder()
                .package_type(PackageType::Source)
                .name("hello-2.10-1.fc40")
                .build(),
        )
        .header(header)
        .build()
        .to_bytes()
}
