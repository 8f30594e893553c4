use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

pub mod read {
    use divan::Bencher;
    use rpm_meta::lead::{Lead, PackageType};
    use rpm_meta::relation;
    use rpm_meta::tags::header as tag;
    use rpm_meta::value::Value;
    use rpm_meta::{HeaderBuilder, PackageWriter, RpmPackage, TagStore};

    const FILES: usize = 2000;

    fn get_header() -> HeaderBuilder {
        let dirs = (0..FILES / 20)
            .map(|i| format!("/usr/share/bench/{i}/"))
            .collect::<Vec<_>>();

        HeaderBuilder::new()
            .add(tag::NAME, Value::String("bench".into()))
            .add(tag::VERSION, Value::String("1.0".into()))
            .add(tag::RELEASE, Value::String("1".into()))
            .add(tag::ARCH, Value::String("noarch".into()))
            .add(
                tag::REQUIRENAME,
                Value::StringArray((0..200).map(|i| format!("lib{i}.so.1()(64bit)")).collect()),
            )
            .add(tag::REQUIREFLAGS, Value::Int32(vec![12; 200]))
            .add(tag::REQUIREVERSION, Value::StringArray(vec!["1:2.3-4".into(); 200]))
            .add(
                tag::BASENAMES,
                Value::StringArray((0..FILES).map(|i| format!("file{i}.txt")).collect()),
            )
            .add(
                tag::DIRINDEXES,
                Value::Int32((0..FILES).map(|i| (i / 20) as i32).collect()),
            )
            .add(tag::DIRNAMES, Value::StringArray(dirs))
            .add(tag::FILESIZES, Value::Int32(vec![4096; FILES]))
            .add(tag::FILEMODES, Value::Int16(vec![0o100644u16 as i16; FILES]))
            .add(tag::FILEFLAGS, Value::Int32(vec![0; FILES]))
    }

    fn get_input() -> Vec<u8> {
        PackageWriter::builder()
            .lead(
                Lead::builder()
                    .package_type(PackageType::Binary)
                    .name("bench-1.0-1")
                    .build(),
            )
            .header(get_header())
            .payload(vec![0xA5; 1 << 20])
            .build()
            .to_bytes()
            .unwrap()
    }

    #[divan::bench]
    fn open(bencher: Bencher) {
        bencher.with_inputs(get_input).bench_refs(|data| {
            divan::black_box(RpmPackage::from_bytes(data).unwrap());
        });
    }

    #[divan::bench]
    fn decode_header(bencher: Bencher) {
        let section = get_header().to_section().unwrap();
        bencher.bench(|| {
            divan::black_box(TagStore::from_section(&section).unwrap());
        });
    }

    #[divan::bench]
    fn rebuild_files(bencher: Bencher) {
        let store = TagStore::from_section(&get_header().to_section().unwrap()).unwrap();
        bencher.bench(|| {
            divan::black_box(relation::files(&store).unwrap());
        });
    }
}
