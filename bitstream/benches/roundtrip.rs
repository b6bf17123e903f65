use bitstream::{BitReader, BitWriter};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const FIELDS: usize = 1024;

fn bench_write(c: &mut Criterion) {
    c.bench_function("write_mixed_fields", |b| {
        b.iter(|| {
            let mut writer = BitWriter::with_capacity(FIELDS * 8);
            for i in 0..FIELDS as u64 {
                writer.write_bool(i & 1 == 0).unwrap();
                writer.write_bits(black_box(i), 11).unwrap();
                writer.write_signed_long(37, black_box(i as i64 - 512)).unwrap();
            }
            black_box(writer.finish())
        });
    });
}

fn bench_read(c: &mut Criterion) {
    let mut writer = BitWriter::with_capacity(FIELDS * 8);
    for i in 0..FIELDS as u64 {
        writer.write_bool(i & 1 == 0).unwrap();
        writer.write_bits(i, 11).unwrap();
        writer.write_signed_long(37, i as i64 - 512).unwrap();
    }
    let bytes = writer.finish();

    c.bench_function("read_mixed_fields", |b| {
        b.iter(|| {
            let mut reader = BitReader::new(&bytes[..]);
            let mut acc = 0i64;
            for _ in 0..FIELDS {
                acc ^= i64::from(reader.read_bool().unwrap());
                acc ^= reader.read_bits(11).unwrap() as i64;
                acc ^= reader.read_signed_long(37).unwrap();
            }
            black_box(acc)
        });
    });
}

criterion_group!(benches, bench_write, bench_read);
criterion_main!(benches);
