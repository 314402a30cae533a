use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use shapeio::{ShapedReader, ShapedWriter};
use std::io::{self, Cursor};

const SIZE: usize = 4 * 1024 * 1024;

fn bench_passthrough(c: &mut Criterion) {
    let data = vec![0u8; SIZE];
    let mut group = c.benchmark_group("passthrough");
    group.throughput(Throughput::Bytes(SIZE as u64));

    group.bench_function("plain_copy", |b| {
        b.iter(|| {
            let mut reader = Cursor::new(black_box(&data));
            io::copy(&mut reader, &mut io::sink())
        })
    });

    group.bench_function("unlimited_reader", |b| {
        b.iter(|| {
            let mut reader = ShapedReader::new(Cursor::new(black_box(&data)));
            io::copy(&mut reader, &mut io::sink())
        })
    });

    group.bench_function("unlimited_writer", |b| {
        b.iter(|| {
            let mut writer = ShapedWriter::new(io::sink());
            io::copy(&mut Cursor::new(black_box(&data)), &mut writer)
        })
    });

    // 上限が十分高く、ほとんど待たない場合の計測コスト
    group.bench_function("high_limit_reader", |b| {
        b.iter(|| {
            let mut reader = ShapedReader::new(Cursor::new(black_box(&data)));
            reader.set_rate_limit(1e15);
            io::copy(&mut reader, &mut io::sink())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_passthrough);
criterion_main!(benches);
