//! Container operation throughput benchmarks
//!
//! # Benchmarks
//!
//! - `concat_chunked`: chunked byte copy of two 128-d containers
//! - `extract_records`: record-at-a-time copy of a middle range
//! - `split_pairs`: pair-aware split at the midpoint
//!
//! All inputs are in memory so the numbers reflect the copy loops rather
//! than the filesystem.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fvkit::io::{ContainerReader, ContainerWriter};
use fvkit::operations::{concat_streams, extract_records, split_pairs_stream, RangeDescriptor};
use fvkit::VectorRecord;
use std::io::Cursor;

const DIM: usize = 128;
const RECORDS: usize = 20_000;

fn build_container(records: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(records * (4 + 4 * DIM));
    for i in 0..records {
        let values = (0..DIM).map(|j| ((i * DIM + j) % 997) as f32 * 0.001).collect();
        VectorRecord::new(values)
            .encode_into(&mut bytes)
            .expect("Failed to encode record");
    }
    bytes
}

fn reader(bytes: &[u8]) -> ContainerReader<Cursor<&[u8]>> {
    ContainerReader::new(Cursor::new(bytes), bytes.len() as u64).expect("Failed to read header")
}

fn bench_concat(c: &mut Criterion) {
    let data = build_container(RECORDS);
    let mut group = c.benchmark_group("concat");
    group.throughput(Throughput::Bytes(2 * data.len() as u64));
    group.bench_function("concat_chunked", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(2 * data.len());
            concat_streams(reader(&data), reader(&data), &mut out).expect("concat failed");
            black_box(out);
        });
    });
    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let data = build_container(RECORDS);
    let range = RangeDescriptor::new(RECORDS as u64 / 4, RECORDS as u64 / 2);
    let mut group = c.benchmark_group("extract");
    group.throughput(Throughput::Elements(range.count));
    group.bench_function("extract_records", |b| {
        b.iter(|| {
            let mut writer = ContainerWriter::new(Vec::new());
            extract_records(&mut reader(&data), black_box(range), &mut writer)
                .expect("extract failed");
            black_box(writer.finish().expect("flush failed"));
        });
    });
    group.finish();
}

fn bench_split_pairs(c: &mut Criterion) {
    let data = build_container(RECORDS);
    let mut group = c.benchmark_group("split");
    group.throughput(Throughput::Elements(RECORDS as u64));
    group.bench_function("split_pairs", |b| {
        b.iter(|| {
            let mut w1 = ContainerWriter::new(Vec::new());
            let mut w2 = ContainerWriter::new(Vec::new());
            split_pairs_stream(&mut reader(&data), black_box(RECORDS as u64 / 4), &mut w1, &mut w2)
                .expect("split failed");
            black_box((w1.records_written(), w2.records_written()));
        });
    });
    group.finish();
}

criterion_group!(benches, bench_concat, bench_extract, bench_split_pairs);
criterion_main!(benches);
