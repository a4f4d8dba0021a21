//! Benchmarks for zip and unzip throughput.
//!
//! Measures archive creation across compression levels and extraction of
//! many small files versus a few large ones.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::cast_possible_truncation
)]

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use quickzip_core::ExtractOptions;
use quickzip_core::NoopProgress;
use quickzip_core::WriteOptions;
use quickzip_core::reader::extract_archive;
use quickzip_core::resolve;
use quickzip_core::test_utils::write_tree;
use quickzip_core::writer::write_archive;
use std::hint::black_box;
use std::path::PathBuf;
use tempfile::TempDir;

/// Creates `count` files of `size` bytes under `<temp>/bench_data`.
fn create_source_tree(temp: &TempDir, count: usize, size: usize) -> PathBuf {
    let root = temp.path().join("bench_data");
    let content = vec![b'q'; size];
    let names: Vec<String> = (0..count)
        .map(|i| format!("dir_{}/file_{i:05}.txt", i % 8))
        .collect();
    let files: Vec<(&str, &[u8])> = names
        .iter()
        .map(|name| (name.as_str(), content.as_slice()))
        .collect();
    write_tree(&root, &files);
    root
}

fn benchmark_write_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_levels");
    let temp = TempDir::new().unwrap();
    let source = create_source_tree(&temp, 100, 16 * 1024);
    let entries = resolve(&[&source], None);
    group.throughput(Throughput::Bytes(100 * 16 * 1024));

    for level in [0u8, 1, 6, 9] {
        let options = WriteOptions::default().with_compression_level(level);
        group.bench_with_input(BenchmarkId::from_parameter(level), &options, |b, options| {
            let output = temp.path().join(format!("level_{level}.zip"));
            b.iter(|| {
                write_archive(black_box(&entries), &output, options, &mut NoopProgress).unwrap()
            });
        });
    }
    group.finish();
}

fn benchmark_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    for (label, count, size) in [("many_small", 500usize, 1024usize), ("few_large", 4, 4 * 1024 * 1024)] {
        let temp = TempDir::new().unwrap();
        let source = create_source_tree(&temp, count, size);
        let archive = temp.path().join("bench.zip");
        write_archive(
            &resolve(&[&source], None),
            &archive,
            &WriteOptions::default(),
            &mut NoopProgress,
        )
        .unwrap();
        group.throughput(Throughput::Bytes((count * size) as u64));

        group.bench_function(label, |b| {
            let options = ExtractOptions::default().with_overwrite(true);
            let destination = temp.path().join("out");
            b.iter(|| {
                extract_archive(black_box(&archive), &destination, &options, &mut NoopProgress)
                    .unwrap()
            });
        });
    }
    group.finish();
}

fn benchmark_resolve(c: &mut Criterion) {
    let temp = TempDir::new().unwrap();
    let source = create_source_tree(&temp, 1000, 0);
    c.bench_function("resolve_1000_files", |b| {
        b.iter(|| resolve(black_box(&[&source]), None));
    });
}

criterion_group!(
    benches,
    benchmark_write_levels,
    benchmark_extract,
    benchmark_resolve
);
criterion_main!(benches);
