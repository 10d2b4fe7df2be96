use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use upkdiff_core::{parse_package, DiffEngine};

const BLOCK: usize = 512;

fn tar_member(name: &str, data: &[u8]) -> Vec<u8> {
    let mut header = vec![0u8; BLOCK];
    header[..name.len()].copy_from_slice(name.as_bytes());
    let size = format!("{:011o}\0", data.len());
    header[124..124 + size.len()].copy_from_slice(size.as_bytes());
    header[136..148].copy_from_slice(b"14717667775\0");
    header[156] = b'0';

    let mut member = header;
    member.extend_from_slice(data);
    let padding = (BLOCK - data.len() % BLOCK) % BLOCK;
    member.extend_from_slice(&vec![0u8; padding]);
    member
}

fn synthetic_package(asset_count: usize, payload: &[u8]) -> Vec<u8> {
    let mut tar = Vec::new();
    for i in 0..asset_count {
        let guid = format!("{:032x}", i);
        let path = format!("Assets/Generated/File{:04}.txt", i);
        tar.extend_from_slice(&tar_member(&format!("{}/pathname", guid), path.as_bytes()));
        tar.extend_from_slice(&tar_member(&format!("{}/asset", guid), payload));
    }
    tar.extend_from_slice(&[0u8; BLOCK * 2]);

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar).unwrap();
    encoder.finish().unwrap()
}

fn bench_parse(c: &mut Criterion) {
    let bytes = synthetic_package(200, &[0x55; 4096]);

    c.bench_function("parse_200_assets", |b| {
        b.iter(|| parse_package(black_box(&bytes)).unwrap())
    });
}

fn bench_diff(c: &mut Criterion) {
    let left = parse_package(&synthetic_package(200, &[0x55; 1024])).unwrap();
    let right = parse_package(&synthetic_package(200, &[0x55; 2048])).unwrap();
    let engine = DiffEngine::new();

    c.bench_function("diff_200_assets", |b| {
        b.iter(|| engine.compare(black_box(&left), black_box(&right)))
    });
}

criterion_group!(benches, bench_parse, bench_diff);
criterion_main!(benches);
