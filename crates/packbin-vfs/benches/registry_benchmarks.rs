//! Benchmarks for registry lookup and snapshot encoding.

use criterion::{Criterion, criterion_group, criterion_main};
use packbin_vfs::{FileRegistry, RunMode};
use std::hint::black_box;

fn populated_registry(entries: usize) -> FileRegistry {
    let mut registry = FileRegistry::new(RunMode::Build);
    for index in 0..entries {
        registry
            .insert(&format!("assets/file-{index}.bin"), vec![0u8; 512])
            .expect("insert entry");
    }
    registry
}

fn bench_lookup(c: &mut Criterion) {
    let mut registry = populated_registry(1_000);
    c.bench_function("read_bytes_hit", |b| {
        b.iter(|| {
            let bytes = registry
                .read_bytes(black_box("./assets/file-500.bin"))
                .expect("entry exists");
            black_box(bytes.len())
        });
    });
}

fn bench_snapshot_encode(c: &mut Criterion) {
    let registry = populated_registry(1_000);
    c.bench_function("snapshot_encode_1k_entries", |b| {
        b.iter(|| {
            let encoded = registry.snapshot().encode().expect("encode snapshot");
            black_box(encoded.len())
        });
    });
}

criterion_group!(benches, bench_lookup, bench_snapshot_encode);
criterion_main!(benches);
