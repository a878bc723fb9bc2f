use std::fs;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tempfile::TempDir;
use tzip_core::{EngineConfig, FileCatalog, Orchestrator, ZlibCodec};

const FILE_COUNT: usize = 64;

fn synthetic_text(seed: usize) -> Vec<u8> {
    let len = 16 * 1024 + (seed * 2_731) % (48 * 1024);
    let mut out = Vec::with_capacity(len);
    let mut word = 0x9E37_79B9_7F4A_7C15u64 ^ seed as u64;
    while out.len() < len {
        word = word
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let vocab = ["lorem ", "ipsum ", "dolor ", "sit ", "amet ", "tzip ", "archive\n"];
        out.extend_from_slice(vocab[(word >> 60) as usize % vocab.len()].as_bytes());
    }
    out.truncate(len);
    out
}

fn fixture() -> (TempDir, FileCatalog, u64) {
    let dir = TempDir::new().expect("bench tempdir");
    let mut total = 0u64;
    for idx in 0..FILE_COUNT {
        let data = synthetic_text(idx);
        total += data.len() as u64;
        fs::write(dir.path().join(format!("{idx:03}.txt")), data).expect("write fixture");
    }
    let catalog = FileCatalog::scan(dir.path(), ".txt").expect("scan fixture");
    (dir, catalog, total)
}

fn bench_pool_scaling(c: &mut Criterion) {
    let (_dir, catalog, total_bytes) = fixture();
    let max_workers = num_cpus::get().clamp(2, 8);

    let mut group = c.benchmark_group("pool_scaling");
    group.throughput(Throughput::Bytes(total_bytes));
    group.sample_size(20);

    for workers in [1, max_workers] {
        let orchestrator = Orchestrator::new(EngineConfig::default().with_worker_cap(workers));
        let level = orchestrator.config().compression_level;

        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, _| {
            b.iter(|| {
                let outcome = orchestrator
                    .compress_catalog(&catalog, || ZlibCodec::new(level))
                    .expect("compress fixture");
                black_box(outcome.stats)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pool_scaling);
criterion_main!(benches);
