mod common;

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use address_bundler_core::cluster::{Coord, KMeans};
use address_bundler_core::{BundleParams, MemoryStore, run};

use common::{bench_config, configure_group, generate_records};

fn bench_kmeans(c: &mut Criterion) {
    let cfg = bench_config();
    let mut group = c.benchmark_group("kmeans_fit");
    configure_group(&mut group, &cfg);

    for &count in cfg.tier.sizes() {
        let coords: Vec<Coord> = generate_records(cfg.seed, count)
            .iter()
            .filter_map(|r| Some([r.latitude?, r.longitude?]))
            .collect();
        let kmeans = KMeans::new(5).seed(cfg.seed);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &coords, |b, coords| {
            b.iter(|| black_box(kmeans.fit(black_box(coords))));
        });
    }
    group.finish();
}

fn bench_run(c: &mut Criterion) {
    let cfg = bench_config();
    let mut group = c.benchmark_group("engine_run");
    configure_group(&mut group, &cfg);

    let params = BundleParams {
        seed: cfg.seed,
        ..BundleParams::default()
    };
    for &count in cfg.tier.sizes() {
        let records = generate_records(cfg.seed, count);
        group.throughput(Throughput::Elements(count as u64));
        for mode in ["STREET", "KMEANS"] {
            group.bench_with_input(BenchmarkId::new(mode, count), &records, |b, records| {
                b.iter_batched(
                    || MemoryStore::from_records(records.iter().cloned()),
                    |mut store| black_box(run(&mut store, &params, mode)),
                    BatchSize::LargeInput,
                );
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_kmeans, bench_run);
criterion_main!(benches);
