use std::env;
use std::time::Duration;

use address_bundler_core::StoredPoint;
use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const STREETS: &[&str] = &[
    "Main St",
    "Oak Ave",
    "Elm St",
    "Pine Rd",
    "Cedar Ln",
    "Maple Dr",
    "Birch Way",
    "Lake Rd",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchTier {
    Quick,
    Full,
}

impl BenchTier {
    pub fn from_env() -> Self {
        match env::var("ADDRESS_BUNDLER_BENCH_TIER").as_deref() {
            Ok("full") => Self::Full,
            _ => Self::Quick,
        }
    }

    /// Point counts benchmarked at this tier.
    pub fn sizes(self) -> &'static [usize] {
        match self {
            Self::Quick => &[500, 2_000],
            Self::Full => &[500, 2_000, 10_000, 50_000],
        }
    }
}

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub tier: BenchTier,
    pub seed: u64,
    pub sample_size: usize,
    pub measurement: Duration,
}

pub fn bench_config() -> BenchConfig {
    let tier = BenchTier::from_env();
    let seed = env::var("ADDRESS_BUNDLER_BENCH_SEED")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0xC0FFEE);
    let (sample_size, measurement) = match tier {
        BenchTier::Quick => (15, Duration::from_secs(4)),
        BenchTier::Full => (25, Duration::from_secs(10)),
    };
    BenchConfig {
        tier,
        seed,
        sample_size,
        measurement,
    }
}

pub fn configure_group<M: Measurement>(group: &mut BenchmarkGroup<'_, M>, cfg: &BenchConfig) {
    group.sample_size(cfg.sample_size);
    group.measurement_time(cfg.measurement);
}

/// `count` located records scattered around a few town centres.
pub fn generate_records(seed: u64, count: usize) -> Vec<StoredPoint> {
    let centres = [
        (42.36, -71.06),
        (42.28, -71.24),
        (42.46, -70.95),
        (42.19, -70.99),
    ];
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let (lat, lon) = centres[rng.random_range(0..centres.len())];
            let street = STREETS[rng.random_range(0..STREETS.len())];
            StoredPoint {
                id: i as u64 + 1,
                latitude: Some(lat + rng.random_range(-0.05..0.05)),
                longitude: Some(lon + rng.random_range(-0.05..0.05)),
                address: format!("{} {}", rng.random_range(1..=900), street),
                family_name: format!("F{:05}", rng.random_range(0..20_000)),
                given_name: format!("G{:03}", rng.random_range(0..500)),
                ..Default::default()
            }
        })
        .collect()
}
