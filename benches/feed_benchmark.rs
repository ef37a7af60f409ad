//! Feed throughput benchmark.
//!
//! Streams a seeded pseudo random load history through a 100 class
//! context, once as a single batch and once in small chunks, the way long
//! measurement series arrive in practice.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rainflow_core::{CountFlags, RainflowEngine, ResidualMethod};

const CLASS_COUNT: u32 = 100;
const CLASS_WIDTH: f64 = 10.0;
const CLASS_OFFSET: f64 = -500.0;
const HYSTERESIS: f64 = 10.0;

fn load_history(len: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut level = 0.0f64;
    (0..len)
        .map(|_| {
            level += rng.gen_range(-25.0..25.0);
            level = level.clamp(-499.0, 499.0);
            level
        })
        .collect()
}

fn bench_feed_batch(c: &mut Criterion) {
    let data = load_history(100_000);

    c.bench_function("feed_100k_batch", |b| {
        b.iter(|| {
            let mut engine = RainflowEngine::new(
                CLASS_COUNT,
                CLASS_WIDTH,
                CLASS_OFFSET,
                HYSTERESIS,
                CountFlags::DEFAULT,
            )
            .unwrap();
            engine.feed(&data).unwrap();
            engine.finalize(ResidualMethod::Ignore).unwrap();
            engine.pseudo_damage()
        });
    });
}

fn bench_feed_chunked(c: &mut Criterion) {
    let data = load_history(100_000);

    c.bench_function("feed_100k_chunks_of_256", |b| {
        b.iter(|| {
            let mut engine = RainflowEngine::new(
                CLASS_COUNT,
                CLASS_WIDTH,
                CLASS_OFFSET,
                HYSTERESIS,
                CountFlags::DEFAULT,
            )
            .unwrap();
            for chunk in data.chunks(256) {
                engine.feed(chunk).unwrap();
            }
            engine.finalize(ResidualMethod::Ignore).unwrap();
            engine.pseudo_damage()
        });
    });
}

criterion_group!(benches, bench_feed_batch, bench_feed_chunked);
criterion_main!(benches);
