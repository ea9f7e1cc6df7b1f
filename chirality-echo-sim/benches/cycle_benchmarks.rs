// benches/cycle_benchmarks.rs

use chirality_echo_sim::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn benchmark_cycle_phases(c: &mut Criterion) {
    let config = CycleConfig::default();

    c.bench_function("foam_generation_20", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(1);
            generate_vorticity_grid(black_box(&config.foam), &mut rng).unwrap()
        });
    });

    let mut rng = StdRng::seed_from_u64(2);
    let foam = generate_vorticity_grid(&config.foam, &mut rng).unwrap();

    c.bench_function("inflation_stretch_20_to_80", |b| {
        b.iter(|| inflation_stretch(black_box(&foam), &config.inflation).unwrap());
    });

    let inflated = inflation_stretch(&foam, &config.inflation).unwrap();
    c.bench_function("reheating_80", |b| {
        b.iter(|| {
            let mut grid = inflated.clone();
            let mut rng = StdRng::seed_from_u64(3);
            reheating_oscillations(&mut grid, &config.reheating, &mut rng).unwrap();
            grid
        });
    });
}

fn benchmark_full_cycle(c: &mut Criterion) {
    let config = CycleConfig::default();
    let mut group = c.benchmark_group("cycle");
    group.sample_size(10);
    group.bench_function("run_cycle_default", |b| {
        b.iter(|| run_cycle_seeded(black_box(&config), 42).unwrap());
    });
    group.finish();
}

criterion_group!(benches, benchmark_cycle_phases, benchmark_full_cycle);
criterion_main!(benches);
