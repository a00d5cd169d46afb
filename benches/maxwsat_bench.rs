//! Criterion benchmarks for the MaxWSAT evaluator and annealing engine.
//!
//! Uses uniform random 3-SAT instances at a clause/variable ratio of 4.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_maxwsat::random::RandomSource;
use u_maxwsat::sa::{SaConfig, SaRunner};
use u_maxwsat::sat::{Assignment, Evaluator, Instance, SatProblem};

// ===========================================================================
// Random 3-SAT
// ===========================================================================

fn random_3sat(variables: usize, seed: u64) -> Instance {
    let mut rng = RandomSource::from_seed(seed);
    let clauses: Vec<Vec<i32>> = (0..variables * 4)
        .map(|_| {
            (0..3)
                .map(|_| {
                    let id = rng.index_below(variables) as i32 + 1;
                    if rng.next_u64() % 2 == 0 {
                        id
                    } else {
                        -id
                    }
                })
                .collect()
        })
        .collect();
    let weights: Vec<i32> = (0..variables)
        .map(|_| rng.index_below(100) as i32 + 1)
        .collect();
    Instance::new(&clauses, &weights).unwrap()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_flip(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluator_flip");

    for &n in &[100, 1_000, 10_000] {
        let instance = random_3sat(n, 42);
        let mut rng = RandomSource::from_seed(7);
        let mut evaluator = Evaluator::new(&instance);
        evaluator.rebuild(Assignment::random(n, &mut rng));

        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter(|| {
                let id = rng.index_below(n) + 1;
                black_box(evaluator.flip(black_box(id)))
            })
        });
    }
    group.finish();
}

fn bench_anneal(c: &mut Criterion) {
    let mut group = c.benchmark_group("anneal_3sat");
    group.sample_size(10);

    for &n in &[50, 200] {
        let instance = random_3sat(n, 42);
        let config = SaConfig::default()
            .with_stop_temperature(1e-3)
            .with_cooling_factor(0.95)
            .with_equilibrium_steps(n as u64);
        group.bench_with_input(BenchmarkId::from_parameter(n), &config, |b, config| {
            b.iter(|| {
                let result = SaRunner::run(
                    SatProblem::new(&instance),
                    black_box(config),
                    RandomSource::from_seed(42),
                );
                black_box(result)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_flip, bench_anneal);
criterion_main!(benches);
