//! Criterion benchmarks for u-metabench.
//!
//! Measures executor overhead around the reference algorithms on synthetic
//! domains (Sphere, OneMax), and the cost of the statistical tests on
//! experiment-sized samples.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::sync::Arc;
use u_metabench::domains::{OneMax, Sphere};
use u_metabench::executor::AlgorithmExecutor;
use u_metabench::heuristics::ga::{GaConfig, GeneticAlgorithm};
use u_metabench::heuristics::sa::{SaConfig, SimulatedAnnealing};
use u_metabench::probe::{BestScoreProbe, TotalEvaluationsProbe};
use u_metabench::problem::Problem;
use u_metabench::stats::{
    ComparisonTestKind, NamedSample, NormalityTest, NormalityTestKind, StatisticalComparisonTest,
};
use u_metabench::stop::EvaluationsStopCondition;

// ===========================================================================
// Executor runs
// ===========================================================================

fn bench_ga_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_sphere");
    group.sample_size(10);

    for (dim, pop, budget) in [(10usize, 50usize, 2_500u64), (50, 100, 3_000), (100, 100, 2_000)] {
        group.bench_with_input(
            BenchmarkId::new(format!("d{dim}_p{pop}"), budget),
            &(dim, pop, budget),
            |b, &(dim, pop, budget)| {
                b.iter(|| {
                    let ga = GeneticAlgorithm::new(GaConfig::default().with_population_size(pop).with_seed(42));
                    let mut executor = AlgorithmExecutor::new(Problem::new(Sphere::new(dim)), ga)
                        .with_stop_condition(EvaluationsStopCondition::new(budget))
                        .expect("valid budget")
                        .with_probe(Arc::new(BestScoreProbe::new()));
                    black_box(executor.execute_and_wait())
                })
            },
        );
    }
    group.finish();
}

fn bench_sa_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("sa_sphere");
    group.sample_size(10);

    for &dim in &[10usize, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |b, &dim| {
            b.iter(|| {
                let sa = SimulatedAnnealing::new(
                    SaConfig::default()
                        .with_initial_temperature(100.0)
                        .with_min_temperature(0.01)
                        .with_seed(42),
                );
                let mut executor = AlgorithmExecutor::new(Problem::new(Sphere::new(dim)), sa)
                    .with_stop_condition(EvaluationsStopCondition::new(1_000))
                    .expect("valid budget")
                    .with_probe(Arc::new(BestScoreProbe::new()));
                black_box(executor.execute_and_wait())
            })
        });
    }
    group.finish();
}

fn bench_probe_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_onemax_probes");
    group.sample_size(10);

    for &probes in &[0usize, 2] {
        group.bench_with_input(BenchmarkId::from_parameter(probes), &probes, |b, &probes| {
            b.iter(|| {
                let ga = GeneticAlgorithm::new(GaConfig::fast().with_seed(7));
                let mut executor = AlgorithmExecutor::new(Problem::new(OneMax::new(100)), ga)
                    .with_stop_condition(EvaluationsStopCondition::new(5_000))
                    .expect("valid budget");
                if probes > 0 {
                    executor = executor
                        .with_probe(Arc::new(BestScoreProbe::new()))
                        .with_probe(Arc::new(TotalEvaluationsProbe::new()));
                }
                black_box(executor.execute_and_wait())
            })
        });
    }
    group.finish();
}

// ===========================================================================
// Statistical tests
// ===========================================================================

fn gaussian(n: usize, mean: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(mean, 1.0).expect("valid normal");
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

fn bench_normality(c: &mut Criterion) {
    let mut group = c.benchmark_group("normality");
    let sample = gaussian(1_000, 0.0, 1);

    for kind in NormalityTestKind::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &sample, |b, s| {
            b.iter(|| black_box(NormalityTest::evaluate(kind, "s", black_box(s))))
        });
    }
    group.finish();
}

fn bench_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("comparison");
    let samples: Vec<NamedSample> = (0..4)
        .map(|i| NamedSample::new(format!("a{i}"), gaussian(100, i as f64 * 0.1, i)))
        .collect();

    for kind in [
        ComparisonTestKind::StudentT,
        ComparisonTestKind::MannWhitneyU,
        ComparisonTestKind::Anova,
        ComparisonTestKind::KruskalWallis,
    ] {
        let input = if kind.is_two_population() { &samples[..2] } else { &samples[..] };
        group.bench_with_input(BenchmarkId::from_parameter(kind), input, |b, s| {
            b.iter(|| black_box(StatisticalComparisonTest::evaluate(kind, black_box(s))))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_ga_sphere,
    bench_sa_sphere,
    bench_probe_overhead,
    bench_normality,
    bench_comparison
);
criterion_main!(benches);
