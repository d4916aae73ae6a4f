//! Criterion benchmarks for regrisk_risk.
//!
//! Benchmarks cover:
//! - Monte Carlo simulation at increasing trial counts
//! - Sequential vs parallel trial map
//! - Sensitivity and scenario analysis on a long-horizon case

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use regrisk_finance::InvestmentCase;
use regrisk_risk::{
    MonteCarloSimulator, ParallelConfig, ScenarioAnalyzer, SensitivityAnalyzer,
    SensitivityVariable, SimulationConfig, UncertainVariable, VariableDistribution,
    VariableDistributions,
};
use rust_decimal_macros::dec;

/// Five-year compliance programme with an uncertain discount rate.
fn programme_case(horizon: u32) -> InvestmentCase {
    InvestmentCase::builder(dec!(0.08), horizon)
        .one_time_cost(dec!(1_200_000))
        .recurring_costs(vec![dec!(150_000)])
        .recurring_benefits(vec![dec!(200_000)])
        .build()
        .and_then(|case| case.with_avoided_penalty(dec!(2_000_000), dec!(0.3)))
        .expect("valid benchmark case")
}

fn distributions() -> VariableDistributions {
    VariableDistributions::default().with(
        UncertainVariable::DiscountRate,
        VariableDistribution::triangular(dec!(0.05), dec!(0.08), dec!(0.12)),
    )
}

/// Benchmark full simulations at increasing trial counts.
fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("monte_carlo");
    group.sample_size(10);

    let case = programme_case(5);
    let dists = distributions();
    for n_trials in [1_000, 10_000, 100_000] {
        let config = SimulationConfig::builder()
            .n_trials(n_trials)
            .seed(42)
            .build()
            .expect("valid config");
        let simulator = MonteCarloSimulator::new(config);

        group.bench_with_input(BenchmarkId::new("trials", n_trials), &n_trials, |b, _| {
            b.iter(|| simulator.simulate(black_box(&case), black_box(&dists)));
        });
    }

    group.finish();
}

/// Benchmark the trial map with and without Rayon.
fn bench_parallel_vs_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("trial_map");
    group.sample_size(10);

    let case = programme_case(10);
    let dists = distributions();
    let modes = [
        ("sequential", ParallelConfig::sequential()),
        ("parallel_64", ParallelConfig::new(64, 0)),
        ("parallel_512", ParallelConfig::new(512, 0)),
    ];
    for (label, parallel) in modes {
        let config = SimulationConfig::builder()
            .n_trials(20_000)
            .seed(7)
            .parallel(parallel)
            .build()
            .expect("valid config");
        let simulator = MonteCarloSimulator::new(config);

        group.bench_function(label, |b| {
            b.iter(|| simulator.simulate(black_box(&case), black_box(&dists)));
        });
    }

    group.finish();
}

/// Benchmark deterministic analyses on a monthly 30-year case.
fn bench_deterministic_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("deterministic");
    let case = programme_case(360);

    let sensitivity = SensitivityAnalyzer::new().with_variables(SensitivityVariable::all());
    group.bench_function("tornado_5_variables", |b| {
        b.iter(|| sensitivity.analyze(black_box(&case)));
    });

    let scenarios = ScenarioAnalyzer::default();
    group.bench_function("three_scenarios", |b| {
        b.iter(|| scenarios.analyze(black_box(&case)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_simulation,
    bench_parallel_vs_sequential,
    bench_deterministic_analysis,
);
criterion_main!(benches);
