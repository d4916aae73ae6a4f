//! Monte Carlo simulator.

use super::{CancellationToken, SimulationConfig, SimulationError};
use crate::distributions::{Sampler, UncertainVariable, VariableDistributions};
use crate::rng::RiskRng;
use regrisk_core::math::statistics::{histogram, mean, std_dev, Histogram, Percentiles};
use regrisk_core::types::{EngineError, Money, Rate};
use regrisk_finance::{CaseAdjustment, CashFlowBuilder, FinancialMetrics, InvestmentCase};
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// Summary of a simulation run.
///
/// Every statistic is over the completed trials. `probability_npv_positive`
/// is `count(npv > 0) / completed_trials`; an NPV of exactly zero is not a
/// success.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationResult {
    /// Requested trials
    pub n_trials: usize,
    /// Trials that ran to completion
    pub completed_trials: usize,
    /// Whether the run was cut short by cancellation
    pub cancelled: bool,
    /// Simulation seed
    pub seed: u64,
    /// NPV p5/p50/p95
    pub npv_percentiles: Percentiles,
    /// Fraction of completed trials with NPV > 0, in [0, 1]
    pub probability_npv_positive: f64,
    /// IRR p5/p50/p95 over trials with a defined IRR
    pub irr_percentiles: Option<Percentiles>,
    /// Trials whose IRR was defined
    pub irr_defined_trials: usize,
    /// Mean NPV; `None` if the sum overflows
    pub npv_mean: Option<Money>,
    /// Sample standard deviation of NPV; `None` if it overflows
    pub npv_std_dev: Option<Money>,
    /// Smallest NPV
    pub npv_min: Money,
    /// Largest NPV
    pub npv_max: Money,
    /// NPV histogram for charting
    pub histogram: Histogram,
}

/// Outcome of one trial.
#[derive(Clone, Copy, Debug)]
struct Trial {
    npv: Money,
    irr: Option<Rate>,
}

/// Validated samplers for one run.
#[derive(Clone, Debug)]
struct PreparedInputs {
    benefit: Sampler,
    cost: Sampler,
    rate: Option<Sampler>,
}

/// Re-evaluates an investment case under random input draws.
///
/// Trial `i` draws, in order, the benefit multiplier, the cost multiplier
/// and (if configured) the discount rate from the stream
/// `RiskRng::for_trial(seed, i)`. The multipliers scale every benefit and
/// every cost of the case; the drawn rate replaces the case rate.
///
/// All configuration errors, including distributions whose extremes push
/// the NPV out of the decimal range, are raised before the first trial.
///
/// # Examples
///
/// ```
/// use regrisk_finance::InvestmentCase;
/// use regrisk_risk::{MonteCarloSimulator, SimulationConfig, VariableDistributions};
/// use rust_decimal_macros::dec;
///
/// let case = InvestmentCase::builder(dec!(0.1), 3)
///     .one_time_cost(dec!(100))
///     .recurring_benefits(vec![dec!(50)])
///     .build()
///     .unwrap();
/// let config = SimulationConfig::builder().n_trials(200).seed(3).build().unwrap();
/// let simulator = MonteCarloSimulator::new(config);
///
/// let a = simulator.simulate(&case, &VariableDistributions::default()).unwrap();
/// let b = simulator.simulate(&case, &VariableDistributions::default()).unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Clone, Debug)]
pub struct MonteCarloSimulator {
    config: SimulationConfig,
    metrics: FinancialMetrics,
    cash_flow_builder: CashFlowBuilder,
}

impl MonteCarloSimulator {
    /// Creates a simulator with default metrics and cash-flow timing.
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            metrics: FinancialMetrics::default(),
            cash_flow_builder: CashFlowBuilder::new(),
        }
    }

    /// Uses `builder` to turn each perturbed case into a cash flow.
    pub fn with_cash_flow_builder(mut self, builder: CashFlowBuilder) -> Self {
        self.cash_flow_builder = builder;
        self
    }

    /// Uses `metrics` for per-trial NPV and IRR.
    pub fn with_metrics(mut self, metrics: FinancialMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Simulation configuration.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Runs every configured trial.
    ///
    /// # Errors
    ///
    /// - `InvalidDistribution` for malformed or out-of-support distributions
    /// - `Engine` if the extreme draws cannot be evaluated
    pub fn simulate(
        &self,
        case: &InvestmentCase,
        distributions: &VariableDistributions,
    ) -> Result<SimulationResult, SimulationError> {
        self.simulate_with_cancellation(case, distributions, &CancellationToken::new())
    }

    /// Runs trials until all are done or `token` is cancelled.
    ///
    /// Trials that have not started when the token fires are skipped; the
    /// result then summarises the completed trials with `cancelled = true`.
    ///
    /// # Errors
    ///
    /// As [`simulate`](Self::simulate), plus `Cancelled` if no trial
    /// completed.
    pub fn simulate_with_cancellation(
        &self,
        case: &InvestmentCase,
        distributions: &VariableDistributions,
        token: &CancellationToken,
    ) -> Result<SimulationResult, SimulationError> {
        let prepared = self.prepare(case, distributions)?;
        let n_trials = self.config.n_trials();
        let seed = self.config.seed();

        info!(n_trials, seed, "monte carlo simulation started");
        let start = Instant::now();

        let outcomes = self.config.parallel().map_indices(n_trials, |index| {
            if token.is_cancelled() {
                None
            } else {
                Some(self.run_trial(case, &prepared, index))
            }
        });
        let trials = outcomes
            .into_iter()
            .flatten()
            .collect::<Result<Vec<Trial>, EngineError>>()?;

        let result = self.summarise(trials)?;
        if result.cancelled {
            warn!(
                completed = result.completed_trials,
                n_trials, "monte carlo simulation cancelled"
            );
        }
        info!(
            completed = result.completed_trials,
            probability_npv_positive = result.probability_npv_positive,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "monte carlo simulation finished"
        );
        Ok(result)
    }

    /// Builds the samplers and evaluates the extreme corner of the input
    /// space, so no trial can fail.
    fn prepare(
        &self,
        case: &InvestmentCase,
        distributions: &VariableDistributions,
    ) -> Result<PreparedInputs, SimulationError> {
        let benefit = distributions
            .benefit_multiplier
            .sampler(UncertainVariable::BenefitMultiplier)?;
        let cost = distributions
            .cost_multiplier
            .sampler(UncertainVariable::CostMultiplier)?;
        let rate = distributions
            .discount_rate
            .as_ref()
            .map(|d| d.sampler(UncertainVariable::DiscountRate))
            .transpose()?;

        let base = self.cash_flow_builder.build(case);
        let out_of_range = |variable: UncertainVariable| SimulationError::InvalidDistribution {
            variable: variable.name().to_string(),
            reason: "upper bound scales the case beyond the decimal range".to_string(),
        };
        base.total_benefits()
            .checked_mul(benefit.upper())
            .ok_or_else(|| out_of_range(UncertainVariable::BenefitMultiplier))?;
        base.total_costs()
            .checked_mul(cost.upper())
            .ok_or_else(|| out_of_range(UncertainVariable::CostMultiplier))?;

        let extreme = case.adjusted(&CaseAdjustment::uniform(benefit.upper(), cost.upper()))?;
        let extreme = self.cash_flow_builder.build(&extreme);
        let rates = match &rate {
            Some(sampler) => vec![sampler.lower(), sampler.upper()],
            None => vec![case.discount_rate()],
        };
        for r in rates {
            self.metrics.npv(&extreme, r)?;
        }

        Ok(PreparedInputs {
            benefit,
            cost,
            rate,
        })
    }

    fn run_trial(
        &self,
        case: &InvestmentCase,
        inputs: &PreparedInputs,
        index: usize,
    ) -> Result<Trial, EngineError> {
        let mut rng = RiskRng::for_trial(self.config.seed(), index as u64);
        let benefit = inputs.benefit.sample(&mut rng);
        let cost = inputs.cost.sample(&mut rng);
        let rate = match &inputs.rate {
            Some(sampler) => sampler.sample(&mut rng),
            None => case.discount_rate(),
        };

        let trial_case = case.adjusted(&CaseAdjustment::uniform(benefit, cost))?;
        let cash_flow = self.cash_flow_builder.build(&trial_case);
        Ok(Trial {
            npv: self.metrics.npv(&cash_flow, rate)?,
            irr: self.metrics.irr(&cash_flow),
        })
    }

    fn summarise(&self, trials: Vec<Trial>) -> Result<SimulationResult, SimulationError> {
        let n_trials = self.config.n_trials();
        let completed_trials = trials.len();

        let mut npvs: Vec<Money> = trials.iter().map(|t| t.npv).collect();
        let mut irrs: Vec<Rate> = trials.iter().filter_map(|t| t.irr).collect();
        npvs.sort_unstable();
        irrs.sort_unstable();

        let Some(npv_percentiles) = Percentiles::from_sorted(&npvs) else {
            warn!(n_trials, "monte carlo simulation cancelled before any trial completed");
            return Err(SimulationError::Cancelled);
        };
        let npv_min = npvs[0];
        let npv_max = npvs[completed_trials - 1];

        let positive = npvs.iter().filter(|npv| **npv > Decimal::ZERO).count();
        let histogram = histogram(&npvs, self.config.histogram_bins()).unwrap_or_else(|| {
            Histogram {
                bin_edges: vec![npv_min, npv_max],
                counts: vec![completed_trials],
            }
        });

        Ok(SimulationResult {
            n_trials,
            completed_trials,
            cancelled: completed_trials < n_trials,
            seed: self.config.seed(),
            npv_percentiles,
            probability_npv_positive: positive as f64 / completed_trials as f64,
            irr_percentiles: Percentiles::from_sorted(&irrs),
            irr_defined_trials: irrs.len(),
            npv_mean: mean(&npvs),
            npv_std_dev: std_dev(&npvs),
            npv_min,
            npv_max,
            histogram,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::VariableDistribution;
    use crate::parallel::ParallelConfig;
    use rust_decimal_macros::dec;

    fn case() -> InvestmentCase {
        InvestmentCase::builder(dec!(0.08), 5)
            .one_time_cost(dec!(1_000_000))
            .recurring_costs(vec![dec!(50_000)])
            .recurring_benefits(vec![dec!(350_000)])
            .build()
            .unwrap()
    }

    fn simulator(n_trials: usize, seed: u64) -> MonteCarloSimulator {
        MonteCarloSimulator::new(
            SimulationConfig::builder()
                .n_trials(n_trials)
                .seed(seed)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_deterministic_distributions_reproduce_point_npv() {
        let result = simulator(50, 1)
            .simulate(&case(), &VariableDistributions::deterministic())
            .unwrap();

        let cf = CashFlowBuilder::new().build(&case());
        let npv = FinancialMetrics::default().npv(&cf, dec!(0.08)).unwrap();

        assert_eq!(result.npv_min, npv);
        assert_eq!(result.npv_max, npv);
        assert_eq!(result.npv_percentiles.p50, npv);
        assert_eq!(result.npv_std_dev, Some(Decimal::ZERO));
        assert_eq!(result.irr_defined_trials, 50);
        assert_eq!(result.histogram.counts, vec![50]);
    }

    #[test]
    fn test_same_seed_is_bit_identical() {
        let dists = VariableDistributions::default().with(
            UncertainVariable::DiscountRate,
            VariableDistribution::triangular(dec!(0.04), dec!(0.08), dec!(0.15)),
        );
        let a = simulator(300, 99).simulate(&case(), &dists).unwrap();
        let b = simulator(300, 99).simulate(&case(), &dists).unwrap();
        assert_eq!(a, b);

        let c = simulator(300, 100).simulate(&case(), &dists).unwrap();
        assert_ne!(a.npv_percentiles, c.npv_percentiles);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let config = |parallel| {
            SimulationConfig::builder()
                .n_trials(2_000)
                .seed(5)
                .parallel(parallel)
                .build()
                .unwrap()
        };
        let dists = VariableDistributions::default();
        let par = MonteCarloSimulator::new(config(ParallelConfig::new(16, 0)))
            .simulate(&case(), &dists)
            .unwrap();
        let seq = MonteCarloSimulator::new(config(ParallelConfig::sequential()))
            .simulate(&case(), &dists)
            .unwrap();
        assert_eq!(par, seq);
    }

    #[test]
    fn test_summary_statistics_are_ordered() {
        let result = simulator(1_000, 17)
            .simulate(&case(), &VariableDistributions::default())
            .unwrap();
        let p = result.npv_percentiles;
        assert!(result.npv_min <= p.p5);
        assert!(p.p5 <= p.p50 && p.p50 <= p.p95);
        assert!(p.p95 <= result.npv_max);
        assert!((0.0..=1.0).contains(&result.probability_npv_positive));
        assert_eq!(result.histogram.total(), 1_000);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_invalid_distribution_fails_before_trials() {
        let dists = VariableDistributions::default().with(
            UncertainVariable::BenefitMultiplier,
            VariableDistribution::triangular(dec!(1.2), dec!(1.0), dec!(1.3)),
        );
        let err = simulator(10, 1).simulate(&case(), &dists).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidDistribution { .. }));
    }

    #[test]
    fn test_underflowing_rate_fails_before_trials() {
        let long = InvestmentCase::builder(dec!(0.05), 600)
            .one_time_cost(dec!(100))
            .recurring_benefits(vec![dec!(10)])
            .build()
            .unwrap();
        let dists = VariableDistributions::default().with(
            UncertainVariable::DiscountRate,
            VariableDistribution::Uniform { min: dec!(-0.99), max: dec!(0.1) },
        );
        let err = simulator(10, 1).simulate(&long, &dists).unwrap_err();
        assert!(matches!(err, SimulationError::Engine(_)));
    }

    #[test]
    fn test_case_near_decimal_limit_fails_before_trials() {
        let huge = InvestmentCase::builder(dec!(0.1), 600)
            .recurring_benefits(vec![dec!(1_600_000_000_000_000_000_000)])
            .recurring_costs(vec![dec!(1_600_000_000_000_000_000_000)])
            .build()
            .unwrap();
        let err = simulator(10, 1)
            .simulate(&huge, &VariableDistributions::default())
            .unwrap_err();
        assert!(matches!(err, SimulationError::Engine(_)));
        assert!(simulator(10, 1)
            .simulate(&huge, &VariableDistributions::deterministic())
            .is_ok());
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let err = simulator(100, 1)
            .simulate_with_cancellation(&case(), &VariableDistributions::default(), &token)
            .unwrap_err();
        assert_eq!(err, SimulationError::Cancelled);
    }

    #[test]
    fn test_no_sign_change_leaves_irr_undefined() {
        let all_cost = InvestmentCase::builder(dec!(0.08), 3)
            .one_time_cost(dec!(1_000))
            .recurring_costs(vec![dec!(10)])
            .build()
            .unwrap();
        let result = simulator(100, 2)
            .simulate(&all_cost, &VariableDistributions::default())
            .unwrap();
        assert_eq!(result.irr_defined_trials, 0);
        assert_eq!(result.irr_percentiles, None);
        assert_eq!(result.probability_npv_positive, 0.0);
    }
}
