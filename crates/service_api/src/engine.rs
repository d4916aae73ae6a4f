//! The `RiskEngine` facade.

use crate::config::EngineConfig;
use crate::error::ApiError;
use crate::records::{InvestmentCaseRecord, ViolationRecord};
use crate::reports::{
    CumulativeReport, FinancialReport, InvestmentAnalysisReport, MonteCarloReport, PenaltyReport,
};
use regrisk_core::types::Money;
use regrisk_finance::{CashFlowBuilder, FinancialMetrics};
use regrisk_penalty::{CumulativePenaltyAggregator, PenaltyCalculator, ViolationClassifier};
use regrisk_risk::parallel::DEFAULT_BATCH_SIZE;
use regrisk_risk::{
    CancellationToken, MonteCarloSimulator, ParallelConfig, ScenarioAnalyzer, SensitivityAnalyzer,
    SimulationConfig,
};
use std::time::Instant;
use tracing::{debug, info};

/// Entry point for upstream callers: records in, reports out.
///
/// Built once from a validated [`EngineConfig`]; every call is pure and the
/// engine can be shared across threads.
///
/// # Examples
///
/// ```
/// use service_api::{EngineConfig, RiskEngine, ViolationRecord};
/// use rust_decimal_macros::dec;
///
/// let engine = RiskEngine::new(EngineConfig::default()).unwrap();
/// let record: ViolationRecord = serde_json::from_str(
///     r#"{"category": "incident_non_reporting", "revenue": 100000000, "is_repeat": true, "is_willful": true}"#,
/// )
/// .unwrap();
///
/// let report = engine.calculate_penalty(&record).unwrap();
/// assert_eq!(report.final_fine, dec!(10_000_000));
/// assert!(report.ceiling_applied);
/// ```
#[derive(Debug, Clone)]
pub struct RiskEngine {
    config: EngineConfig,
    aggregator: CumulativePenaltyAggregator,
    metrics: FinancialMetrics,
    cash_flow_builder: CashFlowBuilder,
    sensitivity: SensitivityAnalyzer,
    scenarios: ScenarioAnalyzer,
}

impl RiskEngine {
    /// Builds the engine components from `config`.
    ///
    /// # Errors
    ///
    /// `ApiError::Config` if the configuration does not validate.
    pub fn new(config: EngineConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let calculator = PenaltyCalculator::new(config.registry()?, ViolationClassifier::standard());
        let aggregator = CumulativePenaltyAggregator::new(calculator)
            .with_max_cumulative_fraction(config.max_cumulative_fraction)?;
        let cash_flow_builder =
            CashFlowBuilder::new().with_benefits_at_period_zero(config.benefits_at_period_zero);
        let sensitivity = SensitivityAnalyzer::new()
            .with_delta(config.sensitivity_delta)?
            .with_cash_flow_builder(cash_flow_builder);
        let scenarios = ScenarioAnalyzer::new(config.scenarios.scenario_set()?)
            .with_cash_flow_builder(cash_flow_builder);

        Ok(Self {
            config,
            aggregator,
            metrics: FinancialMetrics::default(),
            cash_flow_builder,
            sensitivity,
            scenarios,
        })
    }

    /// The configuration the engine was built from.
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fine for a single violation.
    ///
    /// # Errors
    ///
    /// `UnknownCategory`, `UnknownTier` or `InvalidInput` from the record.
    pub fn calculate_penalty(&self, record: &ViolationRecord) -> Result<PenaltyReport, ApiError> {
        let violation = record.to_instance()?;
        let result = self.aggregator.calculator().calculate(&violation)?;
        Ok(PenaltyReport::from(&result))
    }

    /// Capped cumulative fine for several violations of one entity.
    ///
    /// # Errors
    ///
    /// The first record error, or `InvalidInput` for non-positive revenue.
    pub fn aggregate_penalties(
        &self,
        records: &[ViolationRecord],
        annual_revenue: Money,
    ) -> Result<CumulativeReport, ApiError> {
        let violations = records
            .iter()
            .map(ViolationRecord::to_instance)
            .collect::<Result<Vec<_>, _>>()?;
        let result = self.aggregator.aggregate(&violations, annual_revenue)?;
        Ok(CumulativeReport::from(&result))
    }

    /// Simulation settings for `record`: configured defaults with the
    /// record's overrides.
    ///
    /// # Errors
    ///
    /// `ApiError::Simulation` for an out-of-range trial count.
    pub fn simulation_config(
        &self,
        record: &InvestmentCaseRecord,
    ) -> Result<SimulationConfig, ApiError> {
        let settings = &self.config.monte_carlo;
        let overrides = record.monte_carlo.unwrap_or_default();
        let config = SimulationConfig::builder()
            .n_trials(overrides.n_trials.unwrap_or(settings.n_trials))
            .seed(overrides.seed.unwrap_or(settings.seed))
            .histogram_bins(settings.histogram_bins)
            .parallel(ParallelConfig::new(DEFAULT_BATCH_SIZE, settings.parallel_threshold))
            .build()?;
        Ok(config)
    }

    /// Full analysis: deterministic metrics, Monte Carlo, sensitivity and
    /// scenarios.
    ///
    /// # Errors
    ///
    /// Any invalid case field or distribution, raised before simulation.
    pub fn analyze_investment(
        &self,
        record: &InvestmentCaseRecord,
    ) -> Result<InvestmentAnalysisReport, ApiError> {
        self.analyze_investment_with_cancellation(record, &CancellationToken::new())
    }

    /// [`analyze_investment`](Self::analyze_investment) with a token that
    /// stops the simulation early.
    ///
    /// # Errors
    ///
    /// As `analyze_investment`, plus `SimulationError::Cancelled` if the
    /// token fired before any trial completed.
    pub fn analyze_investment_with_cancellation(
        &self,
        record: &InvestmentCaseRecord,
        token: &CancellationToken,
    ) -> Result<InvestmentAnalysisReport, ApiError> {
        let start = Instant::now();
        let case = record.to_case()?;
        let distributions = record.distributions.to_distributions();
        let simulation_config = self.simulation_config(record)?;

        let cash_flow = self.cash_flow_builder.build(&case);
        let financial = self.metrics.evaluate(&cash_flow, case.discount_rate())?;
        debug!(npv = %financial.npv, irr = ?financial.irr, "deterministic metrics");

        let simulation = MonteCarloSimulator::new(simulation_config)
            .with_cash_flow_builder(self.cash_flow_builder)
            .with_metrics(self.metrics.clone())
            .simulate_with_cancellation(&case, &distributions, token)?;
        let sensitivity = self.sensitivity.analyze(&case)?;
        let scenarios = self.scenarios.analyze(&case)?;

        info!(
            horizon = case.horizon_periods(),
            npv = %financial.npv,
            probability_npv_positive = simulation.probability_npv_positive,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "investment analysed"
        );

        Ok(InvestmentAnalysisReport {
            financial: FinancialReport::new(&financial, &cash_flow),
            monte_carlo: MonteCarloReport::from(&simulation),
            sensitivity: sensitivity.iter().map(Into::into).collect(),
            scenarios: scenarios.iter().map(Into::into).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(json: &str) -> InvestmentCaseRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let config = EngineConfig {
            sensitivity_delta: dec!(0),
            ..EngineConfig::default()
        };
        let err = RiskEngine::new(config).unwrap_err();
        assert_eq!(err.code(), "invalid_config");
    }

    #[test]
    fn test_configured_cap_fraction() {
        let config = EngineConfig {
            max_cumulative_fraction: dec!(0.05),
            ..EngineConfig::default()
        };
        let engine = RiskEngine::new(config).unwrap();
        let records: Vec<ViolationRecord> = serde_json::from_str(
            r#"[{"category": "incident_non_reporting", "revenue": 100000000, "is_repeat": true}]"#,
        )
        .unwrap();
        let report = engine.aggregate_penalties(&records, dec!(100_000_000)).unwrap();
        assert_eq!(report.statutory_cap, dec!(5_000_000));
        assert_eq!(report.capped_total, dec!(4_000_000));
        assert!(!report.cap_applied);
    }

    #[test]
    fn test_simulation_config_overrides() {
        let engine = RiskEngine::new(EngineConfig::default()).unwrap();
        let defaulted = engine
            .simulation_config(&record(r#"{"discount_rate": 0.08, "horizon": 3}"#))
            .unwrap();
        assert_eq!(defaulted.n_trials(), 10_000);
        assert_eq!(defaulted.seed(), 42);

        let overridden = engine
            .simulation_config(&record(
                r#"{"discount_rate": 0.08, "horizon": 3, "monte_carlo": {"n_trials": 250, "seed": 9}}"#,
            ))
            .unwrap();
        assert_eq!(overridden.n_trials(), 250);
        assert_eq!(overridden.seed(), 9);

        let err = engine
            .simulation_config(&record(
                r#"{"discount_rate": 0.08, "horizon": 3, "monte_carlo": {"n_trials": 0}}"#,
            ))
            .unwrap_err();
        assert_eq!(err.code(), "invalid_simulation");
    }

    #[test]
    fn test_invalid_distribution_fails_before_simulation() {
        let engine = RiskEngine::new(EngineConfig::default()).unwrap();
        let case = record(
            r#"{"discount_rate": 0.08, "horizon": 3,
                "costs": {"one_time": [100]},
                "benefits": {"recurring": [60]},
                "distributions": {"benefit_multiplier": {"type": "triangular", "min": 1.2, "mode": 1.0, "max": 1.3}},
                "monte_carlo": {"n_trials": 10}}"#,
        );
        let err = engine.analyze_investment(&case).unwrap_err();
        assert_eq!(err.code(), "invalid_simulation");
    }

    #[test]
    fn test_cancelled_before_start() {
        let engine = RiskEngine::new(EngineConfig::default()).unwrap();
        let case = record(
            r#"{"discount_rate": 0.08, "horizon": 3,
                "costs": {"one_time": [100]},
                "benefits": {"recurring": [60]}}"#,
        );
        let token = CancellationToken::new();
        token.cancel();
        let err = engine
            .analyze_investment_with_cancellation(&case, &token)
            .unwrap_err();
        assert_eq!(err.code(), "cancelled");
    }

    #[test]
    fn test_benefits_at_period_zero_flag() {
        let json = r#"{"discount_rate": 0.1, "horizon": 2,
                       "costs": {"one_time": [1000]},
                       "benefits": {"one_time": [500]},
                       "monte_carlo": {"n_trials": 10}}"#;
        let late = RiskEngine::new(EngineConfig::default())
            .unwrap()
            .analyze_investment(&record(json))
            .unwrap();
        let early = RiskEngine::new(EngineConfig {
            benefits_at_period_zero: true,
            ..EngineConfig::default()
        })
        .unwrap()
        .analyze_investment(&record(json))
        .unwrap();

        assert_eq!(late.financial.cash_flow[1].benefits, dec!(500));
        assert_eq!(early.financial.cash_flow[0].benefits, dec!(500));
        assert!(early.financial.npv > late.financial.npv);
    }
}
