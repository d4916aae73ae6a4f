//! Scenario valuation.

use super::presets::{ScenarioPreset, ScenarioSet};
use regrisk_core::types::{EngineError, Money};
use regrisk_finance::{CaseAdjustment, CashFlowBuilder, FinancialMetrics, InvestmentCase};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// Outcome of one scenario.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScenarioResult {
    /// Scenario name
    pub scenario_name: String,
    /// Factor applied to benefits
    pub benefit_multiplier: Decimal,
    /// Factor applied to costs
    pub cost_multiplier: Decimal,
    /// Undiscounted scaled benefits
    pub total_benefits: Money,
    /// Undiscounted scaled costs
    pub total_costs: Money,
    /// NPV at the case discount rate
    pub npv: Money,
}

/// Values an investment case under each preset of a [`ScenarioSet`].
///
/// # Examples
///
/// ```
/// use regrisk_finance::InvestmentCase;
/// use regrisk_risk::ScenarioAnalyzer;
/// use rust_decimal_macros::dec;
///
/// let case = InvestmentCase::builder(dec!(0.08), 5)
///     .one_time_cost(dec!(1_000))
///     .recurring_benefits(vec![dec!(300)])
///     .build()
///     .unwrap();
///
/// let results = ScenarioAnalyzer::default().analyze(&case).unwrap();
/// assert!(results[0].npv <= results[1].npv && results[1].npv <= results[2].npv);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScenarioAnalyzer {
    scenarios: ScenarioSet,
    metrics: FinancialMetrics,
    cash_flow_builder: CashFlowBuilder,
}

impl ScenarioAnalyzer {
    /// Analyzer over `scenarios`.
    pub fn new(scenarios: ScenarioSet) -> Self {
        Self {
            scenarios,
            metrics: FinancialMetrics::default(),
            cash_flow_builder: CashFlowBuilder::new(),
        }
    }

    /// Uses `builder` to turn each scaled case into a cash flow.
    pub fn with_cash_flow_builder(mut self, builder: CashFlowBuilder) -> Self {
        self.cash_flow_builder = builder;
        self
    }

    /// The configured presets.
    #[inline]
    pub fn scenarios(&self) -> &ScenarioSet {
        &self.scenarios
    }

    /// One result per preset, pessimistic first.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidInput` if a scaled case cannot be valued.
    pub fn analyze(&self, case: &InvestmentCase) -> Result<Vec<ScenarioResult>, EngineError> {
        self.scenarios
            .presets()
            .iter()
            .map(|preset| self.execute(case, preset))
            .collect()
    }

    fn execute(
        &self,
        case: &InvestmentCase,
        preset: &ScenarioPreset,
    ) -> Result<ScenarioResult, EngineError> {
        let scaled = case.adjusted(&CaseAdjustment::uniform(
            preset.benefit_multiplier,
            preset.cost_multiplier,
        ))?;
        let cash_flow = self.cash_flow_builder.build(&scaled);
        let npv = self.metrics.npv(&cash_flow, scaled.discount_rate())?;
        debug!(scenario = preset.kind.name(), npv = %npv, "scenario valued");

        Ok(ScenarioResult {
            scenario_name: preset.kind.name().to_string(),
            benefit_multiplier: preset.benefit_multiplier,
            cost_multiplier: preset.cost_multiplier,
            total_benefits: cash_flow.total_benefits(),
            total_costs: cash_flow.total_costs(),
            npv,
        })
    }
}
