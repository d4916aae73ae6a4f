//! One-at-a-time NPV sensitivity (tornado analysis).
//!
//! Each watched variable is moved by `±δ` relative to its point estimate
//! while every other input stays put:
//!
//! ```text
//! low_impact  = NPV(x · (1 − δ)) − NPV(x)
//! high_impact = NPV(x · (1 + δ)) − NPV(x)
//! ```
//!
//! Entries are ranked by `max(|low_impact|, |high_impact|)`, largest first.
//! Ties keep watch-list order.

use crate::mc::SimulationError;
use regrisk_core::types::{EngineError, Money};
use regrisk_finance::{CaseAdjustment, CashFlowBuilder, FinancialMetrics, InvestmentCase};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Default relative perturbation.
pub const DEFAULT_DELTA: Decimal = dec!(0.20);

/// An input moved by the sensitivity analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityVariable {
    /// All benefits, one-off and recurring
    Benefits,
    /// All costs, one-off and recurring
    Costs,
    /// The case discount rate
    DiscountRate,
    /// Up-front costs only
    OneTimeCosts,
    /// Running costs only
    RecurringCosts,
}

impl SensitivityVariable {
    /// Watch-list used unless one is configured.
    pub const DEFAULT_WATCH_LIST: [SensitivityVariable; 3] = [
        SensitivityVariable::Benefits,
        SensitivityVariable::Costs,
        SensitivityVariable::DiscountRate,
    ];

    /// Every variable.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Benefits,
            Self::Costs,
            Self::DiscountRate,
            Self::OneTimeCosts,
            Self::RecurringCosts,
        ]
    }

    /// Canonical snake_case name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Benefits => "benefits",
            Self::Costs => "costs",
            Self::DiscountRate => "discount_rate",
            Self::OneTimeCosts => "one_time_costs",
            Self::RecurringCosts => "recurring_costs",
        }
    }

    /// Case adjustment scaling this variable by `factor`.
    ///
    /// The discount rate is not a case amount, so it maps to the identity.
    fn adjustment(&self, factor: Decimal) -> CaseAdjustment {
        match self {
            Self::Benefits => CaseAdjustment::uniform(factor, Decimal::ONE),
            Self::Costs => CaseAdjustment::uniform(Decimal::ONE, factor),
            Self::OneTimeCosts => CaseAdjustment {
                one_time_costs: factor,
                ..CaseAdjustment::IDENTITY
            },
            Self::RecurringCosts => CaseAdjustment {
                recurring_costs: factor,
                ..CaseAdjustment::IDENTITY
            },
            Self::DiscountRate => CaseAdjustment::IDENTITY,
        }
    }
}

impl fmt::Display for SensitivityVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SensitivityVariable {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::all()
            .into_iter()
            .find(|v| v.name() == normalised)
            .ok_or_else(|| SimulationError::InvalidParameter {
                name: "sensitivity variable",
                reason: format!("unknown variable '{}'", s),
            })
    }
}

/// NPV impact of moving one variable down and up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SensitivityEntry {
    /// Variable name
    pub variable_name: String,
    /// NPV change with the variable at `1 − δ` times its value
    pub low_impact_on_npv: Money,
    /// NPV change with the variable at `1 + δ` times its value
    pub high_impact_on_npv: Money,
}

impl SensitivityEntry {
    /// Tornado bar length: the larger absolute impact.
    pub fn max_impact(&self) -> Money {
        self.low_impact_on_npv.abs().max(self.high_impact_on_npv.abs())
    }
}

/// Tornado analysis of an investment case.
///
/// # Examples
///
/// ```
/// use regrisk_finance::InvestmentCase;
/// use regrisk_risk::SensitivityAnalyzer;
/// use rust_decimal_macros::dec;
///
/// let case = InvestmentCase::builder(dec!(0.1), 5)
///     .one_time_cost(dec!(1_000))
///     .recurring_benefits(vec![dec!(400)])
///     .build()
///     .unwrap();
///
/// let entries = SensitivityAnalyzer::default().analyze(&case).unwrap();
/// assert_eq!(entries.len(), 3);
/// assert_eq!(entries[0].variable_name, "benefits");
/// ```
#[derive(Clone, Debug)]
pub struct SensitivityAnalyzer {
    delta: Decimal,
    variables: Vec<SensitivityVariable>,
    metrics: FinancialMetrics,
    cash_flow_builder: CashFlowBuilder,
}

impl Default for SensitivityAnalyzer {
    fn default() -> Self {
        Self {
            delta: DEFAULT_DELTA,
            variables: SensitivityVariable::DEFAULT_WATCH_LIST.to_vec(),
            metrics: FinancialMetrics::default(),
            cash_flow_builder: CashFlowBuilder::new(),
        }
    }
}

impl SensitivityAnalyzer {
    /// Analyzer with δ = 20% over the default watch-list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the relative perturbation.
    ///
    /// # Errors
    ///
    /// `SimulationError::InvalidParameter` unless `0 < delta < 1`.
    pub fn with_delta(mut self, delta: Decimal) -> Result<Self, SimulationError> {
        if delta <= Decimal::ZERO || delta >= Decimal::ONE {
            return Err(SimulationError::InvalidParameter {
                name: "sensitivity_delta",
                reason: format!("must be in (0, 1), got {}", delta),
            });
        }
        self.delta = delta;
        Ok(self)
    }

    /// Replaces the watch-list.
    pub fn with_variables(mut self, variables: Vec<SensitivityVariable>) -> Self {
        self.variables = variables;
        self
    }

    /// Uses `builder` to turn each perturbed case into a cash flow.
    pub fn with_cash_flow_builder(mut self, builder: CashFlowBuilder) -> Self {
        self.cash_flow_builder = builder;
        self
    }

    /// Relative perturbation.
    #[inline]
    pub fn delta(&self) -> Decimal {
        self.delta
    }

    /// Watched variables.
    #[inline]
    pub fn variables(&self) -> &[SensitivityVariable] {
        &self.variables
    }

    /// Tornado entries, largest impact first.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidInput` if a perturbed case cannot be valued.
    pub fn analyze(&self, case: &InvestmentCase) -> Result<Vec<SensitivityEntry>, EngineError> {
        let base = self.npv(case, case.discount_rate())?;
        let down = Decimal::ONE - self.delta;
        let up = Decimal::ONE + self.delta;

        let mut entries = self
            .variables
            .iter()
            .map(|variable| {
                let low = self.perturbed_npv(case, *variable, down)?;
                let high = self.perturbed_npv(case, *variable, up)?;
                let entry = SensitivityEntry {
                    variable_name: variable.name().to_string(),
                    low_impact_on_npv: low - base,
                    high_impact_on_npv: high - base,
                };
                debug!(
                    variable = %variable,
                    low = %entry.low_impact_on_npv,
                    high = %entry.high_impact_on_npv,
                    "sensitivity computed"
                );
                Ok(entry)
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        entries.sort_by(|a, b| b.max_impact().cmp(&a.max_impact()));
        Ok(entries)
    }

    fn perturbed_npv(
        &self,
        case: &InvestmentCase,
        variable: SensitivityVariable,
        factor: Decimal,
    ) -> Result<Money, EngineError> {
        match variable {
            SensitivityVariable::DiscountRate => self.npv(case, case.discount_rate() * factor),
            _ => {
                let adjusted = case.adjusted(&variable.adjustment(factor))?;
                self.npv(&adjusted, adjusted.discount_rate())
            }
        }
    }

    fn npv(&self, case: &InvestmentCase, rate: Decimal) -> Result<Money, EngineError> {
        let cash_flow = self.cash_flow_builder.build(case);
        self.metrics.npv(&cash_flow, rate)
    }
}
