//! Report DTOs handed to downstream consumers.
//!
//! Reports hold only strings, decimals, integers, floats and booleans, so
//! they can feed charts, HTML or PDF renderers without the engine crates.
//! Decimals serialise as strings to keep every digit.

use regrisk_core::math::statistics::{Histogram, Percentiles};
use regrisk_core::types::Money;
use regrisk_finance::{CashFlow, FinancialResult};
use regrisk_penalty::{AppliedMultiplier, CumulativeResult, PenaltyResult};
use regrisk_risk::{ScenarioResult, SensitivityEntry, SimulationResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Penalties
// =============================================================================

/// One applied multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierReport {
    /// Multiplier label
    pub name: String,
    /// Factor
    pub factor: Decimal,
    /// Running fine after the factor
    pub fine_after: Money,
}

impl From<&AppliedMultiplier> for MultiplierReport {
    fn from(m: &AppliedMultiplier) -> Self {
        Self {
            name: m.name.clone(),
            factor: m.factor,
            fine_after: m.fine_after,
        }
    }
}

/// Fine for one violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyReport {
    /// Category name
    pub category: String,
    /// Tier name
    pub severity: String,
    /// Tier base fine
    pub base_fine: Money,
    /// Revenue × tier fraction
    pub revenue_based_fine: Money,
    /// Clamped fine before multipliers
    pub pre_multiplier_fine: Money,
    /// Multipliers in application order
    pub multipliers_applied: Vec<MultiplierReport>,
    /// Final fine
    pub final_fine: Money,
    /// Final fine as a percentage of revenue
    pub fine_as_pct_of_revenue: Decimal,
    /// Critical-tier ceiling fired
    pub ceiling_applied: bool,
}

impl From<&PenaltyResult> for PenaltyReport {
    fn from(r: &PenaltyResult) -> Self {
        Self {
            category: r.category.to_string(),
            severity: r.severity.to_string(),
            base_fine: r.base_fine,
            revenue_based_fine: r.revenue_based_fine,
            pre_multiplier_fine: r.pre_multiplier_fine,
            multipliers_applied: r.multipliers_applied.iter().map(Into::into).collect(),
            final_fine: r.final_fine,
            fine_as_pct_of_revenue: r.fine_as_pct_of_revenue,
            ceiling_applied: r.ceiling_applied,
        }
    }
}

/// Capped total over several violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativeReport {
    /// Per-violation fines, in input order
    pub violations: Vec<PenaltyReport>,
    /// Sum of final fines
    pub uncapped_total: Money,
    /// Revenue × cap fraction
    pub statutory_cap: Money,
    /// Total after the cap
    pub capped_total: Money,
    /// Cap bound
    pub cap_applied: bool,
    /// Reduction due to the cap
    pub amount_saved_by_cap: Money,
}

impl From<&CumulativeResult> for CumulativeReport {
    fn from(r: &CumulativeResult) -> Self {
        Self {
            violations: r.individual_results.iter().map(Into::into).collect(),
            uncapped_total: r.uncapped_total,
            statutory_cap: r.statutory_cap,
            capped_total: r.capped_total,
            cap_applied: r.cap_applied,
            amount_saved_by_cap: r.amount_saved_by_cap,
        }
    }
}

// =============================================================================
// Investment analysis
// =============================================================================

/// One period of the cash-flow chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowPoint {
    /// Period index, 0 first
    pub period: u32,
    /// Gross benefits
    pub benefits: Money,
    /// Gross costs
    pub costs: Money,
    /// Benefits minus costs
    pub net_amount: Money,
    /// Running net total
    pub cumulative: Money,
}

/// Deterministic metrics at the case rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialReport {
    /// Net present value
    pub npv: Money,
    /// IRR; `None` when undefined
    pub irr: Option<Decimal>,
    /// Payback period in periods
    pub payback_period: Option<Decimal>,
    /// Discounted payback period
    pub discounted_payback_period: Option<Decimal>,
    /// Undiscounted return on investment
    pub roi: Option<Decimal>,
    /// Discounted benefit/cost ratio
    pub benefit_cost_ratio: Option<Decimal>,
    /// Per-period chart data
    pub cash_flow: Vec<CashFlowPoint>,
}

impl FinancialReport {
    /// Combines the metrics with the cash flow they were computed from.
    pub fn new(result: &FinancialResult, cash_flow: &CashFlow) -> Self {
        let cash_flow = cash_flow
            .entries()
            .iter()
            .zip(result.cumulative_cash_flow.iter())
            .map(|(entry, cumulative)| CashFlowPoint {
                period: entry.period,
                benefits: entry.benefits,
                costs: entry.costs,
                net_amount: entry.net_amount,
                cumulative: *cumulative,
            })
            .collect();
        Self {
            npv: result.npv,
            irr: result.irr,
            payback_period: result.payback_period,
            discounted_payback_period: result.discounted_payback_period,
            roi: result.roi,
            benefit_cost_ratio: result.benefit_cost_ratio,
            cash_flow,
        }
    }
}

/// One histogram bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Lower edge
    pub lower: Money,
    /// Upper edge
    pub upper: Money,
    /// Trials in the bin
    pub count: usize,
}

fn histogram_bins(histogram: &Histogram) -> Vec<HistogramBin> {
    histogram
        .bin_edges
        .windows(2)
        .zip(histogram.counts.iter())
        .map(|(edges, count)| HistogramBin {
            lower: edges[0],
            upper: edges[1],
            count: *count,
        })
        .collect()
}

/// Monte Carlo summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloReport {
    /// Trials requested
    pub n_trials: usize,
    /// Trials summarised
    pub completed_trials: usize,
    /// Run was cancelled early
    pub cancelled: bool,
    /// Seed used
    pub seed: u64,
    /// Share of trials with NPV > 0
    pub probability_npv_positive: f64,
    /// 5th percentile NPV
    pub npv_p5: Money,
    /// Median NPV
    pub npv_p50: Money,
    /// 95th percentile NPV
    pub npv_p95: Money,
    /// Mean NPV
    pub npv_mean: Option<Money>,
    /// NPV standard deviation
    pub npv_std_dev: Option<Money>,
    /// Lowest NPV
    pub npv_min: Money,
    /// Highest NPV
    pub npv_max: Money,
    /// 5th percentile IRR over trials with a defined IRR
    pub irr_p5: Option<Decimal>,
    /// Median IRR
    pub irr_p50: Option<Decimal>,
    /// 95th percentile IRR
    pub irr_p95: Option<Decimal>,
    /// Trials with a defined IRR
    pub irr_defined_trials: usize,
    /// NPV histogram
    pub histogram: Vec<HistogramBin>,
}

impl From<&SimulationResult> for MonteCarloReport {
    fn from(r: &SimulationResult) -> Self {
        let irr = |pick: fn(&Percentiles) -> Decimal| r.irr_percentiles.as_ref().map(pick);
        Self {
            n_trials: r.n_trials,
            completed_trials: r.completed_trials,
            cancelled: r.cancelled,
            seed: r.seed,
            probability_npv_positive: r.probability_npv_positive,
            npv_p5: r.npv_percentiles.p5,
            npv_p50: r.npv_percentiles.p50,
            npv_p95: r.npv_percentiles.p95,
            npv_mean: r.npv_mean,
            npv_std_dev: r.npv_std_dev,
            npv_min: r.npv_min,
            npv_max: r.npv_max,
            irr_p5: irr(|p| p.p5),
            irr_p50: irr(|p| p.p50),
            irr_p95: irr(|p| p.p95),
            irr_defined_trials: r.irr_defined_trials,
            histogram: histogram_bins(&r.histogram),
        }
    }
}

/// One tornado bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitivityReport {
    /// Variable name
    pub variable: String,
    /// NPV change at `1 − δ`
    pub low_impact_on_npv: Money,
    /// NPV change at `1 + δ`
    pub high_impact_on_npv: Money,
}

impl From<&SensitivityEntry> for SensitivityReport {
    fn from(e: &SensitivityEntry) -> Self {
        Self {
            variable: e.variable_name.clone(),
            low_impact_on_npv: e.low_impact_on_npv,
            high_impact_on_npv: e.high_impact_on_npv,
        }
    }
}

/// One scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Scenario name
    pub scenario: String,
    /// Benefit factor
    pub benefit_multiplier: Decimal,
    /// Cost factor
    pub cost_multiplier: Decimal,
    /// Scaled undiscounted benefits
    pub total_benefits: Money,
    /// Scaled undiscounted costs
    pub total_costs: Money,
    /// NPV
    pub npv: Money,
}

impl From<&ScenarioResult> for ScenarioReport {
    fn from(r: &ScenarioResult) -> Self {
        Self {
            scenario: r.scenario_name.clone(),
            benefit_multiplier: r.benefit_multiplier,
            cost_multiplier: r.cost_multiplier,
            total_benefits: r.total_benefits,
            total_costs: r.total_costs,
            npv: r.npv,
        }
    }
}

/// `{financial, monte_carlo, sensitivity, scenarios}` for one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentAnalysisReport {
    /// Deterministic metrics
    pub financial: FinancialReport,
    /// Simulation summary
    pub monte_carlo: MonteCarloReport,
    /// Tornado entries, largest impact first
    pub sensitivity: Vec<SensitivityReport>,
    /// Pessimistic, most likely, optimistic
    pub scenarios: Vec<ScenarioReport>,
}
