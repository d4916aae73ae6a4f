//! Discounted-cash-flow metrics.
//!
//! | Metric | Definition | Undefined when |
//! |---|---|---|
//! | NPV | `Σ cf[t] / (1 + r)^t` | never (for `r > -1`) |
//! | IRR | `r` with `NPV(r) = 0` on `(-0.99, 10)` | no sign change, no bracket, no convergence |
//! | Payback | first crossing of the cumulative sum, interpolated | never recovered |
//! | Discounted payback | payback on discounted flows | never recovered |
//! | ROI | `(Σ benefits − Σ costs) / Σ costs` | `Σ costs = 0` |
//! | Benefit/cost ratio | `PV(benefits) / PV(costs)` | `PV(costs) = 0` |
//!
//! An undefined metric is `None`, never zero.
//!
//! A reported IRR always satisfies `|NPV(irr)| <= 1e-6 × Σ|cf|` in decimal
//! arithmetic. The f64 Brent root is polished by decimal bisection when it
//! misses that bound, which happens for steep series with negative roots.

use crate::cashflow::CashFlow;
use regrisk_core::math::solvers::{find_sign_change, BrentSolver, SolverConfig};
use regrisk_core::types::{
    checked_sum, from_f64, present_value, to_f64, EngineError, Money, Rate,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// Full metric set for one cash-flow series.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FinancialResult {
    /// Net present value
    pub npv: Money,
    /// Internal rate of return
    pub irr: Option<Rate>,
    /// Fractional payback period
    pub payback_period: Option<Decimal>,
    /// Fractional payback on discounted flows
    pub discounted_payback_period: Option<Decimal>,
    /// Undiscounted return on investment
    pub roi: Option<Decimal>,
    /// Discounted benefit/cost ratio
    pub benefit_cost_ratio: Option<Decimal>,
    /// Running sum of net amounts, period 0 first
    pub cumulative_cash_flow: Vec<Money>,
}

/// Largest accepted `|NPV(irr)|` as a fraction of `Σ|cf|` (1e-6).
const IRR_RESIDUAL_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

/// Decimal bisection steps allowed when polishing an IRR.
const MAX_POLISH_STEPS: usize = 200;

/// Evaluates [`CashFlow`] series.
///
/// Holds the IRR solver configuration and the bracketing grid; all metric
/// methods are otherwise pure.
///
/// # Examples
///
/// ```
/// use regrisk_finance::{CashFlow, FinancialMetrics};
/// use rust_decimal_macros::dec;
///
/// let cf = CashFlow::from_net_amounts(vec![dec!(-1000), dec!(1100)]).unwrap();
/// let metrics = FinancialMetrics::default();
///
/// assert_eq!(metrics.npv(&cf, dec!(0.1)).unwrap(), dec!(0));
/// let irr = metrics.irr(&cf).unwrap();
/// assert!((irr - dec!(0.1)).abs() < dec!(0.000001));
/// ```
#[derive(Clone, Debug)]
pub struct FinancialMetrics {
    solver: BrentSolver<f64>,
    grid: Vec<f64>,
}

impl Default for FinancialMetrics {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl FinancialMetrics {
    /// Creates an evaluator with the given IRR solver configuration.
    pub fn new(config: SolverConfig<f64>) -> Self {
        Self {
            solver: BrentSolver::new(config),
            grid: irr_grid(),
        }
    }

    /// Net present value at `rate`.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidInput` if `rate <= -1` or the discounted sum
    /// leaves the decimal range.
    pub fn npv(&self, cash_flow: &CashFlow, rate: Rate) -> Result<Money, EngineError> {
        let flows = discounted(cash_flow.net_amounts(), rate)?;
        checked_sum(flows, "net present value")
    }

    /// Internal rate of return.
    ///
    /// `None` if the series never changes sign, if no bracket exists on
    /// `(-0.99, 10)`, if the solver fails to converge, or if no rate in the
    /// bracket brings the decimal NPV within tolerance of zero.
    pub fn irr(&self, cash_flow: &CashFlow) -> Option<Rate> {
        let flows: Vec<f64> = cash_flow.net_amounts().map(to_f64).collect();
        if flows.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let has_inflow = flows.iter().any(|v| *v > 0.0);
        let has_outflow = flows.iter().any(|v| *v < 0.0);
        if !(has_inflow && has_outflow) {
            return None;
        }

        // Normalise so the solver tolerance is relative to the series size.
        let scale: f64 = flows.iter().map(|v| v.abs()).sum();
        let npv = |r: f64| {
            let growth = 1.0 + r;
            flows
                .iter()
                .enumerate()
                .map(|(t, cf)| cf / scale / growth.powi(t as i32))
                .sum::<f64>()
        };

        let (lo, hi) = find_sign_change(npv, &self.grid)?;
        let root = match self.solver.find_root(npv, lo, hi) {
            Ok(root) => root,
            Err(err) => {
                debug!(error = %err, "IRR solver did not converge");
                return None;
            }
        };

        let magnitude =
            checked_sum(cash_flow.net_amounts().map(|a| a.abs()), "irr scale").ok()?;
        let tolerance = magnitude * IRR_RESIDUAL_TOLERANCE;
        self.polish_irr(
            cash_flow,
            (from_f64(lo, "irr").ok()?, from_f64(hi, "irr").ok()?),
            from_f64(root, "irr").ok()?,
            tolerance,
        )
    }

    /// Returns `guess` if its decimal NPV is within `tolerance`, otherwise
    /// bisects `bracket` in decimal arithmetic until a rate is.
    fn polish_irr(
        &self,
        cash_flow: &CashFlow,
        bracket: (Rate, Rate),
        guess: Rate,
        tolerance: Decimal,
    ) -> Option<Rate> {
        let residual = |rate: Rate| self.npv(cash_flow, rate).ok();
        let within = |value: Decimal| value.abs() <= tolerance;

        let at_guess = residual(guess)?;
        if within(at_guess) {
            return Some(guess);
        }
        let (mut lo, mut hi) = bracket;
        let at_lo = residual(lo)?;
        if within(at_lo) {
            return Some(lo);
        }
        let at_hi = residual(hi)?;
        if within(at_hi) {
            return Some(hi);
        }
        let lo_negative = at_lo.is_sign_negative();
        if lo_negative == at_hi.is_sign_negative() {
            return None;
        }
        if guess > lo && guess < hi {
            if at_guess.is_sign_negative() == lo_negative {
                lo = guess;
            } else {
                hi = guess;
            }
        }

        for _ in 0..MAX_POLISH_STEPS {
            let mid = (lo + hi) / Decimal::TWO;
            if mid <= lo || mid >= hi {
                break;
            }
            let at_mid = residual(mid)?;
            if within(at_mid) {
                return Some(mid);
            }
            if at_mid.is_sign_negative() == lo_negative {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        debug!(guess = %guess, "IRR residual above tolerance after polishing");
        None
    }

    /// Undiscounted fractional payback period.
    pub fn payback_period(&self, cash_flow: &CashFlow) -> Option<Decimal> {
        let flows: Vec<Money> = cash_flow.net_amounts().collect();
        interpolated_payback(&flows)
    }

    /// Payback period on flows discounted at `rate`.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidInput` if `rate <= -1`.
    pub fn discounted_payback_period(
        &self,
        cash_flow: &CashFlow,
        rate: Rate,
    ) -> Result<Option<Decimal>, EngineError> {
        let flows = discounted(cash_flow.net_amounts(), rate)?;
        Ok(interpolated_payback(&flows))
    }

    /// Undiscounted return on investment.
    pub fn roi(&self, cash_flow: &CashFlow) -> Option<Decimal> {
        let costs = cash_flow.total_costs();
        (cash_flow.total_benefits() - costs).checked_div(costs)
    }

    /// Ratio of discounted benefits to discounted costs.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidInput` if `rate <= -1` or a discounted total
    /// leaves the decimal range.
    pub fn benefit_cost_ratio(
        &self,
        cash_flow: &CashFlow,
        rate: Rate,
    ) -> Result<Option<Decimal>, EngineError> {
        let entries = cash_flow.entries();
        let benefits = checked_sum(
            discounted(entries.iter().map(|e| e.benefits), rate)?,
            "discounted benefits",
        )?;
        let costs = checked_sum(
            discounted(entries.iter().map(|e| e.costs), rate)?,
            "discounted costs",
        )?;
        Ok(benefits.checked_div(costs))
    }

    /// Every metric for `cash_flow` at `rate`.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidInput` if `rate <= -1`.
    pub fn evaluate(&self, cash_flow: &CashFlow, rate: Rate) -> Result<FinancialResult, EngineError> {
        let result = FinancialResult {
            npv: self.npv(cash_flow, rate)?,
            irr: self.irr(cash_flow),
            payback_period: self.payback_period(cash_flow),
            discounted_payback_period: self.discounted_payback_period(cash_flow, rate)?,
            roi: self.roi(cash_flow),
            benefit_cost_ratio: self.benefit_cost_ratio(cash_flow, rate)?,
            cumulative_cash_flow: cash_flow.cumulative(),
        };
        debug!(
            npv = %result.npv,
            irr = ?result.irr,
            payback = ?result.payback_period,
            "cash flow evaluated"
        );
        Ok(result)
    }
}

/// Bracketing grid on `(-0.99, 10)`: fine below 100%, coarser above.
fn irr_grid() -> Vec<f64> {
    let fine = (-99..100).map(|i| i as f64 / 100.0);
    let coarse = (10..=100).map(|i| i as f64 / 10.0);
    fine.chain(coarse).collect()
}

fn discounted(
    amounts: impl Iterator<Item = Money>,
    rate: Rate,
) -> Result<Vec<Money>, EngineError> {
    amounts
        .zip(0u32..)
        .map(|(amount, t)| present_value(amount, rate, t))
        .collect()
}

/// First crossing of the running sum, interpolated within the crossing period.
///
/// With `k` the first period whose running sum is non-negative, the
/// payback is `(k − 1) + (−cum[k − 1]) / flows[k]`; an outlay that is
/// already covered in period 0 pays back at 0.
fn interpolated_payback(flows: &[Money]) -> Option<Decimal> {
    let mut cumulative = Decimal::ZERO;
    for (k, flow) in flows.iter().enumerate() {
        let previous = cumulative;
        cumulative += *flow;
        if cumulative >= Decimal::ZERO {
            if k == 0 {
                return Some(Decimal::ZERO);
            }
            let fraction = (-previous).checked_div(*flow)?;
            return Some(Decimal::from(k - 1) + fraction);
        }
    }
    None
}
