//! Per-period cash-flow construction.
//!
//! Period layout for a horizon `H` (always `H + 1` entries):
//!
//! ```text
//! period 0        : − Σ one_time_costs   (+ Σ one_time_benefits if recognised at 0)
//! period 1        : recurring_benefits[0] − recurring_costs[0] (+ Σ one_time_benefits)
//! period t (2..H) : recurring_benefits[t−1] − recurring_costs[t−1]
//! ```
//!
//! Recurring lists are zero-indexed from period 1: `recurring_costs[0]` is
//! the cost of period 1, not of period 0. A list shorter than `H` repeats
//! its last value for the remaining periods (`[10, 20]` over four periods
//! reads as `[10, 20, 20, 20]`); a longer list is truncated at `H`; an
//! empty list contributes zero to every period.

use crate::case::InvestmentCase;
use regrisk_core::types::{checked_sum, EngineError, Money};
use rust_decimal::Decimal;
use serde::Serialize;

/// Value of a broadcast list at zero-based `index`.
pub(crate) fn broadcast_value(amounts: &[Money], index: usize) -> Money {
    amounts
        .get(index)
        .or_else(|| amounts.last())
        .copied()
        .unwrap_or(Decimal::ZERO)
}

/// One period of a cash-flow series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CashFlowEntry {
    /// Period index (0 = investment outlay)
    pub period: u32,
    /// Gross benefits in the period
    pub benefits: Money,
    /// Gross costs in the period
    pub costs: Money,
    /// `benefits − costs`
    pub net_amount: Money,
}

/// Ordered cash-flow series, period 0 first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CashFlow {
    entries: Vec<CashFlowEntry>,
}

impl CashFlow {
    /// Builds a series from net amounts, period 0 first.
    ///
    /// Positive amounts are recorded as benefits, negative ones as costs.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidInput` if `net_amounts` is empty or its gross
    /// benefit or cost total leaves the decimal range.
    ///
    /// # Examples
    ///
    /// ```
    /// use regrisk_finance::CashFlow;
    /// use rust_decimal_macros::dec;
    ///
    /// let cf = CashFlow::from_net_amounts(vec![dec!(-100), dec!(60), dec!(60)]).unwrap();
    /// assert_eq!(cf.horizon_periods(), 2);
    /// assert_eq!(cf.entries()[0].costs, dec!(100));
    /// ```
    pub fn from_net_amounts(net_amounts: Vec<Money>) -> Result<Self, EngineError> {
        if net_amounts.is_empty() {
            return Err(EngineError::invalid_input(
                "cash flow needs at least the period-0 amount",
            ));
        }
        let entries = net_amounts
            .into_iter()
            .zip(0u32..)
            .map(|(net, period)| CashFlowEntry {
                period,
                benefits: net.max(Decimal::ZERO),
                costs: (-net).max(Decimal::ZERO),
                net_amount: net,
            })
            .collect::<Vec<CashFlowEntry>>();
        checked_sum(entries.iter().map(|e| e.benefits), "total benefits")?;
        checked_sum(entries.iter().map(|e| e.costs), "total costs")?;
        Ok(Self { entries })
    }

    /// Entries in period order.
    #[inline]
    pub fn entries(&self) -> &[CashFlowEntry] {
        &self.entries
    }

    /// Number of periods including period 0.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false` for a built series.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Periods after the outlay.
    pub fn horizon_periods(&self) -> u32 {
        self.entries.last().map(|e| e.period).unwrap_or(0)
    }

    /// Net amounts in period order.
    pub fn net_amounts(&self) -> impl Iterator<Item = Money> + '_ {
        self.entries.iter().map(|e| e.net_amount)
    }

    /// Running sum of net amounts.
    pub fn cumulative(&self) -> Vec<Money> {
        self.entries
            .iter()
            .scan(Decimal::ZERO, |acc, e| {
                *acc += e.net_amount;
                Some(*acc)
            })
            .collect()
    }

    /// Undiscounted gross benefits.
    ///
    /// Every constructor bounds this total, so the sum cannot overflow.
    pub fn total_benefits(&self) -> Money {
        self.entries.iter().map(|e| e.benefits).sum()
    }

    /// Undiscounted gross costs.
    pub fn total_costs(&self) -> Money {
        self.entries.iter().map(|e| e.costs).sum()
    }
}

/// Turns an [`InvestmentCase`] into a [`CashFlow`].
///
/// # Examples
///
/// ```
/// use regrisk_finance::{CashFlowBuilder, InvestmentCase};
/// use rust_decimal_macros::dec;
///
/// let case = InvestmentCase::builder(dec!(0.1), 3)
///     .one_time_cost(dec!(500))
///     .one_time_benefit(dec!(50))
///     .recurring_benefits(vec![dec!(100), dec!(200)])
///     .build()
///     .unwrap();
///
/// let net: Vec<_> = CashFlowBuilder::new().build(&case).net_amounts().collect();
/// assert_eq!(net, vec![dec!(-500), dec!(150), dec!(200), dec!(200)]);
///
/// let net: Vec<_> = CashFlowBuilder::new()
///     .with_benefits_at_period_zero(true)
///     .build(&case)
///     .net_amounts()
///     .collect();
/// assert_eq!(net, vec![dec!(-450), dec!(100), dec!(200), dec!(200)]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CashFlowBuilder {
    benefits_at_period_zero: bool,
}

impl CashFlowBuilder {
    /// Builder recognising one-off benefits in period 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recognises one-off benefits in period 0 instead of period 1.
    pub fn with_benefits_at_period_zero(mut self, enabled: bool) -> Self {
        self.benefits_at_period_zero = enabled;
        self
    }

    /// Whether one-off benefits land in period 0.
    #[inline]
    pub fn benefits_at_period_zero(&self) -> bool {
        self.benefits_at_period_zero
    }

    /// Builds the `horizon_periods + 1` entry series for `case`.
    pub fn build(&self, case: &InvestmentCase) -> CashFlow {
        let one_time_costs: Money = case.one_time_costs().iter().sum();
        let one_time_benefits: Money = case.one_time_benefits().iter().sum();
        let benefit_period = if self.benefits_at_period_zero { 0 } else { 1 };

        let entries = (0..=case.horizon_periods())
            .map(|period| {
                let (mut benefits, costs) = if period == 0 {
                    (Decimal::ZERO, one_time_costs)
                } else {
                    let index = (period - 1) as usize;
                    (
                        broadcast_value(case.recurring_benefits(), index),
                        broadcast_value(case.recurring_costs(), index),
                    )
                };
                if period == benefit_period {
                    benefits += one_time_benefits;
                }
                CashFlowEntry {
                    period,
                    benefits,
                    costs,
                    net_amount: benefits - costs,
                }
            })
            .collect();

        CashFlow { entries }
    }
}
