//! Investment case assumptions.

use crate::cashflow::broadcast_value;
use regrisk_core::types::{
    checked_scale, checked_sum, ensure_non_negative, EngineError, Money, Rate,
};
use rust_decimal::Decimal;
use serde::Serialize;

/// Longest supported horizon (50 years of monthly periods).
pub const MAX_HORIZON_PERIODS: u32 = 600;

/// Largest undiscounted benefit or cost total over the horizon (1e24).
///
/// Leaves room for scaling by multipliers of several thousand before the
/// 96-bit decimal range is exhausted.
pub const MAX_CASE_TOTAL: Money =
    Decimal::from_parts(2_701_131_776, 466_537_709, 54_210, false, 0);

/// Cost/benefit assumptions for one compliance investment.
///
/// Recurring lists are indexed from period 1. A list shorter than the
/// horizon is broadcast by repeating its last value; a longer one is
/// truncated; an empty list contributes nothing. See
/// [`CashFlowBuilder`](crate::CashFlowBuilder) for how the lists become
/// periods.
///
/// # Invariants
///
/// - `0 < discount_rate < 1`
/// - `1 <= horizon_periods <= MAX_HORIZON_PERIODS`
/// - every amount is non-negative
/// - total benefits and total costs over the horizon are at most
///   [`MAX_CASE_TOTAL`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InvestmentCase {
    discount_rate: Rate,
    horizon_periods: u32,
    one_time_costs: Vec<Money>,
    recurring_costs: Vec<Money>,
    one_time_benefits: Vec<Money>,
    recurring_benefits: Vec<Money>,
}

impl InvestmentCase {
    /// Starts a builder.
    pub fn builder(discount_rate: Rate, horizon_periods: u32) -> InvestmentCaseBuilder {
        InvestmentCaseBuilder {
            case: InvestmentCase {
                discount_rate,
                horizon_periods,
                one_time_costs: Vec::new(),
                recurring_costs: Vec::new(),
                one_time_benefits: Vec::new(),
                recurring_benefits: Vec::new(),
            },
        }
    }

    /// Discount rate per period.
    #[inline]
    pub fn discount_rate(&self) -> Rate {
        self.discount_rate
    }

    /// Number of periods after the initial outlay.
    #[inline]
    pub fn horizon_periods(&self) -> u32 {
        self.horizon_periods
    }

    /// Up-front costs, booked in period 0.
    pub fn one_time_costs(&self) -> &[Money] {
        &self.one_time_costs
    }

    /// Per-period running costs from period 1.
    pub fn recurring_costs(&self) -> &[Money] {
        &self.recurring_costs
    }

    /// One-off benefits.
    pub fn one_time_benefits(&self) -> &[Money] {
        &self.one_time_benefits
    }

    /// Per-period benefits from period 1.
    pub fn recurring_benefits(&self) -> &[Money] {
        &self.recurring_benefits
    }

    /// Adds an expected avoided penalty to every period's benefits.
    ///
    /// The expected value is `amount × annual_probability`, typically the
    /// capped total of a cumulative penalty assessment weighted by the
    /// likelihood of enforcement.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidInput` if `amount < 0` or the probability is
    /// outside `[0, 1]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use regrisk_finance::InvestmentCase;
    /// use rust_decimal_macros::dec;
    ///
    /// let case = InvestmentCase::builder(dec!(0.08), 3)
    ///     .recurring_benefits(vec![dec!(100)])
    ///     .build()
    ///     .unwrap()
    ///     .with_avoided_penalty(dec!(2_000_000), dec!(0.25))
    ///     .unwrap();
    ///
    /// assert_eq!(case.recurring_benefits(), &[dec!(500_100), dec!(500_100), dec!(500_100)]);
    /// ```
    pub fn with_avoided_penalty(
        mut self,
        amount: Money,
        annual_probability: Decimal,
    ) -> Result<Self, EngineError> {
        ensure_non_negative(amount, "avoided penalty")?;
        if annual_probability < Decimal::ZERO || annual_probability > Decimal::ONE {
            return Err(EngineError::InvalidInput(format!(
                "annual_probability must be in [0, 1], got {}",
                annual_probability
            )));
        }
        let expected = checked_scale(amount, annual_probability, "expected avoided penalty")?;
        self.recurring_benefits = (0..self.horizon_periods as usize)
            .map(|i| {
                broadcast_value(&self.recurring_benefits, i)
                    .checked_add(expected)
                    .ok_or_else(|| {
                        EngineError::invalid_input("recurring benefit is outside the decimal range")
                    })
            })
            .collect::<Result<_, _>>()?;
        self.validate()?;
        Ok(self)
    }

    /// Returns a copy with each component scaled by its factor.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidInput` if any factor is negative or the scaled
    /// totals exceed [`MAX_CASE_TOTAL`].
    pub fn adjusted(&self, adjustment: &CaseAdjustment) -> Result<Self, EngineError> {
        adjustment.validate()?;
        let scale = |amounts: &[Money], factor: Decimal, name: &str| {
            amounts
                .iter()
                .map(|a| checked_scale(*a, factor, name))
                .collect::<Result<Vec<Money>, EngineError>>()
        };
        let scaled = Self {
            discount_rate: self.discount_rate,
            horizon_periods: self.horizon_periods,
            one_time_costs: scale(
                &self.one_time_costs,
                adjustment.one_time_costs,
                "one_time_costs",
            )?,
            recurring_costs: scale(
                &self.recurring_costs,
                adjustment.recurring_costs,
                "recurring_costs",
            )?,
            one_time_benefits: scale(
                &self.one_time_benefits,
                adjustment.one_time_benefits,
                "one_time_benefits",
            )?,
            recurring_benefits: scale(
                &self.recurring_benefits,
                adjustment.recurring_benefits,
                "recurring_benefits",
            )?,
        };
        scaled.validate()?;
        Ok(scaled)
    }

    /// Undiscounted total over the horizon of a one-off list and a
    /// broadcast recurring list.
    fn horizon_total(
        &self,
        one_time: &[Money],
        recurring: &[Money],
        name: &str,
    ) -> Result<Money, EngineError> {
        let periods = (0..self.horizon_periods as usize).map(|i| broadcast_value(recurring, i));
        let total = checked_sum(one_time.iter().copied().chain(periods), name)?;
        if total > MAX_CASE_TOTAL {
            return Err(EngineError::InvalidInput(format!(
                "{} over the horizon is {}, above the supported maximum {}",
                name, total, MAX_CASE_TOTAL
            )));
        }
        Ok(total)
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.discount_rate <= Decimal::ZERO || self.discount_rate >= Decimal::ONE {
            return Err(EngineError::InvalidInput(format!(
                "discount_rate must be in (0, 1), got {}",
                self.discount_rate
            )));
        }
        if self.horizon_periods == 0 || self.horizon_periods > MAX_HORIZON_PERIODS {
            return Err(EngineError::InvalidInput(format!(
                "horizon_periods must be in 1..={}, got {}",
                MAX_HORIZON_PERIODS, self.horizon_periods
            )));
        }
        let lists = [
            ("one_time_costs", &self.one_time_costs),
            ("recurring_costs", &self.recurring_costs),
            ("one_time_benefits", &self.one_time_benefits),
            ("recurring_benefits", &self.recurring_benefits),
        ];
        for (name, amounts) in lists {
            for amount in amounts.iter() {
                ensure_non_negative(*amount, name)?;
            }
        }
        self.horizon_total(&self.one_time_benefits, &self.recurring_benefits, "total benefits")?;
        self.horizon_total(&self.one_time_costs, &self.recurring_costs, "total costs")?;
        Ok(())
    }
}

/// Builder for [`InvestmentCase`].
#[derive(Clone, Debug)]
pub struct InvestmentCaseBuilder {
    case: InvestmentCase,
}

impl InvestmentCaseBuilder {
    /// Adds an up-front cost.
    pub fn one_time_cost(mut self, amount: Money) -> Self {
        self.case.one_time_costs.push(amount);
        self
    }

    /// Replaces the up-front costs.
    pub fn one_time_costs(mut self, amounts: Vec<Money>) -> Self {
        self.case.one_time_costs = amounts;
        self
    }

    /// Replaces the per-period running costs.
    pub fn recurring_costs(mut self, amounts: Vec<Money>) -> Self {
        self.case.recurring_costs = amounts;
        self
    }

    /// Adds a one-off benefit.
    pub fn one_time_benefit(mut self, amount: Money) -> Self {
        self.case.one_time_benefits.push(amount);
        self
    }

    /// Replaces the one-off benefits.
    pub fn one_time_benefits(mut self, amounts: Vec<Money>) -> Self {
        self.case.one_time_benefits = amounts;
        self
    }

    /// Replaces the per-period benefits.
    pub fn recurring_benefits(mut self, amounts: Vec<Money>) -> Self {
        self.case.recurring_benefits = amounts;
        self
    }

    /// Validates and builds the case.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidInput` if any invariant of [`InvestmentCase`]
    /// is violated.
    pub fn build(self) -> Result<InvestmentCase, EngineError> {
        self.case.validate()?;
        Ok(self.case)
    }
}

/// Per-component scale factors applied by [`InvestmentCase::adjusted`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaseAdjustment {
    /// Factor on up-front costs
    pub one_time_costs: Decimal,
    /// Factor on running costs
    pub recurring_costs: Decimal,
    /// Factor on one-off benefits
    pub one_time_benefits: Decimal,
    /// Factor on recurring benefits
    pub recurring_benefits: Decimal,
}

impl Default for CaseAdjustment {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CaseAdjustment {
    /// Leaves every component unchanged.
    pub const IDENTITY: Self = Self {
        one_time_costs: Decimal::ONE,
        recurring_costs: Decimal::ONE,
        one_time_benefits: Decimal::ONE,
        recurring_benefits: Decimal::ONE,
    };

    /// Scales all benefits by `benefit` and all costs by `cost`.
    pub fn uniform(benefit: Decimal, cost: Decimal) -> Self {
        Self {
            one_time_costs: cost,
            recurring_costs: cost,
            one_time_benefits: benefit,
            recurring_benefits: benefit,
        }
    }

    fn validate(&self) -> Result<(), EngineError> {
        ensure_non_negative(self.one_time_costs, "one_time_costs factor")?;
        ensure_non_negative(self.recurring_costs, "recurring_costs factor")?;
        ensure_non_negative(self.one_time_benefits, "one_time_benefits factor")?;
        ensure_non_negative(self.recurring_benefits, "recurring_benefits factor")
    }
}
