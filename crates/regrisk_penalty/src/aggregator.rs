//! Cumulative penalty aggregation under a statutory cap.

use crate::calculator::{PenaltyCalculator, PenaltyResult};
use crate::violation::ViolationInstance;
use regrisk_core::types::{checked_sum, ensure_positive, EngineError, Money};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::info;

/// Default cap on the aggregate fine: 2% of annual revenue.
pub const DEFAULT_MAX_CUMULATIVE_FRACTION: Decimal = dec!(0.02);

/// Aggregate of several violations after the statutory cap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CumulativeResult {
    /// Per-violation results, in input order
    pub individual_results: Vec<PenaltyResult>,
    /// Sum of individual final fines
    pub uncapped_total: Money,
    /// `annual_revenue × max_cumulative_fraction`
    pub statutory_cap: Money,
    /// `min(uncapped_total, statutory_cap)`
    pub capped_total: Money,
    /// `uncapped_total > statutory_cap`
    pub cap_applied: bool,
    /// `max(0, uncapped_total − statutory_cap)`
    pub amount_saved_by_cap: Money,
}

impl CumulativeResult {
    fn empty() -> Self {
        Self {
            individual_results: Vec::new(),
            uncapped_total: Decimal::ZERO,
            statutory_cap: Decimal::ZERO,
            capped_total: Decimal::ZERO,
            cap_applied: false,
            amount_saved_by_cap: Decimal::ZERO,
        }
    }
}

/// Combines several violations against one entity under a revenue cap.
///
/// Each violation is priced independently by the inner
/// [`PenaltyCalculator`]; the individual fines are summed and the sum is
/// limited to `annual_revenue × max_cumulative_fraction`.
///
/// # Examples
///
/// ```
/// use regrisk_penalty::{CumulativePenaltyAggregator, ViolationCategory, ViolationInstance};
/// use rust_decimal_macros::dec;
///
/// let revenue = dec!(100_000_000);
/// let violations = vec![
///     ViolationInstance::new(ViolationCategory::IncidentNonReporting, revenue).unwrap(),
///     ViolationInstance::new(ViolationCategory::GovernanceFailure, revenue).unwrap(),
/// ];
///
/// let result = CumulativePenaltyAggregator::standard()
///     .aggregate(&violations, revenue)
///     .unwrap();
/// assert_eq!(result.uncapped_total, dec!(3_000_000));
/// assert_eq!(result.capped_total, dec!(2_000_000));
/// assert!(result.cap_applied);
/// ```
#[derive(Clone, Debug)]
pub struct CumulativePenaltyAggregator {
    calculator: PenaltyCalculator,
    max_cumulative_fraction: Decimal,
}

impl Default for CumulativePenaltyAggregator {
    fn default() -> Self {
        Self::standard()
    }
}

impl CumulativePenaltyAggregator {
    /// Aggregator over `calculator` with the default 2% cap.
    pub fn new(calculator: PenaltyCalculator) -> Self {
        Self {
            calculator,
            max_cumulative_fraction: DEFAULT_MAX_CUMULATIVE_FRACTION,
        }
    }

    /// Standard schedule, baseline classifier, 2% cap.
    pub fn standard() -> Self {
        Self::new(PenaltyCalculator::standard())
    }

    /// Replaces the cap fraction.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidInput` unless `0 < fraction <= 1`.
    pub fn with_max_cumulative_fraction(mut self, fraction: Decimal) -> Result<Self, EngineError> {
        if fraction <= Decimal::ZERO || fraction > Decimal::ONE {
            return Err(EngineError::InvalidInput(format!(
                "max_cumulative_fraction must be in (0, 1], got {}",
                fraction
            )));
        }
        self.max_cumulative_fraction = fraction;
        Ok(self)
    }

    /// Cap fraction in use.
    #[inline]
    pub fn max_cumulative_fraction(&self) -> Decimal {
        self.max_cumulative_fraction
    }

    /// Inner single-violation calculator.
    #[inline]
    pub fn calculator(&self) -> &PenaltyCalculator {
        &self.calculator
    }

    /// Prices every violation and applies the statutory cap.
    ///
    /// An empty list yields an all-zero result with `cap_applied = false`.
    ///
    /// # Errors
    ///
    /// - `EngineError::InvalidInput` if `annual_revenue <= 0` or the summed
    ///   fines leave the decimal range
    /// - any error from pricing an individual violation
    pub fn aggregate(
        &self,
        violations: &[ViolationInstance],
        annual_revenue: Money,
    ) -> Result<CumulativeResult, EngineError> {
        ensure_positive(annual_revenue, "annual_revenue")?;
        if violations.is_empty() {
            return Ok(CumulativeResult::empty());
        }

        let individual_results = violations
            .iter()
            .map(|v| self.calculator.calculate(v))
            .collect::<Result<Vec<_>, _>>()?;

        let uncapped_total =
            checked_sum(individual_results.iter().map(|r| r.final_fine), "uncapped_total")?;
        let statutory_cap = annual_revenue * self.max_cumulative_fraction;
        let capped_total = uncapped_total.min(statutory_cap);
        let cap_applied = uncapped_total > statutory_cap;
        let amount_saved_by_cap = (uncapped_total - statutory_cap).max(Decimal::ZERO);

        if cap_applied {
            info!(
                violations = individual_results.len(),
                uncapped_total = %uncapped_total,
                statutory_cap = %statutory_cap,
                amount_saved_by_cap = %amount_saved_by_cap,
                "statutory cap applied"
            );
        } else {
            info!(
                violations = individual_results.len(),
                total = %uncapped_total,
                "penalties aggregated"
            );
        }

        Ok(CumulativeResult {
            individual_results,
            uncapped_total,
            statutory_cap,
            capped_total,
            cap_applied,
            amount_saved_by_cap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SeverityTier, ViolationCategory};

    fn violation(category: ViolationCategory, revenue: Decimal) -> ViolationInstance {
        ViolationInstance::new(category, revenue).unwrap()
    }

    #[test]
    fn test_empty_list_is_all_zero() {
        let r = CumulativePenaltyAggregator::standard()
            .aggregate(&[], dec!(100_000_000))
            .unwrap();
        assert!(r.individual_results.is_empty());
        assert_eq!(r.uncapped_total, Decimal::ZERO);
        assert_eq!(r.statutory_cap, Decimal::ZERO);
        assert_eq!(r.capped_total, Decimal::ZERO);
        assert_eq!(r.amount_saved_by_cap, Decimal::ZERO);
        assert!(!r.cap_applied);
    }

    #[test]
    fn test_empty_list_still_validates_revenue() {
        let err = CumulativePenaltyAggregator::standard()
            .aggregate(&[], dec!(0))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn test_below_cap_is_untouched() {
        let revenue = dec!(100_000_000);
        let r = CumulativePenaltyAggregator::standard()
            .aggregate(&[violation(ViolationCategory::GovernanceFailure, revenue)], revenue)
            .unwrap();
        assert_eq!(r.uncapped_total, dec!(1_000_000));
        assert_eq!(r.capped_total, dec!(1_000_000));
        assert_eq!(r.statutory_cap, dec!(2_000_000));
        assert!(!r.cap_applied);
        assert_eq!(r.amount_saved_by_cap, Decimal::ZERO);
    }

    #[test]
    fn test_exactly_at_cap_is_not_applied() {
        let revenue = dec!(100_000_000);
        let v = ViolationInstance::builder(ViolationCategory::GovernanceFailure, revenue)
            .severity(SeverityTier::Critical)
            .build()
            .unwrap();
        let r = CumulativePenaltyAggregator::standard()
            .aggregate(&[v], revenue)
            .unwrap();
        assert_eq!(r.uncapped_total, r.statutory_cap);
        assert!(!r.cap_applied);
        assert_eq!(r.capped_total, dec!(2_000_000));
    }

    #[test]
    fn test_custom_fraction() {
        let revenue = dec!(100_000_000);
        let agg = CumulativePenaltyAggregator::standard()
            .with_max_cumulative_fraction(dec!(0.05))
            .unwrap();
        let r = agg
            .aggregate(
                &[
                    violation(ViolationCategory::IncidentNonReporting, revenue),
                    violation(ViolationCategory::ThirdPartyRiskFailure, revenue),
                ],
                revenue,
            )
            .unwrap();
        assert_eq!(r.statutory_cap, dec!(5_000_000));
        assert_eq!(r.capped_total, dec!(3_000_000));
        assert!(!r.cap_applied);
    }

    #[test]
    fn test_rejects_invalid_fraction() {
        let agg = CumulativePenaltyAggregator::standard();
        assert!(agg.clone().with_max_cumulative_fraction(dec!(0)).is_err());
        assert!(agg.clone().with_max_cumulative_fraction(dec!(1.01)).is_err());
        assert!(agg.with_max_cumulative_fraction(dec!(1)).is_ok());
    }

    #[test]
    fn test_order_independent() {
        let revenue = dec!(250_000_000);
        let a = violation(ViolationCategory::IncidentReportingDelay, revenue);
        let b = violation(ViolationCategory::IctRiskManagementFailure, revenue);
        let agg = CumulativePenaltyAggregator::standard();
        let ab = agg.aggregate(&[a.clone(), b.clone()], revenue).unwrap();
        let ba = agg.aggregate(&[b, a], revenue).unwrap();
        assert_eq!(ab.uncapped_total, ba.uncapped_total);
        assert_eq!(ab.capped_total, ba.capped_total);
    }

    #[test]
    fn test_overflowing_total_is_rejected() {
        let revenue = dec!(100_000_000);
        // 100,000 × 5e23 = 5e28 each; the pair exceeds the decimal range
        let v = ViolationInstance::builder(ViolationCategory::RegisterOfInformationGap, revenue)
            .multiplier("systemic", dec!(500_000_000_000_000_000_000_000))
            .build()
            .unwrap();
        let agg = CumulativePenaltyAggregator::standard();
        assert!(agg.aggregate(std::slice::from_ref(&v), revenue).is_ok());

        let err = agg.aggregate(&[v.clone(), v], revenue).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
        assert!(err.to_string().contains("uncapped_total"));
    }
}
