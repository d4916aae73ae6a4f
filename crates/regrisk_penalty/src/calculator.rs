//! Single-violation fine calculation.
//!
//! The calculation order is part of the contract:
//!
//! 1. severity = override, else classifier default
//! 2. parameters = schedule lookup
//! 3. revenue-based fine = revenue × revenue_fraction
//! 4. pre-clamp = max(base_fine, revenue-based fine)
//! 5. base penalty = clamp(pre-clamp, min_fine, max_fine)
//! 6. repeat multiplier, then willful multiplier, then custom multipliers
//!    in list order
//! 7. critical tier with repeat or willful: re-clamp to max_fine
//! 8. fine as percentage of revenue

use crate::classification::{ViolationCategory, ViolationClassifier};
use crate::schedule::{PenaltyScheduleRegistry, SeverityTier};
use crate::violation::ViolationInstance;
use regrisk_core::types::{checked_scale, ensure_positive, percentage_of, EngineError, Money};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// A multiplier as it was applied, with the running fine afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AppliedMultiplier {
    /// "repeat_offence", "willful_violation" or the custom label
    pub name: String,
    /// Factor applied
    pub factor: Decimal,
    /// Fine immediately after this factor
    pub fine_after: Money,
}

/// Fine computed for one violation, with every intermediate value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PenaltyResult {
    /// Violation category
    pub category: ViolationCategory,
    /// Tier actually used
    pub severity: SeverityTier,
    /// Tier base fine
    pub base_fine: Money,
    /// Revenue × tier revenue fraction
    pub revenue_based_fine: Money,
    /// Clamped fine before any multiplier
    pub pre_multiplier_fine: Money,
    /// Multipliers in application order
    pub multipliers_applied: Vec<AppliedMultiplier>,
    /// Final fine
    pub final_fine: Money,
    /// `final_fine / annual_revenue × 100`
    pub fine_as_pct_of_revenue: Decimal,
    /// Whether the critical-tier ceiling reduced the aggravated fine
    pub ceiling_applied: bool,
}

/// Computes the fine for a single violation.
///
/// # Examples
///
/// ```
/// use regrisk_penalty::{PenaltyCalculator, SeverityTier, ViolationCategory, ViolationInstance};
/// use rust_decimal_macros::dec;
///
/// let calculator = PenaltyCalculator::standard();
/// let violation = ViolationInstance::builder(ViolationCategory::GovernanceFailure, dec!(100_000_000))
///     .severity(SeverityTier::Critical)
///     .repeat(true)
///     .willful(true)
///     .build()
///     .unwrap();
///
/// let result = calculator.calculate(&violation).unwrap();
/// // 2,000,000 × 2 × 3 = 12,000,000, re-clamped to the 10,000,000 ceiling
/// assert_eq!(result.final_fine, dec!(10_000_000));
/// assert!(result.ceiling_applied);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PenaltyCalculator {
    registry: PenaltyScheduleRegistry,
    classifier: ViolationClassifier,
}

impl PenaltyCalculator {
    /// Creates a calculator over an explicit schedule and classifier.
    pub fn new(registry: PenaltyScheduleRegistry, classifier: ViolationClassifier) -> Self {
        Self {
            registry,
            classifier,
        }
    }

    /// Calculator over the standard schedule and baseline classifier.
    pub fn standard() -> Self {
        Self::default()
    }

    /// The schedule in use.
    pub fn registry(&self) -> &PenaltyScheduleRegistry {
        &self.registry
    }

    /// The classifier in use.
    pub fn classifier(&self) -> &ViolationClassifier {
        &self.classifier
    }

    /// Calculates the fine for `violation`.
    ///
    /// # Errors
    ///
    /// - `EngineError::InvalidInput` if `annual_revenue <= 0`, or if the
    ///   multiplied fine or its share of revenue leaves the decimal range
    /// - `EngineError::UnknownTier` if the tier is not in the schedule
    pub fn calculate(&self, violation: &ViolationInstance) -> Result<PenaltyResult, EngineError> {
        let revenue = violation.annual_revenue();
        ensure_positive(revenue, "annual_revenue")?;

        let severity = violation
            .severity_override()
            .unwrap_or_else(|| self.classifier.default_severity(violation.category()));
        let params = self.registry.parameters(severity)?;

        let revenue_based_fine = revenue * params.revenue_fraction();
        let pre_clamp = params.base_fine().max(revenue_based_fine);
        let base_penalty = pre_clamp.clamp(params.min_fine(), params.max_fine());

        let mut fine = base_penalty;
        let mut multipliers_applied = Vec::new();
        let mut apply = |name: &str, factor: Decimal, fine: &mut Money| {
            *fine = checked_scale(*fine, factor, &format!("fine after '{}'", name))?;
            multipliers_applied.push(AppliedMultiplier {
                name: name.to_string(),
                factor,
                fine_after: *fine,
            });
            Ok::<(), EngineError>(())
        };

        if violation.is_repeat() {
            apply("repeat_offence", params.repeat_multiplier(), &mut fine)?;
        }
        if violation.is_willful() {
            apply("willful_violation", params.willful_multiplier(), &mut fine)?;
        }
        for custom in violation.custom_multipliers() {
            apply(&custom.name, custom.factor, &mut fine)?;
        }

        let aggravated = violation.is_repeat() || violation.is_willful();
        let mut ceiling_applied = false;
        if severity.has_hard_ceiling() && aggravated && fine > params.max_fine() {
            fine = params.max_fine();
            ceiling_applied = true;
        }

        let fine_as_pct_of_revenue = percentage_of(fine, revenue)?;

        debug!(
            category = %violation.category(),
            severity = %severity,
            base_penalty = %base_penalty,
            final_fine = %fine,
            ceiling_applied,
            "penalty calculated"
        );

        Ok(PenaltyResult {
            category: violation.category(),
            severity,
            base_fine: params.base_fine(),
            revenue_based_fine,
            pre_multiplier_fine: base_penalty,
            multipliers_applied,
            final_fine: fine,
            fine_as_pct_of_revenue,
            ceiling_applied,
        })
    }
}
