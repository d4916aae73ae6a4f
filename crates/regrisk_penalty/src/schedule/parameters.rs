//! Fine parameters for a single severity tier.

use regrisk_core::types::{EngineError, Money, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Multiplier applied to repeat offences.
pub const DEFAULT_REPEAT_MULTIPLIER: Decimal = dec!(2.0);

/// Multiplier applied to willful violations.
pub const DEFAULT_WILLFUL_MULTIPLIER: Decimal = dec!(3.0);

/// Immutable fine parameters for one [`SeverityTier`](super::SeverityTier).
///
/// # Invariants
///
/// - `0 < min_fine ≤ base_fine ≤ max_fine`
/// - `0 < revenue_fraction ≤ 1`
/// - `repeat_multiplier ≥ 1` and `willful_multiplier ≥ 1`
///
/// Construction through [`PenaltyParameters::new`] is the only way to
/// obtain an instance, so every value in circulation satisfies them.
///
/// # Examples
///
/// ```
/// use regrisk_penalty::PenaltyParameters;
/// use rust_decimal_macros::dec;
///
/// let params = PenaltyParameters::new(dec!(10_000), dec!(0.001), dec!(5_000), dec!(500_000)).unwrap();
/// assert_eq!(params.repeat_multiplier(), dec!(2));
///
/// // min_fine above base_fine is rejected
/// assert!(PenaltyParameters::new(dec!(10_000), dec!(0.001), dec!(20_000), dec!(500_000)).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PenaltyParameters {
    base_fine: Money,
    revenue_fraction: Rate,
    min_fine: Money,
    max_fine: Money,
    repeat_multiplier: Decimal,
    willful_multiplier: Decimal,
}

impl PenaltyParameters {
    /// Creates parameters with the default 2.0× repeat and 3.0× willful
    /// multipliers.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidInput` if any invariant is violated.
    pub fn new(
        base_fine: Money,
        revenue_fraction: Rate,
        min_fine: Money,
        max_fine: Money,
    ) -> Result<Self, EngineError> {
        Self::with_multipliers(
            base_fine,
            revenue_fraction,
            min_fine,
            max_fine,
            DEFAULT_REPEAT_MULTIPLIER,
            DEFAULT_WILLFUL_MULTIPLIER,
        )
    }

    /// Creates parameters with explicit aggravating multipliers.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidInput` if any invariant is violated.
    pub fn with_multipliers(
        base_fine: Money,
        revenue_fraction: Rate,
        min_fine: Money,
        max_fine: Money,
        repeat_multiplier: Decimal,
        willful_multiplier: Decimal,
    ) -> Result<Self, EngineError> {
        if min_fine <= Decimal::ZERO {
            return Err(EngineError::InvalidInput(format!(
                "min_fine must be positive, got {}",
                min_fine
            )));
        }
        if !(min_fine <= base_fine && base_fine <= max_fine) {
            return Err(EngineError::InvalidInput(format!(
                "fine bounds must satisfy min_fine <= base_fine <= max_fine, got {} / {} / {}",
                min_fine, base_fine, max_fine
            )));
        }
        if revenue_fraction <= Decimal::ZERO || revenue_fraction > Decimal::ONE {
            return Err(EngineError::InvalidInput(format!(
                "revenue_fraction must be in (0, 1], got {}",
                revenue_fraction
            )));
        }
        if repeat_multiplier < Decimal::ONE || willful_multiplier < Decimal::ONE {
            return Err(EngineError::InvalidInput(format!(
                "aggravating multipliers must be >= 1, got repeat={} willful={}",
                repeat_multiplier, willful_multiplier
            )));
        }
        Ok(Self {
            base_fine,
            revenue_fraction,
            min_fine,
            max_fine,
            repeat_multiplier,
            willful_multiplier,
        })
    }

    /// Flat fine floor for the tier before revenue scaling.
    #[inline]
    pub fn base_fine(&self) -> Money {
        self.base_fine
    }

    /// Fraction of annual revenue used for the revenue-based fine.
    #[inline]
    pub fn revenue_fraction(&self) -> Rate {
        self.revenue_fraction
    }

    /// Lower clamp for the pre-multiplier fine.
    #[inline]
    pub fn min_fine(&self) -> Money {
        self.min_fine
    }

    /// Upper clamp for the pre-multiplier fine (and the critical ceiling).
    #[inline]
    pub fn max_fine(&self) -> Money {
        self.max_fine
    }

    /// Multiplier for repeat offences.
    #[inline]
    pub fn repeat_multiplier(&self) -> Decimal {
        self.repeat_multiplier
    }

    /// Multiplier for willful violations.
    #[inline]
    pub fn willful_multiplier(&self) -> Decimal {
        self.willful_multiplier
    }
}
