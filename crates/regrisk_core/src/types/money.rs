//! Decimal money and rate types.
//!
//! All monetary amounts and rates are carried as [`rust_decimal::Decimal`].
//! Statutory cap comparisons happen at exact percentage boundaries
//! (e.g. 2% of EUR 100,000,000), which binary floating point cannot
//! represent reliably.
//!
//! Binary floating point is only used inside numerical kernels (root
//! finding, random sampling); values cross back into [`Money`] through
//! [`from_f64`], which rejects non-finite input.

use super::error::EngineError;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, MathematicalOps};

/// Currency-agnostic monetary amount.
pub type Money = Decimal;

/// Rate or fraction (0.05 = 5%).
pub type Rate = Decimal;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Converts a decimal to `f64`.
///
/// Values outside the `f64` range map to `NaN`; callers treat the result
/// as a numerical-kernel input only.
///
/// # Examples
///
/// ```
/// use regrisk_core::types::to_f64;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(to_f64(dec!(0.25)), 0.25);
/// ```
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Converts an `f64` to a decimal.
///
/// # Errors
///
/// Returns `EngineError::InvalidInput` when `value` is NaN, infinite or
/// outside the decimal range.
///
/// # Examples
///
/// ```
/// use regrisk_core::types::from_f64;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(from_f64(1.5, "multiplier").unwrap(), dec!(1.5));
/// assert!(from_f64(f64::NAN, "multiplier").is_err());
/// ```
pub fn from_f64(value: f64, name: &str) -> Result<Decimal, EngineError> {
    if !value.is_finite() {
        return Err(EngineError::InvalidInput(format!(
            "{} must be finite, got {}",
            name, value
        )));
    }
    Decimal::from_f64(value).ok_or_else(|| {
        EngineError::InvalidInput(format!("{} = {} is outside the decimal range", name, value))
    })
}

/// Rejects values that are zero or negative.
pub fn ensure_positive(value: Decimal, name: &str) -> Result<(), EngineError> {
    if value <= Decimal::ZERO {
        return Err(EngineError::InvalidInput(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Rejects negative values.
pub fn ensure_non_negative(value: Decimal, name: &str) -> Result<(), EngineError> {
    if value < Decimal::ZERO {
        return Err(EngineError::InvalidInput(format!(
            "{} must be non-negative, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Returns `part / whole × 100`.
///
/// # Errors
///
/// `EngineError::InvalidInput` if `whole` is zero or the ratio leaves the
/// decimal range.
///
/// # Examples
///
/// ```
/// use regrisk_core::types::percentage_of;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(percentage_of(dec!(2_000_000), dec!(100_000_000)).unwrap(), dec!(2));
/// ```
pub fn percentage_of(part: Decimal, whole: Decimal) -> Result<Decimal, EngineError> {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
        .ok_or_else(|| {
            EngineError::InvalidInput(format!(
                "{} as a percentage of {} is outside the decimal range",
                part, whole
            ))
        })
}

/// Multiplies `amount` by `factor`, naming `what` if the product overflows.
pub fn checked_scale(amount: Decimal, factor: Decimal, what: &str) -> Result<Decimal, EngineError> {
    amount.checked_mul(factor).ok_or_else(|| {
        EngineError::InvalidInput(format!(
            "{} ({} × {}) is outside the decimal range",
            what, amount, factor
        ))
    })
}

/// Sums `amounts`, naming `what` if the total overflows.
///
/// ```
/// use regrisk_core::types::checked_sum;
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(checked_sum([dec!(1), dec!(2.5)], "total").unwrap(), dec!(3.5));
/// assert!(checked_sum([Decimal::MAX, dec!(1)], "total").is_err());
/// ```
pub fn checked_sum<I>(amounts: I, what: &str) -> Result<Decimal, EngineError>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, x| acc.checked_add(x))
        .ok_or_else(|| EngineError::InvalidInput(format!("{} is outside the decimal range", what)))
}

/// Computes the discount factor denominator `(1 + rate)^period`.
///
/// # Errors
///
/// Returns `EngineError::InvalidInput` if `rate <= -1` or the power
/// overflows the decimal range.
///
/// # Examples
///
/// ```
/// use regrisk_core::types::discount_factor;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(discount_factor(dec!(0.1), 2).unwrap(), dec!(1.21));
/// ```
pub fn discount_factor(rate: Rate, period: u32) -> Result<Decimal, EngineError> {
    if rate <= Decimal::NEGATIVE_ONE {
        return Err(EngineError::InvalidInput(format!(
            "discount rate must be greater than -1, got {}",
            rate
        )));
    }
    (Decimal::ONE + rate)
        .checked_powu(u64::from(period))
        .ok_or_else(|| {
            EngineError::InvalidInput(format!(
                "(1 + {})^{} overflows the decimal range",
                rate, period
            ))
        })
}

/// Discounts `amount` received at `period` back to period 0.
///
/// A discount factor beyond the decimal range discounts the amount to
/// zero: the present value is below decimal resolution.
///
/// # Errors
///
/// Returns `EngineError::InvalidInput` if `rate <= -1`, or if the factor
/// underflows to zero (rates very close to -1 over long horizons).
///
/// # Examples
///
/// ```
/// use regrisk_core::types::present_value;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(present_value(dec!(121), dec!(0.1), 2).unwrap(), dec!(100));
/// ```
pub fn present_value(amount: Money, rate: Rate, period: u32) -> Result<Money, EngineError> {
    let factor = match discount_factor(rate, period) {
        Ok(factor) => factor,
        Err(_) if rate > Decimal::NEGATIVE_ONE => return Ok(Decimal::ZERO),
        Err(err) => return Err(err),
    };
    if amount.is_zero() {
        return Ok(Decimal::ZERO);
    }
    amount.checked_div(factor).ok_or_else(|| {
        EngineError::InvalidInput(format!(
            "discount factor (1 + {})^{} underflows the decimal range",
            rate, period
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_trip_through_f64() {
        let value = dec!(1234.5);
        assert_relative_eq!(to_f64(value), 1234.5);
        assert_eq!(from_f64(1234.5, "value").unwrap(), value);
    }

    #[test]
    fn test_from_f64_rejects_non_finite() {
        assert!(matches!(
            from_f64(f64::INFINITY, "rate"),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(from_f64(f64::NEG_INFINITY, "rate").is_err());
    }

    #[test]
    fn test_percentage_of_tiny_whole_is_an_error() {
        // 100,000 / 1e-22 fits, but × 100 does not
        let err = percentage_of(dec!(100_000), dec!(0.0000000000000000000001)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
        assert!(percentage_of(Decimal::MAX, dec!(0.5)).is_err());
    }

    #[test]
    fn test_checked_scale_and_sum() {
        assert_eq!(checked_scale(dec!(2_000_000), dec!(1.5), "fine").unwrap(), dec!(3_000_000));
        let huge = dec!(100_000_000_000_000_000_000);
        let err = checked_scale(huge, huge, "fine").unwrap_err();
        assert!(err.to_string().contains("fine"));
        assert_eq!(checked_sum(Vec::new(), "total").unwrap(), Decimal::ZERO);
        assert!(checked_sum([Decimal::MAX, Decimal::MAX], "total").is_err());
    }

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive(dec!(0.01), "revenue").is_ok());
        assert!(ensure_positive(Decimal::ZERO, "revenue").is_err());
        assert!(ensure_positive(dec!(-5), "revenue").is_err());
    }

    #[test]
    fn test_ensure_non_negative() {
        assert!(ensure_non_negative(Decimal::ZERO, "cost").is_ok());
        let err = ensure_non_negative(dec!(-1), "cost").unwrap_err();
        assert!(err.to_string().contains("cost must be non-negative"));
    }

    #[test]
    fn test_percentage_of_zero_whole() {
        assert!(percentage_of(dec!(5), Decimal::ZERO).is_err());
        assert_eq!(percentage_of(dec!(1), dec!(8)).unwrap(), dec!(12.5));
    }

    #[test]
    fn test_discount_factor() {
        assert_eq!(discount_factor(dec!(0.05), 0).unwrap(), Decimal::ONE);
        assert_eq!(discount_factor(dec!(0.05), 1).unwrap(), dec!(1.05));
        assert_eq!(discount_factor(dec!(-0.5), 2).unwrap(), dec!(0.25));
    }

    #[test]
    fn test_discount_factor_rejects_rate_at_minus_one() {
        assert!(discount_factor(Decimal::NEGATIVE_ONE, 1).is_err());
        assert!(discount_factor(dec!(-1.5), 1).is_err());
    }

    #[test]
    fn test_present_value() {
        assert_eq!(present_value(dec!(100), dec!(0.05), 0).unwrap(), dec!(100));
        assert_eq!(present_value(dec!(105), dec!(0.05), 1).unwrap(), dec!(100));
        assert!(present_value(dec!(1), Decimal::NEGATIVE_ONE, 1).is_err());
    }

    #[test]
    fn test_present_value_beyond_decimal_range_is_zero() {
        // 10^40 does not fit a 96-bit mantissa
        assert_eq!(present_value(dec!(1_000), dec!(9), 40).unwrap(), Decimal::ZERO);
    }
}
