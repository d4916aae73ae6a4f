//! Order statistics and moments over decimal samples.
//!
//! Quantiles use linear interpolation between order statistics
//! (Hyndman & Fan type 7, the default of most statistics packages):
//!
//! ```text
//! h = (n - 1) · p
//! Q(p) = x[⌊h⌋] + (h - ⌊h⌋) · (x[⌊h⌋ + 1] - x[⌊h⌋])
//! ```
//!
//! All arithmetic stays in [`Decimal`], so a summary computed twice from
//! the same samples is bit-identical.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// The 5th, 50th and 95th percentiles of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percentiles {
    /// 5th percentile
    pub p5: Decimal,
    /// Median
    pub p50: Decimal,
    /// 95th percentile
    pub p95: Decimal,
}

impl Percentiles {
    /// Computes p5/p50/p95 from an ascending-sorted sample.
    ///
    /// Returns `None` for an empty sample.
    pub fn from_sorted(sorted: &[Decimal]) -> Option<Self> {
        Some(Self {
            p5: quantile(sorted, dec!(0.05))?,
            p50: quantile(sorted, dec!(0.50))?,
            p95: quantile(sorted, dec!(0.95))?,
        })
    }
}

/// Linear-interpolation quantile of an ascending-sorted sample.
///
/// `p` is clamped to `[0, 1]`. Returns `None` for an empty sample.
///
/// # Examples
///
/// ```
/// use regrisk_core::math::statistics::quantile;
/// use rust_decimal_macros::dec;
///
/// let sorted = [dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)];
/// assert_eq!(quantile(&sorted, dec!(0.5)), Some(dec!(3)));
/// assert_eq!(quantile(&sorted, dec!(0.1)), Some(dec!(1.4)));
/// ```
pub fn quantile(sorted: &[Decimal], p: Decimal) -> Option<Decimal> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let p = p.clamp(Decimal::ZERO, Decimal::ONE);
    let h = Decimal::from(n - 1) * p;
    let lower = h.floor();
    let index = lower.to_usize()?;
    if index + 1 >= n {
        return Some(sorted[n - 1]);
    }
    let fraction = h - lower;
    Some(sorted[index] + fraction * (sorted[index + 1] - sorted[index]))
}

/// Arithmetic mean; `None` for an empty sample or on overflow.
pub fn mean(samples: &[Decimal]) -> Option<Decimal> {
    if samples.is_empty() {
        return None;
    }
    let total = samples
        .iter()
        .try_fold(Decimal::ZERO, |acc, x| acc.checked_add(*x))?;
    total.checked_div(Decimal::from(samples.len()))
}

/// Sample standard deviation (n − 1 denominator).
///
/// Returns zero for a single observation and `None` for an empty sample or
/// on overflow.
pub fn std_dev(samples: &[Decimal]) -> Option<Decimal> {
    let centre = mean(samples)?;
    if samples.len() < 2 {
        return Some(Decimal::ZERO);
    }
    let sum_sq = samples.iter().try_fold(Decimal::ZERO, |acc, x| {
        let diff = *x - centre;
        acc.checked_add(diff.checked_mul(diff)?)
    })?;
    sum_sq
        .checked_div(Decimal::from(samples.len() - 1))?
        .sqrt()
}

/// Fixed-width histogram of a sample, for charting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin edges, `counts.len() + 1` values in ascending order.
    pub bin_edges: Vec<Decimal>,
    /// Observation count per bin. The last bin is closed on the right.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Total number of observations across all bins.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Builds a histogram with `bins` equal-width bins spanning `[min, max]`.
///
/// A degenerate sample (all values equal) yields a single bin. Returns
/// `None` for an empty sample or `bins == 0`.
pub fn histogram(samples: &[Decimal], bins: usize) -> Option<Histogram> {
    if samples.is_empty() || bins == 0 {
        return None;
    }
    let min = samples.iter().copied().min()?;
    let max = samples.iter().copied().max()?;

    if min == max {
        return Some(Histogram {
            bin_edges: vec![min, max],
            counts: vec![samples.len()],
        });
    }

    let width = (max - min) / Decimal::from(bins);
    let bin_edges: Vec<Decimal> = (0..=bins)
        .map(|i| {
            if i == bins {
                max
            } else {
                min + width * Decimal::from(i)
            }
        })
        .collect();

    let mut counts = vec![0usize; bins];
    for x in samples {
        let slot = ((*x - min) / width)
            .floor()
            .to_usize()
            .unwrap_or(bins - 1)
            .min(bins - 1);
        counts[slot] += 1;
    }

    Some(Histogram { bin_edges, counts })
}
