//! Violation instances.
//!
//! A [`ViolationInstance`] is validated once, at construction, and is
//! immutable afterwards: create → calculate → discard.

use crate::classification::ViolationCategory;
use crate::schedule::SeverityTier;
use regrisk_core::types::{ensure_positive, EngineError, Money};
use rust_decimal::Decimal;
use serde::Serialize;

/// A named multiplicative adjustment applied after the aggravating factors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CustomMultiplier {
    /// Label recorded in the result (e.g. "cooperation_discount")
    pub name: String,
    /// Strictly positive factor
    pub factor: Decimal,
}

impl CustomMultiplier {
    /// Creates a multiplier.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidInput` if `factor <= 0`.
    pub fn new(name: impl Into<String>, factor: Decimal) -> Result<Self, EngineError> {
        let name = name.into();
        ensure_positive(factor, &format!("custom multiplier '{}'", name))?;
        Ok(Self { name, factor })
    }
}

/// One instance of a regulatory violation.
///
/// # Examples
///
/// ```
/// use regrisk_penalty::{SeverityTier, ViolationCategory, ViolationInstance};
/// use rust_decimal_macros::dec;
///
/// let violation = ViolationInstance::builder(ViolationCategory::GovernanceFailure, dec!(50_000_000))
///     .severity(SeverityTier::Critical)
///     .willful(true)
///     .multiplier("systemic_importance", dec!(1.5))
///     .build()
///     .unwrap();
///
/// assert!(violation.is_willful());
/// assert_eq!(violation.custom_multipliers().len(), 1);
///
/// // Revenue must be positive
/// assert!(ViolationInstance::new(ViolationCategory::GovernanceFailure, dec!(0)).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViolationInstance {
    category: ViolationCategory,
    severity_override: Option<SeverityTier>,
    annual_revenue: Money,
    is_repeat: bool,
    is_willful: bool,
    custom_multipliers: Vec<CustomMultiplier>,
}

impl ViolationInstance {
    /// Creates a first-time, non-willful violation with no adjustments.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidInput` if `annual_revenue <= 0`.
    pub fn new(category: ViolationCategory, annual_revenue: Money) -> Result<Self, EngineError> {
        Self::builder(category, annual_revenue).build()
    }

    /// Starts a builder for a violation.
    pub fn builder(category: ViolationCategory, annual_revenue: Money) -> ViolationInstanceBuilder {
        ViolationInstanceBuilder {
            category,
            severity_override: None,
            annual_revenue,
            is_repeat: false,
            is_willful: false,
            custom_multipliers: Vec::new(),
        }
    }

    /// Violation category.
    #[inline]
    pub fn category(&self) -> ViolationCategory {
        self.category
    }

    /// Caller-supplied tier that replaces the classifier default.
    #[inline]
    pub fn severity_override(&self) -> Option<SeverityTier> {
        self.severity_override
    }

    /// Annual revenue of the sanctioned entity.
    #[inline]
    pub fn annual_revenue(&self) -> Money {
        self.annual_revenue
    }

    /// Repeat offence flag.
    #[inline]
    pub fn is_repeat(&self) -> bool {
        self.is_repeat
    }

    /// Willful violation flag.
    #[inline]
    pub fn is_willful(&self) -> bool {
        self.is_willful
    }

    /// Custom multipliers, in application order.
    #[inline]
    pub fn custom_multipliers(&self) -> &[CustomMultiplier] {
        &self.custom_multipliers
    }
}

/// Builder for [`ViolationInstance`].
#[derive(Clone, Debug)]
pub struct ViolationInstanceBuilder {
    category: ViolationCategory,
    severity_override: Option<SeverityTier>,
    annual_revenue: Money,
    is_repeat: bool,
    is_willful: bool,
    custom_multipliers: Vec<(String, Decimal)>,
}

impl ViolationInstanceBuilder {
    /// Overrides the classifier's default tier.
    pub fn severity(mut self, tier: SeverityTier) -> Self {
        self.severity_override = Some(tier);
        self
    }

    /// Sets an optional tier override.
    pub fn severity_override(mut self, tier: Option<SeverityTier>) -> Self {
        self.severity_override = tier;
        self
    }

    /// Marks the violation as a repeat offence.
    pub fn repeat(mut self, is_repeat: bool) -> Self {
        self.is_repeat = is_repeat;
        self
    }

    /// Marks the violation as willful.
    pub fn willful(mut self, is_willful: bool) -> Self {
        self.is_willful = is_willful;
        self
    }

    /// Appends a custom multiplier; multipliers apply in insertion order.
    pub fn multiplier(mut self, name: impl Into<String>, factor: Decimal) -> Self {
        self.custom_multipliers.push((name.into(), factor));
        self
    }

    /// Validates and builds the instance.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidInput` if revenue is not positive or a custom
    /// factor is not positive.
    pub fn build(self) -> Result<ViolationInstance, EngineError> {
        ensure_positive(self.annual_revenue, "annual_revenue")?;
        let custom_multipliers = self
            .custom_multipliers
            .into_iter()
            .map(|(name, factor)| CustomMultiplier::new(name, factor))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ViolationInstance {
            category: self.category,
            severity_override: self.severity_override,
            annual_revenue: self.annual_revenue,
            is_repeat: self.is_repeat,
            is_willful: self.is_willful,
            custom_multipliers,
        })
    }
}
