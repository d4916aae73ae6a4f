//! Tiered penalty schedule.
//!
//! - [`SeverityTier`]: ordinal classification of violation seriousness
//! - [`PenaltyParameters`]: fine parameters for one tier
//! - [`PenaltyScheduleRegistry`]: validated total map tier → parameters

mod parameters;
mod registry;
mod tier;

pub use parameters::{PenaltyParameters, DEFAULT_REPEAT_MULTIPLIER, DEFAULT_WILLFUL_MULTIPLIER};
pub use registry::PenaltyScheduleRegistry;
pub use tier::SeverityTier;
