//! Named what-if scenarios.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              Scenario Analysis                │
//! ├──────────────────────────────────────────────┤
//! │  ScenarioKind     - pessimistic/likely/optim. │
//! │  ScenarioPreset   - benefit & cost multiplier │
//! │  ScenarioSet      - validated, ordered trio   │
//! │  ScenarioAnalyzer - NPV per preset            │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! A [`ScenarioSet`] only exists if its benefit multipliers are
//! non-decreasing and its cost multipliers non-increasing from
//! pessimistic to optimistic. Since every amount of an investment case is
//! non-negative, NPV is then ordered the same way.

mod engine;
mod presets;

pub use engine::{ScenarioAnalyzer, ScenarioResult};
pub use presets::{ScenarioKind, ScenarioPreset, ScenarioSet};
