//! # regrisk_penalty: Administrative Fine Models (L2)
//!
//! Computes administrative fines for regulatory-violation scenarios under a
//! tiered penalty schedule with statutory caps.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    regrisk_penalty (L2)                  │
//! ├──────────────────────────────────────────────────────────┤
//! │  schedule/       - SeverityTier, PenaltyParameters,      │
//! │                    PenaltyScheduleRegistry               │
//! │  classification  - ViolationCategory → default tier      │
//! │  violation       - ViolationInstance (validated input)   │
//! │  calculator      - one violation → PenaltyResult         │
//! │  aggregator      - many violations → statutory cap       │
//! └──────────────────────────────────────────────────────────┘
//!          ↓
//! ┌──────────────────────────────────────────────────────────┐
//! │  regrisk_core (L1): Money, EngineError                   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The schedule and classifier are explicitly constructed, read-only values
//! passed into the calculator; there is no process-wide registry.
//!
//! ## Example
//!
//! ```
//! use regrisk_penalty::{
//!     PenaltyCalculator, SeverityTier, ViolationCategory, ViolationInstance,
//! };
//! use rust_decimal_macros::dec;
//!
//! let calculator = PenaltyCalculator::standard();
//! let violation = ViolationInstance::builder(ViolationCategory::IncidentNonReporting, dec!(100_000_000))
//!     .repeat(true)
//!     .build()
//!     .unwrap();
//!
//! let result = calculator.calculate(&violation).unwrap();
//! assert_eq!(result.severity, SeverityTier::Critical);
//! assert_eq!(result.final_fine, dec!(4_000_000));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod aggregator;
pub mod calculator;
pub mod classification;
pub mod schedule;
pub mod violation;

pub use aggregator::{CumulativePenaltyAggregator, CumulativeResult, DEFAULT_MAX_CUMULATIVE_FRACTION};
pub use calculator::{AppliedMultiplier, PenaltyCalculator, PenaltyResult};
pub use classification::{ViolationCategory, ViolationClassifier};
pub use schedule::{PenaltyParameters, PenaltyScheduleRegistry, SeverityTier};
pub use violation::{CustomMultiplier, ViolationInstance, ViolationInstanceBuilder};
