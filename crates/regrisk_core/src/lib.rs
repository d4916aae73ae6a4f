//! # regrisk_core: Numeric Foundation for the Penalty & Investment Risk Engine
//!
//! ## Layer 1 (Foundation) Role
//!
//! regrisk_core is the bottom layer of the workspace, providing:
//! - Exact decimal money and rate types (`types::money`)
//! - The engine error taxonomy: `EngineError`, `SolverError` (`types::error`)
//! - Bracketing root solvers used by IRR (`math::solvers`)
//! - Order statistics for simulation summaries (`math::statistics`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other regrisk_* crates:
//! - rust_decimal: fixed-point arithmetic for every monetary amount
//! - num-traits: generic floating-point solvers
//! - thiserror: error derivation
//! - serde: serialisation of money-bearing records
//!
//! ## Usage Examples
//!
//! ```rust
//! use regrisk_core::math::statistics::quantile;
//! use regrisk_core::types::Money;
//! use rust_decimal_macros::dec;
//!
//! let samples: Vec<Money> = vec![dec!(10), dec!(20), dec!(30), dec!(40)];
//! let median = quantile(&samples, dec!(0.5)).unwrap();
//! assert_eq!(median, dec!(25));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
