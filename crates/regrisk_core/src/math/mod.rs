//! Numerical building blocks.
//!
//! - [`solvers`]: bracketing root finders (IRR)
//! - [`statistics`]: quantiles, moments and histograms over decimal samples

pub mod solvers;
pub mod statistics;
