//! Core types: decimal money, rates and structured errors.
//!
//! This module provides:
//! - [`Money`] and [`Rate`]: exact decimal aliases used for every amount
//! - Conversion helpers between decimal and binary floating point
//! - [`EngineError`]: invalid input and unknown enumeration failures
//! - [`SolverError`]: root-finding failures

pub mod error;
pub mod money;

pub use error::{EngineError, SolverError};
pub use money::{
    checked_scale, checked_sum, discount_factor, ensure_non_negative, ensure_positive, from_f64,
    percentage_of, present_value, to_f64, Money, Rate,
};
