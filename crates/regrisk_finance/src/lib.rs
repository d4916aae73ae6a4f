//! # regrisk_finance: Investment Valuation (L3)
//!
//! Turns an implementation cost/benefit profile into a per-period cash-flow
//! series and evaluates it with standard discounted-cash-flow metrics.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   regrisk_finance (L3)                   │
//! ├──────────────────────────────────────────────────────────┤
//! │  case      - InvestmentCase (validated assumptions)      │
//! │  cashflow  - CashFlowBuilder → CashFlow (H + 1 periods)  │
//! │  metrics   - NPV, IRR, payback, ROI → FinancialResult    │
//! └──────────────────────────────────────────────────────────┘
//!          ↓
//! ┌──────────────────────────────────────────────────────────┐
//! │  regrisk_core (L1): Money, present_value, BrentSolver    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts stay in [`rust_decimal::Decimal`] throughout. IRR is the one
//! metric computed in `f64`: the root is located with a bracketing scan and
//! Brent's method, then converted back to a decimal rate.
//!
//! ## Example
//!
//! ```
//! use regrisk_finance::{CashFlowBuilder, FinancialMetrics, InvestmentCase};
//! use rust_decimal_macros::dec;
//!
//! let case = InvestmentCase::builder(dec!(0.08), 5)
//!     .one_time_cost(dec!(1_000_000))
//!     .recurring_costs(vec![dec!(100_000)])
//!     .recurring_benefits(vec![dec!(450_000)])
//!     .build()
//!     .unwrap();
//!
//! let cash_flow = CashFlowBuilder::new().build(&case);
//! assert_eq!(cash_flow.len(), 6);
//!
//! let result = FinancialMetrics::default()
//!     .evaluate(&cash_flow, case.discount_rate())
//!     .unwrap();
//! assert!(result.npv > dec!(0));
//! assert!(result.irr.is_some());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod case;
pub mod cashflow;
pub mod metrics;

pub use case::{
    CaseAdjustment, InvestmentCase, InvestmentCaseBuilder, MAX_CASE_TOTAL, MAX_HORIZON_PERIODS,
};
pub use cashflow::{CashFlow, CashFlowBuilder, CashFlowEntry};
pub use metrics::{FinancialMetrics, FinancialResult};
