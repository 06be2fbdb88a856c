//! Reconciliation of export rows into CoinTracking rows
//!
//! Records are first put in oldest-first order, then walked once by a
//! two-state engine that pairs each liquidation with the repayment after it.

pub mod engine;
pub mod ordering;

pub use engine::*;
pub use ordering::*;
