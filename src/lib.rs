//! # Nexo to CoinTracking
//!
//! Converts a Nexo transaction export (one row per ledger event) into the
//! CoinTracking import format (one row per economic event, trades with both
//! legs).
//!
//! ## Features
//!
//! - **Classification**: sign-aware mapping of export types to CoinTracking labels
//! - **Liquidation reconciliation**: liquidation + repayment rows merged into one
//!   trade, priced from the drop in outstanding loan
//! - **Exchange splitting**: `SELL/BUY` pair rows turned into two-currency trades
//! - **Fail-fast**: any unrecognized or inconsistent row aborts the run
//! - **CSV adapters**: read the export and write the import file
//!
//! ## Quick Start
//!
//! ```rust
//! use nexo_cointracking::{utils::MemorySource, Converter};
//!
//! let source = MemorySource::from_strs(&[
//!     &["NXT1", "Deposit", "BTC", "1.5", "$45000", "approved", "$0", "2021-01-01 10:00:00"],
//! ]);
//! let csv = Converter::default().convert_to_string(source).unwrap();
//! assert!(csv.lines().nth(1).unwrap().starts_with("Deposit,1.5,BTC,"));
//! ```

pub mod classify;
pub mod config;
pub mod converter;
pub mod reconciliation;
pub mod record;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use classify::*;
pub use config::*;
pub use converter::*;
pub use reconciliation::*;
pub use record::*;
pub use traits::*;
pub use types::*;
