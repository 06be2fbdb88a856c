//! Transaction records and output row construction

pub mod output;
pub mod transaction;

pub use output::*;
pub use transaction::*;
