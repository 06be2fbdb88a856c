//! Core types and data structures shared by the conversion pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column headers of the Nexo transaction export, in file order
pub const INPUT_HEADER: [&str; 8] = [
    "Transaction",
    "Type",
    "Currency",
    "Amount",
    "USD Equivalent",
    "Details",
    "Outstanding Loan",
    "Date / Time",
];

/// Column headers of the CoinTracking import format, in file order
pub const OUTPUT_HEADER: [&str; 11] = [
    "Type", "Buy", "Cur.", "Sell", "Cur.", "Fee", "Cur.", "Exchange", "Group", "Comment", "Date",
];

/// One unparsed data row of the export (header already discarded)
pub type RawRow = Vec<String>;

/// Transaction types emitted by the lending platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Crypto or fiat moved onto the platform
    Deposit,
    /// Interest earned (positive) or paid on a loan (negative)
    Interest,
    /// Crypto moved off the platform
    Withdrawal,
    /// Forced sale of collateral to cover a loan
    Liquidation,
    /// Liquidation proceeds credited against the outstanding loan
    Repayment,
    /// Withdrawal paid out of the credit line
    WithdrawalCredit,
    /// Conversion between two currencies, encoded as `SELL/BUY` pairs
    Exchange,
    /// Internal transfer into the savings wallet
    TransferIn,
    /// Internal transfer out of the savings wallet
    TransferOut,
}

impl TransactionType {
    /// All known transaction types
    pub const ALL: [TransactionType; 9] = [
        TransactionType::Deposit,
        TransactionType::Interest,
        TransactionType::Withdrawal,
        TransactionType::Liquidation,
        TransactionType::Repayment,
        TransactionType::WithdrawalCredit,
        TransactionType::Exchange,
        TransactionType::TransferIn,
        TransactionType::TransferOut,
    ];

    /// Label exactly as it appears in the export
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Interest => "Interest",
            TransactionType::Withdrawal => "Withdrawal",
            TransactionType::Liquidation => "Liquidation",
            TransactionType::Repayment => "Repayment",
            TransactionType::WithdrawalCredit => "WithdrawalCredit",
            TransactionType::Exchange => "Exchange",
            TransactionType::TransferIn => "TransferIn",
            TransactionType::TransferOut => "TransferOut",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == trimmed)
            .ok_or_else(|| format!("unknown transaction type '{}'", trimmed))
    }
}

/// One row of the CoinTracking import file
///
/// Field order matches [`OUTPUT_HEADER`]; `None` serializes as an empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// CoinTracking type label (`Deposit`, `Trade`, `Interest Income`, ...)
    pub type_label: String,
    pub buy_amount: Option<String>,
    pub buy_currency: Option<String>,
    pub sell_amount: Option<String>,
    pub sell_currency: Option<String>,
    /// Fees are not modeled; always empty
    pub fee_amount: Option<String>,
    /// Fees are not modeled; always empty
    pub fee_currency: Option<String>,
    /// Name of the source platform
    pub exchange: String,
    /// Always empty
    pub trade_group: Option<String>,
    /// `"<original type>: <details>"` of the primary record
    pub comment: String,
    /// Timestamp of the primary record, verbatim
    pub date: String,
}

impl OutputRecord {
    /// Whether this row is typed `Trade`
    pub fn is_trade(&self) -> bool {
        self.type_label == "Trade"
    }

    /// Cells in [`OUTPUT_HEADER`] order, empty string for missing values
    pub fn to_fields(&self) -> Vec<String> {
        let cell = |v: &Option<String>| v.clone().unwrap_or_default();
        vec![
            self.type_label.clone(),
            cell(&self.buy_amount),
            cell(&self.buy_currency),
            cell(&self.sell_amount),
            cell(&self.sell_currency),
            cell(&self.fee_amount),
            cell(&self.fee_currency),
            self.exchange.clone(),
            cell(&self.trade_group),
            self.comment.clone(),
            self.date.clone(),
        ]
    }
}

/// Counters reported after a conversion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSummary {
    /// Data rows read from the source
    pub input_rows: usize,
    /// Rows written to the sink
    pub output_rows: usize,
    /// Output rows typed `Trade`
    pub trade_rows: usize,
    /// Input rows that produced no row of their own
    pub suppressed_rows: usize,
}

/// Errors that can occur while converting an export
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Classification error for transaction {id}: {reason}")]
    Classification { id: String, reason: String },
    #[error("Reconciliation error for transaction {id}: {reason}")]
    Reconciliation { id: String, reason: String },
    #[error("Malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub(crate) fn classification(id: &str, reason: impl Into<String>) -> Self {
        ConvertError::Classification {
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn reconciliation(id: &str, reason: impl Into<String>) -> Self {
        ConvertError::Reconciliation {
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(row: usize, reason: impl Into<String>) -> Self {
        ConvertError::MalformedRow {
            row,
            reason: reason.into(),
        }
    }
}

/// Result type for conversion operations
pub type ConvertResult<T> = Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_round_trips_labels() {
        for t in TransactionType::ALL {
            assert_eq!(t.as_str().parse::<TransactionType>().unwrap(), t);
        }
    }

    #[test]
    fn test_transaction_type_rejects_unknown() {
        assert!("DepositToExchange".parse::<TransactionType>().is_err());
        assert!("deposit".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_output_record_fields() {
        let record = OutputRecord {
            type_label: "Deposit".to_string(),
            buy_amount: Some("1.5".to_string()),
            buy_currency: Some("BTC".to_string()),
            sell_amount: None,
            sell_currency: None,
            fee_amount: None,
            fee_currency: None,
            exchange: "Nexo".to_string(),
            trade_group: None,
            comment: "Deposit: approved".to_string(),
            date: "2021-01-01 10:00:00".to_string(),
        };

        let fields = record.to_fields();
        assert_eq!(fields.len(), OUTPUT_HEADER.len());
        assert_eq!(fields[1], "1.5");
        assert_eq!(fields[3], "");
        assert_eq!(fields[7], "Nexo");
        assert!(!record.is_trade());
    }
}
