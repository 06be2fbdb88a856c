//! Mapping from export transaction types to CoinTracking type labels

use serde::Serialize;

use crate::record::TransactionRecord;
use crate::types::*;

/// How a transaction type turns into a standalone output row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    /// Label for incoming (`buy`) and outgoing (`sell`) amounts.
    /// A `None` side means that sign is not expected for the type.
    Labels {
        buy: Option<&'static str>,
        sell: Option<&'static str>,
    },
    /// No standalone row; the reconciliation engine handles the type structurally
    Skip,
}

/// Classification table entry for a transaction type
pub fn classification_for(transaction_type: TransactionType) -> Classification {
    match transaction_type {
        TransactionType::Deposit => Classification::Labels {
            buy: Some("Deposit"),
            sell: None,
        },
        TransactionType::Interest => Classification::Labels {
            buy: Some("Interest Income"),
            sell: Some("Borrowing Fee"),
        },
        TransactionType::Withdrawal | TransactionType::WithdrawalCredit => {
            Classification::Labels {
                buy: None,
                sell: Some("Withdrawal"),
            }
        }
        TransactionType::Liquidation
        | TransactionType::Repayment
        | TransactionType::Exchange
        | TransactionType::TransferIn
        | TransactionType::TransferOut => Classification::Skip,
    }
}

/// Resolve the output type label for a record.
///
/// `Ok(None)` means the record is suppressed. An entry with no label for the
/// record's amount sign is an unhandled shape and fails the run.
pub fn resolve_label(record: &TransactionRecord) -> ConvertResult<Option<&'static str>> {
    match classification_for(record.original_type()) {
        Classification::Skip => Ok(None),
        Classification::Labels { buy, sell } => {
            let positive = record.amount_is_positive();
            let label = if positive { buy } else { sell };
            label.map(Some).ok_or_else(|| {
                ConvertError::classification(
                    record.id(),
                    format!(
                        "could not translate transaction type {} for a {} amount of {:?} {:?}",
                        record.original_type(),
                        if positive { "positive" } else { "negative" },
                        record.amount(),
                        record.currency()
                    ),
                )
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConverterConfig;

    fn record(kind: &str, amount: &str) -> TransactionRecord {
        let fields: Vec<String> = [
            "NXT1",
            kind,
            "BTC",
            amount,
            "$1",
            "approved",
            "$0",
            "2021-01-01 00:00:00",
        ]
        .iter()
        .map(|f| f.to_string())
        .collect();
        TransactionRecord::from_fields(1, &fields, &ConverterConfig::default()).unwrap()
    }

    #[test]
    fn test_labels_by_sign() {
        assert_eq!(resolve_label(&record("Deposit", "1")).unwrap(), Some("Deposit"));
        assert_eq!(
            resolve_label(&record("Interest", "0.1")).unwrap(),
            Some("Interest Income")
        );
        assert_eq!(
            resolve_label(&record("Interest", "-0.1")).unwrap(),
            Some("Borrowing Fee")
        );
        assert_eq!(
            resolve_label(&record("Withdrawal", "-1")).unwrap(),
            Some("Withdrawal")
        );
        assert_eq!(
            resolve_label(&record("WithdrawalCredit", "-1")).unwrap(),
            Some("Withdrawal")
        );
    }

    #[test]
    fn test_structural_types_are_skipped() {
        assert_eq!(resolve_label(&record("TransferIn", "1")).unwrap(), None);
        assert_eq!(resolve_label(&record("TransferOut", "-1")).unwrap(), None);
        assert_eq!(resolve_label(&record("Liquidation", "-1")).unwrap(), None);
        assert_eq!(resolve_label(&record("Repayment", "100")).unwrap(), None);
    }

    #[test]
    fn test_unexpected_sign_is_classification_error() {
        assert!(matches!(
            resolve_label(&record("Deposit", "-1")),
            Err(ConvertError::Classification { .. })
        ));
        assert!(matches!(
            resolve_label(&record("Withdrawal", "1")),
            Err(ConvertError::Classification { .. })
        ));
    }

    #[test]
    fn test_every_type_has_an_entry() {
        for t in TransactionType::ALL {
            let _ = classification_for(t);
        }
        assert_eq!(
            classification_for(TransactionType::Exchange),
            Classification::Skip
        );
    }
}
