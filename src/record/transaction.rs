//! Parsed view over one row of the transaction export

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::ConverterConfig;
use crate::types::*;
use crate::utils::validation::*;

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Currency column: a single code, or `SELL/BUY` on exchange rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    Single(String),
    Pair { sell: String, buy: String },
}

/// Amount column: a signed decimal, or unsigned `SELL/BUY` on exchange rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Amount {
    Single(String),
    Pair { sell: String, buy: String },
}

impl Amount {
    /// The amount without its sign; `None` for pairs
    pub fn unsigned(&self) -> Option<&str> {
        match self {
            Amount::Single(value) => Some(strip_sign(value)),
            Amount::Pair { .. } => None,
        }
    }
}

/// Immutable, validated view over one export row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    row: usize,
    id: String,
    original_type: TransactionType,
    currency: Currency,
    amount: Amount,
    usd_equivalent: String,
    details: String,
    outstanding_loan: String,
    date: String,
}

impl TransactionRecord {
    /// Parse the 8 fields of a data row.
    ///
    /// `row` is the 1-based position of the row among data rows and is only
    /// used for error reporting.
    pub fn from_fields(
        row: usize,
        fields: &[String],
        config: &ConverterConfig,
    ) -> ConvertResult<Self> {
        validate_field_count(row, fields)?;

        let id = fields[0].trim().to_string();
        validate_required(row, "Transaction", &id)?;

        let original_type: TransactionType = fields[1].parse().map_err(|reason: String| {
            ConvertError::classification(&id, reason)
        })?;
        let is_exchange = original_type == TransactionType::Exchange;

        let currency = match split_pair(&fields[2]) {
            Some((sell, buy)) if is_exchange => {
                validate_required(row, "Currency", sell)?;
                validate_required(row, "Currency", buy)?;
                Currency::Pair {
                    sell: config.normalize_currency(sell),
                    buy: config.normalize_currency(buy),
                }
            }
            Some(_) => {
                return Err(ConvertError::malformed(
                    row,
                    format!("{} row {} has a currency pair", original_type, id),
                ))
            }
            None if is_exchange => {
                return Err(ConvertError::malformed(
                    row,
                    format!("Exchange row {} needs a SELL/BUY currency pair", id),
                ))
            }
            None => {
                validate_required(row, "Currency", &fields[2])?;
                Currency::Single(config.normalize_currency(&fields[2]))
            }
        };

        let amount = match split_pair(&fields[3]) {
            Some((sell, buy)) if is_exchange => {
                let sell = strip_sign(sell).to_string();
                let buy = strip_sign(buy).to_string();
                validate_decimal(row, "Amount", &sell)?;
                validate_decimal(row, "Amount", &buy)?;
                Amount::Pair { sell, buy }
            }
            Some(_) => {
                return Err(ConvertError::malformed(
                    row,
                    format!("{} row {} has an amount pair", original_type, id),
                ))
            }
            None if is_exchange => {
                return Err(ConvertError::malformed(
                    row,
                    format!("Exchange row {} needs a SELL/BUY amount pair", id),
                ))
            }
            None => {
                let value = fields[3].trim().to_string();
                validate_decimal(row, "Amount", &value)?;
                Amount::Single(value)
            }
        };

        let outstanding_loan = strip_currency_symbol(&fields[6]).to_string();
        let loan_required = matches!(
            original_type,
            TransactionType::Liquidation | TransactionType::Repayment
        );
        if loan_required || !outstanding_loan.is_empty() {
            validate_decimal(row, "Outstanding Loan", &outstanding_loan)?;
        }

        let usd_equivalent = strip_currency_symbol(&fields[4]).to_string();
        if !usd_equivalent.is_empty() {
            validate_decimal(row, "USD Equivalent", &usd_equivalent)?;
        }

        let date = fields[7].clone();
        validate_required(row, "Date / Time", &date)?;

        Ok(Self {
            row,
            id,
            original_type,
            currency,
            amount,
            usd_equivalent,
            details: fields[5].clone(),
            outstanding_loan,
            date,
        })
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn original_type(&self) -> TransactionType {
        self.original_type
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn amount(&self) -> &Amount {
        &self.amount
    }

    pub fn usd_equivalent(&self) -> &str {
        &self.usd_equivalent
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    /// Loan balance after this event, without the leading `$`
    pub fn outstanding_loan(&self) -> &str {
        &self.outstanding_loan
    }

    /// Timestamp exactly as exported
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Loan balance as a number, for comparisons
    pub fn outstanding_loan_value(&self) -> ConvertResult<BigDecimal> {
        validate_decimal(self.row, "Outstanding Loan", &self.outstanding_loan)
    }

    /// Loan balance as exact integer cents
    pub fn outstanding_loan_cents(&self) -> ConvertResult<i64> {
        to_cents(&self.outstanding_loan).map_err(|reason| {
            ConvertError::malformed(self.row, format!("Outstanding Loan {}", reason))
        })
    }

    /// Parsed timestamp, used only to detect a descending export
    pub fn timestamp(&self) -> ConvertResult<NaiveDateTime> {
        let raw = self.date.trim();
        TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .ok_or_else(|| {
                ConvertError::malformed(self.row, format!("unrecognized timestamp '{}'", raw))
            })
    }

    /// True unless the amount starts with `-`; exchange pairs are unsigned
    pub fn amount_is_positive(&self) -> bool {
        match &self.amount {
            Amount::Single(value) => !value.trim_start().starts_with('-'),
            Amount::Pair { .. } => true,
        }
    }

    pub fn is_liquidation(&self) -> bool {
        self.original_type == TransactionType::Liquidation
    }

    pub fn is_repayment(&self) -> bool {
        self.original_type == TransactionType::Repayment
    }

    pub fn is_exchange(&self) -> bool {
        self.original_type == TransactionType::Exchange
    }

    /// Copy of this record with the sign of a single amount flipped
    pub fn negated(&self) -> Self {
        let amount = match &self.amount {
            Amount::Single(value) if self.amount_is_positive() => {
                Amount::Single(format!("-{}", strip_sign(value)))
            }
            Amount::Single(value) => Amount::Single(strip_sign(value).to_string()),
            pair => pair.clone(),
        };
        Self {
            amount,
            ..self.clone()
        }
    }
}

fn split_pair(value: &str) -> Option<(&str, &str)> {
    value
        .split_once('/')
        .map(|(first, second)| (first.trim(), second.trim()))
}
