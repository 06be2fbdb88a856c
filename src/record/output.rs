//! Building CoinTracking rows from transaction records

use tracing::debug;

use crate::classify::resolve_label;
use crate::config::ConverterConfig;
use crate::record::transaction::{Amount, Currency, TransactionRecord};
use crate::types::*;

/// One side of an output row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    pub amount: String,
    pub currency: String,
}

impl Leg {
    pub fn new(amount: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            currency: currency.into(),
        }
    }
}

/// Builder for a single output row.
///
/// The primary record supplies the comment and date. Explicit legs and type
/// override the default sign-based rule.
#[derive(Debug)]
pub struct OutputRecordBuilder<'a> {
    primary: &'a TransactionRecord,
    type_label: Option<String>,
    buy: Option<Leg>,
    sell: Option<Leg>,
}

impl<'a> OutputRecordBuilder<'a> {
    /// Create a builder for a primary record
    pub fn new(primary: &'a TransactionRecord) -> Self {
        Self {
            primary,
            type_label: None,
            buy: None,
            sell: None,
        }
    }

    /// Override the type label
    pub fn type_label(mut self, label: impl Into<String>) -> Self {
        self.type_label = Some(label.into());
        self
    }

    /// Shortcut for a `Trade` row
    pub fn trade(self) -> Self {
        self.type_label("Trade")
    }

    /// Set the buy leg explicitly
    pub fn buy(mut self, leg: Leg) -> Self {
        self.buy = Some(leg);
        self
    }

    /// Set the sell leg explicitly
    pub fn sell(mut self, leg: Leg) -> Self {
        self.sell = Some(leg);
        self
    }

    /// Build the row, or `None` when the type resolves to no label
    pub fn build(self, config: &ConverterConfig) -> ConvertResult<Option<OutputRecord>> {
        let type_label = match self.type_label {
            Some(label) => label,
            None => match resolve_label(self.primary)? {
                Some(label) => label.to_string(),
                None => {
                    debug!(
                        id = self.primary.id(),
                        original_type = %self.primary.original_type(),
                        "suppressing row without a type label"
                    );
                    return Ok(None);
                }
            },
        };

        let (default_buy, default_sell) = if self.buy.is_none() && self.sell.is_none() {
            default_legs(self.primary)?
        } else {
            (None, None)
        };
        let buy = self.buy.or(default_buy);
        let sell = self.sell.or(default_sell);

        let primary = self.primary;
        Ok(Some(OutputRecord {
            type_label,
            buy_amount: buy.as_ref().map(|leg| leg.amount.clone()),
            buy_currency: buy.as_ref().map(|leg| leg.currency.to_uppercase()),
            sell_amount: sell.as_ref().map(|leg| leg.amount.clone()),
            sell_currency: sell.as_ref().map(|leg| leg.currency.to_uppercase()),
            fee_amount: None,
            fee_currency: None,
            exchange: config.exchange_name.clone(),
            trade_group: None,
            comment: format!("{}: {}", primary.original_type(), primary.details()),
            date: primary.date().to_string(),
        }))
    }
}

/// Sign-based legs: a positive amount is bought, a negative amount is sold
fn default_legs(record: &TransactionRecord) -> ConvertResult<(Option<Leg>, Option<Leg>)> {
    let (amount, currency) = match (record.amount(), record.currency()) {
        (Amount::Single(_), Currency::Single(currency)) => {
            (record.amount().unsigned().unwrap_or_default(), currency)
        }
        _ => {
            return Err(ConvertError::classification(
                record.id(),
                format!(
                    "{} row with a currency pair needs explicit legs",
                    record.original_type()
                ),
            ))
        }
    };

    let leg = Leg::new(amount, currency.clone());
    if record.amount_is_positive() {
        Ok((Some(leg), None))
    } else {
        Ok((None, Some(leg)))
    }
}
