//! Reconciliation engine: one forward pass over oldest-first records

use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::config::ConverterConfig;
use crate::reconciliation::ordering::normalize_order;
use crate::record::{Amount, Currency, Leg, OutputRecordBuilder, TransactionRecord};
use crate::types::*;
use crate::utils::validation::cents_to_decimal_string;

/// Engine state between records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineState {
    /// No liquidation is waiting for its repayment
    Scanning,
    /// A liquidation was seen and its repayment has not arrived yet
    AwaitingRepayment { pending: TransactionRecord },
}

/// Turns transaction records into CoinTracking rows.
///
/// Liquidation/repayment pairs become one trade, exchange rows are split into
/// their two legs, everything else goes through the classification table.
#[derive(Debug)]
pub struct ReconciliationEngine {
    config: ConverterConfig,
    state: EngineState,
    output: Vec<OutputRecord>,
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}

impl ReconciliationEngine {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            config,
            state: EngineState::Scanning,
            output: Vec::new(),
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Normalize the order of `records` and reconcile them in a single pass
    pub fn run(mut self, records: Vec<TransactionRecord>) -> ConvertResult<Vec<OutputRecord>> {
        for record in normalize_order(records)? {
            self.process(record)?;
        }
        self.finish()
    }

    /// Feed the next record in processing order
    pub fn process(&mut self, record: TransactionRecord) -> ConvertResult<()> {
        let state = std::mem::replace(&mut self.state, EngineState::Scanning);

        match (state, record.original_type()) {
            (EngineState::Scanning, TransactionType::Liquidation) => {
                debug!(id = record.id(), "liquidation pending repayment");
                self.state = EngineState::AwaitingRepayment { pending: record };
            }
            (EngineState::AwaitingRepayment { pending }, TransactionType::Liquidation) => {
                return Err(ConvertError::reconciliation(
                    record.id(),
                    format!(
                        "liquidation found while liquidation {} is still waiting for its repayment",
                        pending.id()
                    ),
                ));
            }
            (EngineState::AwaitingRepayment { pending }, TransactionType::Repayment) => {
                let trade = self.merge_liquidation(&pending, &record)?;
                self.emit(trade);
            }
            (EngineState::Scanning, TransactionType::Repayment) => {
                return Err(ConvertError::reconciliation(
                    record.id(),
                    format!("liquidation row not found for repayment {}", record.id()),
                ));
            }
            (state, _) => {
                if let EngineState::AwaitingRepayment { pending } = &state {
                    warn!(
                        id = record.id(),
                        pending = pending.id(),
                        "row between a liquidation and its repayment"
                    );
                }
                self.state = state;

                let row = if record.is_exchange() {
                    Some(self.split_exchange(&record)?)
                } else {
                    OutputRecordBuilder::new(&record).build(&self.config)?
                };
                if let Some(row) = row {
                    self.emit(row);
                }
            }
        }

        Ok(())
    }

    /// Finish the pass; a liquidation left without repayment fails the run
    pub fn finish(self) -> ConvertResult<Vec<OutputRecord>> {
        match self.state {
            EngineState::Scanning => Ok(self.output),
            EngineState::AwaitingRepayment { pending } => Err(ConvertError::reconciliation(
                pending.id(),
                "liquidation has no matching repayment",
            )),
        }
    }

    /// Merge a liquidation and the repayment that follows it into one trade.
    ///
    /// The repaid amount is the drop in outstanding loan across the pair, which
    /// absorbs fees and recalculations the individual rows do not show.
    pub fn merge_liquidation(
        &self,
        liquidation: &TransactionRecord,
        repayment: &TransactionRecord,
    ) -> ConvertResult<OutputRecord> {
        if !liquidation.is_liquidation() {
            return Err(ConvertError::reconciliation(
                liquidation.id(),
                format!("expected 'Liquidation', got '{}'", liquidation.original_type()),
            ));
        }
        if !repayment.is_repayment() {
            return Err(ConvertError::reconciliation(
                repayment.id(),
                format!("expected 'Repayment', got '{}'", repayment.original_type()),
            ));
        }

        let before = liquidation.outstanding_loan_value()?;
        let after = repayment.outstanding_loan_value()?;
        if before.cmp(&after) != Ordering::Greater {
            return Err(ConvertError::reconciliation(
                repayment.id(),
                format!(
                    "expected outstanding loan balance to be higher before repayment. Before: ${}, After: ${}",
                    liquidation.outstanding_loan(),
                    repayment.outstanding_loan()
                ),
            ));
        }

        let repaid_cents =
            liquidation.outstanding_loan_cents()? - repayment.outstanding_loan_cents()?;
        let repaid = cents_to_decimal_string(repaid_cents);

        let (sold_amount, sold_currency) = match (liquidation.amount(), liquidation.currency()) {
            (Amount::Single(_), Currency::Single(currency)) => (
                liquidation.amount().unsigned().unwrap_or_default().to_string(),
                currency.clone(),
            ),
            _ => {
                return Err(ConvertError::reconciliation(
                    liquidation.id(),
                    "liquidation must name a single currency and amount",
                ))
            }
        };

        debug!(
            liquidation = liquidation.id(),
            repayment = repayment.id(),
            repaid = %repaid,
            sold = %sold_amount,
            currency = %sold_currency,
            "merged liquidation and repayment"
        );

        let row = OutputRecordBuilder::new(repayment)
            .trade()
            .buy(Leg::new(repaid, self.config.stablecoin.clone()))
            .sell(Leg::new(sold_amount, sold_currency))
            .build(&self.config)?;

        row.ok_or_else(|| {
            ConvertError::reconciliation(repayment.id(), "merged trade produced no row")
        })
    }

    /// Turn an exchange row into a trade: first element sold, second bought
    pub fn split_exchange(&self, record: &TransactionRecord) -> ConvertResult<OutputRecord> {
        let (sell_currency, buy_currency, sell_amount, buy_amount) =
            match (record.currency(), record.amount()) {
                (
                    Currency::Pair {
                        sell: sell_currency,
                        buy: buy_currency,
                    },
                    Amount::Pair {
                        sell: sell_amount,
                        buy: buy_amount,
                    },
                ) => (sell_currency, buy_currency, sell_amount, buy_amount),
                _ => {
                    return Err(ConvertError::reconciliation(
                        record.id(),
                        "exchange row must carry SELL/BUY currency and amount pairs",
                    ))
                }
            };

        let row = OutputRecordBuilder::new(record)
            .trade()
            .buy(Leg::new(buy_amount.clone(), buy_currency.clone()))
            .sell(Leg::new(sell_amount.clone(), sell_currency.clone()))
            .build(&self.config)?;

        row.ok_or_else(|| ConvertError::reconciliation(record.id(), "exchange produced no row"))
    }

    fn emit(&mut self, row: OutputRecord) {
        debug!(
            type_label = %row.type_label,
            date = %row.date,
            "emitting row"
        );
        self.output.push(row);
    }
}
