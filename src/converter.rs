//! Conversion orchestrator that ties a source, the engine and a sink together

use tracing::info;

use crate::config::ConverterConfig;
use crate::reconciliation::ReconciliationEngine;
use crate::record::TransactionRecord;
use crate::traits::*;
use crate::types::*;
use crate::utils::CsvOutputSink;

/// Converts a whole export in one fail-fast run
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Parse raw rows into records, numbering rows from 1 in file order
    pub fn parse_rows(&self, rows: &[RawRow]) -> ConvertResult<Vec<TransactionRecord>> {
        rows.iter()
            .enumerate()
            .map(|(i, fields)| TransactionRecord::from_fields(i + 1, fields, &self.config))
            .collect()
    }

    /// Convert raw rows into output rows without touching any sink
    pub fn convert_rows(&self, rows: &[RawRow]) -> ConvertResult<Vec<OutputRecord>> {
        let records = self.parse_rows(rows)?;
        ReconciliationEngine::new(self.config.clone()).run(records)
    }

    /// Read everything from `source`, reconcile, and write to `sink`.
    ///
    /// Nothing is written when any row fails.
    pub fn convert<S, K>(&self, mut source: S, mut sink: K) -> ConvertResult<ConversionSummary>
    where
        S: TransactionSource,
        K: OutputSink,
    {
        let rows = source.read_rows()?;
        let records = self.convert_rows(&rows)?;
        sink.write_records(&records)?;

        let trade_rows = records.iter().filter(|r| r.is_trade()).count();
        let summary = ConversionSummary {
            input_rows: rows.len(),
            output_rows: records.len(),
            trade_rows,
            // a merged liquidation/repayment pair counts as one suppressed row
            suppressed_rows: rows.len().saturating_sub(records.len()),
        };

        info!(
            input_rows = summary.input_rows,
            output_rows = summary.output_rows,
            trade_rows = summary.trade_rows,
            suppressed_rows = summary.suppressed_rows,
            "conversion finished"
        );
        Ok(summary)
    }

    /// Convert and render the CoinTracking CSV as a string
    pub fn convert_to_string<S: TransactionSource>(&self, source: S) -> ConvertResult<String> {
        let mut sink = CsvOutputSink::from_writer(Vec::new());
        self.convert(source, &mut sink)?;
        let bytes = sink.into_inner()?;
        String::from_utf8(bytes)
            .map_err(|e| ConvertError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }
}
