//! In-memory source and sink for testing and embedding

use crate::traits::*;
use crate::types::*;

/// Source backed by rows already in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: Vec<RawRow>,
}

impl MemorySource {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }

    /// Build from string slices, one inner slice per row
    pub fn from_strs(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|f| f.to_string()).collect())
                .collect(),
        )
    }
}

impl TransactionSource for MemorySource {
    fn read_rows(&mut self) -> ConvertResult<Vec<RawRow>> {
        Ok(self.rows.clone())
    }
}

/// Sink that keeps written rows
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<OutputRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[OutputRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<OutputRecord> {
        self.records
    }
}

impl OutputSink for MemorySink {
    fn write_records(&mut self, records: &[OutputRecord]) -> ConvertResult<()> {
        self.records.extend_from_slice(records);
        Ok(())
    }
}
