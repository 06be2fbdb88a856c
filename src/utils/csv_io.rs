//! CSV source and sink

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::info;

use crate::traits::*;
use crate::types::*;

/// Reads the transaction export from CSV
pub struct CsvTransactionSource<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CsvTransactionSource<R> {
    /// Wrap any reader; the first line is treated as the header
    pub fn from_reader(reader: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        Self { reader }
    }
}

impl CsvTransactionSource<File> {
    /// Open an export on disk
    pub fn from_path(path: &Path) -> ConvertResult<Self> {
        let file = File::open(path)?;
        info!(path = %path.display(), "reading transaction export");
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> TransactionSource for CsvTransactionSource<R> {
    fn read_rows(&mut self) -> ConvertResult<Vec<RawRow>> {
        let mut rows = Vec::new();
        for record in self.reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }
}

/// Writes CoinTracking rows as CSV
pub struct CsvOutputSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvOutputSink<W> {
    pub fn from_writer(writer: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        Self { writer }
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> ConvertResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| ConvertError::Io(e.into_error()))
    }
}

impl<W: Write> OutputSink for CsvOutputSink<W> {
    fn write_records(&mut self, records: &[OutputRecord]) -> ConvertResult<()> {
        self.writer.write_record(OUTPUT_HEADER)?;
        for record in records {
            self.writer.write_record(record.to_fields())?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
