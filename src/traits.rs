//! Traits for the input and output collaborators of a conversion

use crate::types::*;

/// Supplier of export rows
///
/// Rows are returned in file order with the header already discarded; the
/// engine takes care of putting them oldest-first.
pub trait TransactionSource {
    /// Read every data row
    fn read_rows(&mut self) -> ConvertResult<Vec<RawRow>>;
}

/// Destination for converted rows
pub trait OutputSink {
    /// Write the header and every row, in order
    fn write_records(&mut self, records: &[OutputRecord]) -> ConvertResult<()>;
}

impl<T: TransactionSource + ?Sized> TransactionSource for &mut T {
    fn read_rows(&mut self) -> ConvertResult<Vec<RawRow>> {
        (**self).read_rows()
    }
}

impl<T: OutputSink + ?Sized> OutputSink for &mut T {
    fn write_records(&mut self, records: &[OutputRecord]) -> ConvertResult<()> {
        (**self).write_records(records)
    }
}
