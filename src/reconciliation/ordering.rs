//! Oldest-first normalization of an export

use tracing::debug;

use crate::record::TransactionRecord;
use crate::types::*;

/// Put records in oldest-first order.
///
/// Exports may be newest-first. Rows can share a timestamp, so the sequence is
/// never sorted: it is reversed once, as a whole, when the last record is older
/// than the first. Only the two boundary timestamps are parsed.
pub fn normalize_order(mut records: Vec<TransactionRecord>) -> ConvertResult<Vec<TransactionRecord>> {
    let (first, last) = match (records.first(), records.last()) {
        (Some(first), Some(last)) if records.len() > 1 => (first, last),
        _ => return Ok(records),
    };

    if last.timestamp()? < first.timestamp()? {
        debug!(records = records.len(), "export is newest-first, reversing");
        records.reverse();
    }

    Ok(records)
}
