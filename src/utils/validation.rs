//! Field validation and exact decimal helpers

use bigdecimal::BigDecimal;
use std::str::FromStr;

use crate::types::*;

/// Validate that a field holds a decimal number and return its value
pub fn validate_decimal(row: usize, field: &str, value: &str) -> ConvertResult<BigDecimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConvertError::malformed(
            row,
            format!("{} cannot be empty", field),
        ));
    }

    BigDecimal::from_str(trimmed).map_err(|_| {
        ConvertError::malformed(row, format!("{} '{}' is not a decimal number", field, trimmed))
    })
}

/// Validate that a required text field is present
pub fn validate_required(row: usize, field: &str, value: &str) -> ConvertResult<()> {
    if value.trim().is_empty() {
        Err(ConvertError::malformed(
            row,
            format!("{} cannot be empty", field),
        ))
    } else {
        Ok(())
    }
}

/// Validate the number of fields in a raw row
pub fn validate_field_count(row: usize, fields: &[String]) -> ConvertResult<()> {
    if fields.len() != INPUT_HEADER.len() {
        return Err(ConvertError::malformed(
            row,
            format!(
                "expected {} fields, found {}",
                INPUT_HEADER.len(),
                fields.len()
            ),
        ));
    }
    Ok(())
}

/// Remove one leading `-` or `+`
pub fn strip_sign(value: &str) -> &str {
    let trimmed = value.trim();
    trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed)
}

/// Remove a leading `$` from a balance
pub fn strip_currency_symbol(value: &str) -> &str {
    let trimmed = value.trim();
    trimmed.strip_prefix('$').unwrap_or(trimmed).trim()
}

/// Convert a non-negative balance to integer cents without going through floats.
///
/// At most two fractional digits are significant; any further digits must be zero.
pub fn to_cents(value: &str) -> Result<i64, String> {
    let value = value.trim();
    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (value, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(format!("'{}' is not a balance", value));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(format!("'{}' is not a non-negative decimal balance", value));
    }

    let (cents_part, rest) = fraction.split_at(fraction.len().min(2));
    if rest.chars().any(|c| c != '0') {
        return Err(format!("'{}' has sub-cent precision", value));
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| format!("'{}' is out of range", value))?
    };
    let cents: i64 = format!("{:0<2}", cents_part)
        .parse()
        .map_err(|_| format!("'{}' is not a balance", value))?;

    whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(cents))
        .ok_or_else(|| format!("'{}' is out of range", value))
}

/// Render integer cents as a decimal string without trailing zeros
pub fn cents_to_decimal_string(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let whole = abs / 100;
    let fraction = abs % 100;

    match fraction {
        0 => format!("{}{}", sign, whole),
        f if f % 10 == 0 => format!("{}{}.{}", sign, whole, f / 10),
        f => format!("{}{}.{:02}", sign, whole, f),
    }
}
