//! Decimal amount conversion.
//!
//! Amounts arrive as human-denominated decimal strings (`"10.5"`) and must
//! become exact integers in the token's smallest unit. Parsing works digit
//! by digit on [`U256`], so there is no floating-point rounding anywhere.

use alloy::primitives::{U256, hex};

use crate::error::{Result, TransferError};

/// Convert a decimal string to smallest units for a token with `decimals`
/// places of precision.
///
/// Accepts an optional leading `+`, integer digits, and an optional
/// fractional part. Fraction digits beyond `decimals` are truncated.
///
/// # Errors
///
/// - [`TransferError::InvalidAmount`] for empty, negative, or non-decimal
///   input (including `inf`, `NaN` and exponent notation).
/// - [`TransferError::AmountOverflow`] if the scaled value exceeds
///   `2^256 - 1`.
pub fn to_smallest_unit(decimal: &str, decimals: u8) -> Result<U256> {
    let s = decimal.trim();
    if s.starts_with('-') {
        return Err(TransferError::invalid_amount(format!(
            "'{decimal}' is negative"
        )));
    }
    let s = s.strip_prefix('+').unwrap_or(s);

    let (int_part, frac_part) = s.split_once('.').unwrap_or((s, ""));
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() && frac_part.is_empty()
        || !all_digits(int_part)
        || !all_digits(frac_part)
    {
        return Err(TransferError::invalid_amount(format!(
            "'{decimal}' is not a decimal number"
        )));
    }

    let ten = U256::from(10u8);
    let mut value = U256::ZERO;
    let mut push = |digit: u8| -> Result<()> {
        value = value
            .checked_mul(ten)
            .and_then(|v| v.checked_add(U256::from(digit)))
            .ok_or(TransferError::AmountOverflow)?;
        Ok(())
    };

    for b in int_part.bytes() {
        push(b - b'0')?;
    }
    let mut frac = frac_part.bytes();
    for _ in 0..decimals {
        // Missing fraction digits are implicit zeros.
        push(frac.next().map_or(0, |b| b - b'0'))?;
    }

    Ok(value)
}

/// Big-endian, left-zero-padded 32-byte word of `value`, as 64 lowercase hex
/// characters.
#[must_use]
pub fn to_padded_hex_word(value: U256) -> String {
    hex::encode(value.to_be_bytes::<32>())
}

/// Format smallest units back into a decimal string, trimming trailing
/// fractional zeros. Used for log output.
#[must_use]
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return digits;
    }
    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{int_part}.{frac_part}")
    }
}
