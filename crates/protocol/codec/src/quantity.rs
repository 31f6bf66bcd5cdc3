//! Hex quantity parsing.

use crate::CodecError;
use alloy_primitives::U256;

/// Strips a leading `0x` or `0X` marker.
pub fn strip_hex_prefix(raw: &str) -> &str {
    raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")).unwrap_or(raw)
}

/// Parses a hex quantity into a [`u64`].
pub fn parse_u64(field: &'static str, raw: &str) -> Result<u64, CodecError> {
    let digits = digits(field, raw)?;
    if digits.trim_start_matches('0').len() > 16 {
        return Err(CodecError::QuantityOverflow { field, value: raw.to_string() });
    }
    u64::from_str_radix(digits, 16)
        .map_err(|_| CodecError::InvalidQuantity { field, value: raw.to_string() })
}

/// Parses a hex quantity into a [`U256`].
pub fn parse_u256(field: &'static str, raw: &str) -> Result<U256, CodecError> {
    let digits = digits(field, raw)?;
    if digits.trim_start_matches('0').len() > 64 {
        return Err(CodecError::QuantityOverflow { field, value: raw.to_string() });
    }
    U256::from_str_radix(digits, 16)
        .map_err(|_| CodecError::InvalidQuantity { field, value: raw.to_string() })
}

fn digits<'a>(field: &'static str, raw: &'a str) -> Result<&'a str, CodecError> {
    let digits = strip_hex_prefix(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CodecError::InvalidQuantity { field, value: raw.to_string() });
    }
    Ok(digits)
}
