//! 请求参数解析
//!
//! Textual addresses and amounts as they arrive from the HTTP query string.
//! Failures here are input errors and never reach the ledger.

use alloy_primitives::Address;
use num_bigint::BigUint;
use std::str::FromStr;

use crate::error::EstimateError;

/// Parses a 20-byte hex address, with or without `0x`, in any letter case.
///
/// Mixed-case input is accepted without EIP-55 checksum validation, so two
/// spellings of the same address always compare equal after parsing.
pub fn parse_address(field: &'static str, value: &str) -> Result<Address, EstimateError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EstimateError::MissingParameter(field));
    }
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(EstimateError::InvalidAddress { field, value: value.to_string() });
    }
    Address::from_str(digits)
        .map_err(|_| EstimateError::InvalidAddress { field, value: value.to_string() })
}

/// Parses a non-negative base-10 integer of any size.
pub fn parse_amount(value: &str) -> Result<BigUint, EstimateError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EstimateError::MissingParameter("src_amount"));
    }
    // BigUint::from_str also accepts a leading '+' and '_' separators.
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EstimateError::InvalidAmount(value.to_string()));
    }
    BigUint::from_str(trimmed).map_err(|_| EstimateError::InvalidAmount(value.to_string()))
}
