//! Account addresses.
//!
//! `Address` is alloy's 20-byte address. Equality is on the raw bytes, so any
//! two spellings of the same address compare equal, and `Display` renders the
//! EIP-55 checksum form.

use std::str::FromStr;

pub use alloy::primitives::Address;

use crate::error::ValidationError;

/// Parse a hex address, accepting an optional `0x` prefix and any case.
///
/// Mixed-case input is not checked against its checksum.
pub fn parse_address(input: &str) -> Result<Address, ValidationError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.len() != 40 {
        return Err(ValidationError::InvalidAddress {
            input: input.to_string(),
            reason: format!("expected 40 hex digits, got {}", digits.len()),
        });
    }

    Address::from_str(digits).map_err(|e| ValidationError::InvalidAddress {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Lowercase `0x`-prefixed form, used on the wire and in transaction lines
pub fn lower_hex(address: &Address) -> String {
    alloy::hex::encode_prefixed(address.as_slice())
}
