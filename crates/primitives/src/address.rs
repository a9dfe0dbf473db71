//! Recipient address parsing.

use alloy_primitives::Address;

/// Length of an address in hex digits, without the `0x` prefix.
const ADDRESS_HEX_LEN: usize = 40;

/// Errors produced when parsing a recipient address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// Not `0x` followed by 40 hex digits.
    #[error("malformed address")]
    Malformed,

    /// Mixed-case input that does not match its EIP-55 checksum.
    #[error("address checksum mismatch")]
    BadChecksum,

    /// The zero address.
    #[error("zero address")]
    Zero,
}

/// Parse a recipient address typed by the user.
///
/// The input must be `0x` followed by exactly 40 hex digits. Mixed-case input
/// is checked against its EIP-55 checksum, while all-lowercase and
/// all-uppercase input is accepted as is. The zero address is rejected.
pub fn parse_recipient(text: &str) -> Result<Address, AddressError> {
    let text = text.trim();
    let hex = text.strip_prefix("0x").ok_or(AddressError::Malformed)?;
    if hex.len() != ADDRESS_HEX_LEN || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AddressError::Malformed);
    }

    let address: Address = text.parse().map_err(|_| AddressError::Malformed)?;

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && address.to_checksum(None) != text {
        return Err(AddressError::BadChecksum);
    }

    if address.is_zero() {
        return Err(AddressError::Zero);
    }

    Ok(address)
}
