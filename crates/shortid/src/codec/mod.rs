//! Base58 encoding of arbitrary-precision non-negative integers.
//!
//! Identifiers are assembled as decimal digit strings that routinely exceed
//! 128 bits, so the codec works on the minimal big-endian byte form of the
//! integer rather than on a fixed-width primitive.

mod base58;
mod decimal;
mod error;

pub use base58::*;
pub use decimal::*;
pub use error::*;

/// Encodes a decimal numeral as Base58.
///
/// The numeral is converted to its minimal big-endian byte representation
/// (no leading zero bytes) before encoding, so the output never carries a
/// leading padding symbol.
///
/// # Errors
///
/// Returns [`CodecError::EmptyInput`] or [`CodecError::InvalidDigit`] if
/// `decimal` is not a non-empty string of ASCII digits.
///
/// # Example
///
/// ```
/// assert_eq!(shortid::codec::encode_decimal("1058").unwrap(), "KF");
/// ```
pub fn encode_decimal(decimal: &str) -> Result<String, CodecError> {
    let bytes = decimal_to_bytes(decimal)?;
    Ok(encode(&bytes))
}

/// Decodes a Base58 token back into its decimal numeral.
///
/// # Errors
///
/// Returns [`CodecError::InvalidSymbol`] if `encoded` contains a character
/// outside the Base58 alphabet.
pub fn decode_decimal(encoded: &str) -> Result<String, CodecError> {
    let bytes = decode(encoded)?;
    Ok(bytes_to_decimal(&bytes))
}
