use crate::codec::CodecError;

/// Parses a decimal numeral into its minimal big-endian byte form.
///
/// Zero (in any number of `0` digits) maps to an empty byte string, matching
/// the "no leading zero bytes" contract of [`encode`](super::encode).
///
/// # Errors
///
/// - [`CodecError::EmptyInput`] if `decimal` is empty.
/// - [`CodecError::InvalidDigit`] for the first non-ASCII-digit byte.
pub fn decimal_to_bytes(decimal: &str) -> Result<Vec<u8>, CodecError> {
    if decimal.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    // Little-endian base-256 accumulator. log(10) / log(256) < 0.42
    let mut bytes: Vec<u8> = Vec::with_capacity(decimal.len() * 42 / 100 + 1);
    for (index, b) in decimal.bytes().enumerate() {
        if !b.is_ascii_digit() {
            return Err(CodecError::InvalidDigit { byte: b, index });
        }
        let mut carry = u32::from(b - b'0');
        for byte in &mut bytes {
            carry += u32::from(*byte) * 10;
            *byte = (carry & 0xFF) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xFF) as u8);
            carry >>= 8;
        }
    }

    bytes.reverse();
    Ok(bytes)
}

/// Renders big-endian bytes as a decimal numeral without leading zeros.
pub fn bytes_to_decimal(bytes: &[u8]) -> String {
    // Little-endian base-10 digits.
    let mut digits: Vec<u8> = Vec::with_capacity(bytes.len() * 241 / 100 + 1);
    for &byte in bytes {
        let mut carry = u32::from(byte);
        for digit in &mut digits {
            carry += u32::from(*digit) << 8;
            *digit = (carry % 10) as u8;
            carry /= 10;
        }
        while carry > 0 {
            digits.push((carry % 10) as u8);
            carry /= 10;
        }
    }

    if digits.is_empty() {
        return String::from("0");
    }
    digits.iter().rev().map(|&d| char::from(b'0' + d)).collect()
}
