use crate::codec::CodecError;

/// The Bitcoin Base58 alphabet: digits and letters minus `0`, `O`, `I`, `l`.
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const NO_VALUE: u8 = 255;
const BASE: u32 = 58;

/// Lookup table for Base58 decoding
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    while i < 58 {
        lut[ALPHABET[i as usize] as usize] = i;
        i += 1;
    }
    lut
};

/// Encodes a big-endian byte string as Base58.
///
/// Each leading zero byte is rendered as a leading `1`; an empty input
/// encodes to an empty string.
pub fn encode(input: &[u8]) -> String {
    let zeros = input.iter().take_while(|&&b| b == 0).count();

    // Little-endian base-58 digits. log(256) / log(58) < 1.37
    let mut digits: Vec<u8> = Vec::with_capacity((input.len() - zeros) * 137 / 100 + 1);
    for &byte in &input[zeros..] {
        let mut carry = u32::from(byte);
        for digit in &mut digits {
            carry += u32::from(*digit) << 8;
            *digit = (carry % BASE) as u8;
            carry /= BASE;
        }
        while carry > 0 {
            digits.push((carry % BASE) as u8);
            carry /= BASE;
        }
    }

    let mut out = String::with_capacity(zeros + digits.len());
    out.extend(core::iter::repeat_n('1', zeros));
    out.extend(
        digits
            .iter()
            .rev()
            .map(|&d| char::from(ALPHABET[usize::from(d)])),
    );
    out
}

/// Decodes a Base58 string into big-endian bytes.
///
/// # Errors
///
/// Returns [`CodecError::InvalidSymbol`] for the first character that is not
/// part of [`ALPHABET`].
pub fn decode(encoded: &str) -> Result<Vec<u8>, CodecError> {
    let zeros = encoded.bytes().take_while(|&b| b == ALPHABET[0]).count();

    // Little-endian base-256 bytes.
    let mut bytes: Vec<u8> = Vec::with_capacity(encoded.len());
    for (index, b) in encoded.bytes().enumerate() {
        let value = LOOKUP[usize::from(b)];
        if value == NO_VALUE {
            return Err(CodecError::InvalidSymbol { byte: b, index });
        }
        let mut carry = u32::from(value);
        for byte in &mut bytes {
            carry += u32::from(*byte) * BASE;
            *byte = (carry & 0xFF) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xFF) as u8);
            carry >>= 8;
        }
    }

    bytes.extend(core::iter::repeat_n(0, zeros));
    bytes.reverse();
    Ok(bytes)
}
