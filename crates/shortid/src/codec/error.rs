/// Errors produced while converting between decimal numerals, bytes and
/// Base58 text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum CodecError {
    /// A decimal numeral must contain at least one digit.
    #[error("empty decimal input")]
    EmptyInput,

    /// A byte that is not an ASCII digit was found in a decimal numeral.
    #[error("invalid decimal digit {byte:#04x} at index {index}")]
    InvalidDigit { byte: u8, index: usize },

    /// A byte outside the Base58 alphabet was found in an encoded string.
    #[error("invalid base58 symbol {byte:#04x} at index {index}")]
    InvalidSymbol { byte: u8, index: usize },
}
