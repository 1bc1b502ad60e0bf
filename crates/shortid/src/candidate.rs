//! Construction of candidate identifiers.
//!
//! A candidate is the Base58 encoding of the decimal numeral
//!
//! ```text
//! 4719 0 37 0 1760790000
//! └──┘ │ └┘ │ └────────┘
//!  |   │ |  │  unix seconds
//!  |   │ |  separator
//!  |   │ instance id (omitted in shortest mode, together with its separator)
//!  |   separator
//!  random prefix, digits 1..=9, `length` of them
//! ```
//!
//! Neither the prefix nor the instance identifier may contain `0`, so the
//! first one or two zeros unambiguously split the numeral back into its
//! fields.

use crate::{RandSource, TimeSource, codec};

/// Builds candidates for one broker.
#[derive(Clone, Debug)]
pub struct CandidateBuilder<T, R> {
    instance_id: Option<String>,
    time: T,
    rand: R,
}

impl<T, R> CandidateBuilder<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    /// Creates a builder. `instance_id` must already be validated to contain
    /// no `0`; `None` selects shortest mode.
    pub const fn new(instance_id: Option<String>, time: T, rand: R) -> Self {
        Self {
            instance_id,
            time,
            rand,
        }
    }

    /// Assembles the decimal numeral for a candidate with a `length` digit
    /// random prefix.
    pub fn digits(&self, length: usize) -> String {
        let mut digits = String::with_capacity(length + 32);
        digits.extend((0..length).map(|_| char::from(b'0' + self.rand.nonzero_digit())));
        digits.push('0');
        if let Some(instance_id) = &self.instance_id {
            digits.push_str(instance_id);
            digits.push('0');
        }
        digits.push_str(&self.time.current_secs().to_string());
        digits
    }

    /// Builds and encodes a candidate with a `length` digit random prefix.
    ///
    /// # Panics
    ///
    /// Panics if the assembled numeral is not a valid decimal, which would
    /// mean a [`RandSource`] returned something other than a digit. Emitting
    /// a mangled identifier instead would silently break uniqueness.
    pub fn build(&self, length: usize) -> String {
        let digits = self.digits(length);
        match codec::encode_decimal(&digits) {
            Ok(id) => id,
            Err(e) => panic!("candidate numeral {digits:?} is not a valid decimal: {e}"),
        }
    }
}

/// The fields of an issued identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Layout {
    /// The random prefix, as decimal digits.
    pub random: String,
    /// The instance identifier, if the identifier was not built in shortest
    /// mode.
    pub instance_id: Option<String>,
    /// Seconds since the Unix epoch at which the candidate was built.
    pub timestamp: u64,
}

impl Layout {
    /// Splits an identifier back into its fields.
    ///
    /// `shortest` must match the mode of the broker that issued `id`. Returns
    /// `None` if `id` is not valid Base58 or its numeral does not have the
    /// expected shape.
    ///
    /// # Example
    ///
    /// ```
    /// use shortid::Layout;
    ///
    /// // 77 0 1700000000
    /// let layout = Layout::parse("4VK1rdoV", true).unwrap();
    /// assert_eq!(layout.random, "77");
    /// assert_eq!(layout.instance_id, None);
    /// assert_eq!(layout.timestamp, 1_700_000_000);
    /// ```
    pub fn parse(id: &str, shortest: bool) -> Option<Self> {
        let digits = codec::decode_decimal(id).ok()?;
        let (random, rest) = digits.split_once('0')?;
        let (instance_id, timestamp) = if shortest {
            (None, rest)
        } else {
            let (instance_id, timestamp) = rest.split_once('0')?;
            (Some(instance_id.to_owned()), timestamp)
        };
        if random.is_empty() || instance_id.as_deref() == Some("") {
            return None;
        }
        Some(Self {
            random: random.to_owned(),
            instance_id,
            timestamp: timestamp.parse().ok()?,
        })
    }
}
