use ::rand::{Rng, rng};

/// A source of random non-zero decimal digits.
///
/// `0` is the field separator inside a candidate, so the random prefix may
/// only draw from `1..=9`. Implementations returning anything else break the
/// layout that [`Layout::parse`](crate::Layout::parse) relies on.
///
/// # Example
/// ```
/// use shortid::RandSource;
///
/// struct FixedRand;
/// impl RandSource for FixedRand {
///     fn nonzero_digit(&self) -> u8 {
///         7
///     }
/// }
///
/// assert_eq!(FixedRand.nonzero_digit(), 7);
/// ```
pub trait RandSource {
    /// Returns a digit in `1..=9`.
    fn nonzero_digit(&self) -> u8;
}

/// A `RandSource` that uses the thread-local RNG (`rand::rng()`).
///
/// Each OS thread has its own RNG instance, so calls from multiple generator
/// tasks are contention-free. This type does not store the RNG itself.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource for ThreadRandom {
    fn nonzero_digit(&self) -> u8 {
        rng().random_range(1..=9)
    }
}
