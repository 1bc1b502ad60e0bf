use portable_atomic::{AtomicUsize, Ordering};

/// The smallest random prefix a candidate can carry.
pub const MIN_LENGTH: usize = 1;

/// The adaptive number of random digits that prefix each candidate.
///
/// Generators grow it when collisions pile up; every maintenance tick resets
/// it to [`MIN_LENGTH`]. The value is shared by every generator in a
/// [`Scope`](crate::Scope), so all updates go through an atomic.
///
/// The unconditional reset can make the length oscillate under sustained
/// load (grow, reset, regrow within one window).
#[derive(Debug)]
pub struct LengthController {
    value: AtomicUsize,
}

impl Default for LengthController {
    fn default() -> Self {
        Self::new()
    }
}

impl LengthController {
    pub const fn new() -> Self {
        Self {
            value: AtomicUsize::new(MIN_LENGTH),
        }
    }

    /// Current prefix length. Always at least [`MIN_LENGTH`].
    pub fn current(&self) -> usize {
        self.value.load(Ordering::Relaxed)
    }

    /// Lengthens the prefix by one digit and returns the new length.
    pub fn grow(&self) -> usize {
        self.value.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Shrinks the prefix back to [`MIN_LENGTH`].
    pub fn reset(&self) {
        self.value.store(MIN_LENGTH, Ordering::Relaxed);
    }
}
