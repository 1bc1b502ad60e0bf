use core::time::Duration;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// A source of whole seconds since the Unix epoch.
///
/// This abstraction allows you to plug in a real clock or a mocked clock in
/// tests.
///
/// # Example
/// ```
/// use shortid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_secs(&self) -> u64 {
///         1_700_000_000
///     }
/// }
///
/// assert_eq!(FixedTime.current_secs(), 1_700_000_000);
/// ```
pub trait TimeSource {
    /// Returns the current time in whole seconds since the Unix epoch.
    fn current_secs(&self) -> u64;
}

/// A clock that never runs backwards.
///
/// The wall-clock offset from the Unix epoch is sampled once at construction;
/// afterwards time advances with [`Instant`], so NTP steps or manual clock
/// changes cannot make the timestamp component of an identifier go back and
/// re-enter a second that was already issued.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    start: Instant,
    epoch_offset: Duration,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Anchors a new clock to the current wall-clock time.
    ///
    /// A system clock set before 1970 anchors the clock at the epoch itself.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            epoch_offset: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or(Duration::ZERO),
        }
    }
}

impl TimeSource for MonotonicClock {
    fn current_secs(&self) -> u64 {
        (self.epoch_offset + self.start.elapsed()).as_secs()
    }
}
