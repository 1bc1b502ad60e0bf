use crate::mutex::{Mutex, lock};
use core::time::Duration;
use std::collections::HashMap;
use std::time::Instant;

/// How long an issued identifier is guaranteed not to recur.
///
/// Also the period of every distributor's maintenance tick.
pub const UNIQUENESS_WINDOW: Duration = Duration::from_millis(1050);

/// A time-windowed set of recently issued identifiers.
///
/// Each entry maps an identifier to the instant it stops being protected.
/// Entries are only dropped by [`Registry::purge`]; an expired entry that has
/// not been purged yet still counts as present, which errs on the side of
/// rejecting a candidate.
///
/// All operations take one coarse lock over the whole map: the registry is
/// hit by every generator task in its [`Scope`](crate::Scope) and by whichever
/// distributor's maintenance tick fires.
#[derive(Debug)]
pub struct Registry {
    window: Duration,
    entries: Mutex<HashMap<String, Instant>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(UNIQUENESS_WINDOW)
    }
}

impl Registry {
    /// Creates an empty registry protecting each identifier for `window`.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The uniqueness window applied by [`Registry::insert`].
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Records `value` with expiry `now + window`, overwriting any existing
    /// entry for it.
    pub fn insert(&self, value: impl Into<String>) {
        let expires_at = Instant::now() + self.window;
        lock(&self.entries).insert(value.into(), expires_at);
    }

    /// Returns `true` if `value` is currently recorded.
    pub fn contains(&self, value: &str) -> bool {
        lock(&self.entries).contains_key(value)
    }

    /// Records `value` unless it is already present.
    ///
    /// The membership check and the insertion happen under the same lock, so
    /// two generators racing on the same candidate cannot both claim it.
    /// Returns `true` if `value` was recorded by this call.
    pub fn try_insert(&self, value: &str) -> bool {
        let mut entries = lock(&self.entries);
        if entries.contains_key(value) {
            return false;
        }
        entries.insert(value.to_owned(), Instant::now() + self.window);
        true
    }

    /// Removes every entry whose expiry has passed and returns how many were
    /// dropped.
    pub fn purge(&self) -> usize {
        self.purge_at(Instant::now())
    }

    pub(crate) fn purge_at(&self, now: Instant) -> usize {
        let mut entries = lock(&self.entries);
        if entries.is_empty() {
            return 0;
        }
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at > now);
        before - entries.len()
    }

    /// Number of recorded entries, expired or not.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}
