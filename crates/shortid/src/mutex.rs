#[cfg(not(feature = "parking-lot"))]
pub(crate) use std::sync::{Mutex, MutexGuard};

#[cfg(feature = "parking-lot")]
pub(crate) use parking_lot::{Mutex, MutexGuard};

/// Acquires `mutex`, ignoring poisoning.
///
/// Every critical section guarded through this helper is a single map or
/// slot operation, so the data is consistent even if a holder panicked.
#[cfg(not(feature = "parking-lot"))]
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(feature = "parking-lot")]
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock()
}
