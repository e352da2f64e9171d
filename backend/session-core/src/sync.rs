//! Small locking helper shared by the transport and session layers.

use std::sync::{Mutex, MutexGuard};

/// A poisoned lock here only means a message handler panicked mid-delivery;
/// the protected state is still usable, so recover instead of propagating.
pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
