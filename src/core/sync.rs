//! Synchronisation utilities for robust lock handling
//!
//! Converts mutex/condvar poisoning into application errors in a consistent
//! manner across the codebase, so blocking operations propagate a real error
//! instead of panicking when another thread died while holding the lock.

use std::sync::LockResult;

/// Handle poisoned lock results with consistent error handling
///
/// Works for `Mutex::lock`, `Condvar::wait` and `Condvar::wait_timeout`
/// results alike, since all of them wrap their guard in a `LockResult`.
/// The provided constructor builds the caller's error type from a message.
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use conveyor::core::sync::handle_lock_poison;
/// use conveyor::queue::QueueError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_lock_poison(mutex.lock(), |message| QueueError::Poisoned { message }).unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_lock_poison<G, E>(
    result: LockResult<G>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<G, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (lock poisoned). This indicates a panic occurred while holding the lock. PoisonError: {:?}",
            poison_err
        ))
    })
}
