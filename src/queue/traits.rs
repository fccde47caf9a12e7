//! Queue capability trait
//!
//! Producers, consumers and the coordinator depend on this trait rather than
//! a concrete queue type, so any conforming implementation can be swapped in
//! without touching the orchestration code. Substitutability is a tested
//! property, not an accident.

use crate::queue::error::QueueResult;
use std::time::Duration;

/// Contract for a thread-safe FIFO queue with blocking, timed and
/// non-blocking variants of both operations.
///
/// # Blocking semantics
///
/// - `put`/`get` suspend the calling thread indefinitely until the operation
///   can complete. Suspension is a true blocking wait released by the
///   complementary operation, not polling.
/// - `put_timeout`/`get_timeout` suspend up to the given duration, then fail
///   with `QueueError::Full`/`QueueError::Empty`. A timed-out call leaves the
///   queue state untouched.
/// - `try_put`/`try_get` fail immediately instead of waiting.
///
/// # Snapshot semantics
///
/// `len`, `is_empty` and `is_full` return instantaneous, lock-protected
/// snapshots. Under concurrent access the value may be stale by the time the
/// call returns; callers must not build synchronisation logic on top of them.
pub trait ItemQueue<T>: Send + Sync {
    /// Append an item at the tail, waiting indefinitely for capacity.
    fn put(&self, item: T) -> QueueResult<()>;

    /// Append an item at the tail, waiting up to `timeout` for capacity.
    fn put_timeout(&self, item: T, timeout: Duration) -> QueueResult<()>;

    /// Append an item at the tail without waiting.
    fn try_put(&self, item: T) -> QueueResult<()>;

    /// Remove and return the head item, waiting indefinitely for one.
    fn get(&self) -> QueueResult<T>;

    /// Remove and return the head item, waiting up to `timeout` for one.
    fn get_timeout(&self, timeout: Duration) -> QueueResult<T>;

    /// Remove and return the head item without waiting.
    fn try_get(&self) -> QueueResult<T>;

    /// Current number of buffered items (snapshot).
    fn len(&self) -> usize;

    /// Whether the queue currently holds no items (snapshot).
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the queue is at capacity (snapshot). Always false for
    /// unbounded queues.
    fn is_full(&self) -> bool;

    /// Configured capacity; 0 means unbounded.
    fn capacity(&self) -> usize;
}
