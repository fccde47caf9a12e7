//! Bounded blocking FIFO queue built from primitive synchronisation
//!
//! One mutex guards the buffer; two condition variables (`not_empty`,
//! `not_full`) are logically tied to that same lock. Splitting the state
//! across separate locks would open the classic lost-wakeup window, so all
//! of it lives behind the single mutex.
//!
//! Waits are guarded: a woken thread always re-checks its predicate before
//! proceeding, because several waiters may be woken and only one can win.
//! Each successful state change notifies exactly one waiter on the opposite
//! condition, which keeps wake-ups proportional to throughput under load.

use crate::core::sync::handle_lock_poison;
use crate::core::time::Deadline;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::traits::ItemQueue;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Duration;

/// How long an operation is willing to wait for its predicate.
enum Wait {
    NoWait,
    Forever,
    For(Duration),
}

/// A bounded thread-safe FIFO queue.
///
/// Items are appended at the tail and removed from the head; every
/// successful `get` returns the earliest-inserted item still buffered,
/// regardless of which thread inserted it. A `capacity` of 0 makes the
/// queue unbounded, in which case producers never block.
///
/// The queue is shared by reference (`Arc<BoundedQueue<T>>`) among any
/// number of producer and consumer threads for the duration of a run.
pub struct BoundedQueue<T> {
    /// Insertion-ordered buffer; only ever mutated while the lock is held.
    buffer: Mutex<VecDeque<T>>,
    /// Signalled once per successful put.
    not_empty: Condvar,
    /// Signalled once per successful get.
    not_full: Condvar,
    /// Maximum number of buffered items; 0 = unbounded.
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Create a queue holding at most `capacity` items (0 = unbounded).
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Mutex::new(VecDeque::with_capacity(capacity)),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        }
    }

    /// Create an unbounded queue.
    pub fn unbounded() -> Self {
        Self::new(0)
    }

    /// Append an item, waiting indefinitely while the queue is full.
    pub fn put(&self, item: T) -> QueueResult<()> {
        self.put_inner(item, Wait::Forever)
    }

    /// Append an item, waiting up to `timeout` while the queue is full.
    pub fn put_timeout(&self, item: T, timeout: Duration) -> QueueResult<()> {
        self.put_inner(item, Wait::For(timeout))
    }

    /// Append an item, failing immediately with `Full` when at capacity.
    pub fn try_put(&self, item: T) -> QueueResult<()> {
        self.put_inner(item, Wait::NoWait)
    }

    /// Remove and return the head item, waiting indefinitely while empty.
    pub fn get(&self) -> QueueResult<T> {
        self.get_inner(Wait::Forever)
    }

    /// Remove and return the head item, waiting up to `timeout` while empty.
    pub fn get_timeout(&self, timeout: Duration) -> QueueResult<T> {
        self.get_inner(Wait::For(timeout))
    }

    /// Remove and return the head item, failing immediately with `Empty`.
    pub fn try_get(&self) -> QueueResult<T> {
        self.get_inner(Wait::NoWait)
    }

    /// Current number of buffered items.
    ///
    /// The value may be stale as soon as this returns; with concurrent
    /// producers and consumers that staleness is inherent, not a bug.
    pub fn len(&self) -> usize {
        self.buffer.lock().unwrap().len()
    }

    /// Whether the queue currently holds no items. Same staleness caveat
    /// as [`len`](Self::len); unsuitable for synchronisation decisions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the queue is at capacity. Always false when unbounded.
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.len() >= self.capacity
    }

    /// Configured capacity; 0 means unbounded.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock_buffer(&self) -> QueueResult<MutexGuard<'_, VecDeque<T>>> {
        handle_lock_poison(self.buffer.lock(), |message| QueueError::Poisoned {
            message,
        })
    }

    fn put_inner(&self, item: T, wait: Wait) -> QueueResult<()> {
        let mut buffer = self.lock_buffer()?;

        if self.capacity > 0 {
            match wait {
                Wait::NoWait => {
                    if buffer.len() >= self.capacity {
                        return Err(QueueError::Full {
                            capacity: self.capacity,
                        });
                    }
                }
                Wait::Forever => {
                    while buffer.len() >= self.capacity {
                        buffer =
                            handle_lock_poison(self.not_full.wait(buffer), |message| {
                                QueueError::Poisoned { message }
                            })?;
                    }
                }
                Wait::For(timeout) => {
                    let deadline = Deadline::after(timeout);
                    while buffer.len() >= self.capacity {
                        let remaining = match deadline.remaining() {
                            Some(remaining) => remaining,
                            None => {
                                return Err(QueueError::Full {
                                    capacity: self.capacity,
                                })
                            }
                        };
                        // Guarded wait: the loop re-checks the predicate on
                        // every wake-up; the deadline decides timeout, not
                        // the WaitTimeoutResult of a single wait.
                        let (guard, _) = handle_lock_poison(
                            self.not_full.wait_timeout(buffer, remaining),
                            |message| QueueError::Poisoned { message },
                        )?;
                        buffer = guard;
                    }
                }
            }
        }

        buffer.push_back(item);
        // Wake exactly one waiting consumer.
        self.not_empty.notify_one();
        Ok(())
    }

    fn get_inner(&self, wait: Wait) -> QueueResult<T> {
        let mut buffer = self.lock_buffer()?;

        match wait {
            Wait::NoWait => {
                if buffer.is_empty() {
                    return Err(QueueError::Empty);
                }
            }
            Wait::Forever => {
                while buffer.is_empty() {
                    buffer = handle_lock_poison(self.not_empty.wait(buffer), |message| {
                        QueueError::Poisoned { message }
                    })?;
                }
            }
            Wait::For(timeout) => {
                let deadline = Deadline::after(timeout);
                while buffer.is_empty() {
                    let remaining = match deadline.remaining() {
                        Some(remaining) => remaining,
                        None => return Err(QueueError::Empty),
                    };
                    let (guard, _) = handle_lock_poison(
                        self.not_empty.wait_timeout(buffer, remaining),
                        |message| QueueError::Poisoned { message },
                    )?;
                    buffer = guard;
                }
            }
        }

        // Non-empty is guaranteed by the guards above while the lock is held.
        let item = buffer.pop_front().ok_or(QueueError::Empty)?;
        // Wake exactly one waiting producer.
        self.not_full.notify_one();
        Ok(item)
    }
}

impl<T> std::fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

impl<T: Send> ItemQueue<T> for BoundedQueue<T> {
    fn put(&self, item: T) -> QueueResult<()> {
        BoundedQueue::put(self, item)
    }

    fn put_timeout(&self, item: T, timeout: Duration) -> QueueResult<()> {
        BoundedQueue::put_timeout(self, item, timeout)
    }

    fn try_put(&self, item: T) -> QueueResult<()> {
        BoundedQueue::try_put(self, item)
    }

    fn get(&self) -> QueueResult<T> {
        BoundedQueue::get(self)
    }

    fn get_timeout(&self, timeout: Duration) -> QueueResult<T> {
        BoundedQueue::get_timeout(self, timeout)
    }

    fn try_get(&self) -> QueueResult<T> {
        BoundedQueue::try_get(self)
    }

    fn len(&self) -> usize {
        BoundedQueue::len(self)
    }

    fn is_full(&self) -> bool {
        BoundedQueue::is_full(self)
    }

    fn capacity(&self) -> usize {
        BoundedQueue::capacity(self)
    }
}
