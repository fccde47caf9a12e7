//! Single-condvar queue variant
//!
//! A second conforming [`ItemQueue`] implementation that trades wake-up
//! precision for structural simplicity: one condition variable serves both
//! the "not empty" and "not full" predicates, so every state change must
//! broadcast (`notify_all`) or a wake-up could land on a waiter of the wrong
//! kind and be lost. It exists to exercise the substitutability of the queue
//! contract and as a baseline in the demo binary.

use crate::core::sync::handle_lock_poison;
use crate::core::time::Deadline;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::traits::ItemQueue;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// Bounded FIFO queue with a single shared condition variable.
pub struct SimpleQueue<T> {
    buffer: Mutex<VecDeque<T>>,
    changed: Condvar,
    capacity: usize,
}

impl<T> SimpleQueue<T> {
    /// Create a queue holding at most `capacity` items (0 = unbounded).
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Mutex::new(VecDeque::with_capacity(capacity)),
            changed: Condvar::new(),
            capacity,
        }
    }

    fn poisoned(message: String) -> QueueError {
        QueueError::Poisoned { message }
    }
}

impl<T: Send> ItemQueue<T> for SimpleQueue<T> {
    fn put(&self, item: T) -> QueueResult<()> {
        let mut buffer = handle_lock_poison(self.buffer.lock(), Self::poisoned)?;
        while self.capacity > 0 && buffer.len() >= self.capacity {
            buffer = handle_lock_poison(self.changed.wait(buffer), Self::poisoned)?;
        }
        buffer.push_back(item);
        self.changed.notify_all();
        Ok(())
    }

    fn put_timeout(&self, item: T, timeout: Duration) -> QueueResult<()> {
        let deadline = Deadline::after(timeout);
        let mut buffer = handle_lock_poison(self.buffer.lock(), Self::poisoned)?;
        while self.capacity > 0 && buffer.len() >= self.capacity {
            let remaining = match deadline.remaining() {
                Some(remaining) => remaining,
                None => {
                    return Err(QueueError::Full {
                        capacity: self.capacity,
                    })
                }
            };
            let (guard, _) = handle_lock_poison(
                self.changed.wait_timeout(buffer, remaining),
                Self::poisoned,
            )?;
            buffer = guard;
        }
        buffer.push_back(item);
        self.changed.notify_all();
        Ok(())
    }

    fn try_put(&self, item: T) -> QueueResult<()> {
        let mut buffer = handle_lock_poison(self.buffer.lock(), Self::poisoned)?;
        if self.capacity > 0 && buffer.len() >= self.capacity {
            return Err(QueueError::Full {
                capacity: self.capacity,
            });
        }
        buffer.push_back(item);
        self.changed.notify_all();
        Ok(())
    }

    fn get(&self) -> QueueResult<T> {
        let mut buffer = handle_lock_poison(self.buffer.lock(), Self::poisoned)?;
        while buffer.is_empty() {
            buffer = handle_lock_poison(self.changed.wait(buffer), Self::poisoned)?;
        }
        let item = buffer.pop_front().ok_or(QueueError::Empty)?;
        self.changed.notify_all();
        Ok(item)
    }

    fn get_timeout(&self, timeout: Duration) -> QueueResult<T> {
        let deadline = Deadline::after(timeout);
        let mut buffer = handle_lock_poison(self.buffer.lock(), Self::poisoned)?;
        while buffer.is_empty() {
            let remaining = match deadline.remaining() {
                Some(remaining) => remaining,
                None => return Err(QueueError::Empty),
            };
            let (guard, _) = handle_lock_poison(
                self.changed.wait_timeout(buffer, remaining),
                Self::poisoned,
            )?;
            buffer = guard;
        }
        let item = buffer.pop_front().ok_or(QueueError::Empty)?;
        self.changed.notify_all();
        Ok(item)
    }

    fn try_get(&self) -> QueueResult<T> {
        let mut buffer = handle_lock_poison(self.buffer.lock(), Self::poisoned)?;
        let item = buffer.pop_front().ok_or(QueueError::Empty)?;
        self.changed.notify_all();
        Ok(item)
    }

    fn len(&self) -> usize {
        self.buffer.lock().unwrap().len()
    }

    fn is_full(&self) -> bool {
        self.capacity > 0 && self.len() >= self.capacity
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T> std::fmt::Debug for SimpleQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleQueue")
            .field("capacity", &self.capacity)
            .finish()
    }
}
