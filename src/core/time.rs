//! Deadline arithmetic for timed blocking operations
//!
//! Timed waits must re-arm after every spurious or contested wake-up with the
//! time that is actually left, not the original timeout. `Deadline` captures
//! the absolute end instant once and hands back the shrinking remainder.

use std::time::{Duration, Instant};

/// An absolute point in time against which remaining wait budget is measured.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    end: Instant,
}

impl Deadline {
    /// Create a deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            end: Instant::now() + timeout,
        }
    }

    /// Time left until the deadline, or `None` once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        let now = Instant::now();
        if now >= self.end {
            None
        } else {
            Some(self.end - now)
        }
    }

    /// Whether the deadline has passed.
    pub fn expired(&self) -> bool {
        self.remaining().is_none()
    }
}
