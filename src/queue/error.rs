//! Queue Error Types

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Queue is full (capacity: {capacity})")]
    Full { capacity: usize },

    #[error("Queue is empty")]
    Empty,

    #[error("Queue lock poisoned: {message}")]
    Poisoned { message: String },
}

impl QueueError {
    /// True for the capacity/availability errors (`Full`/`Empty`) that a
    /// caller may retry; `Poisoned` is not recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, QueueError::Full { .. } | QueueError::Empty)
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
