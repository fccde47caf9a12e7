//! Pipeline Error Types
//!
//! Item-level collaborator failures are recorded in participant metrics and
//! handled per the configured policy; coordination-level failures always
//! escalate to the run outcome and are never silently swallowed.

use crate::queue::QueueError;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Producer '{name}' failed: {message}")]
    Production { name: String, message: String },

    #[error("Consumer '{name}' failed: {message}")]
    Consumption { name: String, message: String },

    #[error("'{name}' is already running")]
    AlreadyRunning { name: String },

    #[error("Cannot run '{name}': no {role}s configured")]
    MissingParticipants { name: String, role: &'static str },

    #[error("Shutdown timed out after {timeout:?}; stuck participants: {stuck:?}")]
    ShutdownTimeout {
        timeout: Duration,
        stuck: Vec<String>,
    },

    #[error("Sentinel protocol violated: {message}")]
    SentinelMismatch { message: String },

    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Failure reported by a source or sink collaborator for a single item.
/// The owning participant wraps it with its own identity when escalating.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CollaboratorError {
    pub message: String,
}

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
