//! Run metrics and the aggregate report
//!
//! Each participant owns its counters exclusively while its thread runs and
//! hands the finished `ParticipantMetrics` to the coordinator only at exit,
//! so no synchronisation is needed on any counter. The coordinator folds the
//! per-participant values into a single [`RunReport`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use strum_macros::{Display, EnumString};

/// Which side of the queue a participant works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Producer,
    Consumer,
}

/// Counters and timestamps for a single participant thread.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantMetrics {
    pub name: String,
    pub role: Role,
    /// Items successfully produced to / consumed from the queue.
    pub items: u64,
    /// Item-level errors encountered (timeouts, collaborator failures).
    pub errors: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Monotonic elapsed time of the participant's run.
    pub duration: Duration,
    /// Whether the participant completed its protocol normally: a producer
    /// exhausted its source, a consumer terminated on its end-of-stream
    /// marker. False after a fatal abort, stall or external stop.
    pub clean_exit: bool,
}

/// Overall outcome of a coordinated run; the single source of truth for
/// success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// All data drained, no errors, all threads terminated.
    Ok,
    /// Data drained but some item-level errors were recorded.
    Partial,
    /// One or more threads failed to terminate within the join timeout.
    Timeout,
}

/// Aggregate report for one coordinated run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub status: RunStatus,
    pub items_produced: u64,
    pub items_consumed: u64,
    pub producer_errors: u64,
    pub consumer_errors: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Overall wall-clock span: latest participant finish minus earliest
    /// participant start (coordinator clock when participants are missing).
    pub duration: Duration,
    /// Participants that did not terminate within the join timeout. The
    /// threads are detected and reported, never forcibly killed.
    pub stuck: Vec<String>,
    pub participants: Vec<ParticipantMetrics>,
}

impl RunReport {
    pub fn total_errors(&self) -> u64 {
        self.producer_errors + self.consumer_errors
    }
}
