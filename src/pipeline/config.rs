//! Configuration for pipeline participants
//!
//! Plain immutable-by-convention structs controlling participant behaviour.
//! The demo binary layers a config file and CLI flags on top of these; the
//! library itself only ever sees the resolved values.

use std::time::Duration;
use strum_macros::{Display, EnumString};

/// What a participant does when a single item fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop the participant on the first item-level error.
    #[default]
    Abort,
    /// Record the error and continue with the next item.
    Skip,
}

/// Configuration for a [`Producer`](crate::pipeline::Producer).
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Identifier used for the thread name, metrics and logging.
    pub name: String,
    /// Maximum wait when putting to a full queue; `None` waits indefinitely.
    pub put_timeout: Option<Duration>,
    /// Optional pause between items, to simulate a variable production rate.
    pub delay_between_items: Option<Duration>,
    /// Item-level error handling.
    pub error_policy: ErrorPolicy,
}

impl ProducerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            put_timeout: None,
            delay_between_items: None,
            error_policy: ErrorPolicy::default(),
        }
    }

    pub fn with_put_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.put_timeout = timeout;
        self
    }

    pub fn with_delay(mut self, delay: Option<Duration>) -> Self {
        self.delay_between_items = delay;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }
}

/// Configuration for a [`Consumer`](crate::pipeline::Consumer).
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Identifier used for the thread name, metrics and logging.
    pub name: String,
    /// Maximum wait when getting from an empty queue; `None` waits
    /// indefinitely.
    pub get_timeout: Option<Duration>,
    /// Optional pause between items, to simulate a variable consumption rate.
    pub delay_between_items: Option<Duration>,
    /// Item-level error handling.
    pub error_policy: ErrorPolicy,
    /// Consecutive empty timeouts tolerated before the consumer treats the
    /// queue as stalled and gives up; `None` retries forever.
    pub max_empty_retries: Option<u32>,
}

impl ConsumerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            get_timeout: None,
            delay_between_items: None,
            error_policy: ErrorPolicy::default(),
            max_empty_retries: None,
        }
    }

    pub fn with_get_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.get_timeout = timeout;
        self
    }

    pub fn with_delay(mut self, delay: Option<Duration>) -> Self {
        self.delay_between_items = delay;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn with_max_empty_retries(mut self, retries: Option<u32>) -> Self {
        self.max_empty_retries = retries;
        self
    }
}

/// Configuration for the [`Coordinator`](crate::pipeline::Coordinator).
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Identifier used in logging and error messages.
    pub name: String,
    /// Maximum wait when joining each participant thread; `None` waits
    /// indefinitely. Also bounds sentinel delivery, so dead consumers
    /// cannot hang the coordinator on a full queue.
    pub join_timeout: Option<Duration>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            name: "coordinator".to_string(),
            join_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl CoordinatorConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_join_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.join_timeout = timeout;
        self
    }
}
