//! Run settings resolution: defaults ← config file ← CLI flags
//!
//! The config file is TOML with the same vocabulary as the CLI flags.
//! All durations are given in integral milliseconds (seconds for the join
//! timeout), with 0 meaning "disabled" for the optional ones.

use crate::app::cli::args::Args;
use crate::pipeline::ErrorPolicy;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use strum_macros::{Display, EnumString};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("Invalid value for {field}: '{value}'")]
    Invalid { field: &'static str, value: String },
}

/// Which queue implementation backs the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum QueueKind {
    /// Two-condvar bounded queue (the primary implementation).
    #[default]
    Bounded,
    /// Single-condvar broadcast variant.
    Simple,
}

/// Optional overrides read from a TOML config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub producers: Option<usize>,
    pub consumers: Option<usize>,
    pub items: Option<u64>,
    pub capacity: Option<usize>,
    pub queue: Option<String>,
    pub put_timeout_ms: Option<u64>,
    pub get_timeout_ms: Option<u64>,
    pub producer_delay_ms: Option<u64>,
    pub consumer_delay_ms: Option<u64>,
    pub join_timeout_secs: Option<u64>,
    pub error_policy: Option<String>,
}

impl FileSettings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Fully resolved settings for one demo run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub producers: usize,
    pub consumers: usize,
    pub items: u64,
    pub capacity: usize,
    pub queue: QueueKind,
    pub put_timeout: Option<Duration>,
    pub get_timeout: Option<Duration>,
    pub producer_delay: Option<Duration>,
    pub consumer_delay: Option<Duration>,
    pub join_timeout: Option<Duration>,
    pub error_policy: ErrorPolicy,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            producers: 1,
            consumers: 1,
            items: 1000,
            capacity: 10,
            queue: QueueKind::default(),
            put_timeout: None,
            get_timeout: None,
            producer_delay: None,
            consumer_delay: None,
            join_timeout: Some(Duration::from_secs(30)),
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl RunSettings {
    /// Resolve the effective settings: defaults, overridden by the config
    /// file when given, overridden by explicit CLI flags.
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let file = match &args.config_file {
            Some(path) => FileSettings::load(path)?,
            None => FileSettings::default(),
        };

        let mut settings = Self::default();

        if let Some(n) = file.producers {
            settings.producers = n;
        }
        if let Some(n) = args.producers {
            settings.producers = n;
        }
        if let Some(n) = file.consumers {
            settings.consumers = n;
        }
        if let Some(n) = args.consumers {
            settings.consumers = n;
        }
        if let Some(n) = file.items {
            settings.items = n;
        }
        if let Some(n) = args.items {
            settings.items = n;
        }
        if let Some(n) = file.capacity {
            settings.capacity = n;
        }
        if let Some(n) = args.capacity {
            settings.capacity = n;
        }

        let queue = args.queue.as_deref().or(file.queue.as_deref());
        if let Some(value) = queue {
            settings.queue = QueueKind::from_str(value).map_err(|_| ConfigError::Invalid {
                field: "queue",
                value: value.to_string(),
            })?;
        }

        let policy = args.error_policy.as_deref().or(file.error_policy.as_deref());
        if let Some(value) = policy {
            settings.error_policy =
                ErrorPolicy::from_str(value).map_err(|_| ConfigError::Invalid {
                    field: "error_policy",
                    value: value.to_string(),
                })?;
        }

        settings.put_timeout = millis(args.put_timeout_ms.or(file.put_timeout_ms))
            .or(settings.put_timeout);
        settings.get_timeout = millis(args.get_timeout_ms.or(file.get_timeout_ms))
            .or(settings.get_timeout);
        settings.producer_delay = millis(args.producer_delay_ms.or(file.producer_delay_ms));
        settings.consumer_delay = millis(args.consumer_delay_ms.or(file.consumer_delay_ms));
        if let Some(secs) = args.join_timeout_secs.or(file.join_timeout_secs) {
            settings.join_timeout = if secs == 0 {
                None
            } else {
                Some(Duration::from_secs(secs))
            };
        }

        if settings.producers == 0 {
            return Err(ConfigError::Invalid {
                field: "producers",
                value: "0".to_string(),
            });
        }
        if settings.consumers == 0 {
            return Err(ConfigError::Invalid {
                field: "consumers",
                value: "0".to_string(),
            });
        }

        Ok(settings)
    }
}

/// 0 and unset both mean "disabled".
fn millis(value: Option<u64>) -> Option<Duration> {
    value.filter(|ms| *ms > 0).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn args_from(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("conveyor").chain(argv.iter().copied()))
    }

    #[test]
    fn test_defaults_without_flags_or_file() {
        let settings = RunSettings::resolve(&args_from(&[])).unwrap();
        assert_eq!(settings.producers, 1);
        assert_eq!(settings.consumers, 1);
        assert_eq!(settings.items, 1000);
        assert_eq!(settings.capacity, 10);
        assert_eq!(settings.queue, QueueKind::Bounded);
        assert_eq!(settings.error_policy, ErrorPolicy::Abort);
        assert_eq!(settings.join_timeout, Some(Duration::from_secs(30)));
        assert!(settings.put_timeout.is_none());
    }

    #[test]
    fn test_cli_flags_override_defaults() {
        let settings = RunSettings::resolve(&args_from(&[
            "--producers",
            "2",
            "--consumers",
            "3",
            "--items",
            "50",
            "--capacity",
            "1",
            "--queue",
            "simple",
            "--error-policy",
            "skip",
            "--put-timeout-ms",
            "250",
        ]))
        .unwrap();
        assert_eq!(settings.producers, 2);
        assert_eq!(settings.consumers, 3);
        assert_eq!(settings.items, 50);
        assert_eq!(settings.capacity, 1);
        assert_eq!(settings.queue, QueueKind::Simple);
        assert_eq!(settings.error_policy, ErrorPolicy::Skip);
        assert_eq!(settings.put_timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_config_file_overrides_defaults_and_cli_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "producers = 4\nconsumers = 2\nitems = 10\nqueue = \"simple\"\nget_timeout_ms = 100"
        )
        .unwrap();

        let path = file.path().to_string_lossy().to_string();
        let settings =
            RunSettings::resolve(&args_from(&["--config-file", &path, "--consumers", "5"]))
                .unwrap();

        assert_eq!(settings.producers, 4);
        assert_eq!(settings.consumers, 5); // CLI wins over the file
        assert_eq!(settings.items, 10);
        assert_eq!(settings.queue, QueueKind::Simple);
        assert_eq!(settings.get_timeout, Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_unknown_config_key_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "no_such_setting = 1").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let result = RunSettings::resolve(&args_from(&["--config-file", &path]));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_invalid_queue_kind_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "queue = \"lockfree\"").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let result = RunSettings::resolve(&args_from(&["--config-file", &path]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { field: "queue", .. })
        ));
    }

    #[test]
    fn test_zero_participants_rejected() {
        let result = RunSettings::resolve(&args_from(&["--producers", "0"]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "producers",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_join_timeout_means_unbounded() {
        let settings = RunSettings::resolve(&args_from(&["--join-timeout-secs", "0"])).unwrap();
        assert!(settings.join_timeout.is_none());
    }
}
