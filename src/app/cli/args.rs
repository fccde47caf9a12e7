//! Command-line arguments for the demo binary

use clap::Parser;
use std::path::PathBuf;

/// Global arguments structure with all command-line options
///
/// CLI flags override the config file, which overrides built-in defaults.
#[derive(Parser, Debug, Clone)]
#[command(name = "conveyor")]
#[command(about = "Bounded blocking queue producer/consumer pipeline demo")]
#[command(version)]
#[command(
    after_help = "Exit codes: 0 = ok, 1 = partial (item-level errors) or fatal error, 2 = timeout or configuration error"
)]
pub struct Args {
    /// Number of producer threads
    #[arg(short = 'p', long = "producers", value_name = "N")]
    pub producers: Option<usize>,

    /// Number of consumer threads
    #[arg(short = 'c', long = "consumers", value_name = "N")]
    pub consumers: Option<usize>,

    /// Total number of items to push through the pipeline
    #[arg(short = 'n', long = "items", value_name = "COUNT")]
    pub items: Option<u64>,

    /// Queue capacity (0 = unbounded)
    #[arg(short = 'k', long = "capacity", value_name = "SIZE")]
    pub capacity: Option<usize>,

    /// Queue implementation
    #[arg(short = 'q', long = "queue", value_name = "IMPL", value_parser = ["bounded", "simple"])]
    pub queue: Option<String>,

    /// Producer put timeout in milliseconds (unset = wait indefinitely)
    #[arg(long = "put-timeout-ms", value_name = "MS")]
    pub put_timeout_ms: Option<u64>,

    /// Consumer get timeout in milliseconds (unset = wait indefinitely)
    #[arg(long = "get-timeout-ms", value_name = "MS")]
    pub get_timeout_ms: Option<u64>,

    /// Delay between produced items in milliseconds
    #[arg(long = "producer-delay-ms", value_name = "MS")]
    pub producer_delay_ms: Option<u64>,

    /// Delay between consumed items in milliseconds
    #[arg(long = "consumer-delay-ms", value_name = "MS")]
    pub consumer_delay_ms: Option<u64>,

    /// Maximum seconds to wait for each thread to join during shutdown
    #[arg(long = "join-timeout-secs", value_name = "SECS")]
    pub join_timeout_secs: Option<u64>,

    /// Item-level error policy
    #[arg(long = "error-policy", value_name = "POLICY", value_parser = ["abort", "skip"])]
    pub error_policy: Option<String>,

    /// Configuration file path (TOML)
    #[arg(short = 'f', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Emit the run report as JSON on stdout instead of the summary table
    #[arg(long = "json")]
    pub json: bool,

    /// Write the run report as JSON to a file
    #[arg(long = "report-file", value_name = "FILE")]
    pub report_file: Option<PathBuf>,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}
