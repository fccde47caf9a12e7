//! Application startup: argument parsing, logging, demo run assembly

use crate::app::cli::args::Args;
use crate::app::cli::config::{QueueKind, RunSettings};
use crate::app::report;
use crate::pipeline::{
    Consumer, ConsumerConfig, Coordinator, CoordinatorConfig, Item, Producer, ProducerConfig,
    RunReport, RunStatus, VecSink,
};
use crate::queue::{BoundedQueue, ItemQueue, SimpleQueue};
use clap::Parser;
use std::sync::Arc;

/// Parse arguments, run the demo pipeline and return the process exit code.
pub fn startup() -> i32 {
    let args = Args::parse();

    // The handle must stay alive for the duration of the process.
    let _logger = match init_logging(&args) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("conveyor: failed to initialise logging: {e}");
            return 2;
        }
    };

    let settings = match RunSettings::resolve(&args) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("FATAL: {e}");
            return 2;
        }
    };

    match run(&args, &settings) {
        Ok(report) => match report.status {
            RunStatus::Ok => 0,
            RunStatus::Partial => 1,
            RunStatus::Timeout => 2,
        },
        Err(e) => {
            log::error!("FATAL: {e}");
            1
        }
    }
}

fn init_logging(args: &Args) -> Result<flexi_logger::LoggerHandle, flexi_logger::FlexiLoggerError> {
    let spec = args.log_level.clone().unwrap_or_else(|| "info".to_string());
    let logger = flexi_logger::Logger::try_with_str(&spec)?;
    let logger = match &args.log_file {
        Some(path) => logger.log_to_file(flexi_logger::FileSpec::try_from(path.clone())?),
        None => logger,
    };
    logger.start()
}

/// Assemble and run the demo pipeline described by the resolved settings:
/// integer items 1..=N split contiguously across the producers, one shared
/// queue, one in-memory sink per consumer.
fn run(args: &Args, settings: &RunSettings) -> Result<RunReport, Box<dyn std::error::Error>> {
    log::info!(
        "conveyor starting: {} producer(s), {} consumer(s), {} item(s), capacity {}, queue '{}'",
        settings.producers,
        settings.consumers,
        settings.items,
        settings.capacity,
        settings.queue
    );

    let queue: Arc<dyn ItemQueue<Item<i64>>> = match settings.queue {
        QueueKind::Bounded => Arc::new(BoundedQueue::new(settings.capacity)),
        QueueKind::Simple => Arc::new(SimpleQueue::new(settings.capacity)),
    };

    let coordinator_config =
        CoordinatorConfig::new("conveyor").with_join_timeout(settings.join_timeout);
    let mut coordinator = Coordinator::new(coordinator_config, Arc::clone(&queue));

    // Contiguous slices of 1..=items, the remainder spread over the first
    // producers.
    let producer_count = settings.producers as u64;
    let per_producer = settings.items / producer_count;
    let remainder = settings.items % producer_count;
    let mut next: i64 = 1;
    for idx in 0..settings.producers {
        let count = per_producer + u64::from((idx as u64) < remainder);
        let items: Vec<i64> = (next..next + count as i64).collect();
        next += count as i64;

        let config = ProducerConfig::new(format!("producer-{idx}"))
            .with_put_timeout(settings.put_timeout)
            .with_delay(settings.producer_delay)
            .with_error_policy(settings.error_policy);
        coordinator.add_producer(Producer::from_vec(config, items, Arc::clone(&queue)))?;
    }

    let mut sinks: Vec<VecSink<i64>> = Vec::with_capacity(settings.consumers);
    for idx in 0..settings.consumers {
        let sink = VecSink::new();
        sinks.push(sink.clone());

        let config = ConsumerConfig::new(format!("consumer-{idx}"))
            .with_get_timeout(settings.get_timeout)
            .with_delay(settings.consumer_delay)
            .with_error_policy(settings.error_policy);
        coordinator.add_consumer(Consumer::new(config, Box::new(sink), Arc::clone(&queue)))?;
    }

    let report = coordinator.run()?;

    let delivered: usize = sinks.iter().map(VecSink::len).sum();
    log::info!("{} item(s) delivered across {} sink(s)", delivered, sinks.len());

    if args.json {
        println!("{}", report::to_json(&report)?);
    } else {
        report::print_summary(&report);
    }
    if let Some(path) = &args.report_file {
        report::write_json(&report, path)?;
        log::info!("Run report written to '{}'", path.display());
    }

    Ok(report)
}
