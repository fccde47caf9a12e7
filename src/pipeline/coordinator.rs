//! Coordinator: lifecycle orchestration and metrics aggregation
//!
//! The coordinator owns one shared queue and the collections of producers
//! and consumers working it. Start order is consumers first, then producers,
//! so no producer can finish into a queue with no consumer able to observe
//! its end-of-stream marker. Shutdown is sentinel-driven: once every
//! producer has been joined, the coordinator enqueues exactly one
//! end-of-stream marker per consumer (markers therefore sit behind all real
//! data), then joins the consumers.
//!
//! Threads that fail to terminate within the join timeout are detected and
//! reported by name; they are never forcibly killed, since forced thread
//! termination is unsafe.

use crate::pipeline::config::CoordinatorConfig;
use crate::pipeline::consumer::Consumer;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::item::Item;
use crate::pipeline::metrics::{ParticipantMetrics, Role, RunReport, RunStatus};
use crate::pipeline::producer::Producer;
use crate::queue::ItemQueue;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

/// Orchestrator for a single producer-consumer run.
pub struct Coordinator<T: Send + 'static> {
    config: CoordinatorConfig,
    queue: Arc<dyn ItemQueue<Item<T>>>,
    producers: Vec<Producer<T>>,
    consumers: Vec<Consumer<T>>,
    has_run: bool,
}

impl<T: Send + 'static> Coordinator<T> {
    pub fn new(config: CoordinatorConfig, queue: Arc<dyn ItemQueue<Item<T>>>) -> Self {
        Self {
            config,
            queue,
            producers: Vec::new(),
            consumers: Vec::new(),
            has_run: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Shared handle to the queue this coordinator manages.
    pub fn queue(&self) -> Arc<dyn ItemQueue<Item<T>>> {
        Arc::clone(&self.queue)
    }

    /// Register a producer. Fails while the system is running.
    pub fn add_producer(&mut self, producer: Producer<T>) -> PipelineResult<()> {
        if self.producers.iter().any(Producer::is_running) {
            return Err(PipelineError::AlreadyRunning {
                name: self.config.name.clone(),
            });
        }
        log::debug!(
            "Added producer '{}' to coordinator '{}'",
            producer.name(),
            self.config.name
        );
        self.producers.push(producer);
        Ok(())
    }

    /// Register a consumer. Fails while the system is running.
    pub fn add_consumer(&mut self, consumer: Consumer<T>) -> PipelineResult<()> {
        if self.consumers.iter().any(Consumer::is_running) {
            return Err(PipelineError::AlreadyRunning {
                name: self.config.name.clone(),
            });
        }
        log::debug!(
            "Added consumer '{}' to coordinator '{}'",
            consumer.name(),
            self.config.name
        );
        self.consumers.push(consumer);
        Ok(())
    }

    /// Start the system, wait for completion and aggregate the results.
    ///
    /// The returned report's status field is the single source of truth for
    /// success or failure: `ok` (clean), `partial` (data drained with
    /// recoverable item-level errors) or `timeout` (threads failed to
    /// terminate in time). Only usage errors and violated protocol
    /// invariants surface as `Err`.
    pub fn run(&mut self) -> PipelineResult<RunReport> {
        if self.has_run {
            return Err(PipelineError::AlreadyRunning {
                name: self.config.name.clone(),
            });
        }
        if self.producers.is_empty() {
            return Err(PipelineError::MissingParticipants {
                name: self.config.name.clone(),
                role: "producer",
            });
        }
        if self.consumers.is_empty() {
            return Err(PipelineError::MissingParticipants {
                name: self.config.name.clone(),
                role: "consumer",
            });
        }
        self.has_run = true;

        log::info!(
            "Coordinator '{}' starting {} producer(s) and {} consumer(s)",
            self.config.name,
            self.producers.len(),
            self.consumers.len()
        );

        let run_started_at = Utc::now();
        let run_started = Instant::now();

        // Consumers first, so every end-of-stream marker eventually has an
        // observer and items never pile up unread behind absent readers.
        for consumer in &mut self.consumers {
            consumer.start()?;
        }
        for producer in &mut self.producers {
            producer.start()?;
        }

        let mut participants: Vec<ParticipantMetrics> = Vec::new();
        let mut stuck: Vec<String> = Vec::new();

        // Producers finish first; their completion gates the sentinel phase.
        log::debug!(
            "Coordinator '{}' waiting for producers to complete",
            self.config.name
        );
        for producer in &mut self.producers {
            match producer.join(self.config.join_timeout) {
                Some(metrics) => participants.push(metrics),
                None => stuck.push(format!("producer '{}'", producer.name())),
            }
        }

        // One end-of-stream marker per consumer, enqueued only after every
        // producer stopped inserting. Delivery is bounded by the join
        // timeout so dead consumers cannot hang the coordinator on a full
        // queue; a failed delivery is a timeout outcome, not a silent hang.
        let mut sentinel_failures: u64 = 0;
        for consumer in &self.consumers {
            let delivered = match self.config.join_timeout {
                Some(timeout) => self.queue.put_timeout(Item::EndOfStream, timeout),
                None => self.queue.put(Item::EndOfStream),
            };
            if let Err(e) = delivered {
                sentinel_failures += 1;
                log::error!(
                    "Coordinator '{}' failed to deliver end-of-stream for consumer '{}': {}",
                    self.config.name,
                    consumer.name(),
                    e
                );
            }
        }

        log::debug!(
            "Coordinator '{}' waiting for consumers to complete",
            self.config.name
        );
        for consumer in &mut self.consumers {
            match consumer.join(self.config.join_timeout) {
                Some(metrics) => participants.push(metrics),
                None => stuck.push(format!("consumer '{}'", consumer.name())),
            }
        }

        // Sentinel accounting: when every consumer terminated cleanly on its
        // marker and nothing is stuck, the queue must be empty. Leftovers
        // mean the shutdown protocol itself is broken; fail loudly.
        if stuck.is_empty() && sentinel_failures == 0 {
            let all_clean = participants
                .iter()
                .filter(|m| m.role == Role::Consumer)
                .all(|m| m.clean_exit);
            let leftover = self.queue.len();
            if all_clean && leftover > 0 {
                return Err(PipelineError::SentinelMismatch {
                    message: format!(
                        "{} item(s) left in the queue after all consumers terminated on end-of-stream",
                        leftover
                    ),
                });
            }
        }

        let report = self.aggregate(participants, stuck, sentinel_failures, run_started_at, run_started);
        match report.status {
            RunStatus::Timeout => {
                if let Some(timeout) = self.config.join_timeout {
                    log::error!(
                        "{}",
                        PipelineError::ShutdownTimeout {
                            timeout,
                            stuck: report.stuck.clone(),
                        }
                    );
                }
            }
            _ => {
                log::info!(
                    "Coordinator '{}' completed with status '{}': produced={}, consumed={}, errors={}, duration={:.3}s",
                    self.config.name,
                    report.status,
                    report.items_produced,
                    report.items_consumed,
                    report.total_errors(),
                    report.duration.as_secs_f64()
                );
            }
        }
        Ok(report)
    }

    /// Signal every participant to stop after its current item.
    pub fn stop(&self) {
        log::info!("Coordinator '{}' stop requested", self.config.name);
        for producer in &self.producers {
            producer.stop();
        }
        for consumer in &self.consumers {
            consumer.stop();
        }
    }

    fn aggregate(
        &self,
        participants: Vec<ParticipantMetrics>,
        stuck: Vec<String>,
        sentinel_failures: u64,
        run_started_at: chrono::DateTime<Utc>,
        run_started: Instant,
    ) -> RunReport {
        let sum = |role: Role, errors: bool| -> u64 {
            participants
                .iter()
                .filter(|m| m.role == role)
                .map(|m| if errors { m.errors } else { m.items })
                .sum()
        };
        let items_produced = sum(Role::Producer, false);
        let items_consumed = sum(Role::Consumer, false);
        let producer_errors = sum(Role::Producer, true);
        let consumer_errors = sum(Role::Consumer, true);

        // Overall span is latest finish minus earliest start across the
        // participants; the coordinator's own clock covers stuck threads.
        let duration = {
            let earliest = participants.iter().map(|m| m.started_at).min();
            let latest = participants.iter().map(|m| m.finished_at).max();
            match (earliest, latest, stuck.is_empty()) {
                (Some(earliest), Some(latest), true) => (latest - earliest)
                    .to_std()
                    .unwrap_or_else(|_| run_started.elapsed()),
                _ => run_started.elapsed(),
            }
        };

        let status = if !stuck.is_empty() || sentinel_failures > 0 {
            RunStatus::Timeout
        } else if producer_errors + consumer_errors > 0 {
            RunStatus::Partial
        } else {
            RunStatus::Ok
        };

        RunReport {
            status,
            items_produced,
            items_consumed,
            producer_errors,
            consumer_errors,
            started_at: run_started_at,
            finished_at: Utc::now(),
            duration,
            stuck,
            participants,
        }
    }
}
