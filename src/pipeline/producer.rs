//! Producer participant
//!
//! A producer drains a finite source into the shared queue, in source order,
//! on its own OS thread. It is queue-agnostic: it depends only on the
//! [`ItemQueue`] blocking/timeout contract, never on a concrete
//! implementation, so any conforming queue is interchangeable.
//!
//! Producers do not enqueue the end-of-stream marker themselves; the
//! coordinator issues exactly one marker per consumer once every producer
//! has been joined, so markers always sit behind all real data.

use crate::pipeline::config::{ErrorPolicy, ProducerConfig};
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::item::Item;
use crate::pipeline::metrics::{ParticipantMetrics, Role};
use crate::pipeline::traits::{IterSource, Source};
use crate::queue::{ItemQueue, QueueError};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Producer thread handle: owns the source until started, then the running
/// thread; metrics are handed back through [`join`](Self::join).
pub struct Producer<T: Send + 'static> {
    config: ProducerConfig,
    source: Option<Box<dyn Source<T>>>,
    queue: Arc<dyn ItemQueue<Item<T>>>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    outcome: Option<Receiver<ParticipantMetrics>>,
}

impl<T: Send + 'static> Producer<T> {
    pub fn new(
        config: ProducerConfig,
        source: Box<dyn Source<T>>,
        queue: Arc<dyn ItemQueue<Item<T>>>,
    ) -> Self {
        Self {
            config,
            source: Some(source),
            queue,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
            outcome: None,
        }
    }

    /// Convenience constructor for an in-memory source.
    pub fn from_vec(
        config: ProducerConfig,
        items: Vec<T>,
        queue: Arc<dyn ItemQueue<Item<T>>>,
    ) -> Self {
        Self::new(config, Box::new(IterSource::new(items)), queue)
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Start the producer thread.
    pub fn start(&mut self) -> PipelineResult<()> {
        if self.handle.is_some() {
            return Err(PipelineError::AlreadyRunning {
                name: self.config.name.clone(),
            });
        }
        let source = self
            .source
            .take()
            .ok_or_else(|| PipelineError::Production {
                name: self.config.name.clone(),
                message: "source already consumed by a previous run".to_string(),
            })?;

        let (outcome_tx, outcome_rx) = mpsc::channel();
        let config = self.config.clone();
        let queue = Arc::clone(&self.queue);
        let running = Arc::clone(&self.running);
        running.store(true, Ordering::Release);

        let handle = thread::Builder::new()
            .name(self.config.name.clone())
            .spawn(move || {
                let metrics = produce(config, source, queue, &running);
                running.store(false, Ordering::Release);
                // Send failure just means nobody is waiting for the outcome.
                let _ = outcome_tx.send(metrics);
            })
            .map_err(|e| PipelineError::Production {
                name: self.config.name.clone(),
                message: format!("failed to spawn thread: {e}"),
            })?;

        self.handle = Some(handle);
        self.outcome = Some(outcome_rx);
        log::info!("Producer '{}' started", self.config.name);
        Ok(())
    }

    /// Wait for the producer thread to finish and collect its metrics.
    ///
    /// Returns `None` when the timeout elapses with the thread still alive;
    /// the thread is left running (a detected condition, never forcibly
    /// killed) and a later `join` may still succeed.
    pub fn join(&mut self, timeout: Option<Duration>) -> Option<ParticipantMetrics> {
        let outcome_rx = self.outcome.take()?;

        let metrics = match timeout {
            Some(timeout) => match outcome_rx.recv_timeout(timeout) {
                Ok(metrics) => metrics,
                Err(RecvTimeoutError::Timeout) => {
                    log::warn!(
                        "Producer '{}' join timed out after {:?}",
                        self.config.name,
                        timeout
                    );
                    self.outcome = Some(outcome_rx);
                    return None;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    log::warn!(
                        "Producer '{}' exited without reporting metrics",
                        self.config.name
                    );
                    let _ = self.handle.take().map(JoinHandle::join);
                    return None;
                }
            },
            None => match outcome_rx.recv() {
                Ok(metrics) => metrics,
                Err(_) => {
                    log::warn!(
                        "Producer '{}' exited without reporting metrics",
                        self.config.name
                    );
                    let _ = self.handle.take().map(JoinHandle::join);
                    return None;
                }
            },
        };

        // Metrics arrived, so the thread is at its tail; this join is quick.
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        log::debug!("Producer '{}' joined", self.config.name);
        Some(metrics)
    }

    /// Signal the producer to stop after the current item.
    pub fn stop(&self) {
        log::info!("Producer '{}' received stop signal", self.config.name);
        self.running.store(false, Ordering::Release);
    }
}

/// Production loop executed on the producer thread. Counters live on this
/// stack frame only; they leave the thread once, inside the returned metrics.
fn produce<T: Send>(
    config: ProducerConfig,
    mut source: Box<dyn Source<T>>,
    queue: Arc<dyn ItemQueue<Item<T>>>,
    running: &AtomicBool,
) -> ParticipantMetrics {
    let started_at = Utc::now();
    let started = Instant::now();
    let mut items: u64 = 0;
    let mut errors: u64 = 0;
    let mut clean_exit = true;

    log::info!("Producer '{}' starting production from source", config.name);

    while running.load(Ordering::Acquire) {
        let item = match source.next_item() {
            None => break,
            Some(Ok(item)) => item,
            Some(Err(e)) => {
                errors += 1;
                log::error!("Producer '{}' error preparing item: {}", config.name, e);
                if config.error_policy == ErrorPolicy::Abort {
                    clean_exit = false;
                    break;
                }
                continue;
            }
        };

        let outcome = match config.put_timeout {
            Some(timeout) => queue.put_timeout(Item::Payload(item), timeout),
            None => queue.put(Item::Payload(item)),
        };
        match outcome {
            Ok(()) => {
                items += 1;
                if items % 100 == 0 {
                    log::info!(
                        "Producer '{}' produced {} items (queue size: {})",
                        config.name,
                        items,
                        queue.len()
                    );
                } else {
                    log::debug!(
                        "Producer '{}' produced item (queue size: {})",
                        config.name,
                        queue.len()
                    );
                }
            }
            Err(e @ QueueError::Full { .. }) => {
                errors += 1;
                log::error!(
                    "Producer '{}' failed to enqueue item (timeout={:?}): {}",
                    config.name,
                    config.put_timeout,
                    e
                );
                if config.error_policy == ErrorPolicy::Abort {
                    clean_exit = false;
                    break;
                }
            }
            Err(e) => {
                // A poisoned queue is unusable; abort regardless of policy.
                errors += 1;
                clean_exit = false;
                log::error!("Producer '{}' queue failure: {}", config.name, e);
                break;
            }
        }

        if let Some(delay) = config.delay_between_items {
            thread::sleep(delay);
        }
    }

    if !running.load(Ordering::Acquire) {
        clean_exit = false;
        log::info!("Producer '{}' stopped before completion", config.name);
    }

    log::info!(
        "Producer '{}' completed. Produced {} items, errors: {}",
        config.name,
        items,
        errors
    );

    ParticipantMetrics {
        name: config.name,
        role: Role::Producer,
        items,
        errors,
        started_at,
        finished_at: Utc::now(),
        duration: started.elapsed(),
        clean_exit,
    }
}
