//! Consumer participant
//!
//! A consumer drains the shared queue into a destination sink on its own OS
//! thread until it dequeues the end-of-stream marker. An empty-queue timeout
//! and the terminal marker are different outcomes of the same `get` call and
//! are never conflated: the former is retried per policy, the latter ends
//! the consumer without being forwarded or re-enqueued.

use crate::pipeline::config::{ConsumerConfig, ErrorPolicy};
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::item::Item;
use crate::pipeline::metrics::{ParticipantMetrics, Role};
use crate::pipeline::traits::Sink;
use crate::queue::{ItemQueue, QueueError};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Consumer thread handle: owns the sink until started, then the running
/// thread; metrics are handed back through [`join`](Self::join).
pub struct Consumer<T: Send + 'static> {
    config: ConsumerConfig,
    sink: Option<Box<dyn Sink<T>>>,
    queue: Arc<dyn ItemQueue<Item<T>>>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    outcome: Option<Receiver<ParticipantMetrics>>,
}

impl<T: Send + 'static> Consumer<T> {
    pub fn new(
        config: ConsumerConfig,
        sink: Box<dyn Sink<T>>,
        queue: Arc<dyn ItemQueue<Item<T>>>,
    ) -> Self {
        Self {
            config,
            sink: Some(sink),
            queue,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
            outcome: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Start the consumer thread.
    pub fn start(&mut self) -> PipelineResult<()> {
        if self.handle.is_some() {
            return Err(PipelineError::AlreadyRunning {
                name: self.config.name.clone(),
            });
        }
        let sink = self.sink.take().ok_or_else(|| PipelineError::Consumption {
            name: self.config.name.clone(),
            message: "sink already consumed by a previous run".to_string(),
        })?;

        let (outcome_tx, outcome_rx) = mpsc::channel();
        let config = self.config.clone();
        let queue = Arc::clone(&self.queue);
        let running = Arc::clone(&self.running);
        running.store(true, Ordering::Release);

        let handle = thread::Builder::new()
            .name(self.config.name.clone())
            .spawn(move || {
                let metrics = consume(config, sink, queue, &running);
                running.store(false, Ordering::Release);
                // Send failure just means nobody is waiting for the outcome.
                let _ = outcome_tx.send(metrics);
            })
            .map_err(|e| PipelineError::Consumption {
                name: self.config.name.clone(),
                message: format!("failed to spawn thread: {e}"),
            })?;

        self.handle = Some(handle);
        self.outcome = Some(outcome_rx);
        log::info!("Consumer '{}' started", self.config.name);
        Ok(())
    }

    /// Wait for the consumer thread to finish and collect its metrics.
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
                        "Consumer '{}' join timed out after {:?}",
                        self.config.name,
                        timeout
                    );
                    self.outcome = Some(outcome_rx);
                    return None;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    log::warn!(
                        "Consumer '{}' exited without reporting metrics",
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
                        "Consumer '{}' exited without reporting metrics",
                        self.config.name
                    );
                    let _ = self.handle.take().map(JoinHandle::join);
                    return None;
                }
            },
        };

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        log::debug!("Consumer '{}' joined", self.config.name);
        Some(metrics)
    }

    /// Signal the consumer to stop after the current item.
    pub fn stop(&self) {
        log::info!("Consumer '{}' received stop signal", self.config.name);
        self.running.store(false, Ordering::Release);
    }
}

/// Consumption loop executed on the consumer thread.
fn consume<T: Send>(
    config: ConsumerConfig,
    mut sink: Box<dyn Sink<T>>,
    queue: Arc<dyn ItemQueue<Item<T>>>,
    running: &AtomicBool,
) -> ParticipantMetrics {
    let started_at = Utc::now();
    let started = Instant::now();
    let mut items: u64 = 0;
    let mut errors: u64 = 0;
    let mut clean_exit = false;
    let mut consecutive_timeouts: u32 = 0;

    log::info!(
        "Consumer '{}' starting consumption to destination",
        config.name
    );

    while running.load(Ordering::Acquire) {
        let fetched = match config.get_timeout {
            Some(timeout) => queue.get_timeout(timeout),
            None => queue.get(),
        };

        match fetched {
            Ok(Item::EndOfStream) => {
                log::info!(
                    "Consumer '{}' received end-of-stream, shutting down gracefully",
                    config.name
                );
                clean_exit = true;
                break;
            }
            Ok(Item::Payload(item)) => {
                consecutive_timeouts = 0;
                match sink.accept(item) {
                    Ok(()) => {
                        items += 1;
                        if items % 100 == 0 {
                            log::info!(
                                "Consumer '{}' consumed {} items (queue size: {})",
                                config.name,
                                items,
                                queue.len()
                            );
                        } else {
                            log::debug!(
                                "Consumer '{}' consumed item (queue size: {})",
                                config.name,
                                queue.len()
                            );
                        }
                    }
                    Err(e) => {
                        errors += 1;
                        log::error!("Consumer '{}' failed to store item: {}", config.name, e);
                        if config.error_policy == ErrorPolicy::Abort {
                            break;
                        }
                    }
                }
            }
            Err(QueueError::Empty) => {
                // Temporarily empty, not terminal: the end-of-stream marker
                // arrives as a dequeued item, never as this error.
                consecutive_timeouts += 1;
                if let Some(max) = config.max_empty_retries {
                    if consecutive_timeouts > max {
                        errors += 1;
                        log::error!(
                            "Consumer '{}' stalled: queue empty for {} consecutive timeouts",
                            config.name,
                            consecutive_timeouts
                        );
                        break;
                    }
                }
                log::debug!("Consumer '{}' queue empty timeout, continuing", config.name);
                continue;
            }
            Err(e) => {
                // A poisoned queue is unusable; abort regardless of policy.
                errors += 1;
                log::error!("Consumer '{}' queue failure: {}", config.name, e);
                break;
            }
        }

        if let Some(delay) = config.delay_between_items {
            thread::sleep(delay);
        }
    }

    if !running.load(Ordering::Acquire) && !clean_exit {
        log::info!("Consumer '{}' stopped before completion", config.name);
    }

    log::info!(
        "Consumer '{}' completed. Consumed {} items, errors: {}",
        config.name,
        items,
        errors
    );

    ParticipantMetrics {
        name: config.name,
        role: Role::Consumer,
        items,
        errors,
        started_at,
        finished_at: Utc::now(),
        duration: started.elapsed(),
        clean_exit,
    }
}
