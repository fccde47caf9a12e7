//! Producer-Consumer Pipeline Component
//!
//! Orchestration around the bounded blocking queue: producers drain finite
//! sources into the queue, consumers drain the queue into destination sinks,
//! and a coordinator manages participant lifecycle, sentinel-driven shutdown
//! and metrics aggregation.
//!
//! Data flows strictly source → producer → queue → consumer → destination.
//! Every participant runs on its own OS thread and owns its counters
//! exclusively; the coordinator reads them only after joining the thread.
//!
//! # Example
//!
//! ```rust
//! use conveyor::pipeline::{
//!     Consumer, ConsumerConfig, Coordinator, CoordinatorConfig, Producer, ProducerConfig,
//!     VecSink,
//! };
//! use conveyor::queue::{BoundedQueue, ItemQueue};
//! use conveyor::pipeline::Item;
//! use std::sync::Arc;
//!
//! let queue: Arc<dyn ItemQueue<Item<u32>>> = Arc::new(BoundedQueue::new(8));
//! let mut coordinator = Coordinator::new(CoordinatorConfig::default(), Arc::clone(&queue));
//!
//! coordinator
//!     .add_producer(Producer::from_vec(
//!         ProducerConfig::new("producer-0"),
//!         (1..=100).collect(),
//!         Arc::clone(&queue),
//!     ))
//!     .unwrap();
//!
//! let sink = VecSink::new();
//! coordinator
//!     .add_consumer(Consumer::new(
//!         ConsumerConfig::new("consumer-0"),
//!         Box::new(sink.clone()),
//!         Arc::clone(&queue),
//!     ))
//!     .unwrap();
//!
//! let report = coordinator.run().unwrap();
//! assert_eq!(report.items_consumed, 100);
//! assert_eq!(sink.snapshot(), (1..=100).collect::<Vec<u32>>());
//! ```

mod config;
mod consumer;
mod coordinator;
mod error;
mod item;
mod metrics;
mod producer;
mod traits;

pub use config::{ConsumerConfig, CoordinatorConfig, ErrorPolicy, ProducerConfig};
pub use consumer::Consumer;
pub use coordinator::Coordinator;
pub use error::{CollaboratorError, PipelineError, PipelineResult};
pub use item::Item;
pub use metrics::{ParticipantMetrics, Role, RunReport, RunStatus};
pub use producer::Producer;
pub use traits::{IterSource, Sink, Source, TrySource, VecSink};

#[cfg(test)]
mod tests;
