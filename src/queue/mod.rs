//! Bounded Blocking Queue Component
//!
//! A thread-safe FIFO queue coordinating any number of producer and consumer
//! threads, built from a mutex and condition variables rather than a
//! ready-made concurrent collection.
//!
//! # Overview
//!
//! - **Bounded or unbounded**: a fixed capacity applies backpressure to
//!   producers; capacity 0 removes the bound entirely
//! - **Blocking, timed and non-blocking** variants of both operations
//! - **Global FIFO**: the N-th successful get returns the item from the
//!   N-th successful put, across all threads
//! - **Swappable**: orchestration code depends on the [`ItemQueue`] trait,
//!   so any conforming implementation plugs in
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  Producer A  │     │  Producer B  │     │  Producer C  │
//! └──────┬───────┘     └──────┬───────┘     └──────┬───────┘
//!        │ put                │ put                │ put
//!        ▼                    ▼                    ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │            BoundedQueue (one mutex, two condvars)       │
//! │        head ┌───┬───┬───┬───┬───┬───┬───┐ tail          │
//! │             │ 1 │ 2 │ 3 │ 4 │ 5 │ 6 │ 7 │               │
//! │             └───┴───┴───┴───┴───┴───┴───┘               │
//! └──────┬───────────────────┬──────────────────────────────┘
//!        │ get               │ get
//! ┌──────┴──────┐     ┌──────┴──────┐
//! │ Consumer A  │     │ Consumer B  │   (items are competed for,
//! └─────────────┘     └─────────────┘    not broadcast)
//! ```
//!
//! # Example
//!
//! ```rust
//! use conveyor::queue::BoundedQueue;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let queue = Arc::new(BoundedQueue::new(4));
//!
//! let producer_queue = Arc::clone(&queue);
//! let producer = thread::spawn(move || {
//!     for n in 0..8 {
//!         producer_queue.put(n).unwrap();
//!     }
//! });
//!
//! let consumer_queue = Arc::clone(&queue);
//! let consumer = thread::spawn(move || {
//!     (0..8).map(|_| consumer_queue.get().unwrap()).collect::<Vec<_>>()
//! });
//!
//! producer.join().unwrap();
//! assert_eq!(consumer.join().unwrap(), (0..8).collect::<Vec<_>>());
//! ```

mod bounded;
mod error;
mod simple;
mod traits;

pub use bounded::BoundedQueue;
pub use error::{QueueError, QueueResult};
pub use simple::SimpleQueue;
pub use traits::ItemQueue;

#[cfg(test)]
mod tests;
