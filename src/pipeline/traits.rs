//! Source and sink collaborator traits
//!
//! The pipeline only requires sequential iteration from its source and
//! one-at-a-time, in-order acceptance from its destination. Everything else
//! about those collaborators (files, generators, databases) stays outside
//! the core.

use crate::pipeline::error::CollaboratorError;
use std::sync::{Arc, Mutex};

/// A finite, order-preserving sequence of items feeding a producer.
///
/// `Err` items represent data that failed preparation; the producer's error
/// policy decides whether to skip them or abort.
pub trait Source<T>: Send {
    /// The next item, or `None` once the source is exhausted.
    fn next_item(&mut self) -> Option<Result<T, CollaboratorError>>;
}

/// A destination accepting items one at a time in delivery order.
pub trait Sink<T>: Send {
    fn accept(&mut self, item: T) -> Result<(), CollaboratorError>;
}

/// Adapts any iterator of ready items into an infallible [`Source`].
pub struct IterSource<I> {
    inner: I,
}

impl<I> IterSource<I> {
    pub fn new(inner: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            inner: inner.into_iter(),
        }
    }
}

impl<T: Send, I: Iterator<Item = T> + Send> Source<T> for IterSource<I> {
    fn next_item(&mut self) -> Option<Result<T, CollaboratorError>> {
        self.inner.next().map(Ok)
    }
}

/// Adapts an iterator of fallible items into a [`Source`]; `Err` entries
/// become collaborator errors subject to the producer's policy.
pub struct TrySource<I> {
    inner: I,
}

impl<I> TrySource<I> {
    pub fn new(inner: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            inner: inner.into_iter(),
        }
    }
}

impl<T: Send, I: Iterator<Item = Result<T, String>> + Send> Source<T> for TrySource<I> {
    fn next_item(&mut self) -> Option<Result<T, CollaboratorError>> {
        self.inner
            .next()
            .map(|result| result.map_err(CollaboratorError::new))
    }
}

/// Shared in-memory destination: items are appended in delivery order.
///
/// Clones share the same underlying buffer, so a test or caller can keep a
/// handle while the consumer owns another.
pub struct VecSink<T> {
    inner: Arc<Mutex<Vec<T>>>,
}

impl<T> VecSink<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of items delivered so far.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> VecSink<T> {
    /// Copy of the delivered items, in delivery order.
    pub fn snapshot(&self) -> Vec<T> {
        self.inner
            .lock()
            .map(|items| items.clone())
            .unwrap_or_default()
    }
}

impl<T> Default for VecSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for VecSink<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send> Sink<T> for VecSink<T> {
    fn accept(&mut self, item: T) -> Result<(), CollaboratorError> {
        let mut items = self.inner.lock().map_err(|poison_err| {
            CollaboratorError::new(format!("destination lock poisoned: {:?}", poison_err))
        })?;
        items.push(item);
        Ok(())
    }
}
