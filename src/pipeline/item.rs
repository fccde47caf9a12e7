//! Item envelope transported through the queue
//!
//! The end-of-stream marker is a tagged variant rather than a magic payload
//! value, so it can never collide with real data.

/// A queued unit of work: either an opaque payload or the terminal marker.
///
/// The queue transports these without inspecting payload content; only the
/// consumer distinguishes data from the end-of-stream signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item<T> {
    /// A real payload item, forwarded to the destination.
    Payload(T),
    /// Terminal marker: the consumer that dequeues this stops without
    /// forwarding or re-enqueueing it.
    EndOfStream,
}

impl<T> Item<T> {
    /// Whether this is the terminal marker.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Item::EndOfStream)
    }

    /// The payload, if any.
    pub fn into_payload(self) -> Option<T> {
        match self {
            Item::Payload(payload) => Some(payload),
            Item::EndOfStream => None,
        }
    }
}
