//! Test modules for the queue component
//!
//! Tests are organised by functional area: basic operation semantics,
//! blocking/timeout behaviour, concurrent stress and edge cases.

mod concurrent;
