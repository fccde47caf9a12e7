//! Cross-cutting utilities shared by the queue and pipeline modules.

pub mod sync;
pub mod time;
