//! Demo application: CLI parsing, settings resolution and report rendering
//! around the pipeline library.

pub mod cli;
pub mod report;
pub mod startup;
