//! Command-line interface: argument definitions and settings resolution.

pub mod args;
pub mod config;
