//! Test modules for the pipeline component
//!
//! Organised by participant, plus end-to-end integration scenarios and the
//! queue substitutability suite.

mod producer;
