//! Deterministic, pure logic shared by the test engine.
//!
//! Core modules are free of I/O side effects. They operate on in-memory
//! procedure lists and results and return deterministic outputs.

pub mod classifier;
pub mod comparator;
pub mod discovery;
pub mod tally;
pub mod types;
