//! Side-effecting helpers: configuration files and report output.

pub mod config;
pub mod report;
