//! Minimal marker-driven test execution engine.
//!
//! Types under test are described by explicit registration tables
//! ([`suite::Suite`]): a constructor plus procedures tagged with lifecycle
//! markers. A run resolves a type by name, instantiates it, and drives the
//! lifecycle in a fixed order:
//!
//! - **[`core`]**: pure logic (marker partitioning, outcome classification,
//!   status ordering, tallies). No I/O.
//! - **[`io`]**: configuration files and report output.
//!
//! [`run`] owns orchestration; [`registry`] resolves names to fresh
//! instances; [`assertions`] raises the assertion-kind errors that mark a
//! test as FAILED rather than ERROR.

pub mod assertions;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod registry;
pub mod run;
pub mod samples;
pub mod suite;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
