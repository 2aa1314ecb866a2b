//! Deterministic classification of test body outcomes.

use crate::core::types::{Outcome, Procedure, Raised, RaisedKind, Status, TestResult};

/// Classify a raised error by its kind tag.
///
/// - `Assertion` → `FAILED`
/// - anything else → `ERROR`
///
/// The message text is never consulted.
pub fn classify_raised(raised: &Raised) -> Status {
    match raised.kind() {
        RaisedKind::Assertion => Status::Failed,
        RaisedKind::Error => Status::Error,
    }
}

/// Classify a test body's outcome. Normal return is `PASSED`.
pub fn classify(outcome: &Outcome) -> Status {
    match outcome {
        Ok(()) => Status::Passed,
        Err(raised) => classify_raised(raised),
    }
}

/// Turn an invoked test body's outcome into its result record.
pub fn record(procedure: Procedure, outcome: Outcome) -> TestResult {
    match outcome {
        Ok(()) => TestResult::passed(procedure),
        Err(raised) => TestResult::raised(procedure, raised),
    }
}
