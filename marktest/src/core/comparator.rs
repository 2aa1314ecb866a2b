//! Status ordering for sorted reports.
//!
//! The rank is fixed: PASSED, SKIPPED, ERROR, FAILED. Sorting never affects
//! execution order, only how results are presented.

use std::cmp::Ordering;

use crate::core::types::{Status, TestResult};

/// Position of a status in report order.
pub fn rank(status: Status) -> u8 {
    match status {
        Status::Passed => 0,
        Status::Skipped => 1,
        Status::Error => 2,
        Status::Failed => 3,
    }
}

pub fn compare(left: &TestResult, right: &TestResult) -> Ordering {
    rank(left.status()).cmp(&rank(right.status()))
}

/// Stable sort by status rank; equal statuses keep their run order.
pub fn sort_results(results: &mut [TestResult]) {
    results.sort_by(compare);
}
