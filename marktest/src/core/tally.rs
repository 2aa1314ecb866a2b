//! Per-status counts for a result list.

use serde::Serialize;

use crate::core::types::{Status, TestResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
    pub error: usize,
    pub skipped: usize,
}

impl Tally {
    pub fn from_results(results: &[TestResult]) -> Self {
        let mut tally = Tally::default();
        for result in results {
            tally.add(result.status());
        }
        tally
    }

    pub fn add(&mut self, status: Status) {
        match status {
            Status::Passed => self.passed += 1,
            Status::Failed => self.failed += 1,
            Status::Error => self.error += 1,
            Status::Skipped => self.skipped += 1,
        }
    }

    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::Passed => self.passed,
            Status::Failed => self.failed,
            Status::Error => self.error,
            Status::Skipped => self.skipped,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.error + self.skipped
    }

    /// True when nothing FAILED or ERRORed.
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.error == 0
    }
}
