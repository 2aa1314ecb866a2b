//! Partition discovered procedures by lifecycle role.

use tracing::debug;

use crate::core::types::{Marker, Procedure};

/// Procedures of one type, grouped by the phase that invokes them.
///
/// Each list keeps registration order. A procedure carrying several
/// lifecycle markers appears in every matching list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub setups: Vec<Procedure>,
    pub befores: Vec<Procedure>,
    pub tests: Vec<Procedure>,
    pub skips: Vec<Procedure>,
    pub afters: Vec<Procedure>,
    pub teardowns: Vec<Procedure>,
}

impl Plan {
    /// Number of results a completed run must produce.
    pub fn expected_results(&self) -> usize {
        self.tests.len() + self.skips.len()
    }
}

/// Partition procedures into lifecycle categories.
///
/// - `Test` without `Skip` → `tests`
/// - `Test` with `Skip` → `skips`
/// - `Skip` alone is ignored
pub fn partition(procedures: &[Procedure]) -> Plan {
    let mut plan = Plan::default();
    for procedure in procedures {
        if procedure.has(Marker::BeforeAllTests) {
            plan.setups.push(procedure.clone());
        }
        if procedure.has(Marker::BeforeEachTest) {
            plan.befores.push(procedure.clone());
        }
        match (procedure.has(Marker::Test), procedure.has(Marker::Skip)) {
            (true, false) => plan.tests.push(procedure.clone()),
            (true, true) => plan.skips.push(procedure.clone()),
            (false, true) => {
                debug!(procedure = procedure.name(), "skip marker without test ignored");
            }
            (false, false) => {}
        }
        if procedure.has(Marker::AfterEachTest) {
            plan.afters.push(procedure.clone());
        }
        if procedure.has(Marker::AfterAllTests) {
            plan.teardowns.push(procedure.clone());
        }
    }
    plan
}
