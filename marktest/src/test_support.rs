//! Test-only helpers for building suites that record every invocation.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;

use crate::assertions::fail;
use crate::core::types::{Marker, MarkerSet, Outcome, Raised};
use crate::suite::Suite;

/// Shared, ordered log of invoked procedure names.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, name: &str) {
        self.0.borrow_mut().push(name.to_string());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// Number of times `name` was invoked.
    pub fn count(&self, name: &str) -> usize {
        self.0.borrow().iter().filter(|entry| *entry == name).count()
    }

    /// Log positions at which `name` was invoked.
    pub fn positions(&self, name: &str) -> Vec<usize> {
        self.0
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, entry)| *entry == name)
            .map(|(position, _)| position)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

/// What a recorded procedure does after logging itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Return,
    /// Raise an assertion-kind error.
    Assert,
    /// Raise an error-kind error.
    Raise,
    Panic,
}

impl Behavior {
    fn outcome(self, name: &str) -> Outcome {
        match self {
            Behavior::Return => Ok(()),
            Behavior::Assert => fail(format!("{name} asserted false")),
            Behavior::Raise => Err(Raised::error(anyhow!("{name} raised"))),
            Behavior::Panic => panic!("{name} panicked"),
        }
    }
}

/// Object under test for recording suites.
#[derive(Debug)]
pub struct Recorder {
    pub log: CallLog,
}

/// Declarative description of one recorded procedure.
pub struct ProcedureDef<'a> {
    pub name: &'a str,
    pub markers: &'a [Marker],
    pub behavior: Behavior,
}

pub fn def<'a>(name: &'a str, markers: &'a [Marker], behavior: Behavior) -> ProcedureDef<'a> {
    ProcedureDef {
        name,
        markers,
        behavior,
    }
}

/// Build a suite whose procedures log their name to `log`, then act out their [`Behavior`].
pub fn recording_suite(name: &str, log: &CallLog, defs: &[ProcedureDef<'_>]) -> Suite<Recorder> {
    let shared = log.clone();
    let mut suite = Suite::new(name, move || {
        Ok(Recorder {
            log: shared.clone(),
        })
    });
    for def in defs {
        let procedure = def.name.to_string();
        let behavior = def.behavior;
        suite = suite.procedure(
            def.name,
            MarkerSet::from(def.markers),
            move |recorder: &mut Recorder| {
                recorder.log.push(&procedure);
                behavior.outcome(&procedure)
            },
        );
    }
    suite
}

/// One of each outcome around per-test fixtures: setup, before, three
/// invoked tests, one skipped test, after and teardown.
pub fn lifecycle_suite(name: &str, log: &CallLog) -> Suite<Recorder> {
    recording_suite(
        name,
        log,
        &[
            def("setUp", &[Marker::BeforeAllTests], Behavior::Return),
            def("before", &[Marker::BeforeEachTest], Behavior::Return),
            def("passes", &[Marker::Test], Behavior::Return),
            def("fails", &[Marker::Test], Behavior::Assert),
            def("errors", &[Marker::Test], Behavior::Raise),
            def("skipped", &[Marker::Test, Marker::Skip], Behavior::Return),
            def("after", &[Marker::AfterEachTest], Behavior::Return),
            def("tearDown", &[Marker::AfterAllTests], Behavior::Return),
        ],
    )
}
