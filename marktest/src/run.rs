//! Lifecycle orchestration for one type under test.
//!
//! A [`Run`] owns the object under test and walks the phases in a fixed
//! order:
//!
//! ```text
//! NotStarted → Setup → Test (per test) → SkipRecording → Teardown → Done
//! ```
//!
//! Test body outcomes are recorded as data. Any error raised by a setup,
//! before, after or teardown procedure aborts the run with a
//! [`LifecycleFailure`].

use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use thiserror::Error;
use tracing::{debug, info, info_span, instrument};

use crate::core::classifier::record;
use crate::core::discovery::{Plan, partition};
use crate::core::types::{Outcome, Procedure, Raised, TestResult};
use crate::registry::{DiscoveryFailure, TypeResolver};
use crate::suite::Subject;

/// Orchestrator state. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    NotStarted,
    Setup,
    Test,
    SkipRecording,
    Teardown,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::NotStarted => "not-started",
            Phase::Setup => "setup",
            Phase::Test => "test",
            Phase::SkipRecording => "skip-recording",
            Phase::Teardown => "teardown",
            Phase::Done => "done",
        };
        f.write_str(label)
    }
}

/// A setup, before, after or teardown procedure raised; the run was aborted.
///
/// Results recorded before the abort are kept in [`LifecycleFailure::completed`].
#[derive(Debug, Error)]
#[error("{phase} procedure `{procedure}` of `{type_name}` raised: {cause}")]
pub struct LifecycleFailure {
    pub type_name: String,
    pub phase: Phase,
    pub procedure: String,
    pub cause: Raised,
    completed: Vec<TestResult>,
}

impl LifecycleFailure {
    pub fn completed(&self) -> &[TestResult] {
        &self.completed
    }

    pub fn into_completed(self) -> Vec<TestResult> {
        self.completed
    }
}

/// What a run by name produced when no lifecycle procedure failed.
#[derive(Debug)]
pub enum RunOutcome {
    /// Every test was run or recorded as skipped.
    Completed(Vec<TestResult>),
    /// The type could not be resolved or instantiated; nothing was invoked.
    Undiscoverable(DiscoveryFailure),
}

impl RunOutcome {
    /// Results of the run; empty when discovery failed.
    pub fn results(&self) -> &[TestResult] {
        match self {
            RunOutcome::Completed(results) => results,
            RunOutcome::Undiscoverable(_) => &[],
        }
    }

    pub fn into_results(self) -> Vec<TestResult> {
        match self {
            RunOutcome::Completed(results) => results,
            RunOutcome::Undiscoverable(_) => Vec::new(),
        }
    }

    pub fn discovery_failure(&self) -> Option<&DiscoveryFailure> {
        match self {
            RunOutcome::Completed(_) => None,
            RunOutcome::Undiscoverable(failure) => Some(failure),
        }
    }
}

/// Resolve `type_name`, then run its full lifecycle.
///
/// Discovery failures are returned as [`RunOutcome::Undiscoverable`] for the
/// caller to surface; only lifecycle failures are errors.
#[instrument(skip(resolver))]
pub fn run_type(
    resolver: &dyn TypeResolver,
    type_name: &str,
) -> Result<RunOutcome, LifecycleFailure> {
    let subject = match resolver.resolve(type_name) {
        Ok(subject) => subject,
        Err(failure) => {
            debug!(%failure, "discovery failed");
            return Ok(RunOutcome::Undiscoverable(failure));
        }
    };
    Run::new(subject).execute().map(RunOutcome::Completed)
}

/// Context of one discovery → execution → teardown cycle.
pub struct Run {
    subject: Box<dyn Subject>,
    plan: Plan,
    phase: Phase,
    results: Vec<TestResult>,
}

impl Run {
    /// Discover the subject's procedures and prepare a run.
    pub fn new(subject: Box<dyn Subject>) -> Self {
        let plan = partition(&subject.procedures());
        debug!(
            type_name = subject.type_name(),
            setups = plan.setups.len(),
            befores = plan.befores.len(),
            tests = plan.tests.len(),
            skips = plan.skips.len(),
            afters = plan.afters.len(),
            teardowns = plan.teardowns.len(),
            "procedures discovered"
        );
        let results = Vec::with_capacity(plan.expected_results());
        Self {
            subject,
            plan,
            phase: Phase::NotStarted,
            results,
        }
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Drive every phase to completion and return the results in run order.
    pub fn execute(mut self) -> Result<Vec<TestResult>, LifecycleFailure> {
        let _span = info_span!("run", type_name = %self.subject.type_name()).entered();
        self.enter(Phase::Setup);
        let setups = self.plan.setups.clone();
        self.invoke_lifecycle(&setups)?;

        self.enter(Phase::Test);
        let tests = self.plan.tests.clone();
        for test in tests {
            self.run_test(test)?;
        }

        self.enter(Phase::SkipRecording);
        for skipped in &self.plan.skips {
            info!(test = skipped.name(), status = "SKIPPED", "test recorded");
            self.results.push(TestResult::skipped(skipped.clone()));
        }

        self.enter(Phase::Teardown);
        let teardowns = self.plan.teardowns.clone();
        self.invoke_lifecycle(&teardowns)?;

        self.enter(Phase::Done);
        debug_assert_eq!(self.results.len(), self.plan.expected_results());
        Ok(self.results)
    }

    /// befores, body, afters. Afters run even when the body raised.
    ///
    /// The result is recorded before the afters, so a failing after still
    /// leaves it in [`LifecycleFailure::completed`].
    fn run_test(&mut self, test: Procedure) -> Result<(), LifecycleFailure> {
        let befores = self.plan.befores.clone();
        self.invoke_lifecycle(&befores)?;

        debug!(test = test.name(), "invoking test body");
        let outcome = invoke(self.subject.as_mut(), &test);
        let result = record(test, outcome);
        info!(test = result.name(), status = %result.status(), "test recorded");
        self.results.push(result);

        let afters = self.plan.afters.clone();
        self.invoke_lifecycle(&afters)
    }

    fn invoke_lifecycle(&mut self, procedures: &[Procedure]) -> Result<(), LifecycleFailure> {
        for procedure in procedures {
            debug!(phase = %self.phase, procedure = procedure.name(), "invoking lifecycle procedure");
            if let Err(cause) = invoke(self.subject.as_mut(), procedure) {
                return Err(self.abort(procedure, cause));
            }
        }
        Ok(())
    }

    fn abort(&mut self, procedure: &Procedure, cause: Raised) -> LifecycleFailure {
        debug!(
            phase = %self.phase,
            procedure = procedure.name(),
            %cause,
            completed = self.results.len(),
            "lifecycle procedure raised; aborting run"
        );
        LifecycleFailure {
            type_name: self.subject.type_name().to_string(),
            phase: self.phase,
            procedure: procedure.name().to_string(),
            cause,
            completed: std::mem::take(&mut self.results),
        }
    }

    fn enter(&mut self, next: Phase) {
        debug_assert!(next > self.phase, "phase {next} after {}", self.phase);
        debug!(from = %self.phase, to = %next, "phase transition");
        self.phase = next;
    }
}

thread_local! {
    /// `Some` while this thread is inside [`invoke`]; holds the panic site once
    /// the hook has seen one.
    static PANIC_SITE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

/// Wrap the process panic hook once. Panics raised inside [`invoke`] are
/// recorded as results, so the hook only notes where they happened. Every
/// other panic goes to the previous hook.
fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let captured = PANIC_SITE.with(|slot| match slot.try_borrow_mut() {
                Ok(mut slot) => match slot.as_mut() {
                    Some(site) => {
                        *site = info.location().map(ToString::to_string);
                        true
                    }
                    None => false,
                },
                Err(_) => false,
            });
            if !captured {
                previous(info);
            }
        }));
    });
}

/// Invoke one procedure, turning a panic into an `Error`-kind outcome.
fn invoke(subject: &mut dyn Subject, procedure: &Procedure) -> Outcome {
    install_panic_hook();
    let outer = PANIC_SITE.with(|slot| slot.replace(Some(None)));
    let caught = panic::catch_unwind(AssertUnwindSafe(|| subject.invoke(procedure)));
    let site = PANIC_SITE.with(|slot| slot.replace(outer)).flatten();
    match caught {
        Ok(outcome) => outcome,
        Err(payload) => {
            debug!(procedure = procedure.name(), site = ?site, "procedure panicked");
            Err(Raised::panicked(payload, site.as_deref()))
        }
    }
}
