//! Lifecycle tests for complete runs.
//!
//! These tests register recording suites, run them by name through
//! `run_type`, and check invocation order and counts from the call log
//! together with the classified results.

use marktest::core::comparator::sort_results;
use marktest::core::types::{Marker, RaisedKind, Status, TestResult};
use marktest::registry::{DiscoveryFailure, Registry};
use marktest::run::{Phase, RunOutcome, run_type};
use marktest::test_support::{Behavior, CallLog, def, lifecycle_suite, recording_suite};

fn statuses(results: &[TestResult]) -> Vec<(&str, Status)> {
    results.iter().map(|r| (r.name(), r.status())).collect()
}

fn completed(outcome: RunOutcome) -> Vec<TestResult> {
    match outcome {
        RunOutcome::Completed(results) => results,
        RunOutcome::Undiscoverable(failure) => panic!("unexpected discovery failure: {failure}"),
    }
}

/// One of each outcome around per-test fixtures.
///
/// Procedures (registration order):
/// ```text
/// setUp     BeforeAllTests
/// before    BeforeEachTest
/// passes    Test
/// fails     Test            (asserts false)
/// errors    Test            (raises a non-assertion error)
/// skipped   Test + Skip
/// after     AfterEachTest
/// tearDown  AfterAllTests
/// ```
///
/// Expected: 4 results, setUp/tearDown once, before/after three times each,
/// and `skipped` never invoked.
#[test]
fn lifecycle_suite_yields_each_status_once() {
    let log = CallLog::new();
    let mut registry = Registry::new();
    registry
        .register(lifecycle_suite("fixtures.Lifecycle", &log))
        .expect("register");

    let results = completed(run_type(&registry, "fixtures.Lifecycle").expect("run"));

    assert_eq!(
        statuses(&results),
        vec![
            ("passes", Status::Passed),
            ("fails", Status::Failed),
            ("errors", Status::Error),
            ("skipped", Status::Skipped),
        ]
    );
    assert_eq!(log.count("setUp"), 1);
    assert_eq!(log.count("tearDown"), 1);
    assert_eq!(log.count("before"), 3);
    assert_eq!(log.count("after"), 3);
    assert_eq!(log.count("skipped"), 0);

    assert_eq!(
        log.entries(),
        vec![
            "setUp", "before", "passes", "after", "before", "fails", "after", "before", "errors",
            "after", "tearDown",
        ]
    );
}

#[test]
fn causes_match_the_raised_kind() {
    let log = CallLog::new();
    let mut registry = Registry::new();
    registry
        .register(lifecycle_suite("fixtures.Lifecycle", &log))
        .expect("register");

    let results = completed(run_type(&registry, "fixtures.Lifecycle").expect("run"));

    assert!(results[0].cause().is_none());

    let failed = results[1].cause().expect("failed cause");
    assert_eq!(failed.kind(), RaisedKind::Assertion);
    assert_eq!(failed.message(), "fails asserted false");

    let errored = results[2].cause().expect("error cause");
    assert_eq!(errored.kind(), RaisedKind::Error);
    assert_eq!(errored.message(), "errors raised");

    assert!(results[3].cause().is_none());
}

/// An unknown name yields no results and a discovery failure.
#[test]
fn unresolvable_type_yields_no_results() {
    let log = CallLog::new();
    let mut registry = Registry::new();
    registry
        .register(lifecycle_suite("fixtures.Lifecycle", &log))
        .expect("register");

    let outcome = run_type(&registry, "does.not.Exist").expect("no lifecycle failure");

    assert!(outcome.results().is_empty());
    assert_eq!(
        outcome.discovery_failure(),
        Some(&DiscoveryFailure::NotFound {
            type_name: "does.not.Exist".to_string()
        })
    );
    assert!(log.is_empty(), "no procedure may run");
}

/// Two setups and two teardowns bracket two tests.
#[test]
fn multiple_setups_and_teardowns_bracket_tests() {
    let log = CallLog::new();
    let suite = recording_suite(
        "fixtures.Bracketed",
        &log,
        &[
            def("setUpA", &[Marker::BeforeAllTests], Behavior::Return),
            def("first", &[Marker::Test], Behavior::Return),
            def("tearDownA", &[Marker::AfterAllTests], Behavior::Return),
            def("setUpB", &[Marker::BeforeAllTests], Behavior::Return),
            def("second", &[Marker::Test], Behavior::Return),
            def("tearDownB", &[Marker::AfterAllTests], Behavior::Return),
        ],
    );
    let mut registry = Registry::new();
    registry.register(suite).expect("register");

    let results = completed(run_type(&registry, "fixtures.Bracketed").expect("run"));
    assert_eq!(
        statuses(&results),
        vec![("first", Status::Passed), ("second", Status::Passed)]
    );

    for name in ["setUpA", "setUpB", "tearDownA", "tearDownB"] {
        assert_eq!(log.count(name), 1, "{name} runs exactly once");
    }
    let last_setup = log.positions("setUpB")[0].max(log.positions("setUpA")[0]);
    let first_teardown = log.positions("tearDownA")[0].min(log.positions("tearDownB")[0]);
    for test in ["first", "second"] {
        let at = log.positions(test)[0];
        assert!(last_setup < at, "{test} after every setup");
        assert!(at < first_teardown, "{test} before every teardown");
    }
    assert_eq!(
        log.entries(),
        vec!["setUpA", "setUpB", "first", "second", "tearDownA", "tearDownB"]
    );
}

#[test]
fn afters_run_when_test_body_fails_or_panics() {
    let log = CallLog::new();
    let suite = recording_suite(
        "fixtures.Unconditional",
        &log,
        &[
            def("asserts", &[Marker::Test], Behavior::Assert),
            def("panics", &[Marker::Test], Behavior::Panic),
            def("cleanup", &[Marker::AfterEachTest], Behavior::Return),
        ],
    );
    let mut registry = Registry::new();
    registry.register(suite).expect("register");

    let results = completed(run_type(&registry, "fixtures.Unconditional").expect("run"));
    assert_eq!(
        statuses(&results),
        vec![("asserts", Status::Failed), ("panics", Status::Error)]
    );
    assert_eq!(
        log.entries(),
        vec!["asserts", "cleanup", "panics", "cleanup"]
    );
}

#[test]
fn failing_before_aborts_whole_run() {
    let log = CallLog::new();
    let suite = recording_suite(
        "fixtures.BrokenBefore",
        &log,
        &[
            def("setUp", &[Marker::BeforeAllTests], Behavior::Return),
            def("before", &[Marker::BeforeEachTest], Behavior::Raise),
            def("first", &[Marker::Test], Behavior::Return),
            def("second", &[Marker::Test], Behavior::Return),
            def("tearDown", &[Marker::AfterAllTests], Behavior::Return),
        ],
    );
    let mut registry = Registry::new();
    registry.register(suite).expect("register");

    let failure = run_type(&registry, "fixtures.BrokenBefore").expect_err("lifecycle failure");
    assert_eq!(failure.phase, Phase::Test);
    assert_eq!(failure.procedure, "before");
    assert_eq!(failure.type_name, "fixtures.BrokenBefore");
    assert!(failure.completed().is_empty());
    assert_eq!(log.entries(), vec!["setUp", "before"]);
}

#[test]
fn failing_teardown_keeps_completed_results() {
    let log = CallLog::new();
    let suite = recording_suite(
        "fixtures.BrokenTeardown",
        &log,
        &[
            def("only", &[Marker::Test], Behavior::Return),
            def("later", &[Marker::Test, Marker::Skip], Behavior::Return),
            def("tearDown", &[Marker::AfterAllTests], Behavior::Assert),
        ],
    );
    let mut registry = Registry::new();
    registry.register(suite).expect("register");

    let failure = run_type(&registry, "fixtures.BrokenTeardown").expect_err("lifecycle failure");
    assert_eq!(failure.phase, Phase::Teardown);
    assert_eq!(
        statuses(failure.completed()),
        vec![("only", Status::Passed), ("later", Status::Skipped)]
    );
}

#[test]
fn skip_marker_alone_is_ignored() {
    let log = CallLog::new();
    let suite = recording_suite(
        "markers.SkipOnly",
        &log,
        &[
            def("helper", &[Marker::Skip], Behavior::Return),
            def("real", &[Marker::Test], Behavior::Return),
        ],
    );
    let mut registry = Registry::new();
    registry.register(suite).expect("register");

    let results = completed(run_type(&registry, "markers.SkipOnly").expect("run"));
    assert_eq!(statuses(&results), vec![("real", Status::Passed)]);
    assert_eq!(log.entries(), vec!["real"]);
}

#[test]
fn independent_runs_do_not_share_state() {
    let log = CallLog::new();
    let mut registry = Registry::new();
    registry
        .register(lifecycle_suite("fixtures.Lifecycle", &log))
        .expect("register");

    let first = completed(run_type(&registry, "fixtures.Lifecycle").expect("first run"));
    let second = completed(run_type(&registry, "fixtures.Lifecycle").expect("second run"));

    assert_eq!(statuses(&first), statuses(&second));
    assert_eq!(log.count("setUp"), 2);
    assert_eq!(log.count("before"), 6);
}

#[test]
fn sorted_results_group_by_status_rank() {
    let log = CallLog::new();
    let suite = recording_suite(
        "report.Sorted",
        &log,
        &[
            def("f1", &[Marker::Test], Behavior::Assert),
            def("e1", &[Marker::Test], Behavior::Raise),
            def("p1", &[Marker::Test], Behavior::Return),
            def("s1", &[Marker::Test, Marker::Skip], Behavior::Return),
            def("f2", &[Marker::Test], Behavior::Assert),
            def("p2", &[Marker::Test], Behavior::Return),
        ],
    );
    let mut registry = Registry::new();
    registry.register(suite).expect("register");

    let mut results = completed(run_type(&registry, "report.Sorted").expect("run"));
    sort_results(&mut results);

    let order: Vec<&str> = results.iter().map(TestResult::name).collect();
    assert_eq!(order, vec!["p1", "p2", "s1", "e1", "f1", "f2"]);
    assert_eq!(
        log.entries(),
        vec!["f1", "e1", "p1", "f2", "p2"],
        "sorting never changes execution order"
    );
}
