//! Shared deterministic types for the test engine core.
//!
//! These types define the contracts between discovery, orchestration and
//! reporting. They carry no I/O and stay stable across runs.

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::core::classifier::classify_raised;

/// Lifecycle role attached to a procedure.
///
/// The display names are the marker vocabulary shared with test-authoring
/// code and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    BeforeAllTests,
    BeforeEachTest,
    Test,
    Skip,
    AfterEachTest,
    AfterAllTests,
}

impl Marker {
    pub const ALL: [Marker; 6] = [
        Marker::BeforeAllTests,
        Marker::BeforeEachTest,
        Marker::Test,
        Marker::Skip,
        Marker::AfterEachTest,
        Marker::AfterAllTests,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Marker::BeforeAllTests => "BeforeAllTests",
            Marker::BeforeEachTest => "BeforeEachTest",
            Marker::Test => "Test",
            Marker::Skip => "Skip",
            Marker::AfterEachTest => "AfterEachTest",
            Marker::AfterAllTests => "AfterAllTests",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Marker {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Marker::ALL
            .into_iter()
            .find(|marker| marker.as_str() == s)
            .ok_or_else(|| anyhow!("unknown marker `{s}`"))
    }
}

/// Set of markers attached to one procedure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MarkerSet(u8);

impl MarkerSet {
    pub const EMPTY: MarkerSet = MarkerSet(0);

    pub fn contains(self, marker: Marker) -> bool {
        self.0 & marker.bit() != 0
    }

    pub fn with(self, marker: Marker) -> Self {
        MarkerSet(self.0 | marker.bit())
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Markers in vocabulary order.
    pub fn iter(self) -> impl Iterator<Item = Marker> {
        Marker::ALL
            .into_iter()
            .filter(move |marker| self.contains(*marker))
    }
}

impl From<Marker> for MarkerSet {
    fn from(marker: Marker) -> Self {
        MarkerSet::EMPTY.with(marker)
    }
}

impl<const N: usize> From<[Marker; N]> for MarkerSet {
    fn from(markers: [Marker; N]) -> Self {
        markers.into_iter().collect()
    }
}

impl From<&[Marker]> for MarkerSet {
    fn from(markers: &[Marker]) -> Self {
        markers.iter().copied().collect()
    }
}

impl FromIterator<Marker> for MarkerSet {
    fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
        iter.into_iter().fold(MarkerSet::EMPTY, MarkerSet::with)
    }
}

impl fmt::Display for MarkerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Marker::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// Handle to one registered member of the type under test.
///
/// `index` is the member's position in its registration table; the owning
/// instance uses it to find the body to invoke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure {
    index: usize,
    name: String,
    markers: MarkerSet,
}

impl Procedure {
    pub fn new(index: usize, name: impl Into<String>, markers: MarkerSet) -> Self {
        Self {
            index,
            name: name.into(),
            markers,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn markers(&self) -> MarkerSet {
        self.markers
    }

    pub fn has(&self, marker: Marker) -> bool {
        self.markers.contains(marker)
    }
}

/// Kind tag carried by every raised error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaisedKind {
    /// Raised by an assertion helper; classifies a test as FAILED.
    Assertion,
    /// Anything else; classifies a test as ERROR.
    Error,
}

/// Error returned by a procedure body.
#[derive(Debug)]
pub struct Raised {
    kind: RaisedKind,
    error: anyhow::Error,
}

impl Raised {
    pub fn assertion(message: impl fmt::Display) -> Self {
        Self {
            kind: RaisedKind::Assertion,
            error: anyhow!("{message}"),
        }
    }

    pub fn error(error: impl Into<anyhow::Error>) -> Self {
        Self {
            kind: RaisedKind::Error,
            error: error.into(),
        }
    }

    /// Build an `Error`-kind value from a caught panic payload.
    ///
    /// `site` is the `file:line:column` the panic was raised at, when known;
    /// it shows up in the trace, not the message.
    pub fn panicked(payload: Box<dyn Any + Send>, site: Option<&str>) -> Self {
        let detail = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "non-string panic payload".to_string()
        };
        let error = match site {
            Some(site) => anyhow!("at {site}").context(format!("panicked: {detail}")),
            None => anyhow!("panicked: {detail}"),
        };
        Self {
            kind: RaisedKind::Error,
            error,
        }
    }

    pub fn kind(&self) -> RaisedKind {
        self.kind
    }

    pub fn is_assertion(&self) -> bool {
        self.kind == RaisedKind::Assertion
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }

    /// Cause chain, plus a backtrace when `RUST_BACKTRACE` enabled capture.
    pub fn trace(&self) -> String {
        format!("{:?}", self.error)
    }
}

impl fmt::Display for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.error)
    }
}

impl<E> From<E> for Raised
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Raised::error(error)
    }
}

/// What a procedure body returns.
pub type Outcome = Result<(), Raised>;

/// Classified outcome of one test procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Passed,
    Failed,
    Error,
    Skipped,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Passed => "PASSED",
            Status::Failed => "FAILED",
            Status::Error => "ERROR",
            Status::Skipped => "SKIPPED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of one test procedure's outcome within a run.
///
/// `cause` is present exactly when the status is FAILED or ERROR.
#[derive(Debug)]
pub struct TestResult {
    procedure: Procedure,
    status: Status,
    cause: Option<Raised>,
}

impl TestResult {
    pub fn passed(procedure: Procedure) -> Self {
        Self {
            procedure,
            status: Status::Passed,
            cause: None,
        }
    }

    pub fn skipped(procedure: Procedure) -> Self {
        Self {
            procedure,
            status: Status::Skipped,
            cause: None,
        }
    }

    /// FAILED for assertion-kind causes, ERROR otherwise.
    pub fn raised(procedure: Procedure, cause: Raised) -> Self {
        let status = classify_raised(&cause);
        Self {
            procedure,
            status,
            cause: Some(cause),
        }
    }

    pub fn procedure(&self) -> &Procedure {
        &self.procedure
    }

    pub fn name(&self) -> &str {
        self.procedure.name()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn cause(&self) -> Option<&Raised> {
        self.cause.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_names_round_trip_through_from_str() {
        for marker in Marker::ALL {
            let parsed: Marker = marker.as_str().parse().expect("parse marker");
            assert_eq!(parsed, marker);
        }
        assert!("test".parse::<Marker>().is_err());
    }

    #[test]
    fn marker_set_tracks_membership() {
        let set = MarkerSet::from([Marker::Test, Marker::Skip]);
        assert!(set.contains(Marker::Test));
        assert!(set.contains(Marker::Skip));
        assert!(!set.contains(Marker::BeforeEachTest));
        assert_eq!(set.to_string(), "[Test, Skip]");
        assert!(MarkerSet::EMPTY.is_empty());
    }

    #[test]
    fn raised_kind_is_set_at_construction() {
        assert_eq!(Raised::assertion("nope").kind(), RaisedKind::Assertion);
        let io = std::io::Error::other("disk gone");
        let raised: Raised = io.into();
        assert_eq!(raised.kind(), RaisedKind::Error);
        assert_eq!(raised.message(), "disk gone");
    }

    #[test]
    fn assertion_kind_is_not_inferred_from_message() {
        let raised = Raised::error(anyhow!("assertion failed: looks like one"));
        assert!(!raised.is_assertion());
    }

    #[test]
    fn panicked_payload_becomes_message() {
        let raised = Raised::panicked(Box::new("boom"), None);
        assert_eq!(raised.kind(), RaisedKind::Error);
        assert_eq!(raised.message(), "panicked: boom");

        let raised = Raised::panicked(Box::new(String::from("owned boom")), None);
        assert_eq!(raised.message(), "panicked: owned boom");
    }

    #[test]
    fn panic_site_goes_to_trace_not_message() {
        let raised = Raised::panicked(Box::new("boom"), Some("src/lib.rs:7:9"));
        assert_eq!(raised.message(), "panicked: boom");
        assert!(raised.trace().contains("at src/lib.rs:7:9"));
    }

    #[test]
    fn trace_includes_cause_chain() {
        let inner = anyhow!("root cause").context("outer context");
        let raised = Raised::error(inner);
        assert_eq!(raised.message(), "outer context");
        assert!(raised.trace().contains("root cause"));
    }

    #[test]
    fn result_constructors_attach_cause_only_for_raised() {
        let procedure = Procedure::new(0, "t", Marker::Test.into());
        assert!(TestResult::passed(procedure.clone()).cause().is_none());
        assert!(TestResult::skipped(procedure.clone()).cause().is_none());

        let failed = TestResult::raised(procedure.clone(), Raised::assertion("x"));
        assert_eq!(failed.status(), Status::Failed);
        assert!(failed.cause().is_some());

        let errored = TestResult::raised(procedure, Raised::error(anyhow!("y")));
        assert_eq!(errored.status(), Status::Error);
    }
}
