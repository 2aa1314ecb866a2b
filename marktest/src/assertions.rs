//! Assertion helpers for procedure bodies.
//!
//! Every helper raises an `Assertion`-kind [`Raised`], which the orchestrator
//! records as FAILED. Any other error a body returns is recorded as ERROR.

use std::fmt::{Debug, Display};

use crate::core::types::{Outcome, Raised};

/// Fail unconditionally.
pub fn fail(message: impl Display) -> Outcome {
    Err(Raised::assertion(message))
}

pub fn ensure(condition: bool, message: impl Display) -> Outcome {
    if condition { Ok(()) } else { fail(message) }
}

pub fn ensure_eq<T: PartialEq + Debug>(expected: T, actual: T) -> Outcome {
    if expected == actual {
        Ok(())
    } else {
        fail(format!("expected {expected:?}, got {actual:?}"))
    }
}

pub fn ensure_ne<T: PartialEq + Debug>(unexpected: T, actual: T) -> Outcome {
    if unexpected != actual {
        Ok(())
    } else {
        fail(format!("expected a value other than {unexpected:?}"))
    }
}
