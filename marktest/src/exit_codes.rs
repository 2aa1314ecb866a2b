//! Stable exit codes for the `marktest` binary.

/// Usage, listing, or a run where every result PASSED or was SKIPPED.
pub const OK: i32 = 0;
/// Invalid invocation, configuration or registration.
pub const INVALID: i32 = 1;
/// At least one test FAILED or ERRORed.
pub const TESTS_FAILED: i32 = 2;
/// The type could not be resolved or instantiated.
pub const UNDISCOVERABLE: i32 = 3;
/// A setup, before, after or teardown procedure raised.
pub const LIFECYCLE_FAILED: i32 = 4;
