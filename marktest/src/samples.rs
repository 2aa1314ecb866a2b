//! Built-in sample types available to the `marktest` binary.

use anyhow::{Result, anyhow, bail};

use crate::assertions::{ensure, ensure_eq, fail};
use crate::core::types::{Marker, Raised};
use crate::registry::Registry;
use crate::suite::Suite;

pub const LIFECYCLE: &str = "samples.Lifecycle";
pub const ARITHMETIC: &str = "samples.Arithmetic";
pub const UNCONSTRUCTIBLE: &str = "samples.Unconstructible";
pub const LEAKY_TEARDOWN: &str = "samples.LeakyTeardown";

/// Registry holding every sample type.
pub fn registry() -> Result<Registry> {
    let mut registry = Registry::new();
    registry
        .register(lifecycle())?
        .register(arithmetic())?
        .register(unconstructible())?
        .register(leaky_teardown())?;
    Ok(registry)
}

/// Counters shared across phases of one run.
#[derive(Debug, Default)]
pub struct Counters {
    pub setups: u32,
    pub befores: u32,
    pub afters: u32,
    pub fixture: Vec<i64>,
}

/// One passing, failing, erroring and skipped test around a counted fixture.
pub fn lifecycle() -> Suite<Counters> {
    Suite::default_constructed(LIFECYCLE)
        .procedure("setUp", Marker::BeforeAllTests, |c: &mut Counters| {
            c.setups += 1;
            Ok(())
        })
        .procedure("before", Marker::BeforeEachTest, |c: &mut Counters| {
            c.befores += 1;
            c.fixture = vec![1, 2, 3];
            Ok(())
        })
        .procedure("passes", Marker::Test, |c: &mut Counters| {
            ensure_eq(6, c.fixture.iter().sum::<i64>())
        })
        .procedure("fails", Marker::Test, |c: &mut Counters| {
            ensure(c.fixture.is_empty(), "fixture should be empty")
        })
        .procedure("errors", Marker::Test, |c: &mut Counters| {
            let index = c.fixture.len();
            c.fixture
                .get(index)
                .map(|_| ())
                .ok_or_else(|| Raised::error(anyhow!("index {index} out of range")))
        })
        .procedure("skipped", [Marker::Test, Marker::Skip], |_: &mut Counters| {
            fail("skipped tests are never invoked")
        })
        .procedure("after", Marker::AfterEachTest, |c: &mut Counters| {
            c.afters += 1;
            c.fixture.clear();
            Ok(())
        })
        .procedure("tearDown", Marker::AfterAllTests, |c: &mut Counters| {
            ensure_eq((1, 3, 3), (c.setups, c.befores, c.afters))
        })
}

#[derive(Debug, Default)]
pub struct Calculator {
    pub memory: i64,
}

impl Calculator {
    fn divide(&self, divisor: i64) -> Result<i64> {
        if divisor == 0 {
            bail!("division by zero");
        }
        Ok(self.memory / divisor)
    }
}

/// Toy arithmetic checks that all pass.
pub fn arithmetic() -> Suite<Calculator> {
    Suite::default_constructed(ARITHMETIC)
        .procedure("reset", Marker::BeforeEachTest, |calc: &mut Calculator| {
            calc.memory = 12;
            Ok(())
        })
        .procedure("adds", Marker::Test, |calc: &mut Calculator| {
            ensure_eq(Some(15), calc.memory.checked_add(3))
        })
        .procedure("divides", Marker::Test, |calc: &mut Calculator| {
            ensure_eq(4, calc.divide(3).map_err(Raised::error)?)
        })
        .procedure("rejects_division_by_zero", Marker::Test, |calc: &mut Calculator| {
            ensure(calc.divide(0).is_err(), "dividing by zero should fail")
        })
        .procedure("detects_overflow", Marker::Test, |_: &mut Calculator| {
            ensure(i64::MAX.checked_add(1).is_none(), "overflow went unnoticed")
        })
        .procedure(
            "rounds_half_even",
            [Marker::Test, Marker::Skip],
            |_: &mut Calculator| fail("rounding modes are not implemented"),
        )
}

/// A type whose constructor always fails.
pub fn unconstructible() -> Suite<Calculator> {
    Suite::new(UNCONSTRUCTIBLE, || Err(anyhow!("calculator hardware unavailable")))
        .procedure("never", Marker::Test, |_: &mut Calculator| Ok(()))
}

#[derive(Debug, Default)]
pub struct Pool {
    pub open: Vec<&'static str>,
}

/// Passing tests whose teardown finds a connection left open.
pub fn leaky_teardown() -> Suite<Pool> {
    Suite::default_constructed(LEAKY_TEARDOWN)
        .procedure("connects", Marker::Test, |pool: &mut Pool| {
            pool.open.push("primary");
            ensure_eq(1, pool.open.len())
        })
        .procedure("reconnects", Marker::Test, |pool: &mut Pool| {
            ensure(!pool.open.is_empty(), "pool should hold a connection")
        })
        .procedure("tearDown", Marker::AfterAllTests, |pool: &mut Pool| {
            ensure(
                pool.open.is_empty(),
                format!("{} connection(s) still open", pool.open.len()),
            )
        })
}
