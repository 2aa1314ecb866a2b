//! Render run results and tallies.
//!
//! The reporter only reads the result list; ordering is the caller's choice
//! (see [`crate::core::comparator::sort_results`]).

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::tally::Tally;
use crate::core::types::{RaisedKind, Status, TestResult};
use crate::io::config::{MarktestConfig, ReportFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reporter {
    pub format: ReportFormat,
    pub show_traces: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            show_traces: true,
        }
    }
}

impl From<&MarktestConfig> for Reporter {
    fn from(cfg: &MarktestConfig) -> Self {
        Self {
            format: cfg.format,
            show_traces: cfg.show_traces,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    type_name: &'a str,
    results: Vec<JsonResult<'a>>,
    tally: JsonTally,
}

#[derive(Serialize)]
struct JsonResult<'a> {
    procedure: &'a str,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<RaisedKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<String>,
}

#[derive(Serialize)]
struct JsonTally {
    #[serde(flatten)]
    counts: Tally,
    total: usize,
}

impl Reporter {
    /// Write one report for `type_name` to `out`.
    pub fn write<W: Write>(
        &self,
        out: &mut W,
        type_name: &str,
        results: &[TestResult],
    ) -> Result<()> {
        let written = match self.format {
            ReportFormat::Text => self.write_text(out, type_name, results),
            ReportFormat::Json => write_json(out, type_name, results),
        };
        written.context("write report")
    }

    fn write_text<W: Write>(
        &self,
        out: &mut W,
        type_name: &str,
        results: &[TestResult],
    ) -> Result<()> {
        writeln!(out, "run: type={} results={}", type_name, results.len())?;
        for result in results {
            writeln!(out, "{}: {}", result.name(), result.status())?;
            if let Some(cause) = result.cause() {
                writeln!(out, "    cause: {}", cause.message())?;
                if self.show_traces {
                    writeln!(out, "    trace:")?;
                    for line in cause.trace().lines() {
                        writeln!(out, "      {line}")?;
                    }
                }
            }
        }
        let tally = Tally::from_results(results);
        writeln!(
            out,
            "tally: total={} passed={} failed={} error={} skipped={}",
            tally.total(),
            tally.passed,
            tally.failed,
            tally.error,
            tally.skipped
        )?;
        Ok(())
    }
}

fn write_json<W: Write>(out: &mut W, type_name: &str, results: &[TestResult]) -> Result<()> {
    let tally = Tally::from_results(results);
    let report = JsonReport {
        type_name,
        results: results
            .iter()
            .map(|result| JsonResult {
                procedure: result.name(),
                status: result.status(),
                kind: result.cause().map(|cause| cause.kind()),
                message: result.cause().map(|cause| cause.message()),
                trace: result.cause().map(|cause| cause.trace()),
            })
            .collect(),
        tally: JsonTally {
            counts: tally,
            total: tally.total(),
        },
    };
    serde_json::to_writer_pretty(&mut *out, &report).context("serialize report")?;
    writeln!(out)?;
    Ok(())
}
