//! Reporting configuration stored in `marktest.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "marktest.toml";

/// Output format for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Reporting configuration (TOML).
///
/// Missing fields fall back to defaults; a missing file is the default config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MarktestConfig {
    /// Order results by status before reporting.
    pub sort: bool,

    /// Emit diagnostic traces for FAILED and ERROR results in text reports.
    pub show_traces: bool,

    pub format: ReportFormat,
}

impl Default for MarktestConfig {
    fn default() -> Self {
        Self {
            sort: false,
            show_traces: true,
            format: ReportFormat::Text,
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `MarktestConfig::default()`.
pub fn load_config(path: &Path) -> Result<MarktestConfig> {
    if !path.exists() {
        return Ok(MarktestConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: MarktestConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
