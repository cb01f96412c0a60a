//! Configuration loading from a TOML file.
//!
//! The file is only read when passed with `--config`; every field is
//! optional and command-line flags win over it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use elscore_core::{Metric, ParseOptions};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub report: ReportConfig,
    pub parse: ParseConfig,
    pub scoring: ScoringConfig,
}

/// Ranking table settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Metric columns, in display order.
    pub metrics: Vec<Metric>,
    pub decimals: usize,
    /// Add an F1 column after each metric's recall.
    pub f1: bool,
    /// Add the KBP2010 micro-average column.
    pub accuracy: bool,
    pub format: OutputFormat,
}

/// Linking file parser settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    pub allow_extra_columns: bool,
    pub lint_nil_format: bool,
}

/// Which mentions the scores are averaged over.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Linking file whose mentions restrict the B^2 / B^3 averages.
    /// Relative paths resolve against the working directory.
    pub focus: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table with inline `[ERROR]` lines.
    #[default]
    Tsv,
    /// One JSON object per system.
    Json,
}

// --- Defaults ---

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            metrics: vec![Metric::B3],
            decimals: 2,
            f1: false,
            accuracy: false,
            format: OutputFormat::Tsv,
        }
    }
}

impl ParseConfig {
    pub fn options(&self) -> ParseOptions {
        ParseOptions {
            allow_extra_columns: self.allow_extra_columns,
            lint_nil_format: self.lint_nil_format,
        }
    }
}

/// Load config from `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(p) = path else {
        return Ok(Config::default());
    };

    let content =
        std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("parsing {}", p.display()))?;
    Ok(config)
}
