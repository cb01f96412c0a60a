//! Rendering of ranking rows: the tab-separated table, the inline `[ERROR]`
//! diagnostics for skipped systems, and JSON lines.

use std::path::Path;

use anyhow::Result;

use elscore_core::{CoverageMismatch, Evaluation, Mention, Metric, RankingRow};

/// Which columns the table carries and how they are printed.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub accuracy: bool,
    pub metrics: Vec<Metric>,
    pub f1: bool,
    pub decimals: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            accuracy: false,
            metrics: vec![Metric::B3],
            f1: false,
            decimals: 2,
        }
    }
}

impl Layout {
    /// Every column at three decimals.
    pub fn full() -> Self {
        Self {
            accuracy: true,
            metrics: Metric::ALL.to_vec(),
            f1: true,
            decimals: 3,
        }
    }

    pub fn header(&self) -> String {
        let mut cells = vec!["system".to_string()];
        if self.accuracy {
            cells.push("KBP2010 micro-average".into());
        }
        for metric in &self.metrics {
            cells.push(format!("{metric} Precision"));
            cells.push(format!("{metric} Recall"));
            if self.f1 {
                cells.push(format!("{metric} F1"));
            }
        }
        cells.join("\t")
    }

    pub fn row(&self, system: &str, evaluation: &Evaluation) -> String {
        let mut cells = vec![system.to_string()];
        if self.accuracy {
            cells.push(self.number(evaluation.accuracy));
        }
        for metric in &self.metrics {
            let scores = evaluation.scores(*metric);
            cells.push(self.number(scores.precision));
            cells.push(self.number(scores.recall));
            if self.f1 {
                cells.push(self.number(scores.f1));
            }
        }
        cells.join("\t")
    }

    fn number(&self, value: f64) -> String {
        format!("{value:.prec$}", prec = self.decimals)
    }
}

fn mention_list(mentions: &[Mention]) -> String {
    mentions
        .iter()
        .map(Mention::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One `[ERROR]` line per kind of mismatch.
pub fn skip_diagnostics(path: &Path, mismatch: &CoverageMismatch) -> Vec<String> {
    let mut lines = Vec::new();
    if !mismatch.missing.is_empty() {
        lines.push(format!(
            "[ERROR] The output in \"{}\" is missing the following mentions ({}). This system output won't be evaluated.",
            path.display(),
            mention_list(&mismatch.missing)
        ));
    }
    if !mismatch.extra.is_empty() {
        lines.push(format!(
            "[ERROR] The output in \"{}\" contains mentions not present in the gold standard ({}). This system output won't be evaluated.",
            path.display(),
            mention_list(&mismatch.extra)
        ));
    }
    lines
}

/// Table lines for one row: a score row, or the diagnostics of a skip.
pub fn tsv_lines(layout: &Layout, row: &RankingRow, path: &Path) -> Vec<String> {
    match row {
        RankingRow::Scored { system, evaluation } => vec![layout.row(system, evaluation)],
        RankingRow::Skipped { mismatch, .. } => skip_diagnostics(path, mismatch),
    }
}

pub fn json_line(row: &RankingRow) -> Result<String> {
    Ok(serde_json::to_string(row)?)
}
