//! Rank every system output of a [`SystemSource`] against one gold standard.

use serde::Serialize;
use tracing::debug;

use crate::coverage::{check_coverage, check_focus, Coverage, CoverageMismatch};
use crate::error::{ScoreError, ScoreResult};
use crate::linking::Linking;
use crate::score::Evaluation;
use crate::source::SystemSource;

/// One line of a ranking run, emitted in enumeration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RankingRow {
    Scored {
        system: String,
        #[serde(flatten)]
        evaluation: Evaluation,
    },
    Skipped {
        system: String,
        #[serde(flatten)]
        mismatch: CoverageMismatch,
    },
}

impl RankingRow {
    pub fn system(&self) -> &str {
        match self {
            Self::Scored { system, .. } | Self::Skipped { system, .. } => system,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankingSummary {
    pub scored: usize,
    pub skipped: usize,
}

/// Validate and score each system output, handing every row to `emit` as
/// soon as it is ready.
///
/// B² and B³ are averaged over `focus` when given, over all of `gold`
/// otherwise. A focus mention outside gold fails the run before any system
/// is loaded.
///
/// Coverage mismatches become [`RankingRow::Skipped`] and the run goes on.
/// Any other failure (unreadable or malformed file, ambiguous mention)
/// aborts the run.
pub fn rank_systems<S, E, F>(
    gold: &Linking,
    focus: Option<&Linking>,
    source: &S,
    mut emit: F,
) -> Result<RankingSummary, E>
where
    S: SystemSource + ?Sized,
    E: From<ScoreError>,
    F: FnMut(RankingRow) -> Result<(), E>,
{
    if gold.index().is_empty() {
        return Err(ScoreError::EmptyCorpus {
            origin: gold.name().to_string(),
        }
        .into());
    }
    let focus = match focus {
        Some(focus) => {
            check_focus(focus, gold)?;
            debug!(focus = focus.name(), mentions = focus.mention_count(), "restricting averages to focus set");
            focus
        }
        None => gold,
    };

    let mut summary = RankingSummary::default();
    for name in source.system_names()? {
        let row = evaluate_system(gold, focus, source.load_system(&name)?)?;
        match &row {
            RankingRow::Scored { evaluation, .. } => {
                debug!(system = %name, b3_precision = evaluation.b3.precision, b3_recall = evaluation.b3.recall, "scored");
                summary.scored += 1;
            }
            RankingRow::Skipped { .. } => {
                debug!(system = %name, "skipped: mention sets differ");
                summary.skipped += 1;
            }
        }
        emit(row)?;
    }

    Ok(summary)
}

/// Validate one system output and, if it covers exactly the gold mentions, score it.
pub fn evaluate_system(gold: &Linking, focus: &Linking, system: Linking) -> ScoreResult<RankingRow> {
    let name = system.name().to_string();
    match check_coverage(system.index(), gold.index()) {
        Coverage::Mismatch(mismatch) => Ok(RankingRow::Skipped {
            system: name,
            mismatch,
        }),
        Coverage::Exact => Ok(RankingRow::Scored {
            evaluation: Evaluation::compute(&system, gold, focus)?,
            system: name,
        }),
    }
}
