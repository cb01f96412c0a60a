use serde::Serialize;

use crate::error::{ScoreError, ScoreResult};
use crate::linking::{IdentityMap, Linking};
use crate::mention::Mention;

/// Outcome of comparing a system output's mentions with the gold mentions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coverage {
    Exact,
    Mismatch(CoverageMismatch),
}

/// Mentions that keep a system output from being scored, in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageMismatch {
    /// In gold, absent from the system output.
    pub missing: Vec<Mention>,
    /// In the system output, absent from gold.
    pub extra: Vec<Mention>,
}

impl Coverage {
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact)
    }
}

pub fn check_coverage(system: &IdentityMap, gold: &IdentityMap) -> Coverage {
    let missing: Vec<Mention> = gold
        .mentions()
        .filter(|m| !system.contains(m))
        .cloned()
        .collect();
    let extra: Vec<Mention> = system
        .mentions()
        .filter(|m| !gold.contains(m))
        .cloned()
        .collect();

    if missing.is_empty() && extra.is_empty() {
        Coverage::Exact
    } else {
        Coverage::Mismatch(CoverageMismatch { missing, extra })
    }
}

/// The focus set restricts which gold mentions are averaged, so it must be
/// a non-empty subset of them.
pub fn check_focus(focus: &Linking, gold: &Linking) -> ScoreResult<()> {
    if focus.index().is_empty() {
        return Err(ScoreError::EmptyCorpus {
            origin: focus.name().to_string(),
        });
    }

    let missing: Vec<Mention> = focus
        .index()
        .mentions()
        .filter(|m| !gold.index().contains(m))
        .cloned()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ScoreError::FocusOutsideGold {
            origin: focus.name().to_string(),
            missing,
        })
    }
}
