//! Precision / recall aggregation.
//!
//! Element precision of a mention `a` in system cluster `C` is the share of
//! `b ∈ C` for which the chosen [`Metric`] holds on `(a, b)`. Corpus
//! precision is the mean element precision over every system mention.
//! Recall is the same computation with the system and gold sides swapped.
//!
//! The `focused_*` variants average element scores over a focus set of gold
//! mentions instead of the whole corpus. With the gold standard itself as
//! the focus they agree with [`precision`] and [`recall`].

use std::collections::BTreeMap;

use serde::Serialize;

use crate::correctness::Metric;
use crate::error::{ScoreError, ScoreResult};
use crate::linking::Linking;
use crate::mention::Mention;

/// Precision, recall and their harmonic mean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Scores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl Scores {
    pub fn new(precision: f64, recall: f64) -> Self {
        Self {
            precision,
            recall,
            f1: harmonic_mean(precision, recall),
        }
    }
}

fn harmonic_mean(p: f64, r: f64) -> f64 {
    if p + r > 0.0 {
        2.0 * p * r / (p + r)
    } else {
        0.0
    }
}

/// Element precision of every mention of `system`, judged against `gold`.
pub fn element_precisions(metric: Metric, system: &Linking, gold: &Linking) -> BTreeMap<Mention, f64> {
    let (sys_index, gold_index) = (system.index(), gold.index());
    let mut precisions = BTreeMap::new();

    for (_, cluster) in system.clustering().iter() {
        let size = cluster.len() as f64;
        for a in cluster {
            let correct = cluster
                .iter()
                .filter(|b| metric.is_correct(a, b, sys_index, gold_index))
                .count();
            precisions.insert(a.clone(), correct as f64 / size);
        }
    }

    precisions
}

/// Corpus-level precision of `system` against `gold`.
pub fn precision(metric: Metric, system: &Linking, gold: &Linking) -> ScoreResult<f64> {
    let total = system.clustering().mention_count();
    if total == 0 {
        return Err(ScoreError::EmptyCorpus {
            origin: system.name().to_string(),
        });
    }

    let sum: f64 = element_precisions(metric, system, gold).values().sum();
    Ok(sum / total as f64)
}

/// `precision(gold, system)`.
pub fn recall(metric: Metric, system: &Linking, gold: &Linking) -> ScoreResult<f64> {
    precision(metric, gold, system)
}

pub fn score(metric: Metric, system: &Linking, gold: &Linking) -> ScoreResult<Scores> {
    Ok(Scores::new(
        precision(metric, system, gold)?,
        recall(metric, system, gold)?,
    ))
}

/// Mean of `elements` over the mentions of `focus`.
fn focus_average(elements: &BTreeMap<Mention, f64>, focus: &Linking) -> ScoreResult<f64> {
    if focus.mention_count() == 0 {
        return Err(ScoreError::EmptyCorpus {
            origin: focus.name().to_string(),
        });
    }

    let mut sum = 0.0_f64;
    for mention in focus.index().mentions() {
        sum += *elements
            .get(mention)
            .ok_or_else(|| ScoreError::UnknownMention(mention.clone()))?;
    }
    Ok(sum / focus.mention_count() as f64)
}

/// Precision of `system` averaged over the focus mentions only.
pub fn focused_precision(metric: Metric, system: &Linking, gold: &Linking, focus: &Linking) -> ScoreResult<f64> {
    focus_average(&element_precisions(metric, system, gold), focus)
}

/// Recall of `system` averaged over the focus mentions only.
pub fn focused_recall(metric: Metric, system: &Linking, gold: &Linking, focus: &Linking) -> ScoreResult<f64> {
    focus_average(&element_precisions(metric, gold, system), focus)
}

pub fn focused_score(metric: Metric, system: &Linking, gold: &Linking, focus: &Linking) -> ScoreResult<Scores> {
    Ok(Scores::new(
        focused_precision(metric, system, gold, focus)?,
        focused_recall(metric, system, gold, focus)?,
    ))
}

/// Mean over focus mentions of the per-mention harmonic mean of element
/// precision and element recall.
pub fn micro_f1(metric: Metric, system: &Linking, gold: &Linking, focus: &Linking) -> ScoreResult<f64> {
    let precisions = element_precisions(metric, system, gold);
    let recalls = element_precisions(metric, gold, system);

    let f1s: BTreeMap<Mention, f64> = precisions
        .iter()
        .filter_map(|(mention, p)| {
            recalls
                .get(mention)
                .map(|r| (mention.clone(), harmonic_mean(*p, *r)))
        })
        .collect();
    focus_average(&f1s, focus)
}

/// KBP2010 micro-average: share of gold mentions whose system link matches
/// the gold link, NIL placeholders normalised.
pub fn accuracy(system: &Linking, gold: &Linking) -> ScoreResult<f64> {
    if gold.mention_count() == 0 {
        return Err(ScoreError::EmptyCorpus {
            origin: gold.name().to_string(),
        });
    }

    let mut correct = 0usize;
    for mention in gold.index().mentions() {
        let gold_id = gold.index().kb_id(mention)?;
        let sys_id = system.index().kb_id(mention)?;
        if gold_id.normalized() == sys_id.normalized() {
            correct += 1;
        }
    }
    Ok(correct as f64 / gold.mention_count() as f64)
}

/// Every score reported for one system output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub accuracy: f64,
    pub b2: Scores,
    pub b3: Scores,
}

impl Evaluation {
    /// Accuracy counts every gold mention; B² and B³ average over `focus`.
    /// Pass `gold` as the focus to score the whole corpus.
    pub fn compute(system: &Linking, gold: &Linking, focus: &Linking) -> ScoreResult<Self> {
        Ok(Self {
            accuracy: accuracy(system, gold)?,
            b2: focused_score(Metric::B2, system, gold, focus)?,
            b3: focused_score(Metric::B3, system, gold, focus)?,
        })
    }

    pub fn scores(&self, metric: Metric) -> Scores {
        match metric {
            Metric::B2 => self.b2,
            Metric::B3 => self.b3,
        }
    }
}
