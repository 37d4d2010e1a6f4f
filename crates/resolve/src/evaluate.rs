//! Detection quality against a gold standard of duplicate pairs.
//!
//! - precision: fraction of detected pairs that are true duplicates
//! - recall: fraction of true duplicates that were detected
//! - F1: harmonic mean of the two

use std::fmt;

use serde::Serialize;

use crate::error::DedupError;
use crate::model::CandidatePair;

/// True/false positive and false negative counts for one strategy run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairCounts {
    pub tp: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
}

/// Compare detected pairs against gold pairs.
///
/// Pairs match only as ordered pairs: `(2, 1)` does not match gold `(1, 2)`.
/// Each detected and each gold index is consumed at most once.
pub fn count_pairs(detected: &[CandidatePair], gold: &[CandidatePair]) -> PairCounts {
    let mut detected_used = vec![false; detected.len()];
    let mut tp = 0;

    for gold_pair in gold {
        let hit = detected
            .iter()
            .enumerate()
            .position(|(di, pair)| !detected_used[di] && pair == gold_pair);
        if let Some(di) = hit {
            detected_used[di] = true;
            tp += 1;
        }
    }

    PairCounts {
        tp,
        fp: detected.len() - tp,
        fn_: gold.len() - tp,
    }
}

/// Counts plus derived metrics. Construction fails instead of producing NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    #[serde(flatten)]
    pub counts: PairCounts,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl Evaluation {
    pub fn from_counts(counts: PairCounts) -> Result<Self, DedupError> {
        let PairCounts { tp, fp, fn_ } = counts;

        if tp + fp == 0 {
            return Err(DedupError::UndefinedMetric {
                metric: "precision",
                reason: "no pairs were detected".into(),
            });
        }
        let precision = tp as f64 / (tp + fp) as f64;

        if tp + fn_ == 0 {
            return Err(DedupError::UndefinedMetric {
                metric: "recall",
                reason: "the gold standard is empty".into(),
            });
        }
        let recall = tp as f64 / (tp + fn_) as f64;

        if precision + recall == 0.0 {
            return Err(DedupError::UndefinedMetric {
                metric: "f1",
                reason: "precision and recall are both zero".into(),
            });
        }
        let f1 = 2.0 * precision * recall / (precision + recall);

        Ok(Self { counts, precision, recall, f1 })
    }
}

/// Evaluate one strategy's pairs against the gold standard.
pub fn evaluate(detected: &[CandidatePair], gold: &[CandidatePair]) -> Result<Evaluation, DedupError> {
    let counts = count_pairs(detected, gold);
    log::debug!("tp={} fp={} fn={}", counts.tp, counts.fp, counts.fn_);
    Evaluation::from_counts(counts)
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Precision: {:.8}", self.precision)?;
        writeln!(f, "Recall: {:.8}", self.recall)?;
        write!(f, "F1 Score: {:.8}", self.f1)
    }
}
