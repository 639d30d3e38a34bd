//! Rank-based evaluation.

use crate::error::{Error, Result};

/// 1-based rank of the first correct hit; 0 means no correct hit was retrieved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RankOutcome(pub usize);

impl RankOutcome {
    pub const NOT_FOUND: RankOutcome = RankOutcome(0);

    pub fn found(rank: usize) -> Self { RankOutcome(rank) }

    pub fn rank(self) -> usize { self.0 }

    pub fn is_found(self) -> bool { self.0 > 0 }

    pub fn reciprocal(self) -> f64 {
        if self.is_found() { 1.0 / self.0 as f64 } else { 0.0 }
    }
}

/// Mean Reciprocal Rank. Misses add nothing to the sum but still count in the
/// denominator.
pub fn mean_reciprocal_rank(ranks: &[RankOutcome]) -> Result<f64> {
    if ranks.is_empty() {
        return Err(Error::EmptyInput);
    }
    let sum: f64 = ranks.iter().map(|r| r.reciprocal()).sum();
    Ok(sum / ranks.len() as f64)
}

/// Slots 0..=9 count ranks 1..=10; the last slot counts everything else.
pub const HISTOGRAM_SLOTS: usize = 11;

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationSummary {
    pub mrr: f64,
    pub top1: usize,
    pub total: usize,
    pub histogram: [usize; HISTOGRAM_SLOTS],
}

impl EvaluationSummary {
    pub fn from_ranks(ranks: &[RankOutcome]) -> Result<Self> {
        let mrr = mean_reciprocal_rank(ranks)?;
        let mut histogram = [0usize; HISTOGRAM_SLOTS];
        for r in ranks {
            let slot = match r.rank() {
                n @ 1..=10 => n - 1,
                _ => HISTOGRAM_SLOTS - 1,
            };
            histogram[slot] += 1;
        }
        Ok(Self { mrr, top1: histogram[0], total: ranks.len(), histogram })
    }
}
