//! Result accumulators
//!
//! **Purpose:** Collect per-pair scores into averaged recall, precision and
//! F-score, optionally alongside raw positive/negative counts.
//!
//! One accumulator exists per grouping key (pair, reference, tag, total)
//! for the length of an evaluation pass.

use crate::tags::TagSet;

/// Recall/precision observation for one pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecallPrecision {
    pub recall: f64,
    pub precision: f64,
}

impl RecallPrecision {
    pub fn new(recall: f64, precision: f64) -> Self {
        Self { recall, precision }
    }
}

/// Positive/negative amounts for one pair (pairs, or seconds of reference audio)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub true_positive: i64,
    /// Overlap supported by one time axis but not the other
    pub unknown_positive: i64,
    pub false_positive: i64,
    pub false_negative: i64,
}

impl Counts {
    pub fn new(true_positive: i64, unknown_positive: i64, false_positive: i64, false_negative: i64) -> Self {
        Self {
            true_positive,
            unknown_positive,
            false_positive,
            false_negative,
        }
    }

    /// `tp / (tp + fn)`, 0 when nothing was expected
    pub fn recall(&self) -> f64 {
        let denominator = self.true_positive.saturating_add(self.false_negative);
        if denominator > 0 {
            self.true_positive as f64 / denominator as f64
        } else {
            0.0
        }
    }

    /// `tp / (tp + fp)`, 1 when nothing was reported
    pub fn precision(&self) -> f64 {
        let denominator = self.true_positive.saturating_add(self.false_positive);
        if denominator > 0 {
            self.true_positive as f64 / denominator as f64
        } else {
            1.0
        }
    }
}

impl std::ops::AddAssign for Counts {
    fn add_assign(&mut self, rhs: Self) {
        self.true_positive = self.true_positive.saturating_add(rhs.true_positive);
        self.unknown_positive = self.unknown_positive.saturating_add(rhs.unknown_positive);
        self.false_positive = self.false_positive.saturating_add(rhs.false_positive);
        self.false_negative = self.false_negative.saturating_add(rhs.false_negative);
    }
}

/// F-score with precision weighted nine times more than recall
///
/// `f = 10·R·P / (9·R + P)`, or 0 when both are 0.
pub fn calculate_f_score(recall: f64, precision: f64) -> f64 {
    if recall + precision > 0.0 {
        10.0 * recall * precision / (9.0 * recall + precision)
    } else {
        0.0
    }
}

/// Snapshot of an accumulator, ready for reporting
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSummary {
    pub recall: f64,
    pub precision: f64,
    pub f_score: f64,
    /// Summed counts; `None` for ratio-only evaluators
    pub counts: Option<Counts>,
    pub tags: TagSet,
}

/// Accumulates the scores of one grouping key
pub trait ResultAccumulator: Default {
    type Score: Copy;

    fn add(&mut self, score: Self::Score, tags: &TagSet);

    fn summary(&self) -> ResultSummary;
}

/// Averages recall and precision observations
#[derive(Debug, Clone, Default)]
pub struct RecallPrecisionResults {
    recall_sum: f64,
    precision_sum: f64,
    observations: usize,
    tags: TagSet,
}

impl RecallPrecisionResults {
    pub fn add(&mut self, recall: f64, precision: f64, tags: &TagSet) {
        self.recall_sum += recall;
        self.precision_sum += precision;
        self.observations += 1;
        self.tags.extend(tags.iter().cloned());
    }

    /// `(mean recall, mean precision, f-score)`
    ///
    /// Empty: recall 0, precision 1 (nothing reported, nothing wrong).
    pub fn get(&self) -> (f64, f64, f64) {
        let (recall, precision) = if self.observations > 0 {
            let n = self.observations as f64;
            (self.recall_sum / n, self.precision_sum / n)
        } else {
            (0.0, 1.0)
        };
        (recall, precision, calculate_f_score(recall, precision))
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn observations(&self) -> usize {
        self.observations
    }
}

impl ResultAccumulator for RecallPrecisionResults {
    type Score = RecallPrecision;

    fn add(&mut self, score: RecallPrecision, tags: &TagSet) {
        RecallPrecisionResults::add(self, score.recall, score.precision, tags);
    }

    fn summary(&self) -> ResultSummary {
        let (recall, precision, f_score) = self.get();
        ResultSummary {
            recall,
            precision,
            f_score,
            counts: None,
            tags: self.tags.clone(),
        }
    }
}

/// Averages per-pair recall/precision derived from counts and sums the counts
#[derive(Debug, Clone, Default)]
pub struct PositivesNegativesResults {
    ratios: RecallPrecisionResults,
    totals: Counts,
}

impl PositivesNegativesResults {
    pub fn add(&mut self, counts: Counts, tags: &TagSet) {
        self.ratios.add(counts.recall(), counts.precision(), tags);
        self.totals += counts;
    }

    /// `(mean recall, mean precision, f-score, summed counts)`
    pub fn get(&self) -> (f64, f64, f64, Counts) {
        let (recall, precision, f_score) = self.ratios.get();
        (recall, precision, f_score, self.totals)
    }

    pub fn tags(&self) -> &TagSet {
        self.ratios.tags()
    }
}

impl ResultAccumulator for PositivesNegativesResults {
    type Score = Counts;

    fn add(&mut self, score: Counts, tags: &TagSet) {
        PositivesNegativesResults::add(self, score, tags);
    }

    fn summary(&self) -> ResultSummary {
        let (recall, precision, f_score, counts) = self.get();
        ResultSummary {
            recall,
            precision,
            f_score,
            counts: Some(counts),
            tags: self.tags().clone(),
        }
    }
}
