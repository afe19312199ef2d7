//! Match evaluation against annotations
//!
//! **Purpose:** Score the matches reported by an audio matching solution
//! against the annotated ground truth at three levels of strictness.
//!
//! Each strategy implements [`PairScorer`]: it turns the annotation and
//! match lists of a single pair into one score. [`Evaluator`] drives any
//! scorer over every pair and accumulates the scores by pair, by
//! reference, by annotation tag and in total.
//!
//! Strategies:
//! - [`TrackScorer`]: whole-track presence
//! - [`BoundingBoxScorer`]: recall/precision of overlapping time ranges
//! - [`LengthScorer`]: tempo-corrected overlap counts in reference seconds

mod bounding_box;
mod length;
mod track;

pub use bounding_box::BoundingBoxScorer;
pub use length::{round_towards_target, LengthScorer};
pub use track::TrackScorer;

use crate::interval::Interval;
use crate::results::{ResultAccumulator, ResultSummary};
use crate::segment::{PairKey, Segment, SegmentMap};
use crate::tags::{single_tag, TagSet, Tagged, TOTAL_TAG};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Scoring strategy for a single pair
pub trait PairScorer {
    /// Segment representation the strategy needs
    type Segment: Tagged;
    /// Accumulator collecting this strategy's scores
    type Results: ResultAccumulator;

    /// Title of the strategy's result table
    fn title(&self) -> &'static str;

    /// Score one pair; either list may be empty
    fn score_pair(
        &self,
        annotation: &[Self::Segment],
        matched: &[Self::Segment],
    ) -> <Self::Results as ResultAccumulator>::Score;
}

/// Runs a scorer over all pairs and owns the four result tables
pub struct Evaluator<S: PairScorer> {
    scorer: S,
    pair_results: BTreeMap<PairKey, S::Results>,
    reference_results: BTreeMap<String, S::Results>,
    tag_results: BTreeMap<String, S::Results>,
    total_results: S::Results,
}

impl<S: PairScorer> Evaluator<S> {
    pub fn new(scorer: S) -> Self {
        Self {
            scorer,
            pair_results: BTreeMap::new(),
            reference_results: BTreeMap::new(),
            tag_results: BTreeMap::new(),
            total_results: S::Results::default(),
        }
    }

    /// Score every pair present in either map
    ///
    /// A pair missing from one side is scored against an empty list.
    pub fn evaluate(
        &mut self,
        annotations: &SegmentMap<S::Segment>,
        matches: &SegmentMap<S::Segment>,
    ) {
        let pairs: BTreeSet<&PairKey> = annotations.keys().chain(matches.keys()).collect();

        for pair in &pairs {
            let annotation = annotations.get(*pair).map(Vec::as_slice).unwrap_or_default();
            let matched = matches.get(*pair).map(Vec::as_slice).unwrap_or_default();
            self.evaluate_pair(pair, annotation, matched);
        }

        debug!(
            evaluator = self.scorer.title(),
            pairs = pairs.len(),
            annotated = annotations.len(),
            matched = matches.len(),
            "Evaluation pass complete"
        );
    }

    fn evaluate_pair(&mut self, pair: &PairKey, annotation: &[S::Segment], matched: &[S::Segment]) {
        let score = self.scorer.score_pair(annotation, matched);

        // The pair row carries the tags of its first annotated segment
        let pair_tags = annotation
            .first()
            .map(|segment| segment.tags())
            .unwrap_or_default();
        self.pair_results
            .entry(pair.clone())
            .or_default()
            .add(score, &pair_tags);

        self.reference_results
            .entry(pair.reference_id.clone())
            .or_default()
            .add(score, &TagSet::new());

        // Every tag of every annotated segment receives the whole pair score
        for segment in annotation {
            for tag in segment.tags() {
                let tags = single_tag(&tag);
                self.tag_results.entry(tag).or_default().add(score, &tags);
            }
        }

        self.total_results.add(score, &single_tag(TOTAL_TAG));
    }

    pub fn title(&self) -> &'static str {
        self.scorer.title()
    }

    /// Snapshot of all tables in sorted key order
    pub fn report(&self) -> EvaluationReport {
        EvaluationReport {
            title: self.scorer.title().to_string(),
            pairs: self
                .pair_results
                .iter()
                .map(|(pair, results)| (pair.clone(), results.summary()))
                .collect(),
            references: self
                .reference_results
                .iter()
                .map(|(reference, results)| (reference.clone(), results.summary()))
                .collect(),
            tags: self
                .tag_results
                .iter()
                .map(|(tag, results)| (tag.clone(), results.summary()))
                .collect(),
            total: self.total_results.summary(),
        }
    }
}

/// Evaluate with a fresh evaluator and return its report
pub fn evaluate<S: PairScorer>(
    scorer: S,
    annotations: &SegmentMap<S::Segment>,
    matches: &SegmentMap<S::Segment>,
) -> EvaluationReport {
    let mut evaluator = Evaluator::new(scorer);
    evaluator.evaluate(annotations, matches);
    evaluator.report()
}

/// Rendered-ready results of one evaluation pass
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub title: String,
    pub pairs: Vec<(PairKey, ResultSummary)>,
    pub references: Vec<(String, ResultSummary)>,
    pub tags: Vec<(String, ResultSummary)>,
    pub total: ResultSummary,
}

impl EvaluationReport {
    pub fn pair(&self, query_id: &str, reference_id: &str) -> Option<&ResultSummary> {
        self.pairs
            .iter()
            .find(|(pair, _)| pair.query_id == query_id && pair.reference_id == reference_id)
            .map(|(_, summary)| summary)
    }

    pub fn reference(&self, reference_id: &str) -> Option<&ResultSummary> {
        self.references
            .iter()
            .find(|(reference, _)| reference == reference_id)
            .map(|(_, summary)| summary)
    }

    pub fn tag(&self, tag: &str) -> Option<&ResultSummary> {
        self.tags
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, summary)| summary)
    }
}

/// Overlap of one annotated segment with one matched segment on both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Overlap {
    pub reference: Interval,
    pub query: Interval,
}

impl Overlap {
    fn between(annotation: &Segment, matched: &Segment) -> Self {
        Self {
            reference: annotation.reference.intersect(&matched.reference),
            query: annotation.query.intersect(&matched.query),
        }
    }

    /// Overlapping on both axes at once (a box in the reference × query plane)
    pub fn is_joint(&self) -> bool {
        !self.reference.is_empty() && !self.query.is_empty()
    }
}

/// Overlaps of every (match, annotation) combination, indexed `[match][annotation]`
pub(crate) fn overlap_grid(annotation: &[Segment], matched: &[Segment]) -> Vec<Vec<Overlap>> {
    matched
        .iter()
        .map(|m| annotation.iter().map(|a| Overlap::between(a, m)).collect())
        .collect()
}

/// Total width of the ranges selected from each segment, saturating at `i64::MAX`
pub(crate) fn total_length(segments: &[Segment], range: impl Fn(&Segment) -> Interval) -> i64 {
    segments
        .iter()
        .fold(0, |total, segment| total.saturating_add(range(segment).length()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::interval::Interval;
    use crate::segment::{Segment, Transform};

    /// Segment with the given reference and query ranges and tempo
    pub fn seg(reference: (i64, i64), query: (i64, i64), tempo: i64) -> Segment {
        Segment::new(
            Interval::new(reference.0, reference.1),
            Interval::new(query.0, query.1),
            Transform {
                tempo,
                ..Transform::default()
            },
        )
    }
}
