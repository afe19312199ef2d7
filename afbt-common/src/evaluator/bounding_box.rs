//! Segment-level evaluation using bounding boxes
//!
//! An annotated and a matched segment agree only where they overlap on the
//! reference axis and the query axis at the same time. Coverage is measured
//! separately on each axis and the two ratios are multiplied.

use super::{overlap_grid, total_length, Overlap, PairScorer};
use crate::interval::IntervalSet;
use crate::results::{RecallPrecision, RecallPrecisionResults};
use crate::segment::Segment;

#[derive(Debug, Clone, Copy, Default)]
pub struct BoundingBoxScorer;

/// Covered reference and query lengths, summed over the rooted segments
#[derive(Debug, Default)]
struct Coverage {
    reference: i64,
    query: i64,
}

impl Coverage {
    /// Union the joint overlaps of each rooted segment and add up their lengths
    ///
    /// `overlaps` yields, for each rooted segment, its overlaps with every
    /// segment on the other side.
    fn collect<'a, I, J>(overlaps: I) -> Self
    where
        I: Iterator<Item = J>,
        J: Iterator<Item = &'a Overlap>,
    {
        let mut coverage = Self::default();
        for row in overlaps {
            let mut reference_union = IntervalSet::new();
            let mut query_union = IntervalSet::new();
            for overlap in row.filter(|overlap| overlap.is_joint()) {
                reference_union |= overlap.reference;
                query_union |= overlap.query;
            }
            coverage.reference = coverage.reference.saturating_add(reference_union.length());
            coverage.query = coverage.query.saturating_add(query_union.length());
        }
        coverage
    }
}

/// `covered / total`, or `default` when there is nothing to cover
fn ratio(covered: i64, total: i64, default: f64) -> f64 {
    if total != 0 {
        covered as f64 / total as f64
    } else {
        default
    }
}

impl PairScorer for BoundingBoxScorer {
    type Segment = Segment;
    type Results = RecallPrecisionResults;

    fn title(&self) -> &'static str {
        "Bounding Box Segment results"
    }

    fn score_pair(&self, annotation: &[Segment], matched: &[Segment]) -> RecallPrecision {
        let grid = overlap_grid(annotation, matched);
        let rows = &grid;

        // Recall: rooted at annotated segments
        let covered = Coverage::collect(
            (0..annotation.len()).map(move |a| rows.iter().map(move |row| &row[a])),
        );
        let recall = ratio(covered.reference, total_length(annotation, |s| s.reference), 0.0)
            * ratio(covered.query, total_length(annotation, |s| s.query), 0.0);

        // Precision: rooted at matched segments
        let covered = Coverage::collect(rows.iter().map(|row| row.iter()));
        let precision = ratio(covered.reference, total_length(matched, |s| s.reference), 1.0)
            * ratio(covered.query, total_length(matched, |s| s.query), 1.0);

        RecallPrecision::new(recall, precision)
    }
}
