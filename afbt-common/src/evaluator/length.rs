//! Segment-level evaluation using tempo-corrected segment lengths
//!
//! Counts are reported in seconds of reference audio. Query-axis lengths are
//! converted to the reference axis with the segment tempo and rounded
//! towards the length they are compared with.
//!
//! Per annotated segment:
//! - TP: joint overlap, the smaller of the reference and scaled query lengths
//! - FN: uncovered remainder, the larger of the two axes
//!
//! Per matched segment:
//! - UP: disagreement between the joint reference overlap and the scaled
//!   query-only overlap (correctness undecidable)
//! - FP: surplus of the match beyond its overlap, the larger of the two axes

use super::{overlap_grid, PairScorer};
use crate::interval::IntervalSet;
use crate::results::{Counts, PositivesNegativesResults};
use crate::segment::Segment;

#[derive(Debug, Clone, Copy, Default)]
pub struct LengthScorer;

/// Round `value` up when `target` lies above it, down otherwise
pub fn round_towards_target(value: f64, target: i64) -> i64 {
    if target as f64 > value {
        value.ceil() as i64
    } else {
        value.floor() as i64
    }
}

impl PairScorer for LengthScorer {
    type Segment = Segment;
    type Results = PositivesNegativesResults;

    fn title(&self) -> &'static str {
        "Length Segment results"
    }

    fn score_pair(&self, annotation: &[Segment], matched: &[Segment]) -> Counts {
        let grid = overlap_grid(annotation, matched);
        let mut counts = Counts::default();

        // True Positives and False Negatives
        for (a, segment) in annotation.iter().enumerate() {
            let tempo = segment.transform.tempo_ratio();

            let mut overlap_reference = IntervalSet::new();
            let mut overlap_query = IntervalSet::new();
            for overlap in grid.iter().map(|row| &row[a]).filter(|o| o.is_joint()) {
                overlap_reference |= overlap.reference;
                overlap_query |= overlap.query;
            }

            let annotation_reference_length = segment.reference.length();
            let overlap_reference_length = overlap_reference.length();
            let overlap_query_length = round_towards_target(
                overlap_query.length() as f64 * tempo,
                annotation_reference_length,
            );
            counts.true_positive = counts
                .true_positive
                .saturating_add(overlap_reference_length.min(overlap_query_length));

            let missing_reference_length = segment.reference.subtract(&overlap_reference).length();
            let missing_query_length = round_towards_target(
                segment.query.subtract(&overlap_query).length() as f64 * tempo,
                0,
            );
            counts.false_negative = counts
                .false_negative
                .saturating_add(missing_reference_length.max(missing_query_length));
        }

        // False Positives and Unknown Positives
        for (row, segment) in grid.iter().zip(matched) {
            let match_reference_length = segment.reference.length();
            let match_query_length = segment.query.length();

            // Own tempo unless an annotated segment overlaps in the query;
            // then the last such annotated segment decides
            let mut tempo = if match_query_length != 0 {
                match_reference_length as f64 / match_query_length as f64
            } else {
                1.0
            };

            let mut overlap_reference = IntervalSet::new();
            let mut overlap_query_only = IntervalSet::new();
            for (overlap, annotated) in row.iter().zip(annotation) {
                if !overlap.query.is_empty() {
                    tempo = annotated.transform.tempo_ratio();
                }
                if overlap.is_joint() {
                    overlap_reference |= overlap.reference;
                }
                overlap_query_only |= overlap.query;
            }

            let overlap_reference_length = overlap_reference.length();
            let overlap_query_only_length = round_towards_target(
                overlap_query_only.length() as f64 * tempo,
                match_reference_length,
            );
            let overlap_length = overlap_reference_length.max(overlap_query_only_length);

            counts.unknown_positive = counts
                .unknown_positive
                .saturating_add((overlap_reference_length - overlap_query_only_length).abs());

            let surplus_reference_length = (match_reference_length - overlap_length).max(0);
            let surplus_query_length =
                round_towards_target(match_query_length as f64 * tempo, match_reference_length)
                    - overlap_query_only_length;
            counts.false_positive = counts
                .false_positive
                .saturating_add(surplus_reference_length.max(surplus_query_length));
        }

        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::test_support::seg;

    #[test]
    fn test_round_towards_target() {
        assert_eq!(round_towards_target(4.2, 10), 5);
        assert_eq!(round_towards_target(4.8, 0), 4);
        assert_eq!(round_towards_target(4.0, 4), 4);
        assert_eq!(round_towards_target(4.5, 4), 4);
        assert_eq!(round_towards_target(-0.5, 0), 0);
    }

    #[test]
    fn test_identical_segments() {
        let a = [seg((10, 20), (0, 10), 100)];
        assert_eq!(LengthScorer.score_pair(&a, &a), Counts::new(10, 0, 0, 0));
    }

    #[test]
    fn test_missing_match() {
        let a = [seg((10, 20), (0, 10), 100)];
        assert_eq!(LengthScorer.score_pair(&a, &[]), Counts::new(0, 0, 0, 10));
    }

    #[test]
    fn test_unannotated_match() {
        let m = [seg((10, 20), (0, 10), 100)];
        assert_eq!(LengthScorer.score_pair(&[], &m), Counts::new(0, 0, 10, 0));
    }

    #[test]
    fn test_half_found() {
        let a = [seg((0, 20), (0, 20), 100)];
        let m = [seg((10, 20), (10, 20), 100)];
        assert_eq!(LengthScorer.score_pair(&a, &m), Counts::new(10, 0, 0, 10));
    }

    #[test]
    fn test_match_overshoots() {
        let a = [seg((0, 10), (0, 10), 100)];
        let m = [seg((0, 15), (0, 15), 100)];
        assert_eq!(LengthScorer.score_pair(&a, &m), Counts::new(10, 0, 5, 0));
    }

    #[test]
    fn test_tempo_scales_query_axis() {
        // Query plays at 200%: 10 s of query cover 20 s of reference
        let a = [seg((0, 20), (0, 10), 200)];
        let m = [seg((0, 20), (0, 10), 100)];
        assert_eq!(LengthScorer.score_pair(&a, &m), Counts::new(20, 0, 0, 0));
    }

    #[test]
    fn test_query_only_overlap_is_unknown() {
        // Right place in the query, wrong place in the reference
        let a = [seg((0, 10), (0, 10), 100)];
        let m = [seg((50, 60), (0, 10), 100)];
        let counts = LengthScorer.score_pair(&a, &m);
        assert_eq!(counts.true_positive, 0);
        assert_eq!(counts.false_negative, 10);
        assert_eq!(counts.unknown_positive, 10);
        assert_eq!(counts.false_positive, 0);
    }

    #[test]
    fn test_last_overlapping_annotation_sets_tempo() {
        // Both annotations overlap the match in the query; the later one wins
        let a = [seg((0, 10), (0, 10), 100), seg((100, 120), (10, 20), 200)];
        let m = [seg((200, 210), (0, 20), 100)];
        let counts = LengthScorer.score_pair(&a, &m);
        // No joint overlap; query-only overlap 20 s scaled by 2.0
        assert_eq!(counts.unknown_positive, 40);
        // Match query 20 s scaled by 2.0 minus the scaled overlap
        assert_eq!(counts.false_positive, 0);

        let reversed = [a[1].clone(), a[0].clone()];
        let counts = LengthScorer.score_pair(&reversed, &m);
        assert_eq!(counts.unknown_positive, 20);
    }

    #[test]
    fn test_match_own_tempo_without_query_overlap() {
        // Match covers 20 s of reference in 10 s of query, nothing annotated
        let m = [seg((0, 20), (0, 10), 100)];
        assert_eq!(LengthScorer.score_pair(&[], &m), Counts::new(0, 0, 20, 0));
    }

    #[test]
    fn test_query_axis_drives_false_negative() {
        // Half tempo: the 15 s of query left uncovered are 7.5 s of reference
        let a = [seg((0, 10), (0, 20), 50)];
        let m = [seg((0, 10), (0, 5), 100)];
        let counts = LengthScorer.score_pair(&a, &m);
        assert_eq!(counts, Counts::new(3, 7, 0, 7));
        // The reference axis is fully covered, so FN comes from the query axis
        assert!(a[0].reference.subtract(&IntervalSet::from(m[0].reference)).is_empty());
    }

    #[test]
    fn test_huge_bounds_saturate() {
        let a = [seg((0, i64::MAX), (0, 10), 100), seg((0, i64::MAX), (10, 20), 100)];
        let counts = LengthScorer.score_pair(&a, &[]);
        assert_eq!(counts.false_negative, i64::MAX);
        assert_eq!(counts.true_positive, 0);
    }

    #[test]
    fn test_tp_plus_fn_within_rounding() {
        let cases = [
            (seg((0, 30), (0, 23), 130), seg((5, 25), (3, 19), 100)),
            (seg((0, 17), (0, 19), 90), seg((2, 9), (1, 8), 100)),
            (seg((0, 10), (0, 10), 100), seg((3, 7), (3, 7), 100)),
        ];
        for (annotated, matched) in cases {
            let counts = LengthScorer.score_pair(&[annotated.clone()], &[matched]);
            let total = counts.true_positive + counts.false_negative;
            let length = annotated.reference.length();
            assert!(
                (total - length).abs() <= 1,
                "tp + fn = {} for reference length {}",
                total,
                length
            );
        }
    }
}
