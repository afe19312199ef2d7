//! Track-level evaluation: is the reference found in the query at all?

use super::PairScorer;
use crate::results::{Counts, PositivesNegativesResults};
use crate::segment::SegmentRow;

/// Binary presence scoring that ignores segment boundaries
///
/// Works on raw rows, so it needs no time ranges in either file.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackScorer;

impl PairScorer for TrackScorer {
    type Segment = SegmentRow;
    type Results = PositivesNegativesResults;

    fn title(&self) -> &'static str {
        "Track results"
    }

    fn score_pair(&self, annotation: &[SegmentRow], matched: &[SegmentRow]) -> Counts {
        let annotated = !annotation.is_empty();
        let found = !matched.is_empty();

        Counts {
            true_positive: i64::from(annotated && found),
            unknown_positive: 0,
            false_positive: i64::from(!annotated && found),
            false_negative: i64::from(annotated && !found),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::evaluate;
    use crate::segment::{PairKey, SegmentMap};

    fn row(query_id: &str, reference_id: &str) -> SegmentRow {
        SegmentRow::from_pairs([("query_id", query_id), ("reference_id", reference_id)])
    }

    #[test]
    fn test_presence_categories() {
        let scorer = TrackScorer;
        let r = [row("q", "r")];
        assert_eq!(scorer.score_pair(&r, &r), Counts::new(1, 0, 0, 0));
        assert_eq!(scorer.score_pair(&r, &[]), Counts::new(0, 0, 0, 1));
        assert_eq!(scorer.score_pair(&[], &r), Counts::new(0, 0, 1, 0));
        assert_eq!(scorer.score_pair(&[], &[]), Counts::default());
    }

    #[test]
    fn test_segment_count_does_not_matter() {
        let many = vec![row("q", "r"); 5];
        assert_eq!(TrackScorer.score_pair(&many, &many[..1]), Counts::new(1, 0, 0, 0));
    }

    #[test]
    fn test_report_totals() {
        let mut annotations = SegmentMap::new();
        annotations.insert(PairKey::new("q1", "r1"), vec![row("q1", "r1")]);
        annotations.insert(PairKey::new("q2", "r1"), vec![row("q2", "r1")]);
        let mut matches = SegmentMap::new();
        matches.insert(PairKey::new("q1", "r1"), vec![row("q1", "r1")]);
        matches.insert(PairKey::new("q3", "r2"), vec![row("q3", "r2")]);

        let report = evaluate(TrackScorer, &annotations, &matches);
        assert_eq!(report.title, "Track results");
        assert_eq!(report.pairs.len(), 3);
        assert_eq!(report.total.counts, Some(Counts::new(1, 0, 1, 1)));
        assert_eq!(report.reference("r1").unwrap().counts, Some(Counts::new(1, 0, 0, 1)));
        // Mean of per-pair ratios: recall (1 + 0 + 0) / 3, precision (1 + 1 + 0) / 3
        assert!((report.total.recall - 1.0 / 3.0).abs() < 1e-12);
        assert!((report.total.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!(report.pair("q3", "r2").unwrap().tags.is_empty());
    }
}
