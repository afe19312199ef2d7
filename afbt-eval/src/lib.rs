//! AFBT evaluation driver
//!
//! **Purpose:** Run the evaluation tiers selected by an [`EvaluationLevel`]
//! over loaded annotation and match files and write every result table to
//! a report sink.
//!
//! Tiers:
//! - Track level (`files`): [`TrackScorer`] on raw rows
//! - Segment level (`seconds`): [`BoundingBoxScorer`] then [`LengthScorer`]
//!   on rows converted to time ranges

use afbt_common::config::EvaluationLevel;
use afbt_common::evaluator::{evaluate, BoundingBoxScorer, EvaluationReport, LengthScorer, TrackScorer};
use afbt_common::report::{write_csv, write_text};
use afbt_common::segment::{convert_segment_ranges, SegmentMap, SegmentRow};
use afbt_common::Result;
use std::io::Write;
use tracing::{info, warn};

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins over `level` when set. Logs go to stderr; stdout carries
/// text reports.
pub fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Layout of the written tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Aligned text rows
    Text,
    /// CSV tables, each preceded by its title
    Csv,
}

/// Destination of the result tables
pub struct ReportSink<W: Write> {
    format: ReportFormat,
    out: W,
}

impl<W: Write> ReportSink<W> {
    pub fn new(format: ReportFormat, out: W) -> Self {
        Self { format, out }
    }

    pub fn text(out: W) -> Self {
        Self::new(ReportFormat::Text, out)
    }

    pub fn csv(out: W) -> Self {
        Self::new(ReportFormat::Csv, out)
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Write one table
    pub fn write(&mut self, report: &EvaluationReport) -> Result<()> {
        match self.format {
            ReportFormat::Text => write_text(report, &mut self.out),
            ReportFormat::Csv => write_csv(report, &mut self.out),
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Run the selected tiers and write each table as soon as it is complete
///
/// If the rows cannot be converted to time ranges, the segment tier is
/// skipped with a warning; tables already written stay valid. Returns the
/// reports that were written.
pub fn run_evaluation<W: Write>(
    annotations: &SegmentMap<SegmentRow>,
    matches: &SegmentMap<SegmentRow>,
    level: EvaluationLevel,
    sink: &mut ReportSink<W>,
) -> Result<Vec<EvaluationReport>> {
    let mut written = Vec::new();

    if level.includes_tracks() {
        let report = evaluate(TrackScorer, annotations, matches);
        sink.write(&report)?;
        written.push(report);
    }

    if level.includes_segments() {
        let ranges = convert_segment_ranges(annotations)
            .and_then(|annotations| Ok((annotations, convert_segment_ranges(matches)?)));

        match ranges {
            Ok((annotations, matches)) => {
                let report = evaluate(BoundingBoxScorer, &annotations, &matches);
                sink.write(&report)?;
                written.push(report);

                let report = evaluate(LengthScorer, &annotations, &matches);
                sink.write(&report)?;
                written.push(report);
            }
            Err(e) => {
                warn!(error = %e, "Cannot convert segment ranges, matching seconds evaluation is not possible");
            }
        }
    }

    sink.flush()?;
    info!(level = %level, tables = written.len(), "Evaluation finished");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use afbt_common::loader::read_segments;

    fn rows(text: &str) -> SegmentMap<SegmentRow> {
        read_segments(text.as_bytes()).unwrap()
    }

    const FULL: &str = "query_id,reference_id,query_begin,query_end,reference_begin,reference_end\nq,r,0,10,10,20\n";

    #[test]
    fn test_level_selects_tiers() {
        let annotations = rows(FULL);
        let cases = [
            (EvaluationLevel::Files, vec!["Track results"]),
            (
                EvaluationLevel::Seconds,
                vec!["Bounding Box Segment results", "Length Segment results"],
            ),
            (
                EvaluationLevel::All,
                vec!["Track results", "Bounding Box Segment results", "Length Segment results"],
            ),
        ];

        for (level, titles) in cases {
            let mut sink = ReportSink::text(Vec::new());
            let written = run_evaluation(&annotations, &annotations, level, &mut sink).unwrap();
            let written: Vec<&str> = written.iter().map(|r| r.title.as_str()).collect();
            assert_eq!(written, titles, "level {}", level);
        }
    }

    #[test]
    fn test_sink_format() {
        assert_eq!(ReportSink::csv(Vec::new()).format(), ReportFormat::Csv);
        assert_eq!(ReportSink::text(Vec::new()).format(), ReportFormat::Text);
    }
}
