//! Report generation and formatting
//!
//! **Purpose:** Render evaluation reports as aligned text for the terminal
//! or as CSV tables.
//!
//! Both layouts list pair rows, then reference rows, then tag rows, then
//! the total row, each group in sorted key order.

use crate::evaluator::EvaluationReport;
use crate::results::ResultSummary;
use crate::Result;
use std::io::Write;

/// CSV columns of every result table
pub const CSV_HEADER: [&str; 10] = [
    "recall",
    "precision",
    "f_score",
    "tp",
    "up",
    "fp",
    "fn",
    "query_id",
    "reference_id",
    "tags",
];

/// Kind of row, deciding its tag separator in text output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Pair,
    Reference,
    Tag,
    Total,
}

/// Text formatter for result rows
pub struct TextFormatter;

impl TextFormatter {
    /// Format one result row
    ///
    /// Example: `R 100.00  P 100.00  F 100.00  TP      1  UP      0  FP      0  FN      0  q1  r1  pitch:exact`
    pub fn format_row(summary: &ResultSummary, name: &str, kind: RowKind) -> String {
        let mut line = format!(
            "R {:6.2}  P {:6.2}  F {:6.2}  ",
            100.0 * summary.recall,
            100.0 * summary.precision,
            100.0 * summary.f_score
        );

        if let Some(counts) = &summary.counts {
            line.push_str(&format!(
                "TP {:6}  UP {:6}  FP {:6}  FN {:6}  ",
                counts.true_positive,
                counts.unknown_positive,
                counts.false_positive,
                counts.false_negative
            ));
        }

        line.push_str(name);

        if !summary.tags.is_empty() {
            let separator = match kind {
                RowKind::Total => "",
                RowKind::Tag => " ",
                RowKind::Pair | RowKind::Reference => "  ",
            };
            line.push_str(separator);
            line.push_str(&join_tags(summary, ", "));
        }

        line
    }

    /// Format a whole report: title, rows, blank line
    pub fn format_report(report: &EvaluationReport) -> String {
        let mut output = String::new();
        output.push_str(&report.title);
        output.push('\n');

        for (pair, summary) in &report.pairs {
            output.push_str(&Self::format_row(summary, &pair.to_string(), RowKind::Pair));
            output.push('\n');
        }
        for (reference, summary) in &report.references {
            let name = format!("REF {}", reference);
            output.push_str(&Self::format_row(summary, &name, RowKind::Reference));
            output.push('\n');
        }
        for (_, summary) in &report.tags {
            output.push_str(&Self::format_row(summary, "TAG", RowKind::Tag));
            output.push('\n');
        }
        output.push_str(&Self::format_row(&report.total, "", RowKind::Total));
        output.push('\n');
        output.push('\n');

        output
    }
}

fn join_tags(summary: &ResultSummary, separator: &str) -> String {
    summary
        .tags
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}

/// CSV fields of one result row
fn csv_record(summary: &ResultSummary, query_id: &str, reference_id: &str) -> Vec<String> {
    let mut record = vec![
        format!("{:.2}", 100.0 * summary.recall),
        format!("{:.2}", 100.0 * summary.precision),
        format!("{:.2}", 100.0 * summary.f_score),
    ];

    match &summary.counts {
        Some(counts) => record.extend([
            counts.true_positive.to_string(),
            counts.unknown_positive.to_string(),
            counts.false_positive.to_string(),
            counts.false_negative.to_string(),
        ]),
        None => record.extend(std::iter::repeat(String::new()).take(4)),
    }

    record.push(query_id.to_string());
    record.push(reference_id.to_string());
    record.push(join_tags(summary, ","));
    record
}

/// Write the report in text layout
pub fn write_text<W: Write>(report: &EvaluationReport, mut out: W) -> Result<()> {
    out.write_all(TextFormatter::format_report(report).as_bytes())?;
    Ok(())
}

/// Write the report as a CSV table preceded by its title and followed by a blank line
pub fn write_csv<W: Write>(report: &EvaluationReport, mut out: W) -> Result<()> {
    writeln!(out, "{}", report.title)?;

    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut out);

        writer.write_record(CSV_HEADER)?;
        for (pair, summary) in &report.pairs {
            writer.write_record(csv_record(summary, &pair.query_id, &pair.reference_id))?;
        }
        for (reference, summary) in &report.references {
            writer.write_record(csv_record(summary, "", reference))?;
        }
        for (_, summary) in &report.tags {
            writer.write_record(csv_record(summary, "", ""))?;
        }
        writer.write_record(csv_record(&report.total, "", ""))?;
        writer.flush()?;
    }

    writeln!(out)?;
    Ok(())
}
