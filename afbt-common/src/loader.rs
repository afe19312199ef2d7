//! Annotation and match file loading
//!
//! **Purpose:** Read CSV files with a header row into [`SegmentMap`]s of raw
//! rows, grouped by (query_id, reference_id) in file order.
//!
//! Only the two id columns are required. All other columns, known or not,
//! stay in the row's parameter bag and are interpreted later.

use crate::fields;
use crate::segment::{SegmentMap, SegmentRow};
use crate::{Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Columns every annotation and match file must have
pub const REQUIRED_COLUMNS: [&str; 2] = [fields::QUERY_ID, fields::REFERENCE_ID];

/// Load an annotation or match file
pub fn load_segments(path: impl AsRef<Path>) -> Result<SegmentMap<SegmentRow>> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| Error::InvalidInput(format!("Cannot open {}: {}", path.display(), e)))?;

    let segments = read_segments(file)?;
    info!(
        path = %path.display(),
        pairs = segments.len(),
        rows = segments.values().map(Vec::len).sum::<usize>(),
        "Loaded segment file"
    );
    Ok(segments)
}

/// Read CSV rows from any reader
pub fn read_segments<R: Read>(reader: R) -> Result<SegmentMap<SegmentRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(Error::InvalidInput(format!("Missing required column '{}'", column)));
        }
    }
    debug!(columns = headers.len(), "Read CSV header");

    let mut segments = SegmentMap::new();
    for record in csv_reader.records() {
        let record = record?;
        // Short rows leave their trailing columns absent
        let fields: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        let row = SegmentRow::new(fields);
        segments.entry(row.pair_key()).or_insert_with(Vec::new).push(row);
    }

    Ok(segments)
}
