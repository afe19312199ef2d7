//! Reference track list generation
//!
//! **Purpose:** Build the `track_id,track_file,track_duration` list of a set
//! of media files, as consumed by the query generator.

use crate::fields::{TRACK_DURATION, TRACK_FILE, TRACK_ID};
use crate::media::{track_id_from_file_name, DurationProbe};
use crate::Result;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

/// One line of the track list
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEntry {
    pub track_id: String,
    pub track_file: PathBuf,
    /// Seconds, millisecond precision
    pub track_duration: f64,
}

/// Track files listed one per line; blank lines are ignored
pub fn read_file_list<R: BufRead>(reader: R) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let path = line.trim_end();
        if !path.is_empty() {
            files.push(PathBuf::from(path));
        }
    }
    Ok(files)
}

/// Probe every file and key the entries by track id
///
/// Files whose probe fails or reports a zero duration are skipped. When
/// two files share a track id the later one wins.
pub fn build_track_list<P: DurationProbe>(files: &[PathBuf], probe: &P) -> BTreeMap<String, TrackEntry> {
    let mut tracks = BTreeMap::new();

    for file in files {
        let track_duration = match probe.probe_duration(file) {
            Ok(duration) if duration > 0.0 => duration,
            Ok(_) => {
                warn!(file = %file.display(), "Zero duration, skipping");
                continue;
            }
            Err(e) => {
                warn!(file = %file.display(), error = %e, "Cannot determine duration, skipping");
                continue;
            }
        };

        let track_id = track_id_from_file_name(file);
        tracks.insert(
            track_id.clone(),
            TrackEntry {
                track_id,
                track_file: file.clone(),
                track_duration,
            },
        );
    }

    info!(files = files.len(), tracks = tracks.len(), "Track list built");
    tracks
}

/// Write the track list as CSV, sorted by track id
pub fn write_track_list<W: Write>(tracks: &BTreeMap<String, TrackEntry>, out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record([TRACK_ID, TRACK_FILE, TRACK_DURATION])?;
    for entry in tracks.values() {
        writer.write_record([
            entry.track_id.clone(),
            entry.track_file.to_string_lossy().into_owned(),
            // Debug keeps the fractional part: 30.0, 12.345
            format!("{:?}", entry.track_duration),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
