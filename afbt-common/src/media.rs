//! Media file probing
//!
//! **Purpose:** Determine precise track durations with the external
//! `ffprobe` tool and derive track ids from file names.
//!
//! The container-level duration is unreliable for variable bit rate files,
//! so the duration is taken as the end of the last audio packet.

use crate::{Error, Result};
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// File extensions stripped from file names to obtain track ids
pub const KNOWN_EXTENSIONS: [&str; 20] = [
    "aac", "flac", "m4a", "mp3", "ogg", "opus", "vorbis", "wav", "wma", // audio
    "avi", "flv", "mkv", "mov", "mp4", "mpg", "wmv", // video
    "csv", "json", "msgpack", "txt", // data
];

/// Source of media durations
pub trait DurationProbe {
    /// Duration of the media file in seconds
    fn probe_duration(&self, path: &Path) -> Result<f64>;
}

/// Probe backed by the `ffprobe` binary
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    binary_path: String,
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self {
            binary_path: "ffprobe".to_string(),
        }
    }
}

impl FfprobeProbe {
    pub fn new(binary_path: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }
}

impl DurationProbe for FfprobeProbe {
    fn probe_duration(&self, path: &Path) -> Result<f64> {
        debug!(file = %path.display(), "Probing duration");

        let output = Command::new(&self.binary_path)
            .args(["-v", "error", "-select_streams", "a"])
            .args(["-show_entries", "packet=pts_time:packet=duration_time"])
            .args(["-of", "default=noprint_wrappers=1:nokey=1"])
            .arg(path)
            .output()
            .map_err(|e| Error::Probe(format!("Failed to execute {}: {}", self.binary_path, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                file = %path.display(),
                status = %output.status,
                stderr = %stderr.trim(),
                "ffprobe failed"
            );
            return Err(Error::Probe(format!("ffprobe failed for {}", path.display())));
        }

        parse_probe_output(&stdout).map_err(|e| {
            warn!(file = %path.display(), output = %stdout.trim(), "Invalid ffprobe output");
            e
        })
    }
}

/// Duration from ffprobe packet output
///
/// The last two lines are the pts and duration of the last packet; their
/// sum is rounded to milliseconds.
pub fn parse_probe_output(output: &str) -> Result<f64> {
    let lines: Vec<&str> = output.lines().collect();
    let [pts, duration] = match lines.as_slice() {
        [.., pts, duration] => [*pts, *duration],
        _ => {
            return Err(Error::Probe(format!(
                "Expected packet pts and duration, got {} line(s)",
                lines.len()
            )))
        }
    };

    let parse = |value: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::Probe(format!("Invalid packet time '{}'", value)))
    };

    let end = parse(pts)? + parse(duration)?;
    Ok((end * 1000.0).round() / 1000.0)
}

/// Track id: base file name without any trailing known extensions
///
/// `dir/song.mp3.json` becomes `song`. Unknown extensions stop the
/// stripping, so `song.live.mp3` becomes `song.live`.
pub fn track_id_from_file_name(path: impl AsRef<Path>) -> String {
    let mut track_id = path
        .as_ref()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    loop {
        let extension = Path::new(&track_id)
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned());
        let stem_len = match extension {
            Some(ext) if KNOWN_EXTENSIONS.contains(&ext.as_str()) => track_id.len() - ext.len() - 1,
            _ => break,
        };
        track_id.truncate(stem_len);
    }

    track_id
}
