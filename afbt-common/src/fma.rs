//! Reference track list from the FMA dataset
//!
//! **Purpose:** Turn the `raw_tracks.csv` metadata of the Free Music Archive
//! into a track list, keeping only tracks that are freely licensed, present
//! on disk and long enough to cut queries from.
//!
//! Every metadata column is kept. `track_id` is rewritten zero-padded to six
//! digits, and `track_file` and `track_duration` are set (appended when the
//! metadata lacks them). The metadata durations are not trusted; every file
//! is measured.

use crate::fields;
use crate::media::DurationProbe;
use crate::track_table::TrackTable;
use crate::{Error, Result};
use csv::StringRecord;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const LICENSE_IMAGE_FILE_LARGE: &str = "license_image_file_large";
pub const LICENSE_URL: &str = "license_url";

/// Licences that allow redistributing modified excerpts
pub const ALLOWED_LICENSES: [&str; 6] = [
    "by-sa",
    "by",
    "cc-zero",
    "publicdomain",
    "http://artlibre.org/licence/lal/en",
    "http://creativecommons.org/licenses/sampling+/1.0/",
];

/// Shortest usable track, in seconds
pub const MIN_TRACK_DURATION: f64 = 10.0;

/// Licence of a track: the licence image name without extension, else the
/// licence URL
pub fn track_license<'a>(license_image: &'a str, license_url: &'a str) -> &'a str {
    let base = license_image.rsplit('/').next().unwrap_or_default();
    // A leading dot starts a hidden name, not an extension
    let stem = match base.rfind('.') {
        Some(dot) if base[..dot].chars().any(|c| c != '.') => &base[..dot],
        _ => base,
    };
    if stem.is_empty() {
        license_url
    } else {
        stem
    }
}

pub fn is_allowed_license(license: &str) -> bool {
    ALLOWED_LICENSES.contains(&license)
}

/// Location of a track in the FMA layout: `<root>/012/012345.mp3`
pub fn fma_track_file(fma_path: &Path, track_id: u64) -> PathBuf {
    fma_path
        .join(format!("{:03}", track_id / 1000))
        .join(format!("{:06}.mp3", track_id))
}

/// Select the usable tracks of an FMA metadata table
///
/// Unparsable track ids are an error. Tracks with another licence, a missing
/// file, a failed measurement or a duration under [`MIN_TRACK_DURATION`]
/// are skipped.
pub fn select_fma_tracks<P: DurationProbe>(
    raw: &TrackTable,
    fma_path: &Path,
    probe: &P,
) -> Result<TrackTable> {
    let id_column = raw.require_column(fields::TRACK_ID)?;
    let image_column = raw.column(LICENSE_IMAGE_FILE_LARGE);
    let url_column = raw.column(LICENSE_URL);

    let mut selected = TrackTable::new(raw.headers());
    let file_column = selected.ensure_column(fields::TRACK_FILE);
    let duration_column = selected.ensure_column(fields::TRACK_DURATION);

    for row in raw.rows() {
        let field = |column: Option<usize>| column.and_then(|c| row.get(c)).unwrap_or_default();

        let license = track_license(field(image_column), field(url_column));
        if !is_allowed_license(license) {
            continue;
        }

        let raw_id = field(Some(id_column));
        let track_id: u64 = raw_id
            .trim()
            .parse()
            .map_err(|_| Error::InvalidInput(format!("Invalid track id '{}'", raw_id)))?;

        let track_file = fma_track_file(fma_path, track_id);
        if !track_file.exists() {
            debug!(file = %track_file.display(), "Track file missing, skipping");
            continue;
        }

        let track_duration = match probe.probe_duration(&track_file) {
            Ok(duration) => duration,
            Err(e) => {
                warn!(file = %track_file.display(), error = %e, "Cannot determine duration, skipping");
                continue;
            }
        };
        if track_duration < MIN_TRACK_DURATION {
            debug!(file = %track_file.display(), duration = track_duration, "Track too short, skipping");
            continue;
        }

        let track_id = format!("{:06}", track_id);
        let track_file = track_file.to_string_lossy().into_owned();
        let track_duration = format!("{:?}", track_duration);

        let mut output = StringRecord::with_capacity(row.as_slice().len(), selected.headers().len());
        for index in 0..selected.headers().len() {
            let value = if index == id_column {
                track_id.as_str()
            } else if index == file_column {
                track_file.as_str()
            } else if index == duration_column {
                track_duration.as_str()
            } else {
                row.get(index).unwrap_or_default()
            };
            output.push_field(value);
        }
        selected.push(output);
    }

    info!(tracks = raw.len(), selected = selected.len(), "Selected FMA tracks");
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    /// Durations by file name
    struct NamedDurations(HashMap<&'static str, f64>);

    impl DurationProbe for NamedDurations {
        fn probe_duration(&self, path: &Path) -> Result<f64> {
            path.file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| self.0.get(name).copied())
                .ok_or_else(|| Error::Probe(format!("no duration for {}", path.display())))
        }
    }

    #[test]
    fn test_track_license() {
        assert_eq!(track_license("https://licensebuttons.net/l/by-sa.png", ""), "by-sa");
        assert_eq!(track_license("img/cc-zero.large.png", ""), "cc-zero.large");
        assert_eq!(track_license("", "http://artlibre.org/licence/lal/en"), "http://artlibre.org/licence/lal/en");
        assert_eq!(track_license("img/", "url"), "url");
        assert_eq!(track_license(".png", "url"), ".png");
    }

    #[test]
    fn test_allowed_licenses() {
        assert!(is_allowed_license("by"));
        assert!(is_allowed_license("http://creativecommons.org/licenses/sampling+/1.0/"));
        assert!(!is_allowed_license("by-nc"));
    }

    #[test]
    fn test_fma_track_file() {
        assert_eq!(fma_track_file(Path::new("fma"), 2), PathBuf::from("fma/000/000002.mp3"));
        assert_eq!(fma_track_file(Path::new(""), 123456), PathBuf::from("123/123456.mp3"));
    }

    #[test]
    fn test_select_fma_tracks() {
        let dir = TempDir::new().unwrap();
        for file in ["000/000002.mp3", "001/001234.mp3", "000/000005.mp3", "000/000009.mp3"] {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"").unwrap();
        }
        let probe = NamedDurations(HashMap::from([
            ("000002.mp3", 30.5),
            ("001234.mp3", 10.0),
            ("000005.mp3", 9.99),
        ]));

        let raw = TrackTable::read(
            "\
track_id,license_image_file_large,license_url,track_title
2,http://x/by-sa.png,,One
3,http://x/by.png,,No file
1234,,http://artlibre.org/licence/lal/en,\"Two, too\"
5,http://x/by.png,,Short
7,http://x/by-nc.png,,Restricted
9,http://x/by.png,,Unmeasurable
"
            .as_bytes(),
        )
        .unwrap();

        let selected = select_fma_tracks(&raw, dir.path(), &probe).unwrap();
        let mut buffer = Vec::new();
        selected.write(&mut buffer).unwrap();

        let root = dir.path().display();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            format!(
                "track_id,license_image_file_large,license_url,track_title,track_file,track_duration\n\
                 000002,http://x/by-sa.png,,One,{root}/000/000002.mp3,30.5\n\
                 001234,,http://artlibre.org/licence/lal/en,\"Two, too\",{root}/001/001234.mp3,10.0\n"
            )
        );
    }

    #[test]
    fn test_select_rejects_bad_track_id() {
        let raw = TrackTable::read("track_id,license_image_file_large\nabc,by.png\n".as_bytes()).unwrap();
        let probe = NamedDurations(HashMap::new());
        assert!(matches!(
            select_fma_tracks(&raw, Path::new("fma"), &probe),
            Err(Error::InvalidInput(_))
        ));
    }
}
