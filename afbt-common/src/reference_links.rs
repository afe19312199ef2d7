//! Reference packaging with symbolic links
//!
//! **Purpose:** Collect the reference tracks used by a set of annotations
//! into one directory of symbolic links, ready to be packaged with the
//! generated queries.
//!
//! Tracks stored in numbered directories (`000/000123.mp3`) keep that
//! directory level below the reference directory. Relative track paths
//! become links relative to the directory holding the link.

use crate::fields;
use crate::segment::{SegmentMap, SegmentRow};
use crate::track_table::TrackTable;
use crate::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Reference ids used by the annotations
pub fn referenced_ids(annotations: &SegmentMap<SegmentRow>) -> BTreeSet<String> {
    annotations.keys().map(|key| key.reference_id.clone()).collect()
}

/// Track files keyed by track id; later tables override earlier ones
pub fn track_files(tables: &[TrackTable]) -> Result<BTreeMap<String, PathBuf>> {
    let mut files = BTreeMap::new();
    for table in tables {
        let id_column = table.require_column(fields::TRACK_ID)?;
        let file_column = table.require_column(fields::TRACK_FILE)?;
        for row in table.rows() {
            let track_id = row.get(id_column).unwrap_or_default();
            let track_file = row.get(file_column).unwrap_or_default();
            files.insert(track_id.to_string(), PathBuf::from(track_file));
        }
    }
    Ok(files)
}

/// One symbolic link to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceLink {
    /// Directory holding the link
    pub target_dir: PathBuf,
    /// Path of the link itself
    pub link: PathBuf,
    /// What the link points to
    pub source: PathBuf,
}

impl ReferenceLink {
    /// Plan the link of `track_file` below `reference_dir`
    ///
    /// `cwd` anchors relative paths when computing the link source.
    pub fn plan(track_file: &Path, reference_dir: &Path, cwd: &Path) -> Result<Self> {
        let file_name = track_file.file_name().ok_or_else(|| {
            Error::InvalidInput(format!("Track file '{}' has no file name", track_file.display()))
        })?;

        let subdir = track_file
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .filter(|name| is_numeric(name));
        let target_dir = match subdir {
            Some(subdir) => reference_dir.join(subdir),
            None => reference_dir.to_path_buf(),
        };

        let source = if track_file.is_absolute() {
            track_file.to_path_buf()
        } else {
            relative_path(&absolute(track_file, cwd), &absolute(&target_dir, cwd))
        };

        Ok(Self {
            link: target_dir.join(file_name),
            target_dir,
            source,
        })
    }

    /// Create the target directory and the link
    pub fn create(&self) -> Result<()> {
        fs::create_dir_all(&self.target_dir)?;
        symlink(&self.source, &self.link)?;
        debug!(link = %self.link.display(), source = %self.source.display(), "Linked reference");
        Ok(())
    }
}

/// Link the track file of every reference into `reference_dir`
///
/// Every reference must be in `tracks`.
pub fn link_references(
    references: &BTreeSet<String>,
    tracks: &BTreeMap<String, PathBuf>,
    reference_dir: &Path,
) -> Result<Vec<ReferenceLink>> {
    let cwd = std::env::current_dir()?;

    let mut links = Vec::with_capacity(references.len());
    for reference in references {
        let track_file = tracks.get(reference).ok_or_else(|| {
            Error::InvalidInput(format!("Reference '{}' is not in the track lists", reference))
        })?;
        let link = ReferenceLink::plan(track_file, reference_dir, &cwd)?;
        link.create()?;
        links.push(link);
    }

    info!(links = links.len(), dir = %reference_dir.display(), "Linked reference tracks");
    Ok(links)
}

fn is_numeric(name: &str) -> bool {
    !name.is_empty() && name.chars().all(char::is_numeric)
}

/// `path` made absolute against `cwd`, with `.` and `..` resolved lexically
fn absolute(path: &Path, cwd: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in cwd.join(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

/// Path leading from directory `base` to `path`; both absolute
fn relative_path(path: &Path, base: &Path) -> PathBuf {
    let path: Vec<Component> = path.components().collect();
    let base: Vec<Component> = base.components().collect();
    let common = path.iter().zip(&base).take_while(|(a, b)| a == b).count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &path[common..] {
        relative.push(component.as_os_str());
    }
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    relative
}

#[cfg(unix)]
fn symlink(source: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, link)
}

#[cfg(windows)]
fn symlink(source: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(source, link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::read_segments;
    use tempfile::TempDir;

    fn plan(track_file: &str, reference_dir: &str) -> ReferenceLink {
        ReferenceLink::plan(Path::new(track_file), Path::new(reference_dir), Path::new("/work/pkg")).unwrap()
    }

    #[test]
    fn test_numbered_directory_kept() {
        let link = plan("fma/012/012345.mp3", "references");
        assert_eq!(link.target_dir, PathBuf::from("references/012"));
        assert_eq!(link.link, PathBuf::from("references/012/012345.mp3"));
        assert_eq!(link.source, PathBuf::from("../../fma/012/012345.mp3"));
    }

    #[test]
    fn test_named_directory_flattened() {
        let link = plan("audio/rock/song.mp3", "references");
        assert_eq!(link.target_dir, PathBuf::from("references"));
        assert_eq!(link.source, PathBuf::from("../audio/rock/song.mp3"));
    }

    #[test]
    fn test_absolute_track_file_used_as_is() {
        let link = plan("/data/123/a.mp3", "references");
        assert_eq!(link.target_dir, PathBuf::from("references/123"));
        assert_eq!(link.source, PathBuf::from("/data/123/a.mp3"));
    }

    #[test]
    fn test_reference_dir_outside_cwd() {
        let link = plan("./audio/a.mp3", "../out");
        assert_eq!(link.source, PathBuf::from("../pkg/audio/a.mp3"));
    }

    #[test]
    fn test_track_file_without_name() {
        assert!(ReferenceLink::plan(Path::new(".."), Path::new("r"), Path::new("/w")).is_err());
    }

    #[test]
    fn test_referenced_ids_and_track_files() {
        let annotations = read_segments("query_id,reference_id\nq1,r2\nq2,r1\nq3,r1\n".as_bytes()).unwrap();
        let ids: Vec<String> = referenced_ids(&annotations).into_iter().collect();
        assert_eq!(ids, vec!["r1", "r2"]);

        let first = TrackTable::read("track_id,track_file\nr1,old.mp3\n".as_bytes()).unwrap();
        let second = TrackTable::read("track_file,track_id\nnew.mp3,r1\n".as_bytes()).unwrap();
        let files = track_files(&[first, second]).unwrap();
        assert_eq!(files["r1"], PathBuf::from("new.mp3"));
    }

    #[test]
    fn test_missing_reference_is_error() {
        let dir = TempDir::new().unwrap();
        let references = BTreeSet::from(["r1".to_string()]);
        let result = link_references(&references, &BTreeMap::new(), dir.path());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_link_references_creates_links() {
        let dir = TempDir::new().unwrap();
        let track_file = dir.path().join("fma").join("000").join("000007.mp3");
        fs::create_dir_all(track_file.parent().unwrap()).unwrap();
        fs::write(&track_file, b"mp3").unwrap();

        let references = BTreeSet::from(["000007".to_string()]);
        let tracks = BTreeMap::from([("000007".to_string(), track_file.clone())]);
        let reference_dir = dir.path().join("references");
        let links = link_references(&references, &tracks, &reference_dir).unwrap();

        let link = reference_dir.join("000").join("000007.mp3");
        assert_eq!(links[0].link, link);
        assert_eq!(fs::read_link(&link).unwrap(), track_file);
        assert_eq!(fs::read(&link).unwrap(), b"mp3");
    }
}
