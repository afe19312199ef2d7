//! Track list tool tests over files on disk

use afbt_common::loader::load_segments;
use afbt_common::reference_filter::{filter_non_matching, MatchGraph};
use afbt_common::reference_links::{link_references, referenced_ids, track_files};
use afbt_common::TrackTable;
use std::fs;
use tempfile::TempDir;

const TRACKS: &str = "\
track_id,track_file,track_duration
q1,queries/q1.mp3,30.0
q2,queries/q2.mp3,30.0
r1,refs/001/001000.mp3,200.0
r2,refs/001/001001.mp3,180.5
r3,refs/001/001002.mp3,95.25
";

const ANNOTATIONS: &str = "\
query_id,reference_id,query_begin,query_end,reference_begin,reference_end
q1,r1,0,10,50,60
q2,r1,0,10,70,80
q2,r2,10,20,0,10
";

#[test]
fn test_filter_non_matching_files() {
    let dir = TempDir::new().unwrap();
    let tracks_file = dir.path().join("tracks.csv");
    let annotation_file = dir.path().join("annotations.csv");
    fs::write(&tracks_file, TRACKS).unwrap();
    fs::write(&annotation_file, ANNOTATIONS).unwrap();

    let tracks = TrackTable::load(&tracks_file).unwrap();
    let matches = load_segments(&annotation_file).unwrap();
    let kept = filter_non_matching(&tracks, MatchGraph::from_pairs(&matches)).unwrap();

    // q2 and r1 tie with two links; q2 goes first, then q1 of the q1-r1 tie
    let output = dir.path().join("non_matching.csv");
    kept.write(fs::File::create(&output).unwrap()).unwrap();
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "track_id,track_file,track_duration\nr1,refs/001/001000.mp3,200.0\nr2,refs/001/001001.mp3,180.5\nr3,refs/001/001002.mp3,95.25\n"
    );
}

#[cfg(unix)]
#[test]
fn test_symlink_referenced_tracks() {
    let dir = TempDir::new().unwrap();
    let mut tracks = String::from("track_id,track_file\n");
    for (id, name) in [("r1", "001000"), ("r2", "001001"), ("r3", "001002")] {
        let file = dir.path().join("fma").join("001").join(format!("{}.mp3", name));
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, id).unwrap();
        tracks.push_str(&format!("{},{}\n", id, file.display()));
    }
    let annotation_file = dir.path().join("annotations.csv");
    fs::write(&annotation_file, ANNOTATIONS).unwrap();

    let tables = vec![TrackTable::read(tracks.as_bytes()).unwrap()];
    let references = referenced_ids(&load_segments(&annotation_file).unwrap());
    let reference_dir = dir.path().join("references");
    let links = link_references(&references, &track_files(&tables).unwrap(), &reference_dir).unwrap();

    assert_eq!(links.len(), 2);
    assert_eq!(fs::read_to_string(reference_dir.join("001").join("001001.mp3")).unwrap(), "r2");
    assert!(!reference_dir.join("001").join("001002.mp3").exists());
}
