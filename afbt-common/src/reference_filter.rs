//! Non-matching reference selection
//!
//! **Purpose:** Drop every track that takes part in a known match so that
//! the remaining tracks can serve as references no query is expected to
//! find.
//!
//! Matches form an undirected graph over track ids. Tracks are removed
//! greedily, the one with the most remaining links first, until no link is
//! left. This keeps more tracks than dropping both sides of every match.

use crate::fields;
use crate::segment::{SegmentMap, SegmentRow};
use crate::track_table::TrackTable;
use crate::Result;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, info};

/// Links between tracks that match each other
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchGraph {
    links: BTreeMap<String, BTreeSet<String>>,
}

impl MatchGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph of the (query, reference) pairs of an annotation or match file
    pub fn from_pairs(pairs: &SegmentMap<SegmentRow>) -> Self {
        let mut graph = Self::new();
        for key in pairs.keys() {
            graph.link(&key.query_id, &key.reference_id);
        }
        graph
    }

    /// Link two tracks both ways; a track matching itself adds nothing
    pub fn link(&mut self, a: &str, b: &str) {
        if a == b {
            return;
        }
        self.links.entry(a.to_string()).or_default().insert(b.to_string());
        self.links.entry(b.to_string()).or_default().insert(a.to_string());
    }

    /// Tracks with at least one link
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Number of tracks linked to `id`
    pub fn degree(&self, id: &str) -> usize {
        self.links.get(id).map_or(0, BTreeSet::len)
    }

    /// Remove the track with the most links and return its id
    ///
    /// Ties go to the smallest id. Neighbours left without links leave the
    /// graph with it.
    pub fn remove_most_linked(&mut self) -> Option<String> {
        let mut selected: Option<(&String, usize)> = None;
        for (id, linked) in &self.links {
            if selected.map_or(true, |(_, degree)| linked.len() > degree) {
                selected = Some((id, linked.len()));
            }
        }
        let id = selected.map(|(id, _)| id.clone())?;

        let linked = self.links.remove(&id).unwrap_or_default();
        for other in &linked {
            let now_isolated = match self.links.get_mut(other) {
                Some(others) => {
                    others.remove(&id);
                    others.is_empty()
                }
                None => false,
            };
            if now_isolated {
                self.links.remove(other);
            }
        }

        debug!(track_id = %id, links = linked.len(), "Removed matching track");
        Some(id)
    }

    /// Remove tracks until no link is left, returning them in removal order
    pub fn remove_all_links(&mut self) -> Vec<String> {
        std::iter::from_fn(|| self.remove_most_linked()).collect()
    }
}

/// Tracks of `tracks` that keep no match once `graph` is resolved
///
/// The result is keyed by track id: rows sharing an id collapse to the last
/// one, and rows come out sorted by id with the input columns.
pub fn filter_non_matching(tracks: &TrackTable, mut graph: MatchGraph) -> Result<TrackTable> {
    let id_column = tracks.require_column(fields::TRACK_ID)?;

    let removed: HashSet<String> = graph.remove_all_links().into_iter().collect();

    let mut by_id = BTreeMap::new();
    for row in tracks.rows() {
        let track_id = row.get(id_column).unwrap_or_default();
        by_id.insert(track_id.to_string(), row.clone());
    }

    let mut kept = TrackTable::new(tracks.headers());
    for (track_id, row) in by_id {
        if !removed.contains(&track_id) {
            kept.push(row);
        }
    }

    info!(
        tracks = tracks.len(),
        removed = removed.len(),
        kept = kept.len(),
        "Filtered matching tracks"
    );
    Ok(kept)
}
