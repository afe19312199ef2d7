//! afbt-symlink-references - Reference audio packaging
//!
//! Creates symbolic links to the track files of every reference used by the
//! annotations, so the references can be packaged with the queries.
//!
//! **Usage:**
//! ```bash
//! afbt-symlink-references tracks.csv [more_tracks.csv ...] -a annotations.csv -r references
//! ```

use afbt_common::loader::load_segments;
use afbt_common::reference_links::{link_references, referenced_ids, track_files};
use afbt_common::TrackTable;
use afbt_eval::init_tracing;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Reference linker
#[derive(Parser, Debug)]
#[clap(name = "afbt-symlink-references", version)]
#[clap(about = "Symlink the reference audio files used by the annotations")]
struct Args {
    /// CSV file(s) with the track list
    #[clap(required = true)]
    track_lists: Vec<PathBuf>,

    /// Annotations of the generated queries
    #[clap(short = 'a', long, value_name = "CSV", default_value = "annotations.csv")]
    annotation_file: PathBuf,

    /// Directory for the symlinked reference audios
    #[clap(short = 'r', long, value_name = "DIR", default_value = "references")]
    reference_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[clap(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let tables = args
        .track_lists
        .iter()
        .map(|path| {
            TrackTable::load(path).with_context(|| format!("Failed to load tracks from {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    let tracks = track_files(&tables)?;

    let annotations = load_segments(&args.annotation_file).with_context(|| {
        format!("Failed to load annotations from {}", args.annotation_file.display())
    })?;
    let references = referenced_ids(&annotations);
    info!("Linking {} reference(s)", references.len());

    link_references(&references, &tracks, &args.reference_dir)
        .with_context(|| format!("Failed to link references into {}", args.reference_dir.display()))?;

    Ok(())
}
