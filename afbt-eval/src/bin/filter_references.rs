//! afbt-filter-references - Non-matching reference track list
//!
//! Removes every track taking part in a known match from a track list,
//! most-matched tracks first, and writes the remaining tracks sorted by id.
//!
//! **Usage:**
//! ```bash
//! afbt-filter-references tracks.csv non_matching.csv -m annotations.csv
//! ```

use afbt_common::loader::load_segments;
use afbt_common::reference_filter::{filter_non_matching, MatchGraph};
use afbt_common::TrackTable;
use afbt_eval::init_tracing;
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

/// Reference track filter
#[derive(Parser, Debug)]
#[clap(name = "afbt-filter-references", version)]
#[clap(about = "Prepare the list of non-matching reference tracks")]
struct Args {
    /// File name of the input track list
    input: PathBuf,

    /// File name for the output track list
    output: PathBuf,

    /// CSV file with the track matches (query_id, reference_id)
    #[clap(short = 'm', long, value_name = "CSV")]
    matches: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[clap(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let tracks = TrackTable::load(&args.input)
        .with_context(|| format!("Failed to load tracks from {}", args.input.display()))?;
    let matches = load_segments(&args.matches)
        .with_context(|| format!("Failed to load matches from {}", args.matches.display()))?;

    let kept = filter_non_matching(&tracks, MatchGraph::from_pairs(&matches))?;
    if kept.is_empty() {
        bail!("No suitable input tracks exist!");
    }

    let output = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    kept.write(BufWriter::new(output))?;
    info!("Wrote {} track(s) to {}", kept.len(), args.output.display());

    Ok(())
}
