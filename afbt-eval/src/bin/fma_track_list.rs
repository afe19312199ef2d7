//! afbt-fma-track-list - Reference track list from the FMA dataset
//!
//! Reads `fma_metadata/raw_tracks.csv`, keeps the freely licensed tracks
//! whose audio is present and at least 10 s long, and writes them as a
//! track list.
//!
//! **Usage:**
//! ```bash
//! afbt-fma-track-list fma_metadata/raw_tracks.csv tracks.csv -f fma_full
//! ```

use afbt_common::fma::select_fma_tracks;
use afbt_common::media::FfprobeProbe;
use afbt_common::TrackTable;
use afbt_eval::init_tracing;
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

/// FMA track list generator
#[derive(Parser, Debug)]
#[clap(name = "afbt-fma-track-list", version)]
#[clap(about = "Prepare the reference track list from the FMA dataset")]
struct Args {
    /// File name of the input list (fma_metadata/raw_tracks.csv)
    input: PathBuf,

    /// File name for the output list
    output: PathBuf,

    /// Path to the FMA dataset track files
    #[clap(short = 'f', long, value_name = "DIR", default_value = "")]
    fma_path: PathBuf,

    /// ffprobe binary to use
    #[clap(long, value_name = "PATH", default_value = "ffprobe")]
    ffprobe: String,

    /// Log level (trace, debug, info, warn, error)
    #[clap(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let raw = TrackTable::load(&args.input)
        .with_context(|| format!("Failed to load FMA metadata from {}", args.input.display()))?;

    let selected = select_fma_tracks(&raw, &args.fma_path, &FfprobeProbe::new(args.ffprobe))?;
    if selected.is_empty() {
        bail!("No suitable input tracks exist!");
    }

    let output = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    selected.write(BufWriter::new(output))?;
    info!("Wrote {} track(s) to {}", selected.len(), args.output.display());

    Ok(())
}
