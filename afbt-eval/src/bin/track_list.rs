//! afbt-track-list - Reference track list generator
//!
//! Probes the duration of every given media file and writes the
//! `track_id,track_file,track_duration` list used by the query generator.
//!
//! **Usage:**
//! ```bash
//! afbt-track-list -o tracks.csv audio/*.mp3
//! afbt-track-list -o tracks.csv --input files.txt
//! ```

use afbt_common::media::FfprobeProbe;
use afbt_common::track_list::{build_track_list, read_file_list, write_track_list};
use afbt_eval::init_tracing;
use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use tracing::info;

/// Track list generator
#[derive(Parser, Debug)]
#[clap(name = "afbt-track-list", version)]
#[clap(about = "Prepare the reference track list from a set of media files")]
struct Args {
    /// Track file name(s)
    tracks: Vec<PathBuf>,

    /// File with the input list of media files, one per line
    #[clap(short = 'i', long, value_name = "LIST")]
    input: Option<PathBuf>,

    /// File name for the output CSV
    #[clap(short = 'o', long, value_name = "CSV")]
    output: PathBuf,

    /// ffprobe binary to use
    #[clap(long, value_name = "PATH", default_value = "ffprobe")]
    ffprobe: String,

    /// Log level (trace, debug, info, warn, error)
    #[clap(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.input.is_none() && args.tracks.is_empty() {
        Args::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "Track file name(s) or --input LIST must be specified",
            )
            .exit();
    }

    init_tracing(&args.log_level);

    let mut files = args.tracks;
    if let Some(list) = &args.input {
        let reader = File::open(list).with_context(|| format!("Failed to open {}", list.display()))?;
        files.extend(read_file_list(BufReader::new(reader))?);
    }
    info!("Probing {} media file(s)", files.len());

    let tracks = build_track_list(&files, &FfprobeProbe::new(args.ffprobe));

    let output = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    write_track_list(&tracks, BufWriter::new(output))?;
    info!("Wrote {} track(s) to {}", tracks.len(), args.output.display());

    Ok(())
}
