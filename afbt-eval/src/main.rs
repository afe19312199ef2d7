//! afbt-eval - Evaluate matches against annotations
//!
//! Scores the matches reported by an audio matching solution against the
//! annotated ground truth and prints the result tables, or writes them to
//! a CSV file.
//!
//! **Usage:**
//! ```bash
//! afbt-eval -a annotations.csv -m matches.csv [-o results.csv] [-l files|seconds|all]
//! ```
//!
//! Every option falls back to its `AFBT_*` environment variable, then to the
//! TOML config file, then to the compiled default.

use afbt_common::config::{
    locate_config_file, read_toml_config, EvaluationSettings, SettingsOverrides, TomlConfig,
};
use afbt_common::loader::load_segments;
use afbt_eval::{init_tracing, run_evaluation, ReportSink};
use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing::{debug, info};

/// Match evaluation tool
#[derive(Parser, Debug)]
#[clap(name = "afbt-eval", version)]
#[clap(about = "Evaluate reported matches against annotations")]
struct Args {
    /// CSV file with the annotations (ground truth)
    #[clap(short = 'a', long, value_name = "FILE")]
    annotation_file: Option<PathBuf>,

    /// CSV file with the matches reported by the evaluated solution
    #[clap(short = 'm', long, value_name = "FILE")]
    matches_file: Option<PathBuf>,

    /// Write the result tables to this CSV file instead of stdout
    #[clap(short = 'o', long, value_name = "FILE")]
    output_csv_file: Option<PathBuf>,

    /// Evaluation level: files, seconds or all
    #[clap(short = 'l', long, value_name = "LEVEL")]
    level: Option<String>,

    /// TOML config file (default: <config dir>/afbt/config.toml)
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[clap(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Read before logging exists; the source is reported once it does
    let config_file = locate_config_file(args.config.as_deref());
    let toml = match &config_file {
        Some(path) => read_toml_config(path).context("Failed to load configuration")?,
        None => TomlConfig::default(),
    };
    let settings = EvaluationSettings::resolve(
        SettingsOverrides {
            annotation_file: args.annotation_file,
            matches_file: args.matches_file,
            output_csv_file: args.output_csv_file,
            level: args.level,
            log_level: args.log_level,
        },
        &toml,
    )
    .context("Invalid settings")?;

    init_tracing(&settings.log_level);

    info!("Starting AFBT match evaluation (afbt-eval) v{}", env!("CARGO_PKG_VERSION"));
    match &config_file {
        Some(path) => info!(path = %path.display(), "Loaded config file"),
        None => debug!("No config file, using defaults"),
    }
    info!(
        annotations = %settings.annotation_file.display(),
        matches = %settings.matches_file.display(),
        level = %settings.level,
        "Settings resolved"
    );

    let annotations = load_segments(&settings.annotation_file).with_context(|| {
        format!("Failed to load annotations from {}", settings.annotation_file.display())
    })?;
    let matches = load_segments(&settings.matches_file)
        .with_context(|| format!("Failed to load matches from {}", settings.matches_file.display()))?;

    match &settings.output_csv_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut sink = ReportSink::csv(BufWriter::new(file));
            run_evaluation(&annotations, &matches, settings.level, &mut sink)?;
            info!("Results written to {}", path.display());
        }
        None => {
            let mut sink = ReportSink::text(io::stdout().lock());
            run_evaluation(&annotations, &matches, settings.level, &mut sink)?;
        }
    }

    Ok(())
}
