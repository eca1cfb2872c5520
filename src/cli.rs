//! # Command line interface for `focalfilt`
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

/// Environment variable consulted for the data repository root when
/// `--data-repo` is not given.
pub const DATA_REPO_ENV: &str = "FOCALFILT_DATA_REPO";

#[derive(Parser)]
#[command(
    name = "focalfilt",
    author,
    version,
    about = "Arm-aware prefiltering of copy number segment calls",
    long_about = None
)]
pub struct Cli {
    /// Segment call files to prefilter. Expected format is tab-delimited BED3+ with an inclusive end position and the copy number in the last column. Each file is processed independently
    #[arg(short, long, num_args = 1.., required = true)]
    pub segments: Vec<PathBuf>,

    /// Genome build to load reference tables for (e.g. GRCh38). Must name a directory inside the data repository
    #[arg(short, long)]
    pub reference: String,

    /// Data repository root holding the per-build reference tables. Falls back to the FOCALFILT_DATA_REPO environment variable
    #[arg(long)]
    pub data_repo: Option<PathBuf>,

    /// Base copy number gain threshold. Segments are retained if their copy number exceeds the arm median by more than this margin (minus the diploid baseline); the margin is scaled by 1.5 for segments over 5 Mbp
    #[arg(long, default_value_t = 4.5)]
    pub cngain: f64,

    /// Directory to write prefiltered segment files to
    #[arg(short, long, default_value = ".")]
    pub outdir: PathBuf,

    /// Number of threads to use. Segment files are processed in parallel
    #[arg(long, default_value_t = 1, value_parser = threads_in_range)]
    pub threads: usize,
}

impl Cli {
    /// Resolve the data repository root from `--data-repo`, falling back
    /// to the `FOCALFILT_DATA_REPO` environment variable.
    pub fn resolve_data_repo(&self) -> Result<PathBuf> {
        if let Some(path) = &self.data_repo {
            return Ok(path.clone());
        }
        match std::env::var(DATA_REPO_ENV) {
            Ok(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => bail!("No data repository given. Pass --data-repo or set {DATA_REPO_ENV}"),
        }
    }
}

fn threads_in_range(s: &str) -> Result<usize> {
    let threads = s
        .parse()
        .context("Could not parse value passed to --threads to integer")?;
    if threads < 1 {
        bail!("--threads must be at least 1");
    }
    Ok(threads)
}
