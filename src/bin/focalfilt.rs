use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use focalfilt::{cli::Cli, reference::ReferenceData};
use log::info;
use rayon::{prelude::*, ThreadPoolBuilder};

fn main() -> Result<()> {
    // Initialize the logger. If the log level is not set via `RUST_LOG`, set it to 'info' by default
    Builder::from_env(Env::default().default_filter_or("info")).init();

    // parse command line and load reference tables for the requested build
    let config = Cli::parse();
    let data_repo = config.resolve_data_repo()?;
    let reference = ReferenceData::load(&data_repo, &config.reference)?;

    fs::create_dir_all(&config.outdir).with_context(|| {
        format!(
            "Could not create output directory {}",
            config.outdir.display()
        )
    })?;

    ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build_global()?;

    info!("Prefiltering {} segment file(s)", config.segments.len());
    let outputs: Result<Vec<_>> = config
        .segments
        .par_iter()
        .map(|segments| {
            // Main work happens in this parallel iterator
            focalfilt::run(segments, &reference, config.cngain, &config.outdir)
        })
        .collect();

    for out_path in outputs? {
        info!("Prefiltered segments written to {}", out_path.display());
    }

    Ok(())
}
