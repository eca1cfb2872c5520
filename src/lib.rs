//! # FocalFilt
//!
//! This library serves as the backbone for the `focalfilt` binary, which
//! prefilters copy-number variant (CNV) segment calls before focal
//! amplification analysis. Segment calls are judged against the ploidy of
//! the chromosome arm they sit on rather than against a genome-wide
//! baseline, so whole-arm gains do not drown out focal events. Retained
//! segments are sliced at the boundaries of curated gain regions to hand
//! downstream tools boundary-aligned intervals.
pub mod arms;
pub mod cli;
pub mod intervals;
pub mod io;
pub mod prefilter;
pub mod reference;
pub mod segment;
pub mod utils;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::reference::ReferenceData;

/// The main work of `focalfilt` happens in this `run` function.
/// It processes a single sample's segment file and is meant to be called
/// from inside a rayon parallel iterator when several files are given,
/// with `reference` shared read-only between threads. Segments are read
/// from `segments_path`, prefiltered against the per-arm baselines with
/// the `cngain` base margin, and the survivors are written to `outdir`.
/// Returns the path of the written file.
pub fn run(
    segments_path: &Path,
    reference: &ReferenceData,
    cngain: f64,
    outdir: &Path,
) -> Result<PathBuf> {
    let segments = io::read_segments(segments_path)?;
    let filtered = prefilter::prefilter_segments(segments, reference, cngain);

    let out_path = utils::prefiltered_bed_path(segments_path, outdir)?;
    io::write_segments(&out_path, &filtered).with_context(|| {
        format!(
            "Could not write prefiltered segments for {}",
            segments_path.display()
        )
    })?;
    info!("Wrote {} segments to {}", filtered.len(), out_path.display());

    Ok(out_path)
}
