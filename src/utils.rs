//! # Utility functions
//!
//! Miscellaneous helper functions shared across the `focalfilt` library.
use std::{
    cmp,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};

/// Determine the overlap between two half-open ranges `[a_start, a_end)`
/// and `[b_start, b_end)`. Ranges that do not overlap have an overlap of 0.
///
/// # Examples
///
/// ```
/// let overlap = focalfilt::utils::range_overlap(10, 16, 13, 26).unwrap();
/// assert_eq!(3, overlap);
///
/// let overlap = focalfilt::utils::range_overlap(10, 16, 16, 26).unwrap();
/// assert_eq!(0, overlap);
/// ```
pub fn range_overlap(a_start: i64, a_end: i64, b_start: i64, b_end: i64) -> Result<i64> {
    if (a_start > a_end) | (b_start > b_end) {
        bail!("a or b range not correctly specified")
    }
    Ok(cmp::max(0, cmp::min(a_end, b_end) - cmp::max(a_start, b_start)))
}

/// Derive the output path for a prefiltered segment file: the input file
/// name truncated at the first `.bed` occurrence, with a
/// `_pre_filtered.bed` suffix, placed in `outdir`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// let out = focalfilt::utils::prefiltered_bed_path(
///     Path::new("calls/sample_cnvs.bed"),
///     Path::new("out"),
/// )
/// .unwrap();
/// assert_eq!(Path::new("out/sample_cnvs_pre_filtered.bed"), out.as_path());
/// ```
pub fn prefiltered_bed_path(segments: &Path, outdir: &Path) -> Result<PathBuf> {
    let context = || {
        format!(
            "Could not derive an output name from path {}",
            segments.display()
        )
    };
    let name = segments
        .file_name()
        .with_context(context)?
        .to_str()
        .with_context(context)?;
    let stem = name.split(".bed").next().unwrap_or(name);

    Ok(outdir.join(format!("{stem}_pre_filtered.bed")))
}
