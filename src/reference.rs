//! # Reference data repository
//!
//! Loads the reference tables the prefilter needs, chromosome lengths,
//! centromere bounds, and curated gain regions, from an on-disk data
//! repository. A repository holds one directory per genome build, each
//! with a `file_list.txt` index naming the build's table files:
//!
//! ```text
//! chrLen_filename  GRCh38_chrom_sizes.txt
//! centromere_filename  GRCh38_centromere.bed
//! conserved_regions_filename  GRCh38_conserved_gain.bed
//! ```
//!
//! All tables are loaded once per run and shared read-only across samples.
use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use log::{info, warn};

use crate::segment::GainRegion;

const CHROM_LENGTHS_KEY: &str = "chrLen_filename";
const CENTROMERES_KEY: &str = "centromere_filename";
const GAIN_REGIONS_KEY: &str = "conserved_regions_filename";

/// Parsed reference tables for one genome build. `centromeres` maps a
/// chromosome to its `(start, end)` centromere bounds, `gain_regions` to
/// its start-sorted curated gain intervals. Chromosomes may be missing
/// from `centromeres` and `gain_regions`, but every chromosome the
/// prefilter should consider must appear in `chrom_lengths`.
#[derive(Debug, Default)]
pub struct ReferenceData {
    pub chrom_lengths: HashMap<String, i64>,
    pub centromeres: HashMap<String, (i64, i64)>,
    pub gain_regions: HashMap<String, Vec<GainRegion>>,
}

impl ReferenceData {
    /// Load the reference tables for `build` from the data repository at
    /// `repo_root`. A missing build directory, index key, or table file is
    /// a fatal error: the prefilter cannot run without its reference
    /// tables.
    pub fn load(repo_root: &Path, build: &str) -> Result<Self> {
        let build_dir = repo_root.join(build);
        if !build_dir.is_dir() {
            bail!(
                "Genome build '{build}' not found in data repository {}",
                repo_root.display()
            );
        }
        let files = read_file_list(&build_dir.join("file_list.txt"))?;

        let chrom_lengths = read_chrom_lengths(&resolve(&build_dir, &files, CHROM_LENGTHS_KEY)?)?;
        let centromeres = read_centromeres(&resolve(&build_dir, &files, CENTROMERES_KEY)?)?;
        let gain_regions = read_gain_regions(&resolve(&build_dir, &files, GAIN_REGIONS_KEY)?)?;

        info!(
            "Loaded reference tables for {build}: {} chromosomes, {} centromeres, {} chromosomes with gain regions",
            chrom_lengths.len(),
            centromeres.len(),
            gain_regions.len()
        );
        Ok(Self {
            chrom_lengths,
            centromeres,
            gain_regions,
        })
    }
}

/// Read a `file_list.txt` index of whitespace-separated `key value` lines.
fn read_file_list(path: &Path) -> Result<HashMap<String, String>> {
    let file = File::open(path)
        .with_context(|| format!("Could not read data repository index {}", path.display()))?;

    let mut files = HashMap::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let mut fields = line.split_whitespace();
        if let (Some(key), Some(value)) = (fields.next(), fields.next()) {
            files.insert(key.to_string(), value.to_string());
        }
    }
    Ok(files)
}

/// Resolve `key` from the index to a path inside the build directory.
fn resolve(build_dir: &Path, files: &HashMap<String, String>, key: &str) -> Result<PathBuf> {
    let name = files.get(key).with_context(|| {
        format!(
            "Data repository index {} has no '{key}' entry",
            build_dir.join("file_list.txt").display()
        )
    })?;
    Ok(build_dir.join(name))
}

/// Read a `chrom length` table. Columns beyond the second are ignored.
fn read_chrom_lengths(path: &Path) -> Result<HashMap<String, i64>> {
    let file = File::open(path)
        .with_context(|| format!("Could not read chromosome length file {}", path.display()))?;

    let mut lengths = HashMap::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(chrom), Some(length)) = (fields.next(), fields.next()) else {
            bail!(
                "Malformed chromosome length record '{line}' in {}",
                path.display()
            );
        };
        let length = length.parse::<i64>().with_context(|| {
            format!(
                "Could not parse chromosome length '{length}' in {}",
                path.display()
            )
        })?;
        lengths.insert(chrom.to_string(), length);
    }
    if lengths.is_empty() {
        bail!("Chromosome length file {} holds no records", path.display());
    }
    Ok(lengths)
}

/// Read centromere bounds from a BED3+ file. Builds that list several
/// centromere records for one chromosome get the outermost bounds:
/// minimum start, maximum end.
fn read_centromeres(path: &Path) -> Result<HashMap<String, (i64, i64)>> {
    let file = File::open(path)
        .with_context(|| format!("Could not read centromere file {}", path.display()))?;

    let mut centromeres: HashMap<String, (i64, i64)> = HashMap::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (chrom, start, end) = parse_bed3(&line).with_context(|| {
            format!("Malformed centromere record '{line}' in {}", path.display())
        })?;
        centromeres
            .entry(chrom)
            .and_modify(|bounds| {
                bounds.0 = bounds.0.min(start);
                bounds.1 = bounds.1.max(end);
            })
            .or_insert((start, end));
    }
    Ok(centromeres)
}

/// Read curated gain regions from a BED3+ file into per-chromosome,
/// start-sorted vectors. Size 0 intervals are skipped with a warning.
fn read_gain_regions(path: &Path) -> Result<HashMap<String, Vec<GainRegion>>> {
    let file = File::open(path)
        .with_context(|| format!("Could not read gain region file {}", path.display()))?;

    let mut regions: HashMap<String, Vec<GainRegion>> = HashMap::new();
    let mut n_regions = 0;
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (chrom, start, end) = parse_bed3(&line).with_context(|| {
            format!("Malformed gain region record '{line}' in {}", path.display())
        })?;
        if end - start == 0 {
            warn!("Size 0 interval found. Skipping: {line}");
            continue;
        }
        regions
            .entry(chrom.clone())
            .or_default()
            .push(GainRegion { chrom, start, end });
        n_regions += 1;
    }
    for chrom_regions in regions.values_mut() {
        chrom_regions.sort_by_key(|region| (region.start, region.end));
    }

    info!("Read {n_regions} gain regions from {}", path.display());
    Ok(regions)
}

/// Parse the first three columns of a BED record.
fn parse_bed3(line: &str) -> Result<(String, i64, i64)> {
    let mut fields = line.split_whitespace();
    let (Some(chrom), Some(start), Some(end)) = (fields.next(), fields.next(), fields.next())
    else {
        bail!("expected at least 3 columns");
    };
    Ok((chrom.to_string(), start.parse()?, end.parse()?))
}
