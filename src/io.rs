//! # Segment file reading and writing
//!
//! Tab-delimited CNV segment files. Input records are
//! `chrom start end ... copy_number` with the copy number in the last
//! column and an inclusive end position, converted to the half-open
//! system at the parse boundary. Output records are
//! `chrom start end copy_number` with half-open coordinates.
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::{info, warn};

use crate::segment::CnvSegment;

/// Read CNV segments from the tab-delimited file at `path`. Records with
/// fewer than four columns, unparseable coordinates or copy numbers, or an
/// empty interval are skipped with a warning. Lines starting with `#` are
/// treated as comments.
pub fn read_segments(path: &Path) -> Result<Vec<CnvSegment>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .flexible(true)
        .comment(Some(b'#'))
        .from_path(path)
        .with_context(|| format!("Could not read segment file {}", path.display()))?;

    let mut segments = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("Failed to read record in {}", path.display()))?;
        match parse_segment_record(&record) {
            Some(segment) => segments.push(segment),
            None => {
                let line = record.iter().collect::<Vec<&str>>().join("\t");
                warn!(
                    "Skipping malformed or empty segment record '{line}' in {}",
                    path.display()
                );
            }
        }
    }

    info!("Read {} segments from {}", segments.len(), path.display());
    Ok(segments)
}

/// Parse one segment record, converting the inclusive end position to the
/// half-open system. The copy number is taken from the last column, so
/// caller-specific annotation columns in between are tolerated.
fn parse_segment_record(record: &StringRecord) -> Option<CnvSegment> {
    if record.len() < 4 {
        return None;
    }
    let chrom = record.get(0)?;
    let start = record.get(1)?.parse::<i64>().ok()?;
    let end = record.get(2)?.parse::<i64>().ok()? + 1;
    let copy_number = record.get(record.len() - 1)?.parse::<f64>().ok()?;
    if end <= start {
        return None;
    }
    Some(CnvSegment::new(chrom, start, end, copy_number))
}

/// Write `segments` as tab-delimited `chrom start end copy_number` records
/// to `path`.
pub fn write_segments(path: &Path, segments: &[CnvSegment]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("Could not create output file {}", path.display()))?;

    for segment in segments {
        writer
            .serialize(segment)
            .with_context(|| format!("Failed to write record for {}", segment.region_s()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush output file {}", path.display()))?;
    Ok(())
}
