//! # Structs to represent copy-number calls and reference regions
//!
//! Module containing the records that flow through the prefilter.
//! [`CnvSegment`] is a single copy-number call produced by an upstream
//! caller, [`GainRegion`] is a curated reference interval that is prone to
//! recurrent or artifactual copy gain.
use serde::Serialize;

/// `CnvSegment` represents a single copy-number call on a chromosome.
/// `start` and `end` follow the 0-based half-open coordinate system:
/// `[start, end)`. Segment files carry inclusive end positions, the reader
/// converts them at the parse boundary (see [`crate::io::read_segments`]).
/// `copy_number` is the estimated absolute copy number of the interval, a
/// non-negative real value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CnvSegment {
    pub chrom: String,
    pub start: i64,
    pub end: i64,
    pub copy_number: f64,
}

impl CnvSegment {
    pub fn new(chrom: &str, start: i64, end: i64, copy_number: f64) -> Self {
        Self {
            chrom: chrom.to_string(),
            start,
            end,
            copy_number,
        }
    }
    /// Genomic span of the segment in bases.
    pub fn len(&self) -> i64 {
        self.end - self.start
    }
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
    /// Midpoint of the segment, rounded down.
    pub fn midpoint(&self) -> i64 {
        (self.start + self.end) / 2
    }
    pub fn region_s(&self) -> String {
        format!("{}:{}-{}", self.chrom, self.start, self.end)
    }
}

/// A curated reference interval known to attract recurrent or artifactual
/// copy gain. Gain regions are loaded once per run and are only ever used
/// to slice retained segments at their boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct GainRegion {
    pub chrom: String,
    pub start: i64,
    pub end: i64,
}
