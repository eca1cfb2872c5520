//! # Chromosome arm partition and per-arm aggregation
//!
//! Partitions a genome into chromosome arms from centromere coordinates
//! and assigns copy-number segments to the arms they belong to. Arms are
//! the unit the prefilter estimates its baseline ploidy over.
use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};

use crate::{
    intervals::{Interval, IntervalSet},
    segment::CnvSegment,
    utils,
};

/// Per-chromosome arm intervals. Chromosomes with a centromere record get
/// two arms: `[0, centromere_start)` labeled `<chrom>p` and
/// `[centromere_end, chrom_length)` labeled `<chrom>q`. The centromere
/// span itself belongs to no arm. Chromosomes without a centromere record
/// (mitochondrial or viral contigs) get a single region spanning the whole
/// contig, labeled with the bare chromosome name.
#[derive(Debug, Default)]
pub struct GenomeArms {
    arms: HashMap<String, IntervalSet<String>>,
}

impl GenomeArms {
    /// Build the arm partition from chromosome lengths and centromere
    /// bounds. Arms that would be empty (centromere starting at 0 or
    /// running to the end of the chromosome) are left out of the
    /// partition.
    pub fn from_reference(
        chrom_lengths: &HashMap<String, i64>,
        centromeres: &HashMap<String, (i64, i64)>,
    ) -> Self {
        let mut arms: HashMap<String, IntervalSet<String>> = HashMap::new();
        for (chrom, &length) in chrom_lengths {
            let set = arms.entry(chrom.clone()).or_default();
            match centromeres.get(chrom) {
                Some(&(cent_start, cent_end)) => {
                    if cent_start > 0 {
                        set.insert(0, cent_start, format!("{chrom}p"));
                    } else {
                        debug!("p arm of {chrom} is empty, not included in the partition");
                    }
                    if cent_end < length {
                        set.insert(cent_end, length, format!("{chrom}q"));
                    } else {
                        debug!("q arm of {chrom} is empty, not included in the partition");
                    }
                }
                None => set.insert(0, length, chrom.clone()),
            }
        }
        Self { arms }
    }

    /// Find the arm `segment` belongs to: first the arm containing the
    /// segment midpoint, then, if the midpoint falls outside every arm
    /// (e.g. inside the centromere span), the arm with the largest overlap
    /// with the whole segment. Equal overlaps are broken towards the
    /// lexicographically smallest arm label, so assignment does not depend
    /// on map iteration order.
    pub fn find_arm(&self, segment: &CnvSegment) -> Option<&Interval<String>> {
        let set = self.arms.get(&segment.chrom)?;
        if let Some(arm) = set.query_point(segment.midpoint()).into_iter().next() {
            return Some(arm);
        }

        let mut hits = set.query_range(segment.start, segment.end);
        hits.sort_by(|a, b| {
            let overlap_a =
                utils::range_overlap(segment.start, segment.end, a.start, a.end).unwrap_or(0);
            let overlap_b =
                utils::range_overlap(segment.start, segment.end, b.start, b.end).unwrap_or(0);
            overlap_b.cmp(&overlap_a).then_with(|| a.data.cmp(&b.data))
        });
        hits.into_iter().next()
    }

    /// Arm intervals for `chrom`, if the chromosome is part of the
    /// partition.
    pub fn chrom_arms(&self, chrom: &str) -> Option<&IntervalSet<String>> {
        self.arms.get(chrom)
    }
}

/// The segments assigned to one chromosome arm, along with the arm's
/// region length in bases.
#[derive(Debug, Default)]
pub struct ArmCalls {
    pub segments: Vec<CnvSegment>,
    pub arm_len: i64,
}

/// Assign each segment to exactly one chromosome arm. Segments that match
/// no arm, because they sit on an unknown contig or entirely inside a
/// centromere span, are skipped with a warning and take no further part in
/// the run. The returned map iterates arms in lexicographic label order.
pub fn assign_to_arms(segments: Vec<CnvSegment>, arms: &GenomeArms) -> BTreeMap<String, ArmCalls> {
    let mut arm_calls: BTreeMap<String, ArmCalls> = BTreeMap::new();
    for segment in segments {
        let Some(arm) = arms.find_arm(&segment) else {
            warn!(
                "Could not match {} to a chromosome arm, skipping segment",
                segment.region_s()
            );
            continue;
        };
        let calls = arm_calls.entry(arm.data.clone()).or_default();
        calls.arm_len = arm.len();
        calls.segments.push(segment);
    }
    arm_calls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> (HashMap<String, i64>, HashMap<String, (i64, i64)>) {
        let chrom_lengths = HashMap::from([
            ("chr1".to_string(), 1000i64),
            ("chrM".to_string(), 50i64),
        ]);
        let centromeres = HashMap::from([("chr1".to_string(), (400i64, 600i64))]);
        (chrom_lengths, centromeres)
    }

    #[test]
    fn partition_splits_at_centromere() {
        let (lengths, centromeres) = reference();
        let arms = GenomeArms::from_reference(&lengths, &centromeres);

        let chr1 = arms.chrom_arms("chr1").unwrap();
        let labeled: Vec<(i64, i64, &str)> = chr1
            .iter()
            .map(|iv| (iv.start, iv.end, iv.data.as_str()))
            .collect();
        assert_eq!(vec![(0, 400, "chr1p"), (600, 1000, "chr1q")], labeled);
    }

    #[test]
    fn partition_without_centromere_is_whole_contig() {
        let (lengths, centromeres) = reference();
        let arms = GenomeArms::from_reference(&lengths, &centromeres);

        let chrm = arms.chrom_arms("chrM").unwrap();
        let labeled: Vec<(i64, i64, &str)> = chrm
            .iter()
            .map(|iv| (iv.start, iv.end, iv.data.as_str()))
            .collect();
        assert_eq!(vec![(0, 50, "chrM")], labeled);
    }

    #[test]
    fn partition_drops_empty_arms() {
        let lengths = HashMap::from([("chr2".to_string(), 1000i64)]);
        let centromeres = HashMap::from([("chr2".to_string(), (0i64, 1000i64))]);
        let arms = GenomeArms::from_reference(&lengths, &centromeres);
        assert!(arms.chrom_arms("chr2").unwrap().is_empty());
    }

    #[test]
    fn segment_matched_by_midpoint() {
        let (lengths, centromeres) = reference();
        let arms = GenomeArms::from_reference(&lengths, &centromeres);

        let segment = CnvSegment::new("chr1", 100, 300, 2.0);
        assert_eq!("chr1p", arms.find_arm(&segment).unwrap().data);

        let segment = CnvSegment::new("chr1", 700, 900, 2.0);
        assert_eq!("chr1q", arms.find_arm(&segment).unwrap().data);
    }

    #[test]
    fn straddling_segment_matched_by_largest_overlap() {
        let (lengths, centromeres) = reference();
        let arms = GenomeArms::from_reference(&lengths, &centromeres);

        // midpoint 500 sits in the centromere span, overlap with chr1q
        // (100 bases) beats chr1p (50 bases)
        let segment = CnvSegment::new("chr1", 350, 700, 2.0);
        assert_eq!("chr1q", arms.find_arm(&segment).unwrap().data);
    }

    #[test]
    fn equal_overlaps_break_towards_smallest_label() {
        let (lengths, centromeres) = reference();
        let arms = GenomeArms::from_reference(&lengths, &centromeres);

        // 50 bases into each arm, midpoint 500 in the centromere span
        let segment = CnvSegment::new("chr1", 350, 650, 2.0);
        assert_eq!("chr1p", arms.find_arm(&segment).unwrap().data);
    }

    #[test]
    fn segment_inside_centromere_matches_nothing() {
        let (lengths, centromeres) = reference();
        let arms = GenomeArms::from_reference(&lengths, &centromeres);

        let segment = CnvSegment::new("chr1", 450, 550, 2.0);
        assert!(arms.find_arm(&segment).is_none());
    }

    #[test]
    fn unmatched_segments_are_dropped_from_aggregation() {
        let (lengths, centromeres) = reference();
        let arms = GenomeArms::from_reference(&lengths, &centromeres);

        let segments = vec![
            CnvSegment::new("chr1", 100, 300, 2.0),
            CnvSegment::new("chr1", 450, 550, 9.0),
            CnvSegment::new("chrUn_scaffold", 0, 100, 3.0),
        ];
        let arm_calls = assign_to_arms(segments, &arms);
        assert_eq!(1, arm_calls.len());
        assert_eq!(1, arm_calls["chr1p"].segments.len());
        assert_eq!(400, arm_calls["chr1p"].arm_len);
    }

    #[test]
    fn aggregation_iterates_arms_in_label_order() {
        let (lengths, centromeres) = reference();
        let arms = GenomeArms::from_reference(&lengths, &centromeres);

        let segments = vec![
            CnvSegment::new("chrM", 0, 40, 2.0),
            CnvSegment::new("chr1", 700, 900, 2.0),
            CnvSegment::new("chr1", 100, 300, 2.0),
        ];
        let order: Vec<String> = assign_to_arms(segments, &arms).into_keys().collect();
        assert_eq!(vec!["chr1p", "chr1q", "chrM"], order);
    }
}
