//! # Copy-number segment prefiltering
//!
//! The decision core of `focalfilt`. Segments are aggregated per
//! chromosome arm, each arm's baseline ploidy is estimated as the
//! length-weighted median copy number of its calls, and only segments
//! whose copy number clears an adaptive gain threshold over that baseline
//! are retained. Survivors are then sliced at the boundaries of curated
//! gain regions so downstream consumers see boundary-aligned intervals.
use log::{debug, info};

use crate::{
    arms::{assign_to_arms, GenomeArms},
    intervals::IntervalSet,
    reference::ReferenceData,
    segment::{CnvSegment, GainRegion},
};

/// Segment length in bases above which the gain margin is scaled up.
const LARGE_SEGMENT_LEN: i64 = 5_000_000;
/// Margin multiplier applied to segments longer than [`LARGE_SEGMENT_LEN`].
const LARGE_SEGMENT_MARGIN_SCALE: f64 = 1.5;
/// Baseline copy number assumed for arms with too little call coverage.
const ASSUMED_DIPLOID_CN: f64 = 2.0;

/// Length-weighted median copy number of an arm's segment calls, used as
/// the arm's baseline ploidy.
///
/// Returns [`ASSUMED_DIPLOID_CN`] when the calls cover less than half of
/// `arm_len`: too little of the arm is observed to estimate a baseline.
/// Otherwise segments are walked in ascending copy-number order and the
/// copy number at which the accumulated length first reaches half of the
/// total covered length is returned. Weighting is by genomic span, so one
/// long diploid segment outweighs many short amplified ones.
pub fn median_copy_number(segments: &[CnvSegment], arm_len: i64) -> f64 {
    let covered: i64 = segments.iter().map(CnvSegment::len).sum();
    if segments.is_empty() || (covered as f64) < 0.5 * arm_len as f64 {
        return ASSUMED_DIPLOID_CN;
    }

    let mut by_copy_number: Vec<&CnvSegment> = segments.iter().collect();
    by_copy_number.sort_by(|a, b| a.copy_number.total_cmp(&b.copy_number));

    let half_covered = covered as f64 / 2.0;
    let mut running = 0i64;
    let mut median = ASSUMED_DIPLOID_CN;
    for segment in by_copy_number {
        median = segment.copy_number;
        running += segment.len();
        if running as f64 >= half_covered {
            break;
        }
    }
    median
}

/// Decide whether `segment` stands out as a focal gain against the arm
/// baseline `median`. The margin is `cngain`, scaled by 1.5 for segments
/// longer than 5 Mbp, and the comparison is strict: a copy number exactly
/// at the threshold is not retained.
pub fn is_focal_gain(segment: &CnvSegment, median: f64, cngain: f64) -> bool {
    let mut margin = cngain;
    if segment.len() > LARGE_SEGMENT_LEN {
        margin *= LARGE_SEGMENT_MARGIN_SCALE;
    }
    segment.copy_number > median + margin - 2.0
}

/// Slice `segment` at every gain-region boundary falling strictly inside
/// it and return the resulting sub-intervals in start order, each carrying
/// the original copy number. This is a boundary alignment pass, not a
/// subtraction: pieces inside gain regions are emitted like every other
/// piece, and the union of the output equals the input interval exactly.
pub fn slice_on_gain_regions(segment: &CnvSegment, regions: &[GainRegion]) -> Vec<CnvSegment> {
    let mut pieces: IntervalSet<()> = IntervalSet::new();
    pieces.insert(segment.start, segment.end, ());
    for region in regions {
        pieces.split_at(region.start);
        pieces.split_at(region.end);
    }
    pieces
        .iter()
        .map(|piece| CnvSegment::new(&segment.chrom, piece.start, piece.end, segment.copy_number))
        .collect()
}

/// Run the full prefilter over one sample's segment calls: assign segments
/// to chromosome arms, estimate each arm's baseline, keep the segments
/// exceeding the gain threshold, and slice the survivors at gain-region
/// boundaries. Output segments are ordered by arm label, keeping the input
/// order within each arm.
pub fn prefilter_segments(
    segments: Vec<CnvSegment>,
    reference: &ReferenceData,
    cngain: f64,
) -> Vec<CnvSegment> {
    let n_input = segments.len();
    let arms = GenomeArms::from_reference(&reference.chrom_lengths, &reference.centromeres);
    let arm_calls = assign_to_arms(segments, &arms);

    let mut retained: Vec<CnvSegment> = Vec::new();
    for (arm_label, calls) in &arm_calls {
        let median = median_copy_number(&calls.segments, calls.arm_len);
        debug!(
            "Arm {arm_label}: baseline copy number {median} over {} segments",
            calls.segments.len()
        );
        retained.extend(
            calls
                .segments
                .iter()
                .filter(|segment| is_focal_gain(segment, median, cngain))
                .cloned(),
        );
    }
    info!(
        "Retained {} of {n_input} segments above the arm-adjusted gain threshold",
        retained.len()
    );

    let mut filtered: Vec<CnvSegment> = Vec::new();
    for segment in &retained {
        let regions = reference
            .gain_regions
            .get(&segment.chrom)
            .map(Vec::as_slice)
            .unwrap_or_default();
        filtered.extend(slice_on_gain_regions(segment, regions));
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: i64, end: i64, copy_number: f64) -> CnvSegment {
        CnvSegment::new("chr1", start, end, copy_number)
    }

    #[test]
    fn median_of_single_whole_arm_segment_is_its_copy_number() {
        let segments = vec![segment(0, 1000, 7.3)];
        assert_eq!(7.3, median_copy_number(&segments, 1000));

        let segments = vec![segment(0, 1000, 0.5)];
        assert_eq!(0.5, median_copy_number(&segments, 1000));
    }

    #[test]
    fn median_assumes_diploid_below_half_coverage() {
        let segments = vec![segment(0, 499, 9.0)];
        assert_eq!(2.0, median_copy_number(&segments, 1000));
        assert_eq!(2.0, median_copy_number(&[], 1000));
    }

    #[test]
    fn median_estimates_at_exactly_half_coverage() {
        let segments = vec![segment(0, 500, 9.0)];
        assert_eq!(9.0, median_copy_number(&segments, 1000));
    }

    #[test]
    fn median_weights_by_span_not_call_count() {
        // one long diploid block against three short amplifications
        let segments = vec![
            segment(0, 600, 2.0),
            segment(600, 700, 8.0),
            segment(700, 800, 9.0),
            segment(800, 900, 10.0),
        ];
        assert_eq!(2.0, median_copy_number(&segments, 1000));
    }

    #[test]
    fn median_takes_value_reaching_half_covered_length() {
        let segments = vec![segment(0, 500, 1.0), segment(500, 1000, 5.0)];
        assert_eq!(1.0, median_copy_number(&segments, 1000));

        let segments = vec![segment(0, 400, 1.0), segment(400, 1000, 5.0)];
        assert_eq!(5.0, median_copy_number(&segments, 1000));
    }

    #[test]
    fn gain_threshold_is_strict() {
        // baseline 2.0 and margin 4.0 puts the threshold at 4.0
        let at_threshold = segment(0, 1000, 4.0);
        assert!(!is_focal_gain(&at_threshold, 2.0, 4.0));

        let above_threshold = segment(0, 1000, 4.01);
        assert!(is_focal_gain(&above_threshold, 2.0, 4.0));
    }

    #[test]
    fn gain_margin_scales_for_long_segments() {
        let just_at_limit = segment(0, 5_000_000, 5.0);
        assert!(is_focal_gain(&just_at_limit, 2.0, 4.0));

        // above 5 Mbp the margin becomes 6.0, copy number 5.0 no longer clears it
        let above_limit = segment(0, 5_000_001, 5.0);
        assert!(!is_focal_gain(&above_limit, 2.0, 4.0));
        let above_limit_high_cn = segment(0, 5_000_001, 6.01);
        assert!(is_focal_gain(&above_limit_high_cn, 2.0, 4.0));
    }

    #[test]
    fn gain_compares_against_arm_median() {
        let tetraploid_arm_segment = segment(0, 1000, 6.0);
        assert!(is_focal_gain(&tetraploid_arm_segment, 2.0, 4.0));
        assert!(!is_focal_gain(&tetraploid_arm_segment, 4.0, 4.0));
    }

    fn region(start: i64, end: i64) -> GainRegion {
        GainRegion {
            chrom: "chr1".to_string(),
            start,
            end,
        }
    }

    #[test]
    fn slicing_emits_every_piece() {
        let pieces = slice_on_gain_regions(&segment(100, 200, 8.0), &[region(150, 160)]);
        let coords: Vec<(i64, i64)> = pieces.iter().map(|p| (p.start, p.end)).collect();
        assert_eq!(vec![(100, 150), (150, 160), (160, 200)], coords);
        assert!(pieces.iter().all(|p| p.copy_number == 8.0));
    }

    #[test]
    fn slicing_with_no_regions_returns_segment_unchanged() {
        let pieces = slice_on_gain_regions(&segment(100, 200, 8.0), &[]);
        assert_eq!(vec![segment(100, 200, 8.0)], pieces);
    }

    #[test]
    fn slicing_ignores_regions_outside_the_segment() {
        let pieces = slice_on_gain_regions(&segment(100, 200, 8.0), &[region(300, 400)]);
        assert_eq!(1, pieces.len());
    }

    #[test]
    fn slicing_at_touching_boundaries_is_noop() {
        let pieces = slice_on_gain_regions(&segment(100, 200, 8.0), &[region(200, 300)]);
        assert_eq!(vec![segment(100, 200, 8.0)], pieces);
    }

    #[test]
    fn slicing_handles_region_overlapping_segment_edge() {
        // only the region end falls inside the segment
        let pieces = slice_on_gain_regions(&segment(100, 200, 8.0), &[region(50, 150)]);
        let coords: Vec<(i64, i64)> = pieces.iter().map(|p| (p.start, p.end)).collect();
        assert_eq!(vec![(100, 150), (150, 200)], coords);
    }

    #[test]
    fn prefilter_keeps_focal_gain_over_diploid_arm() {
        let reference = ReferenceData {
            chrom_lengths: std::collections::HashMap::from([("chrA".to_string(), 2_000_000i64)]),
            ..Default::default()
        };
        let segments = vec![
            CnvSegment::new("chrA", 0, 1_000_000, 2.0),
            CnvSegment::new("chrA", 1_000_000, 1_500_000, 6.0),
        ];

        let filtered = prefilter_segments(segments, &reference, 4.1);
        assert_eq!(
            vec![CnvSegment::new("chrA", 1_000_000, 1_500_000, 6.0)],
            filtered
        );
    }

    #[test]
    fn prefilter_passes_through_chrom_without_gain_regions() {
        let reference = ReferenceData {
            chrom_lengths: std::collections::HashMap::from([("chrA".to_string(), 1_000_000i64)]),
            gain_regions: std::collections::HashMap::from([(
                "chrB".to_string(),
                vec![GainRegion {
                    chrom: "chrB".to_string(),
                    start: 0,
                    end: 500,
                }],
            )]),
            ..Default::default()
        };
        let segments = vec![
            CnvSegment::new("chrA", 0, 600_000, 2.0),
            CnvSegment::new("chrA", 600_000, 700_000, 9.0),
        ];

        let filtered = prefilter_segments(segments, &reference, 4.5);
        assert_eq!(
            vec![CnvSegment::new("chrA", 600_000, 700_000, 9.0)],
            filtered
        );
    }
}
