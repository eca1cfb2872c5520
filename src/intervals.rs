//! # Interval sets over genomic coordinates
//!
//! A small sorted-vector container for half-open intervals on a single
//! coordinate axis. The sets built in this crate stay tiny (at most two
//! arms per chromosome, a handful of pieces per sliced segment), so every
//! query is a linear scan over a `Vec` kept sorted by start position.

/// A half-open interval `[start, end)` with an attached payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval<T> {
    pub start: i64,
    pub end: i64,
    pub data: T,
}

impl<T> Interval<T> {
    pub fn new(start: i64, end: i64, data: T) -> Self {
        Self { start, end, data }
    }
    pub fn len(&self) -> i64 {
        self.end - self.start
    }
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
    /// Check if `pos` falls inside the interval.
    pub fn contains(&self, pos: i64) -> bool {
        self.start <= pos && pos < self.end
    }
    /// Check if `[start, end)` overlaps the interval.
    pub fn overlaps(&self, start: i64, end: i64) -> bool {
        self.start < end && start < self.end
    }
}

/// A collection of half-open intervals kept sorted by `(start, end)`.
/// Intervals are allowed to overlap, lookups report every hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalSet<T> {
    intervals: Vec<Interval<T>>,
}

impl<T> IntervalSet<T> {
    pub fn new() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }

    /// Insert `[start, end)` with `data`, keeping the set sorted. Empty
    /// intervals are ignored.
    pub fn insert(&mut self, start: i64, end: i64, data: T) {
        if end <= start {
            return;
        }
        let idx = self
            .intervals
            .partition_point(|iv| (iv.start, iv.end) <= (start, end));
        self.intervals.insert(idx, Interval::new(start, end, data));
    }

    /// All intervals containing `pos`, in start order.
    pub fn query_point(&self, pos: i64) -> Vec<&Interval<T>> {
        self.intervals.iter().filter(|iv| iv.contains(pos)).collect()
    }

    /// All intervals overlapping `[start, end)`, in start order.
    pub fn query_range(&self, start: i64, end: i64) -> Vec<&Interval<T>> {
        self.intervals
            .iter()
            .filter(|iv| iv.overlaps(start, end))
            .collect()
    }

    /// Split every interval that strictly contains `pos` into two abutting
    /// intervals at `pos`, cloning the payload into both halves. Intervals
    /// that only touch `pos` at a boundary are left alone, so repeated
    /// splits at the same position are no-ops.
    pub fn split_at(&mut self, pos: i64)
    where
        T: Clone,
    {
        let mut split = Vec::with_capacity(self.intervals.len() + 1);
        for iv in self.intervals.drain(..) {
            if iv.start < pos && pos < iv.end {
                split.push(Interval::new(iv.start, pos, iv.data.clone()));
                split.push(Interval::new(pos, iv.end, iv.data));
            } else {
                split.push(iv);
            }
        }
        self.intervals = split;
    }

    /// Iterate the intervals in start order.
    pub fn iter(&self) -> impl Iterator<Item = &Interval<T>> {
        self.intervals.iter()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

impl<T> Default for IntervalSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
