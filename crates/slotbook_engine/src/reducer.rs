// --- File: crates/slotbook_engine/src/reducer.rs ---
//! Busy/free interval arithmetic.
//!
//! [`merge`] coalesces raw busy ranges into a [`BusyIntervalSet`];
//! [`subtract`] removes them from a window, producing a [`FreeIntervalSet`].
//! Both are pure and recomputed per query.

use tracing::debug;

use crate::time_range::TimeRange;

/// Sorted, non-overlapping, non-touching busy ranges.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BusyIntervalSet {
    ranges: Vec<TimeRange>,
}

impl BusyIntervalSet {
    /// Sorts and merges arbitrary ranges.
    pub fn from_ranges<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = TimeRange>,
    {
        let raw: Vec<TimeRange> = ranges.into_iter().collect();
        Self {
            ranges: merge(&raw),
        }
    }

    pub fn ranges(&self) -> &[TimeRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeRange> {
        self.ranges.iter()
    }

    pub fn into_ranges(self) -> Vec<TimeRange> {
        self.ranges
    }
}

/// The free complement of a busy set inside a bounding window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeIntervalSet {
    bounds: TimeRange,
    ranges: Vec<TimeRange>,
}

impl FreeIntervalSet {
    pub fn bounds(&self) -> TimeRange {
        self.bounds
    }

    pub fn ranges(&self) -> &[TimeRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeRange> {
        self.ranges.iter()
    }
}

/// Sorts by start and coalesces ranges that overlap or touch.
///
/// Touching ranges must merge: `[09:00, 09:30)` and `[09:30, 10:00)` become
/// `[09:00, 10:00)`, never two ranges with a zero-width gap between them.
pub fn merge(ranges: &[TimeRange]) -> Vec<TimeRange> {
    let mut sorted = ranges.to_vec();
    sorted.sort();

    let mut merged: Vec<TimeRange> = Vec::with_capacity(sorted.len());
    for range in sorted {
        match merged.last_mut() {
            Some(last) if range.start() <= last.end() => {
                if range.end() > last.end() {
                    *last = TimeRange::from_ordered(last.start(), range.end());
                }
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// Free ranges of `window` once every `busy` range is removed.
///
/// `busy` may be unsorted, overlapping and may extend past the window; it is
/// merged first and clipped while walking.
pub fn subtract(window: TimeRange, busy: &[TimeRange]) -> FreeIntervalSet {
    let merged = merge(busy);
    let mut free = Vec::new();
    let mut cursor = window.start();

    for range in &merged {
        if range.end() <= window.start() {
            continue;
        }
        if range.start() >= window.end() {
            break;
        }
        let busy_start = range.start().max(window.start());
        let busy_end = range.end().min(window.end());
        if cursor < busy_start {
            free.push(TimeRange::from_ordered(cursor, busy_start));
        }
        cursor = cursor.max(busy_end);
    }

    if cursor < window.end() {
        free.push(TimeRange::from_ordered(cursor, window.end()));
    }

    debug!(
        "Reduced {} busy ({} merged) to {} free ranges in {}",
        busy.len(),
        merged.len(),
        free.len(),
        window
    );

    FreeIntervalSet {
        bounds: window,
        ranges: free,
    }
}
