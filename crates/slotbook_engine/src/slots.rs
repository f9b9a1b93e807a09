// --- File: crates/slotbook_engine/src/slots.rs ---
//! Slicing free time into bookable slots.

use std::iter::FusedIterator;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::{Result, SchedulingError};
use crate::reducer::FreeIntervalSet;
use crate::time_range::TimeRange;

/// A candidate appointment: `[start, end)` lies inside a single free range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Slot {
    pub fn range(&self) -> TimeRange {
        TimeRange::from_ordered(self.start, self.end)
    }
}

/// Lazy, capped iterator over slots. Created by [`slice`].
///
/// Nothing past the cap is ever computed, so a multi-year free range with a
/// one-minute duration costs as much as `max_slots` steps.
#[derive(Debug, Clone)]
pub struct Slots<'a> {
    ranges: std::slice::Iter<'a, TimeRange>,
    current: Option<TimeRange>,
    next_start: DateTime<Utc>,
    duration: Duration,
    remaining: usize,
}

impl Iterator for Slots<'_> {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        if self.remaining == 0 {
            return None;
        }
        loop {
            if let Some(range) = self.current {
                match self.next_start.checked_add_signed(self.duration) {
                    Some(end) if end <= range.end() => {
                        let start = self.next_start;
                        self.next_start = end;
                        self.remaining -= 1;
                        return Some(Slot { start, end });
                    }
                    _ => self.current = None,
                }
            }
            let range = *self.ranges.next()?;
            self.current = Some(range);
            self.next_start = range.start();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl FusedIterator for Slots<'_> {}

/// Slices each free range, in order, into back-to-back slots of `duration`
/// starting at the range's start, stopping after `max_slots`.
///
/// A free range shorter than `duration` contributes nothing, and no slot ever
/// spans two free ranges.
pub fn slice(free: &FreeIntervalSet, duration: Duration, max_slots: usize) -> Result<Slots<'_>> {
    if duration <= Duration::zero() {
        return Err(SchedulingError::InvalidArgument(format!(
            "slot duration must be positive, got {} minutes",
            duration.num_minutes()
        )));
    }
    if max_slots == 0 {
        return Err(SchedulingError::InvalidArgument(
            "max_slots must be at least 1".to_string(),
        ));
    }
    Ok(Slots {
        ranges: free.ranges().iter(),
        current: None,
        next_start: free.bounds().start(),
        duration,
        remaining: max_slots,
    })
}
