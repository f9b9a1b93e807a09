// --- File: crates/slotbook_engine/src/time_range.rs ---
//! Half-open time ranges.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::{Result, SchedulingError};

/// A half-open interval `[start, end)` with `end > start`.
///
/// The invariant is enforced by every constructor, so code receiving a
/// `TimeRange` never has to re-check it. Two ranges that only share a boundary
/// ("touch") do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Builds a range, rejecting empty and inverted ones.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end <= start {
            return Err(SchedulingError::InvalidRange(format!(
                "end {} must be after start {}",
                end.to_rfc3339(),
                start.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    /// `[start, start + duration)`. The duration must be positive.
    pub fn starting_at(start: DateTime<Utc>, duration: Duration) -> Result<Self> {
        if duration <= Duration::zero() {
            return Err(SchedulingError::InvalidArgument(format!(
                "duration must be positive, got {} minutes",
                duration.num_minutes()
            )));
        }
        let end = start.checked_add_signed(duration).ok_or_else(|| {
            SchedulingError::InvalidRange(format!(
                "{} plus {} minutes is out of range",
                start.to_rfc3339(),
                duration.num_minutes()
            ))
        })?;
        Self::new(start, end)
    }

    /// Parses two RFC 3339 timestamps (any offset) into a UTC range.
    pub fn parse_rfc3339(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_instant(start)?, parse_instant(end)?)
    }

    /// Internal constructor for callers that already established `start < end`.
    pub(crate) fn from_ordered(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start < end, "from_ordered called with {start} >= {end}");
        Self { start, end }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Adjacent without overlapping: one ends exactly where the other starts.
    pub fn touches(&self, other: &TimeRange) -> bool {
        self.end == other.start || other.end == self.start
    }

    pub fn contains(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn contains_instant(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// The part of `self` inside `bounds`, if any.
    pub fn clip_to(&self, bounds: &TimeRange) -> Option<TimeRange> {
        let start = self.start.max(bounds.start);
        let end = self.end.min(bounds.end);
        (start < end).then(|| Self::from_ordered(start, end))
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Parses an RFC 3339 timestamp into UTC, mapping failures to `InvalidRange`.
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SchedulingError::InvalidRange(format!("unparsable timestamp '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 5, h, m, 0).unwrap()
    }

    #[test]
    fn test_rejects_empty_and_inverted() {
        assert!(matches!(
            TimeRange::new(at(9, 0), at(9, 0)),
            Err(SchedulingError::InvalidRange(_))
        ));
        assert!(matches!(
            TimeRange::new(at(10, 0), at(9, 0)),
            Err(SchedulingError::InvalidRange(_))
        ));
        assert!(TimeRange::new(at(9, 0), at(9, 1)).is_ok());
    }

    #[test]
    fn test_starting_at_rejects_non_positive_duration() {
        assert!(matches!(
            TimeRange::starting_at(at(9, 0), Duration::zero()),
            Err(SchedulingError::InvalidArgument(_))
        ));
        assert!(matches!(
            TimeRange::starting_at(at(9, 0), Duration::minutes(-30)),
            Err(SchedulingError::InvalidArgument(_))
        ));
        let range = TimeRange::starting_at(at(9, 0), Duration::minutes(30)).unwrap();
        assert_eq!(range.end(), at(9, 30));
    }

    #[test]
    fn test_touching_is_not_overlapping() {
        let a = TimeRange::new(at(9, 0), at(9, 30)).unwrap();
        let b = TimeRange::new(at(9, 30), at(10, 0)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.touches(&b));
        assert!(b.touches(&a));

        let c = TimeRange::new(at(9, 29), at(10, 0)).unwrap();
        assert!(a.overlaps(&c));
        assert!(!a.touches(&c));
    }

    #[test]
    fn test_clip_to() {
        let window = TimeRange::new(at(9, 0), at(12, 0)).unwrap();
        let busy = TimeRange::new(at(8, 0), at(9, 30)).unwrap();
        assert_eq!(
            busy.clip_to(&window),
            Some(TimeRange::new(at(9, 0), at(9, 30)).unwrap())
        );

        let outside = TimeRange::new(at(12, 0), at(13, 0)).unwrap();
        assert_eq!(outside.clip_to(&window), None);
    }

    #[test]
    fn test_parse_rfc3339_normalizes_offsets() {
        let range =
            TimeRange::parse_rfc3339("2025-05-05T11:00:00+02:00", "2025-05-05T09:30:00Z").unwrap();
        assert_eq!(range.start(), at(9, 0));
        assert_eq!(range.end(), at(9, 30));

        assert!(matches!(
            TimeRange::parse_rfc3339("yesterday", "2025-05-05T09:30:00Z"),
            Err(SchedulingError::InvalidRange(_))
        ));
    }
}
