// --- File: crates/slotbook_engine/src/working_hours.rs ---
//! Configured opening hours, expanded into closed time ranges.
//!
//! Closed time is treated exactly like provider busy time, so slot listing and
//! the booking re-check see the same blocked set.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::{Result, SchedulingError};
use crate::reducer;
use crate::time_range::TimeRange;

/// Daily opening hours in a specific time zone. `open < close`, same day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingHours {
    time_zone: Tz,
    open: NaiveTime,
    close: NaiveTime,
    days: Vec<Weekday>,
}

impl WorkingHours {
    pub fn new(time_zone: Tz, open: NaiveTime, close: NaiveTime, days: Vec<Weekday>) -> Result<Self> {
        if close <= open {
            return Err(SchedulingError::InvalidArgument(format!(
                "working hours close ({close}) must be after open ({open})"
            )));
        }
        Ok(Self {
            time_zone,
            open,
            close,
            days,
        })
    }

    /// Parses configuration values: an IANA zone, `HH:MM` times and day
    /// abbreviations (`Mon`..`Sun`).
    pub fn parse(time_zone: &str, open: &str, close: &str, days: &[String]) -> Result<Self> {
        let tz = Tz::from_str(time_zone).map_err(|_| {
            SchedulingError::InvalidArgument(format!("unknown time zone '{time_zone}'"))
        })?;
        let open = parse_clock(open)?;
        let close = parse_clock(close)?;
        let days = days
            .iter()
            .map(|d| {
                d.parse::<Weekday>().map_err(|_| {
                    SchedulingError::InvalidArgument(format!("unknown weekday '{d}'"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(tz, open, close, days)
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Open periods intersecting `window`, clipped to it, in ascending order.
    pub fn open_ranges(&self, window: TimeRange) -> Vec<TimeRange> {
        // One day of slack on both sides covers zones far from UTC.
        let first_day = window.start().with_timezone(&self.time_zone).date_naive();
        let first_day = first_day.pred_opt().unwrap_or(first_day);
        let last_day = window.end().with_timezone(&self.time_zone).date_naive();
        let last_day = last_day.succ_opt().unwrap_or(last_day);

        let mut open = Vec::new();
        let mut day = first_day;
        while day <= last_day {
            if self.days.contains(&day.weekday()) {
                let opens = resolve_local(&self.time_zone, day, self.open);
                let closes = resolve_local(&self.time_zone, day, self.close);
                if let (Some(opens), Some(closes)) = (opens, closes) {
                    if let Ok(range) = TimeRange::new(opens, closes) {
                        if let Some(clipped) = range.clip_to(&window) {
                            open.push(clipped);
                        }
                    }
                }
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        open
    }

    /// Closed periods inside `window`: the window minus its open periods.
    pub fn closed_ranges(&self, window: TimeRange) -> Vec<TimeRange> {
        let open = self.open_ranges(window);
        let closed = reducer::subtract(window, &open).ranges().to_vec();
        debug!(
            "Working hours leave {} open and {} closed ranges in {}",
            open.len(),
            closed.len(),
            window
        );
        closed
    }
}

fn parse_clock(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| SchedulingError::InvalidArgument(format!("invalid time '{value}', expected HH:MM")))
}

/// Wall-clock time on `day` in `tz` as a UTC instant.
///
/// Ambiguous times (clocks going back) take the earlier instant; times that do
/// not exist (clocks going forward) move to the first valid minute after the gap.
fn resolve_local(tz: &Tz, day: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    let naive = day.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => (1..=180)
            .map(|m| naive + Duration::minutes(m))
            .find_map(|shifted| tz.from_local_datetime(&shifted).earliest())
            .map(|dt| dt.with_timezone(&Utc)),
    }
}
