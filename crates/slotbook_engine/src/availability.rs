// --- File: crates/slotbook_engine/src/availability.rs ---
//! Answers "which slots are free" and "is this exact slot free".

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use slotbook_common::{BusyPeriod, CalendarProvider};
use tracing::{debug, error};

use crate::error::{ProviderOperation, Result, SchedulingError};
use crate::reducer::{self, BusyIntervalSet, FreeIntervalSet};
use crate::slots::{self, Slot};
use crate::time_range::{parse_instant, TimeRange};
use crate::working_hours::WorkingHours;

/// Combines the provider's busy time, optional working hours, the reducer and
/// the slot generator. Holds no mutable state; safe to share across tasks.
pub struct AvailabilityService {
    provider: Arc<dyn CalendarProvider>,
    working_hours: Option<WorkingHours>,
}

impl AvailabilityService {
    pub fn new(provider: Arc<dyn CalendarProvider>) -> Self {
        Self {
            provider,
            working_hours: None,
        }
    }

    /// Treat time outside `hours` as blocked.
    pub fn with_working_hours(mut self, hours: WorkingHours) -> Self {
        self.working_hours = Some(hours);
        self
    }

    pub fn provider(&self) -> &Arc<dyn CalendarProvider> {
        &self.provider
    }

    pub fn working_hours(&self) -> Option<&WorkingHours> {
        self.working_hours.as_ref()
    }

    /// Everything blocked inside `window`: provider busy time plus closed
    /// hours, merged and clipped to the window. One provider read.
    pub async fn blocked_intervals(&self, calendar_id: &str, window: TimeRange) -> Result<BusyIntervalSet> {
        let periods = self
            .provider
            .query_busy(calendar_id, window.start(), window.end())
            .await
            .map_err(|source| {
                error!(
                    calendar_id,
                    provider = self.provider.name(),
                    "Busy query failed for {}: {}",
                    window,
                    source
                );
                SchedulingError::Provider {
                    provider: self.provider.name(),
                    calendar_id: calendar_id.to_string(),
                    operation: ProviderOperation::QueryBusy,
                    window,
                    source,
                }
            })?;

        let mut blocked = parse_busy_periods(periods).map_err(|detail| {
            error!(
                calendar_id,
                provider = self.provider.name(),
                "Unusable busy data for {}: {}",
                window,
                detail
            );
            SchedulingError::ProviderData {
                provider: self.provider.name(),
                calendar_id: calendar_id.to_string(),
                window,
                detail,
            }
        })?;
        if let Some(hours) = &self.working_hours {
            blocked.extend(hours.closed_ranges(window));
        }

        Ok(BusyIntervalSet::from_ranges(
            blocked.iter().filter_map(|r| r.clip_to(&window)),
        ))
    }

    pub async fn free_intervals(&self, calendar_id: &str, window: TimeRange) -> Result<FreeIntervalSet> {
        let blocked = self.blocked_intervals(calendar_id, window).await?;
        Ok(reducer::subtract(window, blocked.ranges()))
    }

    /// Free slots of `duration` inside `window`, at most `max_slots`, in order.
    ///
    /// Arguments are validated before the provider is contacted.
    pub async fn list_available_slots(
        &self,
        calendar_id: &str,
        window: TimeRange,
        duration: Duration,
        max_slots: usize,
    ) -> Result<Vec<Slot>> {
        validate_slot_request(duration, max_slots)?;

        let free = self.free_intervals(calendar_id, window).await?;
        let slots: Vec<Slot> = slots::slice(&free, duration, max_slots)?.collect();

        debug!(
            calendar_id,
            "Found {} slots of {} min in {} free ranges of {}",
            slots.len(),
            duration.num_minutes(),
            free.len(),
            window
        );
        Ok(slots)
    }

    /// Whether `[start, start + duration)` is entirely free right now.
    ///
    /// Both the pre-flight check and the booking re-check go through here.
    pub async fn is_slot_free(&self, calendar_id: &str, start: DateTime<Utc>, duration: Duration) -> Result<bool> {
        let requested = TimeRange::starting_at(start, duration)?;
        let blocked = self.blocked_intervals(calendar_id, requested).await?;
        debug!(
            calendar_id,
            "Slot {} has {} blocked ranges",
            requested,
            blocked.len()
        );
        Ok(blocked.is_empty())
    }
}

fn validate_slot_request(duration: Duration, max_slots: usize) -> Result<()> {
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
    Ok(())
}

/// Converts provider periods into ranges.
///
/// Zero-length periods block nothing under half-open semantics and are
/// dropped; unparsable or inverted ones are provider bugs and fail the query.
fn parse_busy_periods(periods: Vec<BusyPeriod>) -> std::result::Result<Vec<TimeRange>, String> {
    let mut ranges = Vec::with_capacity(periods.len());
    for period in periods {
        let start = parse_instant(&period.start).map_err(|e| e.to_string())?;
        let end = parse_instant(&period.end).map_err(|e| e.to_string())?;
        if start == end {
            debug!("Skipping zero-length busy period at {}", period.start);
            continue;
        }
        let range = TimeRange::new(start, end).map_err(|_| {
            format!(
                "busy period ends before it starts: {} .. {}",
                period.start, period.end
            )
        })?;
        ranges.push(range);
    }
    Ok(ranges)
}
