// --- File: crates/slotbook_engine/src/memory.rs ---
//! In-memory [`CalendarProvider`] for local development and tests.
//!
//! Writes check for overlap and insert under one lock, so concurrent writes
//! for the same time behave like a provider with conflict detection: the
//! first wins, later ones get [`ProviderError::Conflict`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use slotbook_common::{
    AppointmentWrite, BoxFuture, BusyPeriod, CalendarProvider, ProviderError, WrittenAppointment,
};
use tracing::debug;

use crate::time_range::TimeRange;

/// An event held by [`InMemoryCalendar`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEvent {
    pub id: String,
    pub range: TimeRange,
    pub summary: String,
    pub description: String,
}

#[derive(Debug, Default)]
pub struct InMemoryCalendar {
    events: Mutex<HashMap<String, Vec<StoredEvent>>>,
}

impl InMemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an event without conflict checking, e.g. to seed existing busy time.
    pub fn insert_busy(&self, calendar_id: &str, range: TimeRange, summary: &str) -> String {
        let id = format!("mem-{}", uuid::Uuid::new_v4());
        self.lock()
            .entry(calendar_id.to_string())
            .or_default()
            .push(StoredEvent {
                id: id.clone(),
                range,
                summary: summary.to_string(),
                description: String::new(),
            });
        id
    }

    /// All events of a calendar, ordered by start.
    pub fn events(&self, calendar_id: &str) -> Vec<StoredEvent> {
        let mut events = self.lock().get(calendar_id).cloned().unwrap_or_default();
        events.sort_by_key(|e| e.range);
        events
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<StoredEvent>>> {
        // A panic while holding the lock cannot leave a half-written Vec entry.
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CalendarProvider for InMemoryCalendar {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn query_busy(
        &self,
        calendar_id: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyPeriod>, ProviderError> {
        let calendar_id = calendar_id.to_string();

        Box::pin(async move {
            let busy = self
                .events(&calendar_id)
                .into_iter()
                .filter(|e| e.range.start() < window_end && window_start < e.range.end())
                .map(|e| BusyPeriod::from_instants(e.range.start(), e.range.end()))
                .collect();
            Ok(busy)
        })
    }

    fn write_appointment(
        &self,
        calendar_id: &str,
        appointment: AppointmentWrite,
    ) -> BoxFuture<'_, WrittenAppointment, ProviderError> {
        let calendar_id = calendar_id.to_string();

        Box::pin(async move {
            let range = TimeRange::new(appointment.start, appointment.end)
                .map_err(|e| ProviderError::UnexpectedResponse(e.to_string()))?;

            let mut events = self.lock();
            let calendar = events.entry(calendar_id.clone()).or_default();
            if calendar.iter().any(|e| e.range.overlaps(&range)) {
                debug!("In-memory calendar {} rejects {}", calendar_id, range);
                return Err(ProviderError::Conflict);
            }

            let id = format!("mem-{}", uuid::Uuid::new_v4());
            calendar.push(StoredEvent {
                id: id.clone(),
                range,
                summary: appointment.summary,
                description: appointment.description,
            });

            Ok(WrittenAppointment {
                display_link: Some(format!("memory://{}/{}", calendar_id, id)),
                provider_id: id,
                confirmed_start: range.start(),
                confirmed_end: range.end(),
            })
        })
    }
}
