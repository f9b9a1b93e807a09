// --- File: crates/slotbook_engine/src/booking.rs ---
//! Conflict-checked appointment booking.
//!
//! A booking moves `Requested -> Verifying -> Committing -> Confirmed`, or
//! ends in `Rejected` when the slot is taken. Verifying and committing are two
//! separate provider calls, so another booking can still land in between; the
//! provider's write is the final authority and its conflict signal is mapped
//! to the same [`SchedulingError::SlotConflict`] the local check produces.
//!
//! Cancellation is by dropping the future returned from
//! [`BookingCoordinator::book`]. A dropped verify never reaches the write, and a
//! dropped write yields no confirmation.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use slotbook_common::{AppointmentWrite, ProviderError};
use tracing::{debug, info, warn};

use crate::availability::AvailabilityService;
use crate::error::{ProviderOperation, Result, SchedulingError};
use crate::time_range::TimeRange;

/// What the requester asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub requester_name: String,
    pub requester_phone: String,
    /// Service label, e.g. "Haircut".
    pub service: String,
    pub start: DateTime<Utc>,
    pub duration: Duration,
    pub notes: Option<String>,
}

impl Appointment {
    pub fn range(&self) -> Result<TimeRange> {
        TimeRange::starting_at(self.start, self.duration)
    }

    /// Event title shown in the calendar.
    pub fn summary(&self) -> String {
        format!("{}: {}", self.service.trim(), self.requester_name.trim())
    }

    pub fn description(&self) -> String {
        let mut lines = vec![
            format!("Name: {}", self.requester_name.trim()),
            format!("Phone: {}", self.requester_phone.trim()),
            format!("Service: {}", self.service.trim()),
        ];
        if let Some(notes) = self.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            lines.push(format!("Notes: {notes}"));
        }
        lines.join("\n")
    }

    fn validate(&self) -> Result<TimeRange> {
        for (field, value) in [
            ("name", &self.requester_name),
            ("phone", &self.requester_phone),
            ("service", &self.service),
        ] {
            if value.trim().is_empty() {
                return Err(SchedulingError::InvalidArgument(format!("{field} must not be empty")));
            }
        }
        self.range()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    Requested,
    Verifying,
    Committing,
    Confirmed,
    Rejected,
}

impl fmt::Display for BookingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookingState::Requested => "requested",
            BookingState::Verifying => "verifying",
            BookingState::Committing => "committing",
            BookingState::Confirmed => "confirmed",
            BookingState::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Normalized result of a confirmed booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingConfirmation {
    pub provider_id: String,
    pub display_link: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Runs the check-then-commit protocol. Stateless: concurrent `book` calls
/// are not serialized here.
pub struct BookingCoordinator {
    availability: Arc<AvailabilityService>,
}

impl BookingCoordinator {
    pub fn new(availability: Arc<AvailabilityService>) -> Self {
        Self { availability }
    }

    pub fn availability(&self) -> &Arc<AvailabilityService> {
        &self.availability
    }

    pub async fn book(&self, calendar_id: &str, appointment: Appointment) -> Result<BookingConfirmation> {
        let mut state = BookingState::Requested;
        let range = appointment.validate()?;

        advance(&mut state, BookingState::Verifying, calendar_id, &range);
        let free = self
            .availability
            .is_slot_free(calendar_id, appointment.start, appointment.duration)
            .await?;
        if !free {
            advance(&mut state, BookingState::Rejected, calendar_id, &range);
            warn!(calendar_id, "Slot {} is no longer free", range);
            return Err(SchedulingError::SlotConflict { start: range.start() });
        }

        advance(&mut state, BookingState::Committing, calendar_id, &range);
        let provider = self.availability.provider();
        let write = AppointmentWrite {
            start: range.start(),
            end: range.end(),
            summary: appointment.summary(),
            description: appointment.description(),
        };
        let written = match provider.write_appointment(calendar_id, write).await {
            Ok(written) => written,
            Err(ProviderError::Conflict) => {
                advance(&mut state, BookingState::Rejected, calendar_id, &range);
                warn!(calendar_id, "Provider rejected {} as conflicting", range);
                return Err(SchedulingError::SlotConflict { start: range.start() });
            }
            Err(source) => {
                return Err(SchedulingError::Provider {
                    provider: provider.name(),
                    calendar_id: calendar_id.to_string(),
                    operation: ProviderOperation::WriteAppointment,
                    window: range,
                    source,
                });
            }
        };

        if written.confirmed_start != range.start() || written.confirmed_end != range.end() {
            warn!(
                calendar_id,
                "Provider confirmed [{}, {}) for requested {}",
                written.confirmed_start.to_rfc3339(),
                written.confirmed_end.to_rfc3339(),
                range
            );
        }

        advance(&mut state, BookingState::Confirmed, calendar_id, &range);
        info!(
            calendar_id,
            provider_id = %written.provider_id,
            "Booked {} for {}",
            range,
            appointment.service
        );
        Ok(BookingConfirmation {
            provider_id: written.provider_id,
            display_link: written.display_link,
            start: written.confirmed_start,
            end: written.confirmed_end,
        })
    }
}

fn advance(state: &mut BookingState, next: BookingState, calendar_id: &str, range: &TimeRange) {
    debug!(calendar_id, "Booking {}: {} -> {}", range, state, next);
    *state = next;
}
