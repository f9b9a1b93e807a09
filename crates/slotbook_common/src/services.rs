// --- File: crates/slotbook_common/src/services.rs ---
//! Service abstractions for the external calendar.
//!
//! The scheduling engine never talks to a calendar API directly. It depends on
//! [`CalendarProvider`], and the concrete adapter (Google Calendar, in-memory)
//! is injected at startup. This keeps interval arithmetic testable without a
//! network and makes the provider a mockable boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Failures reported by a calendar provider.
///
/// `Conflict` is the only variant the booking flow treats specially; every
/// other variant is terminal for the call and never retried by the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider refused the write because the time is already taken.
    #[error("scheduling conflict reported by provider")]
    Conflict,
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("request timed out after {0} seconds")]
    Timeout(u64),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// A busy period exactly as the provider reported it.
///
/// Timestamps stay RFC 3339 strings at this boundary; the engine parses and
/// validates them, so malformed provider data is caught in one place.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyPeriod {
    pub start: String,
    pub end: String,
}

impl BusyPeriod {
    pub fn from_instants(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: start.to_rfc3339(),
            end: end.to_rfc3339(),
        }
    }
}

/// An appointment write as sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentWrite {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Event title.
    pub summary: String,
    pub description: String,
}

/// The provider's acknowledgement of a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenAppointment {
    /// Provider-assigned event id.
    pub provider_id: String,
    /// Link a human can open to see the event, when the provider has one.
    pub display_link: Option<String>,
    pub confirmed_start: DateTime<Utc>,
    pub confirmed_end: DateTime<Utc>,
}

/// A calendar the engine can read busy time from and write appointments to.
pub trait CalendarProvider: Send + Sync {
    /// Short name used in logs and error context, e.g. `"google"`.
    fn name(&self) -> &'static str;

    /// Busy periods of `calendar_id` intersecting `[window_start, window_end)`.
    ///
    /// Read-only. An empty list means the window is fully free.
    fn query_busy(
        &self,
        calendar_id: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyPeriod>, ProviderError>;

    /// Persists an appointment. Returns [`ProviderError::Conflict`] when the
    /// provider itself detects that the time is taken.
    fn write_appointment(
        &self,
        calendar_id: &str,
        appointment: AppointmentWrite,
    ) -> BoxFuture<'_, WrittenAppointment, ProviderError>;
}
