// --- File: crates/slotbook_engine/src/error.rs ---
use std::fmt;

use chrono::{DateTime, Utc};
use slotbook_common::{external_service_error, ProviderError, SlotbookError};
use thiserror::Error;

use crate::time_range::TimeRange;

/// Which provider call failed, for error context and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderOperation {
    QueryBusy,
    WriteAppointment,
}

impl fmt::Display for ProviderOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderOperation::QueryBusy => f.write_str("query_busy"),
            ProviderOperation::WriteAppointment => f.write_str("write_appointment"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SchedulingError {
    /// Malformed or inverted time ranges supplied by the caller.
    #[error("Invalid time range: {0}")]
    InvalidRange(String),

    /// The provider answered, but with busy periods that are not valid ranges.
    #[error("Invalid time range from calendar provider '{provider}' on calendar '{calendar_id}' for {window}: {detail}")]
    ProviderData {
        provider: &'static str,
        calendar_id: String,
        window: TimeRange,
        detail: String,
    },

    /// Non-positive durations or slot caps, blank appointment fields.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The calendar provider failed. Never retried by the engine.
    #[error("Calendar provider '{provider}' failed during {operation} on calendar '{calendar_id}' for {window}: {source}")]
    Provider {
        provider: &'static str,
        calendar_id: String,
        operation: ProviderOperation,
        window: TimeRange,
        #[source]
        source: ProviderError,
    },

    /// The exact requested start is no longer free, whether the local re-check
    /// or the provider's write caught it.
    #[error("Slot starting at {start} is no longer available")]
    SlotConflict { start: DateTime<Utc> },
}

pub type Result<T> = std::result::Result<T, SchedulingError>;

impl SchedulingError {
    /// Conflicts are worth offering alternative slots for; everything else is not.
    pub fn is_conflict(&self) -> bool {
        matches!(self, SchedulingError::SlotConflict { .. })
    }

    /// Bad ranges, whether from the caller or from provider data.
    pub fn is_invalid_range(&self) -> bool {
        matches!(
            self,
            SchedulingError::InvalidRange(_) | SchedulingError::ProviderData { .. }
        )
    }

    /// The failure lies with the calendar provider rather than the request.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            SchedulingError::Provider { .. } | SchedulingError::ProviderData { .. }
        )
    }
}

impl From<SchedulingError> for SlotbookError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::InvalidRange(_) | SchedulingError::InvalidArgument(_) => {
                SlotbookError::ValidationError(err.to_string())
            }
            SchedulingError::Provider {
                source: ProviderError::Timeout(_),
                ..
            } => SlotbookError::TimeoutError(err.to_string()),
            SchedulingError::Provider { provider, .. }
            | SchedulingError::ProviderData { provider, .. } => {
                external_service_error(provider, &err)
            }
            SchedulingError::SlotConflict { start } => SlotbookError::SlotConflict {
                start: start.to_rfc3339(),
            },
        }
    }
}
