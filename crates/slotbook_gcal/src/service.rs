// --- File: crates/slotbook_gcal/src/service.rs ---
//! Google Calendar implementation of [`CalendarProvider`].
//!
//! Reads go through the free/busy endpoint, writes through `events.insert`.
//! Every call is bounded by the configured request timeout; nothing is retried.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use google_calendar3::api::{Event, EventDateTime, FreeBusyRequest, FreeBusyRequestItem};
use slotbook_common::{
    AppointmentWrite, BoxFuture, BusyPeriod, CalendarProvider, ProviderError, WrittenAppointment,
};
use slotbook_config::{AppConfig, ProviderKind};
use slotbook_engine::InMemoryCalendar;
use tracing::{debug, info, warn};

use crate::auth::{create_calendar_hub, GcalAdapterError, HubType};

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Google Calendar provider.
pub struct GoogleCalendarProvider {
    calendar_hub: Arc<HubType>,
    timeout: Duration,
}

impl GoogleCalendarProvider {
    pub fn new(calendar_hub: Arc<HubType>, timeout: Duration) -> Self {
        Self {
            calendar_hub,
            timeout,
        }
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, google_calendar3::Error>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(map_api_error),
            Err(_) => Err(ProviderError::Timeout(self.timeout.as_secs())),
        }
    }
}

impl CalendarProvider for GoogleCalendarProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    fn query_busy(
        &self,
        calendar_id: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyPeriod>, ProviderError> {
        let calendar_id = calendar_id.to_string();

        Box::pin(async move {
            let req = FreeBusyRequest {
                time_min: Some(window_start),
                time_max: Some(window_end),
                time_zone: Some("UTC".to_string()),
                items: Some(vec![FreeBusyRequestItem {
                    id: Some(calendar_id.clone()),
                }]),
                ..Default::default()
            };

            let (_response, freebusy) = self
                .bounded(self.calendar_hub.freebusy().query(req).doit())
                .await?;

            let calendar = freebusy
                .calendars
                .and_then(|mut calendars| calendars.remove(&calendar_id))
                .ok_or_else(|| {
                    ProviderError::UnexpectedResponse(format!(
                        "free/busy response has no entry for calendar '{calendar_id}'"
                    ))
                })?;

            if let Some(errors) = calendar.errors.filter(|e| !e.is_empty()) {
                let reasons: Vec<String> = errors
                    .into_iter()
                    .map(|e| e.reason.unwrap_or_else(|| "unknown".to_string()))
                    .collect();
                return Err(ProviderError::UnexpectedResponse(format!(
                    "calendar '{}' reported: {}",
                    calendar_id,
                    reasons.join(", ")
                )));
            }

            let mut busy = Vec::new();
            for period in calendar.busy.unwrap_or_default() {
                match (period.start, period.end) {
                    (Some(start), Some(end)) => busy.push(BusyPeriod::from_instants(start, end)),
                    _ => {
                        // Treating it as free could double-book.
                        return Err(ProviderError::UnexpectedResponse(format!(
                            "busy period without start or end: {period:?}"
                        )));
                    }
                }
            }

            debug!(
                calendar_id = %calendar_id,
                "Google reported {} busy periods in [{}, {})",
                busy.len(),
                window_start.to_rfc3339(),
                window_end.to_rfc3339()
            );
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
            let new_event = Event {
                summary: Some(appointment.summary),
                description: Some(appointment.description),
                start: Some(EventDateTime {
                    date_time: Some(appointment.start),
                    time_zone: Some("UTC".to_string()),
                    ..Default::default()
                }),
                end: Some(EventDateTime {
                    date_time: Some(appointment.end),
                    time_zone: Some("UTC".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            };

            let (_response, created) = self
                .bounded(
                    self.calendar_hub
                        .events()
                        .insert(new_event, &calendar_id)
                        .doit(),
                )
                .await?;

            let provider_id = created.id.ok_or_else(|| {
                ProviderError::UnexpectedResponse("created event has no id".to_string())
            })?;
            let confirmed_start = created
                .start
                .and_then(|s| s.date_time)
                .unwrap_or(appointment.start);
            let confirmed_end = created
                .end
                .and_then(|e| e.date_time)
                .unwrap_or(appointment.end);

            info!(calendar_id = %calendar_id, "Created Google event {}", provider_id);
            Ok(WrittenAppointment {
                provider_id,
                display_link: created.html_link,
                confirmed_start,
                confirmed_end,
            })
        })
    }
}

/// Maps a Google client error onto the provider error vocabulary.
///
/// Only errors that carry an HTTP status are classified by it; the message
/// text is never searched for status codes.
pub(crate) fn map_api_error(err: google_calendar3::Error) -> ProviderError {
    let status = match &err {
        google_calendar3::Error::BadRequest(body) => body["error"]["code"]
            .as_u64()
            .and_then(|code| u16::try_from(code).ok()),
        google_calendar3::Error::Failure(response) => Some(response.status().as_u16()),
        google_calendar3::Error::MissingToken(_) => Some(401),
        _ => None,
    };
    let mapped = classify(status, &err.to_string());
    warn!("Google Calendar call failed: {} (mapped to {:?})", err, mapped);
    mapped
}

/// 409/412 mean the slot is taken, 401/403 mean the credentials are not
/// accepted. Anything else, including an unknown status, is a transport failure.
pub(crate) fn classify(status: Option<u16>, message: &str) -> ProviderError {
    match status {
        Some(409) | Some(412) => ProviderError::Conflict,
        Some(401) | Some(403) => ProviderError::Unauthorized(message.to_string()),
        _ => ProviderError::Transport(message.to_string()),
    }
}

/// Builds the provider selected by `config.provider`.
pub async fn provider_from_config(
    config: &AppConfig,
) -> Result<Arc<dyn CalendarProvider>, GcalAdapterError> {
    match config.provider {
        ProviderKind::Memory => {
            info!("Using in-memory calendar provider");
            Ok(Arc::new(InMemoryCalendar::new()))
        }
        ProviderKind::Google => {
            let gcal = config.gcal.as_ref().ok_or(GcalAdapterError::MissingConfig)?;
            let hub = create_calendar_hub(gcal).await?;
            let timeout = Duration::from_secs(
                gcal.request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            );
            info!("Using Google Calendar provider (timeout {:?})", timeout);
            Ok(Arc::new(GoogleCalendarProvider::new(Arc::new(hub), timeout)))
        }
    }
}
