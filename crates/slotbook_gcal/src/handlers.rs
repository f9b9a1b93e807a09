// File: crates/slotbook_gcal/src/handlers.rs
use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use slotbook_common::{config_error, validation_error, SlotbookError};
use slotbook_config::AppConfig;
use slotbook_engine::{
    time_range::parse_instant, Appointment, AvailabilityService, BookingCoordinator,
    SchedulingError, TimeRange, WorkingHours,
};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

pub const SLOTS_UNAVAILABLE_MESSAGE: &str = "No slots available right now, please try again later";

// Shared state for the scheduling handlers
#[derive(Clone)]
pub struct SchedulingState {
    pub config: Arc<AppConfig>,
    pub availability: Arc<AvailabilityService>,
    pub booking: Arc<BookingCoordinator>,
    /// Zone used to render instants in responses.
    pub time_zone: Tz,
}

impl SchedulingState {
    /// Wires the engine to `provider`, applying the configured working hours.
    pub fn from_config(
        config: Arc<AppConfig>,
        provider: Arc<dyn slotbook_common::CalendarProvider>,
    ) -> Result<Self, SchedulingError> {
        let booking_config = &config.booking;
        let time_zone = Tz::from_str(&booking_config.time_zone).map_err(|_| {
            SchedulingError::InvalidArgument(format!(
                "unknown time zone '{}'",
                booking_config.time_zone
            ))
        })?;

        let mut availability = AvailabilityService::new(provider);
        if let Some(hours) = &booking_config.working_hours {
            let hours = WorkingHours::parse(
                &booking_config.time_zone,
                &hours.open,
                &hours.close,
                &hours.days,
            )?;
            availability = availability.with_working_hours(hours);
        }
        let availability = Arc::new(availability);

        Ok(Self {
            booking: Arc::new(BookingCoordinator::new(availability.clone())),
            availability,
            config,
            time_zone,
        })
    }

    fn calendar_id(&self, requested: Option<String>) -> Result<String, SlotbookError> {
        match requested.filter(|id| !id.trim().is_empty()) {
            Some(id) => Ok(id),
            None => self
                .config
                .default_calendar_id()
                .map(str::to_string)
                .ok_or_else(|| config_error("no default calendar configured")),
        }
    }

    /// Earliest bookable instant given the configured notice period.
    fn earliest_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let lead = Duration::try_minutes(self.config.booking.lead_time_minutes.max(0))
            .unwrap_or_else(Duration::zero);
        now.checked_add_signed(lead).unwrap_or(now)
    }

    fn render(&self, instant: DateTime<Utc>) -> String {
        instant.with_timezone(&self.time_zone).to_rfc3339()
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[derive(Debug, Deserialize)]
pub struct AvailableSlotsQuery {
    pub calendar_id: Option<String>,
    /// RFC 3339 instant, inclusive.
    pub window_start: String,
    /// RFC 3339 instant, exclusive.
    pub window_end: String,
    pub duration_minutes: i64,
    pub max_slots: Option<usize>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AvailableSlotsResponse {
    /// Slot starts, RFC 3339 in the configured time zone.
    pub slots: Vec<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[derive(Debug, Deserialize)]
pub struct SlotFreeQuery {
    pub calendar_id: Option<String>,
    pub start: String,
    pub duration_minutes: i64,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SlotFreeResponse {
    pub free: bool,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BookRequest {
    pub calendar_id: Option<String>,
    pub start: String,
    pub duration_minutes: i64,
    pub name: String,
    pub phone: String,
    pub service: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct BookingResponse {
    pub provider_id: String,
    pub display_link: Option<String>,
    pub start: String,
    pub end: String,
}

fn minutes(value: i64) -> Result<Duration, SlotbookError> {
    if value <= 0 {
        return Err(validation_error("duration_minutes must be positive"));
    }
    Duration::try_minutes(value).ok_or_else(|| validation_error("duration_minutes is too large"))
}

/// Handler to list bookable slot starts.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/available-slots",
    params(AvailableSlotsQuery),
    responses(
        (status = 200, description = "Bookable slot starts", body = AvailableSlotsResponse),
        (status = 400, description = "Invalid or overlong window, duration or max_slots"),
        (status = 503, description = "Calendar provider unavailable")
    ),
    tag = "Scheduling"
))]
pub async fn available_slots_handler(
    State(state): State<Arc<SchedulingState>>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<AvailableSlotsResponse>, SlotbookError> {
    let calendar_id = state.calendar_id(query.calendar_id)?;
    let window = TimeRange::parse_rfc3339(&query.window_start, &query.window_end)?;
    let duration = minutes(query.duration_minutes)?;

    let booking_config = &state.config.booking;
    let max_window = Duration::try_days(booking_config.max_window_days.max(1))
        .ok_or_else(|| config_error("booking.max_window_days is too large"))?;
    if window.duration() > max_window {
        return Err(validation_error(format!(
            "window must not span more than {} days",
            booking_config.max_window_days
        )));
    }

    let max_slots = query.max_slots.unwrap_or(booking_config.max_slots_default);
    if max_slots == 0 || max_slots > booking_config.max_slots_limit {
        return Err(validation_error(format!(
            "max_slots must be between 1 and {}",
            booking_config.max_slots_limit
        )));
    }

    let earliest = state.earliest_start(Utc::now());
    if window.end() <= earliest {
        info!(calendar_id = %calendar_id, "Window {} ends before the earliest bookable start", window);
        return Ok(Json(AvailableSlotsResponse { slots: Vec::new() }));
    }
    let window = TimeRange::new(window.start().max(earliest), window.end())?;

    let slots = match state
        .availability
        .list_available_slots(&calendar_id, window, duration, max_slots)
        .await
    {
        Ok(slots) => slots,
        Err(err) if err.is_provider_failure() => {
            warn!(calendar_id = %calendar_id, "Degrading slot listing: {}", err);
            return Err(SlotbookError::ServiceUnavailable(
                SLOTS_UNAVAILABLE_MESSAGE.to_string(),
            ));
        }
        Err(err) => return Err(err.into()),
    };

    info!(calendar_id = %calendar_id, "Listing {} slots in {}", slots.len(), window);
    Ok(Json(AvailableSlotsResponse {
        slots: slots.iter().map(|slot| state.render(slot.start)).collect(),
    }))
}

/// Handler to check one exact slot.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/slot-free",
    params(SlotFreeQuery),
    responses(
        (status = 200, description = "Whether the slot is free", body = SlotFreeResponse),
        (status = 400, description = "Invalid start or duration"),
        (status = 502, description = "Calendar provider failed")
    ),
    tag = "Scheduling"
))]
pub async fn slot_free_handler(
    State(state): State<Arc<SchedulingState>>,
    Query(query): Query<SlotFreeQuery>,
) -> Result<Json<SlotFreeResponse>, SlotbookError> {
    let calendar_id = state.calendar_id(query.calendar_id)?;
    let start = parse_instant(&query.start)?;
    let duration = minutes(query.duration_minutes)?;

    let free = state
        .availability
        .is_slot_free(&calendar_id, start, duration)
        .await?;
    Ok(Json(SlotFreeResponse { free }))
}

/// Handler to book a slot.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/book",
    request_body = BookRequest,
    responses(
        (status = 200, description = "Booking confirmed", body = BookingResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Slot no longer available"),
        (status = 502, description = "Calendar provider failed")
    ),
    tag = "Scheduling"
))]
pub async fn book_handler(
    State(state): State<Arc<SchedulingState>>,
    Json(payload): Json<BookRequest>,
) -> Result<Json<BookingResponse>, SlotbookError> {
    let calendar_id = state.calendar_id(payload.calendar_id)?;
    let start = parse_instant(&payload.start)?;
    let duration = minutes(payload.duration_minutes)?;

    let earliest = state.earliest_start(Utc::now());
    if start < earliest {
        return Err(validation_error(format!(
            "bookings need at least {} minutes notice",
            state.config.booking.lead_time_minutes
        )));
    }

    let appointment = Appointment {
        requester_name: payload.name,
        requester_phone: payload.phone,
        service: payload.service,
        start,
        duration,
        notes: payload.notes,
    };

    match state.booking.book(&calendar_id, appointment).await {
        Ok(confirmation) => {
            info!(
                calendar_id = %calendar_id,
                "Successfully created booking {}",
                confirmation.provider_id
            );
            Ok(Json(BookingResponse {
                start: state.render(confirmation.start),
                end: state.render(confirmation.end),
                provider_id: confirmation.provider_id,
                display_link: confirmation.display_link,
            }))
        }
        Err(SchedulingError::SlotConflict { start }) => Err(SlotbookError::SlotConflict {
            start: state.render(start),
        }),
        Err(err) => {
            warn!(calendar_id = %calendar_id, "Booking failed: {}", err);
            Err(err.into())
        }
    }
}

/// Liveness probe.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String)),
    tag = "Scheduling"
))]
pub async fn health_handler() -> &'static str {
    "ok"
}
