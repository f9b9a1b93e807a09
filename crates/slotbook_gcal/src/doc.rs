// File: crates/slotbook_gcal/src/doc.rs

#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::{
    AvailableSlotsQuery, AvailableSlotsResponse, BookRequest, BookingResponse, SlotFreeQuery,
    SlotFreeResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::available_slots_handler,
        crate::handlers::slot_free_handler,
        crate::handlers::book_handler,
        crate::handlers::health_handler,
    ),
    components(schemas(
        AvailableSlotsQuery,
        AvailableSlotsResponse,
        SlotFreeQuery,
        SlotFreeResponse,
        BookRequest,
        BookingResponse,
    )),
    tags(
        (name = "Scheduling", description = "Slot listing and conflict-checked booking")
    )
)]
pub struct SchedulingApiDoc;
