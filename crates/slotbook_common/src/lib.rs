// --- File: crates/slotbook_common/src/lib.rs ---

pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod services; // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{
    config_error, external_service_error, internal_error, validation_error, Context,
    HttpStatusCode, SlotbookError,
};

pub use http::IntoHttpResponse;

pub use services::{
    AppointmentWrite, BoxFuture, BusyPeriod, CalendarProvider, ProviderError, WrittenAppointment,
};
