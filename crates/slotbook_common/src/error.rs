// --- File: crates/slotbook_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The HTTP-facing error type shared by all Slotbook crates.
///
/// Domain crates keep their own error enums and convert into this one at the
/// API boundary, where it is rendered as a JSON body with a matching status code.
#[derive(Error, Debug)]
pub enum SlotbookError {
    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// The service cannot answer right now; the caller may try again later
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The requested start is no longer free
    #[error("Requested time slot starting at {start} is no longer available")]
    SlotConflict { start: String },

    /// Error occurred due to a timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for SlotbookError {
    fn status_code(&self) -> u16 {
        match self {
            SlotbookError::ConfigError(_) => 500,
            SlotbookError::ValidationError(_) => 400,
            SlotbookError::ExternalServiceError { .. } => 502,
            SlotbookError::ServiceUnavailable(_) => 503,
            SlotbookError::SlotConflict { .. } => 409,
            SlotbookError::TimeoutError(_) => 504,
            SlotbookError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, SlotbookError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, SlotbookError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, SlotbookError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| internal_error(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, SlotbookError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| internal_error(format!("{}: {}", f(), error)))
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> SlotbookError {
    SlotbookError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> SlotbookError {
    SlotbookError::ValidationError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> SlotbookError {
    SlotbookError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> SlotbookError {
    SlotbookError::InternalError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(validation_error("bad").status_code(), 400);
        assert_eq!(config_error("missing").status_code(), 500);
        assert_eq!(external_service_error("gcal", "down").status_code(), 502);
        assert_eq!(
            SlotbookError::SlotConflict {
                start: "2025-05-05T09:00:00+00:00".to_string()
            }
            .status_code(),
            409
        );
        assert_eq!(SlotbookError::ServiceUnavailable("later".into()).status_code(), 503);
    }

    #[test]
    fn test_context_wraps_as_internal() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        let err = result.context("binding listener").unwrap_err();
        assert_eq!(err.to_string(), "Internal error: binding listener: boom");
    }
}
