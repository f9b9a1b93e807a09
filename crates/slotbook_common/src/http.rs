// --- File: crates/slotbook_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{HttpStatusCode, SlotbookError};

/// Extension trait for SlotbookError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for SlotbookError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let error_message = self.to_string();

        let mut error = json!({
            "message": error_message,
            "code": status_code.as_u16(),
        });
        // Conflicts echo the rejected start so the UI can offer the next slots right away.
        if let SlotbookError::SlotConflict { start } = &self {
            error["conflicting_start"] = json!(start);
        }

        (status_code, Json(json!({ "error": error }))).into_response()
    }
}

impl IntoResponse for SlotbookError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}
