// --- File: crates/slotbook_gcal/src/routes.rs ---

use crate::handlers::{
    available_slots_handler, book_handler, health_handler, slot_free_handler, SchedulingState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all scheduling routes, relative to the `/api` prefix.
pub fn routes(state: Arc<SchedulingState>) -> Router {
    Router::new()
        .route("/available-slots", get(available_slots_handler))
        .route("/slot-free", get(slot_free_handler))
        .route("/book", post(book_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}
