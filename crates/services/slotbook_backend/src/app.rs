// --- File: crates/services/slotbook_backend/src/app.rs ---
//! Application assembly: provider selection, shared state and the router.

use axum::{routing::get, Router};
use http::Method;
use slotbook_common::{config_error, CalendarProvider, SlotbookError};
use slotbook_config::AppConfig;
use slotbook_gcal::{handlers::SchedulingState, routes as scheduling_routes, service::provider_from_config};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Builds the configured calendar provider and wires the engine around it.
pub async fn build_state(config: Arc<AppConfig>) -> Result<Arc<SchedulingState>, SlotbookError> {
    let provider = provider_from_config(&config).await.map_err(config_error)?;
    info!(
        "Calendar provider '{}', default calendar {:?}",
        provider.name(),
        config.default_calendar_id()
    );
    let state = SchedulingState::from_config(config, provider).map_err(config_error)?;
    Ok(Arc::new(state))
}

/// All routes under `/api`, plus Swagger UI when built with `openapi`.
pub fn build_router(state: Arc<SchedulingState>) -> Router {
    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Slotbook API!" }))
        .merge(scheduling_routes::routes(state));

    #[allow(unused_mut)] // only mutated with the openapi feature
    let mut app = Router::new().nest("/api", api_router);

    #[cfg(feature = "openapi")]
    {
        use slotbook_gcal::doc::SchedulingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Slotbook API",
                version = "0.1.0",
                description = "Appointment availability and booking",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers((url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(SchedulingApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any)
        .allow_headers(Any);

    app.layer(cors).layer(TraceLayer::new_for_http())
}
