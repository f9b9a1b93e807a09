// File: services/slotbook_backend/src/main.rs
use slotbook_backend::app::{build_router, build_state};
use slotbook_common::{config_error, logging, Context, SlotbookError};
use slotbook_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), SlotbookError> {
    let config = Arc::new(load_config().map_err(config_error)?);

    let level = logging::parse_level(config.logging.level.as_deref());
    // Held until exit so buffered file logs are flushed.
    let _log_guard = match config.logging.directory.as_deref() {
        Some(directory) => logging::init_with_file(level, directory),
        None => {
            logging::init_with_level(level);
            None
        }
    };

    let state = build_state(config.clone()).await?;
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("serving HTTP")?;
    Ok(())
}
