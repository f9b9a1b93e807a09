// File: crates/slotbook_gcal/src/auth.rs
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator},
    CalendarHub,
};
use slotbook_config::GcalConfig;
use std::path::Path;
use thiserror::Error;
use tracing::info;

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

/// Failures while building the authenticated Google client.
#[derive(Error, Debug)]
pub enum GcalAdapterError {
    #[error("Missing key_path in gcal configuration")]
    MissingKeyPath,
    #[error("Missing gcal configuration section")]
    MissingConfig,
    #[error("Failed to read service account key '{path}': {source}")]
    KeyFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to build service account authenticator: {0}")]
    Authenticator(#[source] std::io::Error),
    #[error("Failed to load native TLS roots: {0}")]
    Tls(#[source] std::io::Error),
}

pub async fn create_calendar_hub(config: &GcalConfig) -> Result<HubType, GcalAdapterError> {
    let key_path = config
        .key_path
        .as_deref()
        .ok_or(GcalAdapterError::MissingKeyPath)?;

    let sa_key = read_service_account_key(Path::new(key_path))
        .await
        .map_err(|source| GcalAdapterError::KeyFile {
            path: key_path.to_string(),
            source,
        })?;

    let auth = ServiceAccountAuthenticator::builder(sa_key)
        .build()
        .await
        .map_err(GcalAdapterError::Authenticator)?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(GcalAdapterError::Tls)?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    info!("Google Calendar client ready (key {})", key_path);
    Ok(CalendarHub::new(client, auth))
}
