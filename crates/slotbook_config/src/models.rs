// --- File: crates/slotbook_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which calendar backend answers free/busy queries and receives writes.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Google,
    #[default]
    Memory,
}

// --- Google Calendar Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    pub key_path: Option<String>, // service account JSON, mandatory for provider = google
    pub calendar_id: Option<String>,
    /// Upper bound for a single Google API call. Owned by the adapter, never retried.
    pub request_timeout_secs: Option<u64>,
}

// --- Opening hours ---
// Times are wall-clock "HH:MM" in `BookingConfig::time_zone`, days are "Mon".."Sun".
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WorkingHoursConfig {
    pub open: String,
    pub close: String,
    #[serde(default = "default_working_days")]
    pub days: Vec<String>,
}

fn default_working_days() -> Vec<String> {
    ["Mon", "Tue", "Wed", "Thu", "Fri"]
        .iter()
        .map(|d| d.to_string())
        .collect()
}

// --- Booking Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingConfig {
    /// Calendar used when a request does not name one.
    pub default_calendar_id: Option<String>,
    /// IANA zone used to render slot starts and to interpret working hours.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_max_slots")]
    pub max_slots_default: usize,
    #[serde(default = "default_max_slots_limit")]
    pub max_slots_limit: usize,
    /// Minimum notice between "now" and the earliest bookable start.
    #[serde(default)]
    pub lead_time_minutes: i64,
    /// Longest listing window accepted, in days.
    #[serde(default = "default_max_window_days")]
    pub max_window_days: i64,
    #[serde(default)]
    pub working_hours: Option<WorkingHoursConfig>,
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

fn default_max_slots() -> usize {
    60
}

fn default_max_slots_limit() -> usize {
    500
}

fn default_max_window_days() -> i64 {
    366
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            default_calendar_id: None,
            time_zone: default_time_zone(),
            max_slots_default: default_max_slots(),
            max_slots_limit: default_max_slots_limit(),
            lead_time_minutes: 0,
            max_window_days: default_max_window_days(),
            working_hours: None,
        }
    }
}

// --- Logging Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    #[serde(default)]
    pub provider: ProviderKind,

    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Calendar used when the caller does not pass one explicitly.
    pub fn default_calendar_id(&self) -> Option<&str> {
        self.booking
            .default_calendar_id
            .as_deref()
            .or_else(|| self.gcal.as_ref().and_then(|g| g.calendar_id.as_deref()))
    }
}
