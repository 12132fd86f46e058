// --- File: crates/meetslot_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

// --- Logging Config ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    /// Minimum level, e.g. "info" or "debug". Defaults to "info".
    pub level: Option<String>,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<String>,
}

// --- Google Calendar Config ---
// Credential files are read from disk; their contents never live in the config.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GcalConfig {
    /// Calendars consulted for busy times. Empty or missing means every
    /// calendar in the user's calendar list.
    pub calendar_ids: Option<Vec<String>>,
    /// Calendar that receives booked events. Defaults to "primary".
    pub booking_calendar_id: Option<String>,
    /// Service account key (JSON). Takes precedence over the installed flow.
    pub key_path: Option<String>,
    /// OAuth client secret for the installed-application flow.
    pub client_secret_path: Option<String>,
    /// Where the installed flow persists its tokens. Defaults to "token.json".
    pub token_cache_path: Option<String>,
}

// --- Scheduling Config ---
// Times of day are "HH:MM" strings, weekdays are "Mon".."Sun".
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SchedulingConfig {
    /// IANA zone used for every comparison and every formatted timestamp.
    pub time_zone: Option<String>, // default "Asia/Hong_Kong"
    pub work_start_time: Option<String>, // default "09:00"
    pub work_end_time: Option<String>,   // default "18:00"
    /// Days scanned for suggestions. Missing means all seven days.
    pub working_days: Option<Vec<String>>,
    pub lunch_start_time: Option<String>, // default "12:00"
    pub lunch_end_time: Option<String>,   // default "14:00"
    /// Earliest start for "only afternoon" requests.
    pub afternoon_start_time: Option<String>, // default "14:00"
    pub slot_duration_minutes: Option<i64>,   // default 60
    /// Spacing between candidate starts. Defaults to the slot duration.
    pub step_minutes: Option<i64>,
    pub default_days: Option<i64>,        // default 3
    pub default_hours_ahead: Option<i64>, // default 24
    /// Upper bound on suggestions returned by `GET /suggest`.
    pub suggest_limit: Option<usize>,
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub gcal: GcalConfig,
    #[serde(default)]
    pub scheduling: SchedulingConfig,
}
