//! Engine configuration.
//!
//! Defaults match the program's deployment (Detroit wall clock, 17:00-22:00
//! event window, top three ranked dates). A TOML file can override any field
//! and a couple of environment variables override the file, so secrets stay
//! out of checked-in config.

use anyhow::{Context, Result};
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TIMEZONE: &str = "America/Detroit";
const DEFAULT_API_URL: &str = "https://www.shiftadmin.com/api_getscheduledshifts_json.php";

/// Parameters for the remote ShiftAdmin source.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub api_url: String,
    pub validation_key: String,
    /// Group id of the primary facility calendar.
    pub primary_group: u32,
    /// Optional second facility whose calendar also carries program shifts.
    pub secondary_group: Option<u32>,
    /// Shift-code substring that marks program shifts on the secondary
    /// calendar; everything else there is dropped.
    pub secondary_filter: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            validation_key: String::new(),
            primary_group: 1,
            secondary_group: Some(9),
            secondary_filter: Some(" M".to_string()),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Timezone all shift timestamps and windows are interpreted in.
    pub timezone: Tz,
    /// A resident with at most this many observed shifts in a half-block is
    /// inferred off-service for that half-block.
    pub off_service_threshold: usize,
    /// Default daily event window when a query does not carry one.
    pub default_window_start: NaiveTime,
    pub default_window_end: NaiveTime,
    /// How many ranked dates a report returns.
    pub best_dates: usize,
    pub remote: RemoteConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE
                .parse()
                .expect("default timezone is valid"),
            off_service_threshold: 1,
            default_window_start: NaiveTime::from_hms_opt(17, 0, 0).expect("valid time"),
            default_window_end: NaiveTime::from_hms_opt(22, 0, 0).expect("valid time"),
            best_dates: 3,
            remote: RemoteConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    timezone: Option<String>,
    off_service_threshold: Option<usize>,
    default_window_start: Option<String>,
    default_window_end: Option<String>,
    best_dates: Option<usize>,
    #[serde(default)]
    remote: RemoteFile,
}

#[derive(Debug, Default, Deserialize)]
struct RemoteFile {
    api_url: Option<String>,
    validation_key: Option<String>,
    primary_group: Option<u32>,
    secondary_group: Option<u32>,
    secondary_filter: Option<String>,
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .with_context(|| format!("invalid time of day {raw:?}"))
}

impl AppConfig {
    /// Parse configuration from a TOML string, applying defaults for any
    /// missing field.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(raw).context("invalid config TOML")?;
        let mut config = AppConfig::default();

        if let Some(tz) = file.timezone {
            config.timezone = tz
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid timezone {tz:?}: {e}"))?;
        }
        if let Some(threshold) = file.off_service_threshold {
            config.off_service_threshold = threshold;
        }
        if let Some(raw) = file.default_window_start {
            config.default_window_start = parse_time(&raw)?;
        }
        if let Some(raw) = file.default_window_end {
            config.default_window_end = parse_time(&raw)?;
        }
        if let Some(n) = file.best_dates {
            config.best_dates = n;
        }

        if let Some(url) = file.remote.api_url {
            config.remote.api_url = url;
        }
        if let Some(key) = file.remote.validation_key {
            config.remote.validation_key = key;
        }
        if let Some(gid) = file.remote.primary_group {
            config.remote.primary_group = gid;
        }
        if let Some(gid) = file.remote.secondary_group {
            config.remote.secondary_group = Some(gid);
        }
        if let Some(filter) = file.remote.secondary_filter {
            config.remote.secondary_filter = Some(filter);
        }

        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Environment Variables
    /// - `RESIDOODLE_TZ` (optional): overrides the configured timezone
    /// - `RESIDOODLE_VALIDATION_KEY` (optional): overrides the API key
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&raw)
    }

    fn apply_env(&mut self) {
        if let Ok(tz) = std::env::var("RESIDOODLE_TZ") {
            match tz.parse() {
                Ok(parsed) => self.timezone = parsed,
                Err(e) => log::warn!("ignoring RESIDOODLE_TZ {tz:?}: {e}"),
            }
        }
        if let Ok(key) = std::env::var("RESIDOODLE_VALIDATION_KEY") {
            self.remote.validation_key = key;
        }
    }
}
