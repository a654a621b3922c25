use anyhow::{Context, Result};
use std::time::Duration;

/// Published CSV export of the team's call tracking sheet.
pub const DEFAULT_SOURCE: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vSqX2UIjXuKu7noH2QLT8k-YfNbWtJgmPbYuaunoOdy51UVtT4IQqvl-fhT0XtxTbe66FE1savHnNVv/pub?gid=286064860&single=true&output=csv";

pub const DEFAULT_LOG_FILE: &str = "logs/call_metrics.log";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Settings read from the environment (and `.env`, once `dotenvy` has run).
///
/// | Variable | Default |
/// |----------|---------|
/// | `CALL_SHEET_URL` | [`DEFAULT_SOURCE`] |
/// | `LOG_FILE_PATH` | [`DEFAULT_LOG_FILE`] |
/// | `HTTP_TIMEOUT_SECS` | 30 |
/// | `CACHE_MAX_AGE_SECS` | unset, entries never expire |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub source: String,
    pub log_file_path: String,
    pub http_timeout: Duration,
    pub cache_max_age: Option<Duration>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let http_timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => parse_secs("HTTP_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        let cache_max_age = get("CACHE_MAX_AGE_SECS")
            .map(|raw| parse_secs("CACHE_MAX_AGE_SECS", &raw))
            .transpose()?
            .map(Duration::from_secs);

        Ok(AppConfig {
            source: get("CALL_SHEET_URL").unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            log_file_path: get("LOG_FILE_PATH").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
            http_timeout: Duration::from_secs(http_timeout_secs),
            cache_max_age,
        })
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .with_context(|| format!("{key} must be a whole number of seconds, got '{raw}'"))
}
