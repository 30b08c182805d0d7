use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

pub const DEFAULT_API_ORIGIN: &str = "http://localhost:8082";
pub const DEFAULT_DASHBOARD_FEED_ID: &str = "dashboards";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Client configuration, read from `EVA_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaConfig {
    /// Scheme and authority of the data service, e.g. `https://api.everyaware.eu`.
    pub api_origin: String,
    /// Feed holding persisted dashboards and external widget-type URLs.
    pub dashboard_feed_id: String,
    pub log_level: String,
    /// Directory for rolling log files; stdout only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for EvaConfig {
    fn default() -> Self {
        Self {
            api_origin: DEFAULT_API_ORIGIN.to_string(),
            dashboard_feed_id: DEFAULT_DASHBOARD_FEED_ID.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_dir: None,
        }
    }
}

impl EvaConfig {
    /// Loads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let api_origin = read("EVA_API_ORIGIN", DEFAULT_API_ORIGIN);
        if !(api_origin.starts_with("http://") || api_origin.starts_with("https://")) {
            return Err(anyhow!(
                "EVA_API_ORIGIN must be an http(s) origin, got {:?}",
                api_origin
            ));
        }

        let dashboard_feed_id = read("EVA_DASHBOARD_FEED_ID", DEFAULT_DASHBOARD_FEED_ID);
        if dashboard_feed_id.contains('/') {
            return Err(anyhow!(
                "EVA_DASHBOARD_FEED_ID cannot contain '/', got {:?}",
                dashboard_feed_id
            ));
        }

        let log_dir = lookup("EVA_LOG_DIR")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            api_origin,
            dashboard_feed_id,
            log_level: read("EVA_LOG_LEVEL", DEFAULT_LOG_LEVEL),
            log_dir,
        })
    }
}
