//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development. Only the event id is
//! truly optional: without it every data-dependent flow stays in its
//! loading state instead of failing.

use std::env;
use std::path::PathBuf;

/// Default API base URL for local development.
const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Object storage bucket that serves relative photo paths.
pub const DEFAULT_S3_BASE_URL: &str = "https://event-hex-saas.s3.us-east-1.amazonaws.com";

/// Dial code used when the user does not pick one.
pub const DEFAULT_COUNTRY_CODE: &str = "+91";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the InstaSnap REST API (no trailing slash)
    pub api_base_url: String,
    /// Event whose photos are browsed; `None` disables all flows
    pub event_id: Option<String>,
    /// Prefix for relative photo paths (no trailing slash)
    pub s3_base_url: String,
    /// Default dial code, with or without leading `+`
    pub country_code: String,
    /// File backing the persistent store; in-memory when unset
    pub storage_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base_url = non_empty_var("INSTASNAP_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid("INSTASNAP_API_URL", api_base_url));
        }

        Ok(Self {
            api_base_url: trim_slash(api_base_url),
            event_id: non_empty_var("INSTASNAP_EVENT_ID"),
            s3_base_url: trim_slash(
                non_empty_var("INSTASNAP_S3_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_S3_BASE_URL.to_string()),
            ),
            country_code: non_empty_var("INSTASNAP_COUNTRY_CODE")
                .unwrap_or_else(|| DEFAULT_COUNTRY_CODE.to_string()),
            storage_path: non_empty_var("INSTASNAP_STORAGE_PATH").map(PathBuf::from),
        })
    }

    /// Config for tests, pointing at a local mock backend.
    pub fn test_default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            event_id: Some("test-event".to_string()),
            s3_base_url: DEFAULT_S3_BASE_URL.to_string(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            storage_path: None,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
