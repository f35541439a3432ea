//! Application configuration loaded from environment variables.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Realtime Database instance
    /// (e.g. "https://crux-tracker.firebaseio.com")
    pub database_url: String,
    /// Auth token appended to every database request
    pub auth_token: String,
    /// Signed-in user ID (owner of training sessions)
    pub user_id: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            database_url: "http://localhost:9000".to_string(),
            auth_token: "test_token".to_string(),
            user_id: "test_user".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?
                .trim_end_matches('/')
                .to_string(),
            auth_token: env::var("DATABASE_AUTH_TOKEN")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("DATABASE_AUTH_TOKEN"))?,
            user_id: env::var("TRACKER_USER_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("TRACKER_USER_ID"))?,
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
