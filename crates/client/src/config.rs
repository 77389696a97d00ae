//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `HEALTHY_FOOD_API_URL` - Backend base URL (default: `http://127.0.0.1:5000`)
//! - `HEALTHY_FOOD_USER_ID` - User whose filters are used (default: `default`)
//! - `HEALTHY_FOOD_STORE` - Store searched by default, `kroger` or `heb` (default: `kroger`)
//! - `HEALTHY_FOOD_TIMEOUT_SECS` - Transport timeout in seconds (default: none)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::time::Duration;

use healthy_food_core::{Store, UserId};
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend serving `/api/*`
    pub api_base_url: Url,
    /// User whose filter list is loaded and mutated
    pub user_id: UserId,
    /// Store selected when a search names none
    pub default_store: Store,
    /// Transport timeout; `None` leaves reqwest's default in place
    pub request_timeout: Option<Duration>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ClientConfig {
    /// Configuration for a backend at `api_base_url`, everything else default.
    #[must_use]
    pub fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            user_id: UserId::default(),
            default_store: Store::default(),
            request_timeout: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = get("HEALTHY_FOOD_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_base_url = parse_api_url(&api_base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("HEALTHY_FOOD_API_URL".to_string(), e))?;

        let user_id = get("HEALTHY_FOOD_USER_ID").map_or_else(UserId::default, UserId::new);

        let default_store = get("HEALTHY_FOOD_STORE")
            .map(|s| s.parse::<Store>())
            .transpose()
            .map_err(|e| ConfigError::InvalidEnvVar("HEALTHY_FOOD_STORE".to_string(), e))?
            .unwrap_or_default();

        let request_timeout = get("HEALTHY_FOOD_TIMEOUT_SECS")
            .map(|s| parse_timeout(&s))
            .transpose()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("HEALTHY_FOOD_TIMEOUT_SECS".to_string(), e)
            })?;

        Ok(Self {
            user_id,
            default_store,
            request_timeout,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
            ..Self::new(api_base_url)
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a backend base URL; only http(s) URLs are accepted.
///
/// # Errors
///
/// Returns a description of the problem if the URL is unusable.
pub fn parse_api_url(value: &str) -> Result<Url, String> {
    let url = Url::parse(value.trim()).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{other}' (expected http or https)")),
    }
}

/// Parse a positive whole number of seconds.
fn parse_timeout(value: &str) -> Result<Duration, String> {
    let secs = value.trim().parse::<u64>().map_err(|e| e.to_string())?;
    if secs == 0 {
        return Err("must be greater than zero".to_string());
    }
    Ok(Duration::from_secs(secs))
}
