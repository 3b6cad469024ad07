//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `DANCEMODE_API_URL` - Base URL of the ticketing REST service
//!   (default: `http://127.0.0.1:8080`)
//! - `DANCEMODE_STATE_DIR` - Directory for persisted client state (default: `<data dir>/dancemode`)
//! - `DANCEMODE_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `DANCEMODE_CLEAR_CART_ON_LOGOUT` - Empty the cart on logout (default: true)
//! - `DANCEMODE_NOTIFICATION_CLEAR_MS` - Delay before notifications auto-clear (default: 5000)
//! - `DANCEMODE_BULK_POLICY` - `continue` or `abort` on a failed bulk step (default: continue)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::api::BulkPolicy;
use crate::services::auth::LogoutPolicy;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_NOTIFICATION_CLEAR_MS: u64 = 5000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST API settings
    pub api: ApiConfig,
    /// Directory holding persisted state; `None` disables persistence
    pub state_dir: Option<PathBuf>,
    /// What logout clears besides authentication
    pub logout_policy: LogoutPolicy,
    /// How long notifications stay visible
    pub notification_clear_after: Duration,
    /// How "save all" reacts to a failed step
    pub bulk_policy: BulkPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// REST API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            // Constant is a valid absolute URL
            base_url: Url::parse(DEFAULT_API_URL).unwrap_or_else(|_| unreachable!()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            state_dir: default_state_dir(),
            logout_policy: LogoutPolicy::default(),
            notification_clear_after: Duration::from_millis(DEFAULT_NOTIFICATION_CLEAR_MS),
            bulk_policy: BulkPolicy::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = parse_url(
            "DANCEMODE_API_URL",
            &get_env_or_default("DANCEMODE_API_URL", DEFAULT_API_URL),
        )?;
        let timeout = Duration::from_secs(parse_env_or(
            "DANCEMODE_REQUEST_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
        )?);
        let state_dir = get_optional_env("DANCEMODE_STATE_DIR")
            .map(PathBuf::from)
            .or_else(default_state_dir);
        let logout_policy = LogoutPolicy {
            clear_cart: parse_env_or("DANCEMODE_CLEAR_CART_ON_LOGOUT", true)?,
        };
        let notification_clear_after = Duration::from_millis(parse_env_or(
            "DANCEMODE_NOTIFICATION_CLEAR_MS",
            DEFAULT_NOTIFICATION_CLEAR_MS,
        )?);
        let bulk_policy = parse_env_or("DANCEMODE_BULK_POLICY", BulkPolicy::default())?;

        Ok(Self {
            api: ApiConfig { base_url, timeout },
            state_dir,
            logout_policy,
            notification_clear_after,
            bulk_policy,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Platform data directory for persisted state.
fn default_state_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("dancemode"))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse an absolute http(s) base URL.
fn parse_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}
