use std::env;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_STATS_API_URL: &str = "https://tip.hunt.town";
pub const DEFAULT_COMPOSER_URL: &str = "https://warpcast.com/~/compose";
pub const DEFAULT_VALIDATOR_URL: &str = "https://api.neynar.com";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings, read once at startup.
///
/// Every URL is stored without a trailing slash so callers can append paths
/// and query strings directly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Public URL of the frame endpoint. Used for self-referencing buttons.
    pub app_url: String,
    /// Base URL of the service exposing `/api/farscore`.
    pub identity_api_url: String,
    pub stats_api_url: String,
    pub composer_url: String,
    pub validator_url: String,
    /// When set, signed frame payloads are checked against the validator API.
    /// Without it the unsigned `untrustedData.fid` is accepted.
    pub neynar_api_key: Option<String>,
    pub upstream_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let upstream_timeout_secs = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::Invalid { key: "UPSTREAM_TIMEOUT_SECS", value: raw }),
            },
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        let app_url = get("APP_URL").unwrap_or_else(|| format!("http://localhost:{}", port));
        let app_url = normalize_base(app_url, "APP_URL")?;
        let identity_api_url = match get("IDENTITY_API_URL") {
            Some(raw) => normalize_base(raw, "IDENTITY_API_URL")?,
            None => app_url.clone(),
        };

        Ok(AppConfig {
            port,
            identity_api_url,
            stats_api_url: normalize_base(
                get("STATS_API_URL").unwrap_or_else(|| DEFAULT_STATS_API_URL.to_string()),
                "STATS_API_URL",
            )?,
            composer_url: normalize_base(
                get("COMPOSER_URL").unwrap_or_else(|| DEFAULT_COMPOSER_URL.to_string()),
                "COMPOSER_URL",
            )?,
            validator_url: normalize_base(
                get("VALIDATOR_URL").unwrap_or_else(|| DEFAULT_VALIDATOR_URL.to_string()),
                "VALIDATOR_URL",
            )?,
            neynar_api_key: get("NEYNAR_API_KEY"),
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            app_url,
        })
    }
}

fn normalize_base(raw: String, key: &'static str) -> Result<String, ConfigError> {
    if url::Url::parse(&raw).is_err() {
        return Err(ConfigError::Invalid { key, value: raw });
    }
    Ok(raw.trim_end_matches('/').to_string())
}
