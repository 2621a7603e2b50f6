//! Runtime settings.
//!
//! Settings come from a TOML document with every field optional, then
//! `KEYCALC_*` environment variables override individual values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// How the API token is presented in the `Authorization` header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    #[default]
    Bearer,
    Token,
    Basic,
    /// The bare token, no scheme prefix
    Raw,
}

impl AuthScheme {
    /// Header value for `token` under this scheme.
    pub fn header_value(&self, token: &str) -> String {
        match self {
            Self::Bearer => format!("Bearer {token}"),
            Self::Token => format!("Token {token}"),
            Self::Basic => format!("Basic {token}"),
            Self::Raw => token.to_string(),
        }
    }

    /// Next scheme to try after an authorization failure.
    /// The order is bearer, token, raw, basic; basic is the last resort.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Bearer => Some(Self::Token),
            Self::Token => Some(Self::Raw),
            Self::Raw => Some(Self::Basic),
            Self::Basic => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bearer" => Some(Self::Bearer),
            "token" => Some(Self::Token),
            "basic" => Some(Self::Basic),
            "raw" | "direct" => Some(Self::Raw),
            _ => None,
        }
    }
}

/// Calculator client settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the arithmetic/history API
    pub api_base_url: String,
    /// API token; empty means no `Authorization` header
    pub api_token: String,
    pub auth_scheme: AuthScheme,
    /// Try other auth schemes after a 401
    pub rotate_auth_on_unauthorized: bool,
    /// Automatic retries after a failed call
    pub request_retries: u32,
    /// Per-attempt transport timeout; unset means calls wait indefinitely
    pub request_timeout_secs: Option<u64>,
    /// Maximum number of ledger entries
    pub history_limit: usize,
    /// Seconds the error display stays before everything is cleared
    pub error_clear_secs: u64,
    /// Where the local history snapshot is written
    pub snapshot_path: PathBuf,
    /// WebSocket URL of the live rate feed, if any
    pub rate_feed_url: Option<String>,
    pub reconnect_delay_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5001/api/calculator".to_string(),
            api_token: String::new(),
            auth_scheme: AuthScheme::Bearer,
            rotate_auth_on_unauthorized: false,
            request_retries: 1,
            request_timeout_secs: None,
            history_limit: crate::core::DEFAULT_HISTORY_LIMIT,
            error_clear_secs: 5,
            snapshot_path: PathBuf::from("calculator-history.json"),
            rate_feed_url: None,
            reconnect_delay_secs: 3,
        }
    }
}

impl Settings {
    /// Parse settings from TOML. Missing fields keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML file, then apply environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings = Self::from_toml_str(&text)?;
        settings.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        settings.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Apply `KEYCALC_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("KEYCALC_API_BASE_URL") {
            self.api_base_url = url;
        }
        if let Some(token) = lookup("KEYCALC_API_TOKEN") {
            self.api_token = token;
        }
        if let Some(scheme) = lookup("KEYCALC_AUTH_SCHEME") {
            self.auth_scheme =
                AuthScheme::parse(&scheme).ok_or_else(|| ConfigError::InvalidValue {
                    key: "KEYCALC_AUTH_SCHEME".to_string(),
                    value: scheme.clone(),
                })?;
        }
        if let Some(path) = lookup("KEYCALC_SNAPSHOT_PATH") {
            self.snapshot_path = PathBuf::from(path);
        }
        if let Some(url) = lookup("KEYCALC_RATE_FEED_URL") {
            self.rate_feed_url = Some(url).filter(|u| !u.is_empty());
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn error_clear_after(&self) -> Duration {
        Duration::from_secs(self.error_clear_secs)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }
}
