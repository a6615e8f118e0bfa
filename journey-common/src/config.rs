//! Configuration loading
//!
//! Resolution priority (highest first):
//! 1. Command-line arguments (applied by the server binary)
//! 2. Environment variables
//! 3. TOML config file
//! 4. Compiled defaults
//!
//! A missing TOML file is not an error. Missing credentials are not an error
//! at load time either: they surface as [`Error::Config`] when an operation
//! that needs them runs, so the service can still start and report the
//! problem per request.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 5730;
pub const DEFAULT_API_BASE_URL: &str = "https://photoslibrary.googleapis.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Environment variable names
pub mod env_keys {
    pub const CLIENT_ID: &str = "GOOGLE_CLIENT_ID";
    pub const CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";
    pub const REDIRECT_URI: &str = "GOOGLE_REDIRECT_URI";
    pub const REFRESH_TOKEN: &str = "GOOGLE_REFRESH_TOKEN";
    pub const ALBUM_ID: &str = "GOOGLE_PHOTOS_ALBUM_ID";
    pub const CRON_SECRET: &str = "CRON_SECRET";
    pub const DEV_MODE: &str = "JOURNEY_DEV_MODE";
    pub const DATABASE_PATH: &str = "JOURNEY_DATABASE_PATH";
    pub const PORT: &str = "JOURNEY_PORT";
}

/// OAuth client settings for the offline refresh-token exchange
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    /// Long-lived offline refresh credential
    pub refresh_token: Option<String>,
    pub token_url: String,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            redirect_uri: None,
            refresh_token: None,
            token_url: DEFAULT_TOKEN_URL.to_string(),
        }
    }
}

/// Validated OAuth credentials, ready for a token exchange
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: Option<String>,
    pub refresh_token: String,
    pub token_url: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Full service configuration
///
/// Passed explicitly into the photo source and the sync aggregator so tests
/// can run with fake credentials and album ids.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub oauth: OAuthConfig,
    /// Shared album to sync
    pub album_id: Option<String>,
    /// Bearer secret the scheduled trigger must present
    pub cron_secret: Option<String>,
    /// Photos Library API base URL
    pub api_base_url: String,
    pub http_timeout_secs: u64,
    /// Allows triggering sync with a plain GET and no secret
    pub dev_mode: bool,
    pub port: u16,
    pub database_path: PathBuf,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            oauth: OAuthConfig::default(),
            album_id: None,
            cron_secret: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            dev_mode: false,
            port: DEFAULT_PORT,
            database_path: default_database_path(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load TOML (explicit path or the default location) and apply environment overrides
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_toml_file(path)?,
            None => match default_config_file() {
                Some(path) if path.exists() => Self::from_toml_file(&path)?,
                _ => {
                    info!("No config file found, using defaults and environment");
                    Self::default()
                }
            },
        };

        config.apply_env();
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse TOML content
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Apply process environment overrides
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| is_set(v));

        if let Some(v) = get(env_keys::CLIENT_ID) {
            self.oauth.client_id = Some(v);
        }
        if let Some(v) = get(env_keys::CLIENT_SECRET) {
            self.oauth.client_secret = Some(v);
        }
        if let Some(v) = get(env_keys::REDIRECT_URI) {
            self.oauth.redirect_uri = Some(v);
        }
        if let Some(v) = get(env_keys::REFRESH_TOKEN) {
            self.oauth.refresh_token = Some(v);
        }
        if let Some(v) = get(env_keys::ALBUM_ID) {
            self.album_id = Some(v);
        }
        if let Some(v) = get(env_keys::CRON_SECRET) {
            self.cron_secret = Some(v);
        }
        if let Some(v) = get(env_keys::DEV_MODE) {
            self.dev_mode = matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(v) = get(env_keys::DATABASE_PATH) {
            self.database_path = PathBuf::from(v);
        }
        if let Some(v) = get(env_keys::PORT) {
            match v.parse() {
                Ok(port) => self.port = port,
                Err(_) => warn!("Ignoring invalid {}={}", env_keys::PORT, v),
            }
        }
    }

    /// Album id, or a configuration error if unset
    pub fn require_album_id(&self) -> Result<&str> {
        self.album_id
            .as_deref()
            .filter(|v| is_set(v))
            .ok_or_else(|| Error::Config("Album ID not configured".to_string()))
    }

    /// Trigger secret, or a configuration error if unset
    pub fn require_cron_secret(&self) -> Result<&str> {
        self.cron_secret
            .as_deref()
            .filter(|v| is_set(v))
            .ok_or_else(|| Error::Config("Cron secret not configured".to_string()))
    }

    /// OAuth credentials, or a configuration error naming what is missing
    pub fn require_oauth(&self) -> Result<OAuthCredentials> {
        let field = |value: &Option<String>, name: &str| {
            value
                .clone()
                .filter(|v| is_set(v))
                .ok_or_else(|| Error::Config(format!("OAuth {} not configured", name)))
        };

        Ok(OAuthCredentials {
            client_id: field(&self.oauth.client_id, "client id")?,
            client_secret: field(&self.oauth.client_secret, "client secret")?,
            redirect_uri: self.oauth.redirect_uri.clone().filter(|v| is_set(v)),
            refresh_token: field(&self.oauth.refresh_token, "refresh token")?,
            token_url: self.oauth.token_url.clone(),
        })
    }
}

/// Non-empty, non-whitespace
fn is_set(value: &str) -> bool {
    !value.trim().is_empty()
}

/// `~/.config/journey-map/config.toml` (platform equivalent elsewhere)
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("journey-map").join("config.toml"))
}

/// `~/.local/share/journey-map/journey.db` (platform equivalent elsewhere)
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("journey-map"))
        .unwrap_or_else(|| PathBuf::from("./journey_data"))
        .join("journey.db")
}
