//! Shared configuration for the wiremap console.
//!
//! One TOML file plus `WIREMAP_`-prefixed environment overrides, loaded
//! through figment. Translation helpers produce the transport settings
//! and credentials the API client consumes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use wiremap_api::{TlsMode, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured -- set username and password in the config file or WIREMAP_USERNAME / WIREMAP_PASSWORD")]
    NoCredentials,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// Top-level TOML configuration for the console.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Inventory service base URL.
    #[serde(default = "default_service")]
    pub service: String,

    /// Username for the service session. When present (together with a
    /// password) the login screen is pre-filled.
    pub username: Option<String>,

    /// Password for the service session (plaintext -- prefer the
    /// `WIREMAP_PASSWORD` variable).
    pub password: Option<String>,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Log file location; the console falls back to its own default
    /// when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: default_service(),
            username: None,
            password: None,
            insecure: false,
            timeout: default_timeout(),
            log_file: None,
        }
    }
}

fn default_service() -> String {
    "http://localhost:8080".into()
}
fn default_timeout() -> u64 {
    30
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "wiremap", "wiremap").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("wiremap");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load a Config from the given file plus environment overrides.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WIREMAP_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load the full Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Translation to API settings ─────────────────────────────────────

/// Parse and validate the configured service URL.
pub fn service_url(config: &Config) -> Result<Url, ConfigError> {
    config.service.parse().map_err(|_| ConfigError::Validation {
        field: "service".into(),
        reason: format!("invalid URL: {}", config.service),
    })
}

/// Build the transport settings for the API client.
pub fn transport_config(config: &Config) -> TransportConfig {
    TransportConfig {
        tls: if config.insecure {
            TlsMode::DangerAcceptInvalid
        } else {
            TlsMode::System
        },
        timeout: Duration::from_secs(config.timeout),
        cookie_jar: None,
    }
}

/// Resolve the configured session credentials, if both halves exist.
pub fn resolve_credentials(config: &Config) -> Result<(String, SecretString), ConfigError> {
    let username = config.username.clone().ok_or(ConfigError::NoCredentials)?;
    let password = config
        .password
        .clone()
        .map(SecretString::from)
        .ok_or(ConfigError::NoCredentials)?;
    Ok((username, password))
}

// ── Tests ────────────────────────────────────────────────────────────
