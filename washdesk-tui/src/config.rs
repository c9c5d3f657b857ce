//! Configuration loading for the washdesk console.
//!
//! All fields are required unless explicitly marked optional. No defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use washdesk_client::RestConfig;

pub const CONFIG_ENV: &str = "WASHDESK_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    pub api_base_url: String,
    pub auth: AuthConfig,
    pub request_timeout_ms: u64,
    pub tick_interval_ms: u64,
    pub page_size: u32,
    pub persistence_path: PathBuf,
    pub log_path: PathBuf,
    pub export_dir: PathBuf,
    pub currency_code: String,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    pub api_key: Option<String>,
    pub jwt: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or WASHDESK_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: &str) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.to_string(),
        }
    }
}

impl TuiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api_base_url.trim();
        if base.is_empty() {
            return Err(ConfigError::invalid("api_base_url", "must not be empty"));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "api_base_url",
                "must start with http:// or https://",
            ));
        }
        if self.auth.api_key.is_none() && self.auth.jwt.is_none() {
            return Err(ConfigError::invalid(
                "auth",
                "api_key or jwt must be provided",
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::invalid("request_timeout_ms", "must be > 0"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::invalid("tick_interval_ms", "must be > 0"));
        }
        if self.page_size == 0 || self.page_size > 200 {
            return Err(ConfigError::invalid("page_size", "must be between 1 and 200"));
        }
        if self.persistence_path.as_os_str().is_empty() {
            return Err(ConfigError::invalid("persistence_path", "must not be empty"));
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(ConfigError::invalid("log_path", "must not be empty"));
        }
        if self.export_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid("export_dir", "must not be empty"));
        }
        if self.currency_code.trim().len() != 3 {
            return Err(ConfigError::invalid(
                "currency_code",
                "must be a 3-letter code",
            ));
        }
        if self.theme.name.to_ascii_lowercase() != "synthbrute" {
            return Err(ConfigError::invalid(
                "theme.name",
                "only 'synthbrute' is supported",
            ));
        }
        Ok(())
    }

    pub fn rest_config(&self) -> RestConfig {
        RestConfig {
            base_url: self.api_base_url.clone(),
            timeout_ms: self.request_timeout_ms,
            api_key: self.auth.api_key.clone(),
            bearer_token: self.auth.jwt.clone(),
        }
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV).ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
