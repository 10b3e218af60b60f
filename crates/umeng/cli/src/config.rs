use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use umeng_push::{Credentials, DEFAULT_HOST};

pub const APP_KEY_ENV: &str = "UMENG_APP_KEY";
pub const APP_MASTER_SECRET_ENV: &str = "UMENG_APP_MASTER_SECRET";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Config file not found at {0}")]
    NotFound(PathBuf),
    #[error("`{key}` is not set (config file or {env})")]
    MissingCredential {
        key: &'static str,
        env: &'static str,
    },
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app_key: String,
    #[serde(default)]
    pub app_master_secret: String,
    #[serde(default = "default_production_mode")]
    pub production_mode: bool,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub allow_empty_tag_filter: bool,
}

fn default_production_mode() -> bool {
    true
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load from `path`, or from the default location if none is given.
    ///
    /// An explicit path must exist. A missing default file yields defaults,
    /// so credentials can come from the environment alone.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::config_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/etc"))
            .join("umeng-push")
            .join("config.toml")
    }

    /// Override credentials with non-empty environment values.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let set = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(app_key) = set(APP_KEY_ENV) {
            self.app_key = app_key;
        }
        if let Some(secret) = set(APP_MASTER_SECRET_ENV) {
            self.app_master_secret = secret;
        }
    }

    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        if self.app_key.is_empty() {
            return Err(ConfigError::MissingCredential {
                key: "app_key",
                env: APP_KEY_ENV,
            });
        }
        if self.app_master_secret.is_empty() {
            return Err(ConfigError::MissingCredential {
                key: "app_master_secret",
                env: APP_MASTER_SECRET_ENV,
            });
        }
        Ok(Credentials::new(&self.app_key, &self.app_master_secret))
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("app_key", &self.app_key)
            .field("app_master_secret", &"<redacted>")
            .field("production_mode", &self.production_mode)
            .field("host", &self.host)
            .field("timeout_secs", &self.timeout_secs)
            .field("allow_empty_tag_filter", &self.allow_empty_tag_filter)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_key: String::new(),
            app_master_secret: String::new(),
            production_mode: default_production_mode(),
            host: default_host(),
            timeout_secs: default_timeout_secs(),
            allow_empty_tag_filter: false,
        }
    }
}
