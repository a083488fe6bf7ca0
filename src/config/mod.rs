//! Configuration loading and management

use crate::billing::draft;
use crate::core::error::{BizResult, ConfigError};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Environment variable naming the YAML config file
pub const CONFIG_ENV_VAR: &str = "BIZBOOK_CONFIG";

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Storage collaborator settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Deadline applied to every storage call
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl StorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    pub min_password_length: usize,
    pub pbkdf2_iterations: u32,
    /// Session lifetime in hours; 0 keeps sessions until logout
    pub session_ttl_hours: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_length: 6,
            pbkdf2_iterations: 100_000,
            session_ttl_hours: 720,
        }
    }
}

impl AuthConfig {
    pub fn session_ttl(&self) -> Option<TimeDelta> {
        match self.session_ttl_hours {
            0 => None,
            hours => i64::try_from(hours).ok().and_then(TimeDelta::try_hours),
        }
    }
}

/// Defaults applied to new invoice drafts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BillingConfig {
    pub default_sac_code: String,
    pub default_gst_rate: f64,
    pub default_description: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            default_sac_code: draft::DEFAULT_SAC_CODE.to_string(),
            default_gst_rate: draft::DEFAULT_GST_RATE,
            default_description: draft::DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub billing: BillingConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> BizResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> BizResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the file named by `BIZBOOK_CONFIG`, or use defaults
    pub fn from_env() -> BizResult<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => {
                tracing::info!(path = %path, "loading configuration");
                Self::from_yaml_file(path.trim())
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn bind_addr(&self) -> BizResult<SocketAddr> {
        self.server.bind_addr.parse().map_err(|_| {
            ConfigError::InvalidValue {
                field: "server.bind_addr".to_string(),
                value: self.server.bind_addr.clone(),
                message: "expected host:port".to_string(),
            }
            .into()
        })
    }

    /// Reject values no deployment can work with
    pub fn validate(&self) -> BizResult<()> {
        self.bind_addr()?;

        if self.storage.timeout_secs == 0 {
            return Err(invalid("storage.timeout_secs", "0", "must be at least 1"));
        }
        if self.auth.min_password_length == 0 {
            return Err(invalid("auth.min_password_length", "0", "must be at least 1"));
        }
        if self.auth.pbkdf2_iterations == 0 {
            return Err(invalid("auth.pbkdf2_iterations", "0", "must be at least 1"));
        }
        let ttl_hours = self.auth.session_ttl_hours;
        if ttl_hours > 0 && self.auth.session_ttl().is_none() {
            return Err(invalid(
                "auth.session_ttl_hours",
                &ttl_hours.to_string(),
                "is too large",
            ));
        }
        let rate = self.billing.default_gst_rate;
        if !(0.0..=draft::MAX_GST_RATE).contains(&rate) {
            return Err(invalid(
                "billing.default_gst_rate",
                &rate.to_string(),
                "must be between 0 and 28",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, value: &str, message: &str) -> crate::core::BizError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
    .into()
}
