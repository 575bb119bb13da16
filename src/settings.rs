//! Runtime settings loaded from the environment.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::config_utils;

/// Default ceiling for one shortening call
pub const DEFAULT_SHORTEN_TIMEOUT_SECS: u64 = 10;
/// Default ceiling for one upload call; hosts may fetch the file before answering
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a data directory; set MULTIUPLOADER_DATA_DIR")]
    NoDataDir,
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Holds `shorteners.json`, `uploads.json` and `logs.json`
    pub data_dir: PathBuf,
    /// Rolling log files; `None` disables file logging
    pub logs_dir: Option<PathBuf>,
    pub shorten_timeout: Duration,
    pub upload_timeout: Duration,
    /// Name written to the upload log when the command does not supply one
    pub log_user: String,
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or no data
    /// directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = match optional_env("MULTIUPLOADER_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => config_utils::default_data_dir().ok_or(ConfigError::NoDataDir)?,
        };

        Ok(Self {
            data_dir,
            logs_dir: optional_env("MULTIUPLOADER_LOG_DIR")
                .map(PathBuf::from)
                .or_else(config_utils::default_logs_dir),
            shorten_timeout: Duration::from_secs(parse_env_u64(
                "SHORTEN_TIMEOUT_SECS",
                DEFAULT_SHORTEN_TIMEOUT_SECS,
            )?),
            upload_timeout: Duration::from_secs(parse_env_u64(
                "UPLOAD_TIMEOUT_SECS",
                DEFAULT_UPLOAD_TIMEOUT_SECS,
            )?),
            log_user: optional_env("MULTIUPLOADER_USER")
                .or_else(|| optional_env("USER"))
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    /// Settings rooted at an explicit data directory, with default timeouts
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            logs_dir: None,
            shorten_timeout: Duration::from_secs(DEFAULT_SHORTEN_TIMEOUT_SECS),
            upload_timeout: Duration::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECS),
            log_user: "unknown".to_string(),
        }
    }

    /// # Errors
    ///
    /// Returns an error if either timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shorten_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "SHORTEN_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.upload_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "UPLOAD_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn shorteners_file(&self) -> PathBuf {
        self.data_dir.join("shorteners.json")
    }

    pub fn uploaders_file(&self) -> PathBuf {
        self.data_dir.join("uploads.json")
    }

    pub fn upload_log_file(&self) -> PathBuf {
        self.data_dir.join("logs.json")
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}
