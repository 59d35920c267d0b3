//! Runtime configuration passed into the assistant.
//!
//! # Responsibility
//! - Resolve the data directory and log level from the environment.
//! - Derive every on-disk path from one data directory.
//!
//! # Invariants
//! - `data_dir` is always absolute after [`AppConfig::from_env`].

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DATA_DIR: &str = "SHACO_DATA_DIR";
pub const ENV_LOG_LEVEL: &str = "SHACO_LOG_LEVEL";
pub const ENV_HISTORY_LIMIT: &str = "SHACO_HISTORY_LIMIT";

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_HISTORY_LIMIT: usize = 10;
const NOTES_FILE_NAME: &str = "notes.json";
const JOBS_FILE_NAME: &str = "jobs.json";
const LOG_DIR_NAME: &str = "logs";
const ACTIVITY_LOG_FILE_NAME: &str = "activity.log";

/// Configuration errors surfaced before the main loop starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
    CurrentDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => write!(f, "invalid value for {key}: `{value}`"),
            Self::CurrentDir(message) => {
                write!(f, "cannot resolve current directory: {message}")
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Root of all persisted state.
    pub data_dir: PathBuf,
    /// Diagnostic log level (`trace|debug|info|warn|error`).
    pub log_level: String,
    /// Default entry count for `history` without an argument.
    pub history_limit: usize,
}

impl AppConfig {
    /// Builds a config rooted at `data_dir` with defaults for the rest.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            log_level: default_log_level().to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Reads `SHACO_DATA_DIR`, `SHACO_LOG_LEVEL` and `SHACO_HISTORY_LIMIT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(|err| ConfigError::CurrentDir(err.to_string()))?;

        let data_dir = lookup(ENV_DATA_DIR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let data_dir = absolutize(&cwd, &data_dir);

        let mut config = Self::new(data_dir);

        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|value| !value.trim().is_empty()) {
            let normalized = normalize_level(&level).map_err(|_| ConfigError::InvalidValue {
                key: ENV_LOG_LEVEL,
                value: level.clone(),
            })?;
            config.log_level = normalized.to_string();
        }

        if let Some(limit) = lookup(ENV_HISTORY_LIMIT).filter(|value| !value.trim().is_empty()) {
            config.history_limit = limit
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidValue {
                    key: ENV_HISTORY_LIMIT,
                    value: limit.clone(),
                })?;
        }

        Ok(config)
    }

    pub fn notes_path(&self) -> PathBuf {
        self.data_dir.join(NOTES_FILE_NAME)
    }

    pub fn jobs_path(&self) -> PathBuf {
        self.data_dir.join(JOBS_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }

    pub fn activity_log_path(&self) -> PathBuf {
        self.log_dir().join(ACTIVITY_LOG_FILE_NAME)
    }
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
