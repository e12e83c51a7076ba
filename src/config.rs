//! Runtime configuration
//!
//! Loaded from `{config_dir}/recall/config.toml`. Every field is optional:
//!
//! ```toml
//! data_dir = "/var/lib/recall"
//! due_limit = 20
//! max_commit_retries = 3
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecallConfig {
    /// Where cards and API keys are stored (default: platform local data dir)
    pub data_dir: Option<PathBuf>,
    /// Number of due cards returned when the caller gives no limit
    pub due_limit: usize,
    /// How many times a review is recomputed after losing a concurrent commit
    pub max_commit_retries: u32,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            due_limit: default_due_limit(),
            max_commit_retries: 3,
        }
    }
}

fn default_due_limit() -> usize {
    20
}

impl RecallConfig {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("recall").join("config.toml"))
    }

    /// Load from `path`, or from the default location when `None`.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            log::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config = Self::from_toml(&content)?;
        log::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        if config.due_limit == 0 {
            return Err(ConfigError::Invalid("due_limit must be positive".to_string()));
        }
        Ok(config)
    }

    /// Resolved data directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_local_dir()
                .map(|p| p.join("recall"))
                .ok_or(ConfigError::DataDirNotFound),
        }
    }
}
