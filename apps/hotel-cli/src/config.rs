//! # CLI Configuration
//!
//! Where the data lives and which backend stores it.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --backend flat_file                                                │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     HOTEL_BACKEND=flat_file                                            │
//! │     HOTEL_DATA_DIR=/srv/hotel                                          │
//! │     HOTEL_ARCHIVE_DIR=/srv/hotel/archive                               │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config path, or hotel.toml in the platform config dir            │
//! │     ~/.config/hotel-pos/hotel.toml (Linux)                             │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     sqlite, platform data dir, <data_dir>/archive                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # hotel.toml
//! backend = "sqlite"        # sqlite | flat_file
//! data_dir = "/srv/hotel"
//! archive_dir = "/srv/hotel/archive"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Backend
// =============================================================================

/// Which durable medium holds the hotel's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Single SQLite file, `hotel.db`.
    #[default]
    Sqlite,

    /// `hotel_data.txt` snapshot plus `customer_log.txt` sale log.
    FlatFile,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Sqlite => write!(f, "sqlite"),
            Backend::FlatFile => write!(f, "flat_file"),
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "db" => Ok(Backend::Sqlite),
            "flat_file" | "flat-file" | "flat" | "file" => Ok(Backend::FlatFile),
            other => Err(ConfigError::Invalid(format!(
                "Unknown backend: '{}'. Valid options: sqlite, flat_file",
                other
            ))),
        }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: Backend,

    /// Directory holding the database or the flat files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Where rollover archives go. Defaults to `<data_dir>/archive`.
    #[serde(default)]
    pub archive_dir: Option<PathBuf>,
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "hotel", "pos")
}

fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("hotel-data"))
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            backend: Backend::default(),
            data_dir: default_data_dir(),
            archive_dir: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// An explicit `config_path` must exist; the platform default may not.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path)),
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            let mut config = Self::default();
            config.apply_env_overrides();
            config
        })
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".into()));
        }
        if matches!(&self.archive_dir, Some(dir) if dir.as_os_str().is_empty()) {
            return Err(ConfigError::Invalid("archive_dir must not be empty".into()));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `HOTEL_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(backend) = lookup("HOTEL_BACKEND") {
            match backend.parse() {
                Ok(parsed) => {
                    debug!(backend = %backend, "Overriding backend from environment");
                    self.backend = parsed;
                }
                Err(_) => warn!(backend = %backend, "Unknown backend in environment"),
            }
        }

        if let Some(dir) = lookup("HOTEL_DATA_DIR") {
            debug!(dir = %dir, "Overriding data dir from environment");
            self.data_dir = PathBuf::from(dir);
        }

        if let Some(dir) = lookup("HOTEL_ARCHIVE_DIR") {
            self.archive_dir = Some(PathBuf::from(dir));
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("hotel.toml"))
    }

    /// Resolved archive directory.
    pub fn archive_dir(&self) -> PathBuf {
        self.archive_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("archive"))
    }

    /// SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("hotel.db")
    }
}
