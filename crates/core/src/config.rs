//! Browser settings
//!
//! Settings live in TOML at ~/.config/s4/settings.toml. A missing file means
//! defaults; command-line flags override individual values afterwards.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Current settings schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Default deadline for the size dimension of directory stats
pub const DEFAULT_SIZE_TIMEOUT_MS: u64 = 1000;

/// Default deadline for the date dimension of directory stats
pub const DEFAULT_DATE_TIMEOUT_MS: u64 = 2000;

/// Persistent browser settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    pub schema_version: u32,

    /// Where downloads are written (working directory when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,

    /// Directory the upload picker opens in (`.` when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_start_dir: Option<PathBuf>,

    /// Deadline for summing directory sizes
    #[serde(default = "default_size_timeout")]
    pub size_timeout_ms: u64,

    /// Deadline for finding the latest modification date
    #[serde(default = "default_date_timeout")]
    pub date_timeout_ms: u64,
}

fn default_size_timeout() -> u64 {
    DEFAULT_SIZE_TIMEOUT_MS
}

fn default_date_timeout() -> u64 {
    DEFAULT_DATE_TIMEOUT_MS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            download_dir: None,
            upload_start_dir: None,
            size_timeout_ms: DEFAULT_SIZE_TIMEOUT_MS,
            date_timeout_ms: DEFAULT_DATE_TIMEOUT_MS,
        }
    }
}

impl Settings {
    /// Size-stat deadline as a Duration
    pub fn size_timeout(&self) -> Duration {
        Duration::from_millis(self.size_timeout_ms)
    }

    /// Date-stat deadline as a Duration
    pub fn date_timeout(&self) -> Duration {
        Duration::from_millis(self.date_timeout_ms)
    }

    /// Effective download directory
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Effective starting directory for the upload picker
    pub fn upload_start_dir(&self) -> PathBuf {
        self.upload_start_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Loads and saves the settings file
#[derive(Debug)]
pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    /// Create a manager for the default settings path
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".into()))?;
        Ok(Self {
            settings_path: config_dir.join("s4").join("settings.toml"),
        })
    }

    /// Create a manager for a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            settings_path: path,
        }
    }

    /// Path of the settings file
    pub fn settings_path(&self) -> &PathBuf {
        &self.settings_path
    }

    /// Load settings, falling back to defaults when the file is absent
    pub fn load(&self) -> Result<Settings> {
        if !self.settings_path.exists() {
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(&self.settings_path)?;
        let mut settings: Settings = toml::from_str(&content)?;

        if settings.schema_version < SCHEMA_VERSION {
            settings = migrate(settings);
        } else if settings.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Settings file version {} is newer than supported version {}. Please upgrade s4.",
                settings.schema_version, SCHEMA_VERSION
            )));
        }

        if settings.size_timeout_ms == 0 || settings.date_timeout_ms == 0 {
            return Err(Error::Config("stat timeouts must be greater than zero".into()));
        }

        Ok(settings)
    }

    /// Write settings, creating parent directories as needed
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(settings)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }
}

fn migrate(mut settings: Settings) -> Settings {
    // Version 0 files predate the field; the layout is otherwise identical
    settings.schema_version = SCHEMA_VERSION;
    settings
}
