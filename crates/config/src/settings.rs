// Application settings
// Loaded from ~/.config/artview/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ConfigError;

pub const DEFAULT_API_BASE: &str = "https://api.artic.edu";
pub const DEFAULT_FIELDS: &str =
    "id,title,place_of_origin,artist_display,inscriptions,date_start,date_end";
pub const DEFAULT_PAGE_SIZE: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // API
    #[serde(rename = "api.base")]
    pub api_base: String,

    /// Comma-separated field filter; empty asks for full records
    #[serde(rename = "api.fields")]
    pub fields: String,

    #[serde(rename = "api.timeoutSecs")]
    pub timeout_secs: u64,

    // Table
    #[serde(rename = "table.pageSize")]
    pub page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // API
            api_base: DEFAULT_API_BASE.to_string(),
            fields: DEFAULT_FIELDS.to_string(),
            timeout_secs: 30,
            // Table
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("artview")
            .join("settings.json")
    }

    /// Load settings from the default location. A missing file gives defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(format!("{}: {}", path.display(), e))),
        };
        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            log::warn!("ignoring settings: {}", e);
            Self::default()
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("table.pageSize must be at least 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("api.timeoutSecs must be at least 1".into()));
        }
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api.base must be an http(s) URL, got {:?}",
                self.api_base
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Field filter, or `None` when full records are wanted
    pub fn fields_filter(&self) -> Option<&str> {
        let f = self.fields.trim();
        (!f.is_empty()).then_some(f)
    }
}
