//! Application configuration
//!
//! Settings come from `<data_dir>/config.toml` when it exists, then
//! environment overrides:
//! - `MARGINALIA_DATA_DIR` relocates the data directory
//! - `OPENAI_API_KEY` supplies the AI credential

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::FileBackend;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DATA_DIR_ENV: &str = "MARGINALIA_DATA_DIR";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Value shipped in sample env files; treated the same as no key at all
pub const API_KEY_PLACEHOLDER: &str = "your_openai_api_key_here";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Data directory not found")]
    DataDirNotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiConfig {
    /// Base URL of an OpenAI-compatible API, without `/chat/completions`
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            timeout_secs: 60,
            api_key: None,
        }
    }
}

impl AiConfig {
    /// The usable API key, if one is set and is not the placeholder
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != API_KEY_PLACEHOLDER)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub autosave_delay_ms: u64,
    pub ai: AiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            autosave_delay_ms: 3000,
            ai: AiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(toml::from_str(&content)?)
    }

    /// Resolve the data directory, load its config file and apply the
    /// environment overrides
    pub fn from_env(data_dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        let data_dir = match data_dir.or_else(|| env::var_os(DATA_DIR_ENV).map(PathBuf::from)) {
            Some(dir) => dir,
            None => FileBackend::default_data_dir().map_err(|_| ConfigError::DataDirNotFound)?,
        };

        let mut config = Self::load(&data_dir.join(CONFIG_FILE_NAME))?;
        // A data_dir set in the file relocates the store; the file itself stays put
        config.data_dir.get_or_insert(data_dir);
        config.apply_overrides(env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Apply values that take precedence over the file
    pub fn apply_overrides(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.ai.api_key = Some(key);
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => FileBackend::default_data_dir().map_err(|_| ConfigError::DataDirNotFound),
        }
    }

    /// Directory holding the note and flashcard store
    pub fn store_dir(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.data_dir()?.join("store"))
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}
