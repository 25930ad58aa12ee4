use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use holocron::DEFAULT_API_URL;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Base url of the SWAPI-compatible catalog
    pub api_url: ConfigValue<String>,
    /// Directory holding the local overlay
    pub data_dir: ConfigValue<PathBuf>,
    /// Request timeout in seconds
    pub timeout_secs: ConfigValue<u64>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    api_url: Option<String>,
    data_dir: Option<PathBuf>,
    timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut api_url = ConfigValue::new(DEFAULT_API_URL.to_string(), ConfigSource::Default);
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut timeout_secs = ConfigValue::new(DEFAULT_TIMEOUT_SECS, ConfigSource::Default);
        let mut config_file = None;

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(url) = file_config.api_url {
                api_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(secs) = file_config.timeout_secs {
                timeout_secs = ConfigValue::new(secs, ConfigSource::File);
            }
        }

        if let Ok(url) = std::env::var("HOLOCRON_API_URL") {
            api_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Ok(dir) = std::env::var("HOLOCRON_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(secs) = std::env::var("HOLOCRON_TIMEOUT_SECS") {
            let secs = secs
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue("HOLOCRON_TIMEOUT_SECS", secs.clone()))?;
            timeout_secs = ConfigValue::new(secs, ConfigSource::Environment);
        }

        Ok(Self {
            api_url,
            data_dir,
            timeout_secs,
            config_file,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/holocron/
    /// - macOS: ~/Library/Application Support/holocron/
    /// - Windows: %APPDATA%/holocron/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("holocron")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/holocron/
    /// - macOS: ~/Library/Application Support/holocron/
    /// - Windows: %APPDATA%/holocron/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("holocron")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(name, value) => {
                write!(f, "Invalid value for {}: '{}'", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
