//! Configuration management for crabcaps
//!
//! Settings come from an optional TOML file layered with `CRABCAPS_*`
//! environment variables (`CRABCAPS_ENUMERATION__FALLBACK_FPS=30`).

use crate::errors::CameraError;
use crate::types::FALLBACK_FPS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrabCapsConfig {
    pub enumeration: EnumerationConfig,
    pub logging: LoggingConfig,
}

/// How the platform backend is picked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendSelection {
    /// Use the extended API whenever the provider exposes it
    #[default]
    Auto,
    Legacy,
    Modern,
}

/// Enumeration behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationConfig {
    pub backend: BackendSelection,
    /// Frame rate synthesized for cameras that report none
    pub fallback_fps: u32,
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        Self {
            backend: BackendSelection::Auto,
            fallback_fps: FALLBACK_FPS,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// env_logger filter used when RUST_LOG is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: crate::DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl CrabCapsConfig {
    /// Load configuration from a TOML file plus environment overrides.
    ///
    /// A missing file is not an error; defaults fill every absent key.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CameraError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
        }

        let loaded = ::config::Config::builder()
            .add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix("CRABCAPS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize::<CrabCapsConfig>())
            .map_err(|e| CameraError::ConfigError(format!("Failed to load config: {}", e)))?;

        loaded.validate().map_err(CameraError::ConfigError)?;

        log::debug!("Loaded configuration from {:?}", path);
        Ok(loaded)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CameraError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    CameraError::ConfigError(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let toml_string = toml::to_string_pretty(self).map_err(|e| {
            CameraError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, toml_string).map_err(|e| {
            CameraError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("crabcaps.toml")
    }

    /// Load from default location, falling back to defaults on any error
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.enumeration.fallback_fps == 0 || self.enumeration.fallback_fps > 240 {
            return Err("Invalid fallback FPS (must be 1-240)".to_string());
        }
        if self.logging.filter.trim().is_empty() {
            return Err("Logging filter must not be empty".to_string());
        }
        Ok(())
    }
}
