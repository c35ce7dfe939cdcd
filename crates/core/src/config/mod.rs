//! Configuration for cvardump
//!
//! Settings are read from a TOML file. Every key is optional and falls back
//! to its default:
//!
//! ```toml
//! version = 1
//! debug = false
//! command = "cvarlist"
//! connect_timeout_ms = 5000
//! operation_timeout_ms = 30000
//! max_packet_size = 65536
//! ```
//!
//! The file is looked up in this order:
//! 1. The path passed on the command line (must exist)
//! 2. `cvardump.toml` next to the binary (optional)

mod loader;

use std::path::Path;
use std::time::Duration;

use cvardump_rcon::RconConfig;
use cvardump_sdk::{DEFAULT_MAX_PACKET_SIZE, MIN_PACKET_SIZE};
use serde::{Deserialize, Serialize};

pub use loader::{cvardump_base_dir, default_config_path, CONFIG_FILE_NAME};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Could not determine config directory from binary location
    #[error("Config directory not available - could not resolve binary path")]
    NoConfigDirectory,

    /// A setting is out of range
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// cvardump configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvardumpConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// Console command issued in rcon mode
    pub command: String,

    /// TCP connect timeout in milliseconds
    pub connect_timeout_ms: u64,

    /// Budget for connect + authenticate + execute in milliseconds
    pub operation_timeout_ms: u64,

    /// Largest packet size field accepted from the server
    pub max_packet_size: usize,
}

impl Default for CvardumpConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            command: "cvarlist".to_string(),
            connect_timeout_ms: 5_000,
            operation_timeout_ms: 30_000,
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
        }
    }
}

impl CvardumpConfig {
    /// Load config from an explicit path, or from the default location.
    ///
    /// An explicit path must exist. A missing default file yields the
    /// default config.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        let default_path = default_config_path()?;
        if default_path.exists() {
            Self::load_from_file(&default_path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", default_path);
            Ok(Self::default())
        }
    }

    /// Load and validate config from a TOML file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Parse and validate config from a TOML string
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every setting is usable
    pub fn validate(&self) -> ConfigResult<()> {
        if self.command.trim().is_empty() {
            return Err(ConfigError::Invalid("command must not be empty".to_string()));
        }
        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "connect_timeout_ms must be at least 1".to_string(),
            ));
        }
        if self.operation_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "operation_timeout_ms must be at least 1".to_string(),
            ));
        }
        if self.max_packet_size < MIN_PACKET_SIZE {
            return Err(ConfigError::Invalid(format!(
                "max_packet_size must be at least {}, got {}",
                MIN_PACKET_SIZE, self.max_packet_size
            )));
        }
        Ok(())
    }

    /// Session settings derived from this config
    pub fn rcon_config(&self) -> RconConfig {
        RconConfig {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            operation_timeout: Duration::from_millis(self.operation_timeout_ms),
            max_packet_size: self.max_packet_size,
        }
    }
}
