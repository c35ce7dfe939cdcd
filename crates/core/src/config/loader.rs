//! Config path resolution
//!
//! Handles resolving the default config file location from the binary.

use std::path::PathBuf;

use super::{ConfigError, ConfigResult};

/// File name of the default config
pub const CONFIG_FILE_NAME: &str = "cvardump.toml";

/// Returns the directory containing the running `cvardump` binary.
pub fn cvardump_base_dir() -> ConfigResult<PathBuf> {
    let exe = std::env::current_exe().map_err(ConfigError::IoError)?;

    exe.parent()
        .map(PathBuf::from)
        .ok_or(ConfigError::NoConfigDirectory)
}

/// Returns the default config path.
///
/// Path: `<binary dir>/cvardump.toml`
pub fn default_config_path() -> ConfigResult<PathBuf> {
    Ok(cvardump_base_dir()?.join(CONFIG_FILE_NAME))
}
