//! Config path resolution
//!
//! Handles resolving paths for configuration files based on the host
//! executable's location.

use std::path::PathBuf;

use super::{ConfigError, ConfigResult};

/// Returns the uelayout directory next to the host executable.
///
/// We are loaded into the host process, so `current_exe` is the game:
/// `<game>/Binaries/Win64/Game.exe` -> `<game>/Binaries/Win64/uelayout/`
pub fn uelayout_base_dir() -> ConfigResult<PathBuf> {
    let exe = std::env::current_exe().map_err(ConfigError::IoError)?;

    exe.parent()
        .map(|dir| dir.join("uelayout"))
        .ok_or(ConfigError::NoConfigDirectory)
}

/// Returns the core config path.
///
/// Path: `<exe dir>/uelayout/config.toml`
pub fn core_config_path() -> ConfigResult<PathBuf> {
    Ok(uelayout_base_dir()?.join("config.toml"))
}

/// Returns the default gamedata path.
///
/// Path: `<exe dir>/uelayout/gamedata.json`
pub fn gamedata_path() -> ConfigResult<PathBuf> {
    Ok(uelayout_base_dir()?.join("gamedata.json"))
}
