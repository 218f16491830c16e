//! Configuration for uelayout
//!
//! This module provides the TOML configuration for the discovery engine:
//! - Scan window bounds ([`ScanConfig`])
//! - Debug logging switch
//! - Optional gamedata (fallback offsets) path override
//!
//! # Example
//!
//! ```toml
//! version = 1
//! debug = false
//!
//! [scan]
//! header_size = 0x28
//! class_offset = 0x10
//! super_struct_ceiling = 0x100
//! ceiling = 0x300
//! field_window = 0x100
//! ```

mod loader;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uelayout_sdk::uobject::{POINTER_SIZE, UOBJECT_CLASS_OFFSET, UOBJECT_HEADER_SIZE};

pub use loader::{core_config_path, gamedata_path, uelayout_base_dir};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Could not determine config directory from the host executable
    #[error("Config directory not available - could not resolve host executable path")]
    NoConfigDirectory,

    /// Scan bounds are inconsistent
    #[error("Invalid scan window: {0}")]
    InvalidScanWindow(String),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Bounds of every offset search
///
/// All windows are half-open byte ranges relative to the descriptor being
/// scanned. Nothing outside them is ever read from a landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Size of the fixed object header; scans start here
    pub header_size: usize,

    /// Offset of the class pointer in the object header
    pub class_offset: usize,

    /// End of the super struct search
    pub super_struct_ceiling: usize,

    /// End of the children, default object and struct-ops searches
    pub ceiling: usize,

    /// End of the inner searches inside a field list element
    pub field_window: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            header_size: UOBJECT_HEADER_SIZE,
            class_offset: UOBJECT_CLASS_OFFSET,
            super_struct_ceiling: 0x100,
            ceiling: 0x300,
            field_window: 0x100,
        }
    }
}

impl ScanConfig {
    /// Check that the windows are non-empty, nested and pointer aligned
    pub fn validate(&self) -> ConfigResult<()> {
        for (name, value) in [
            ("header_size", self.header_size),
            ("super_struct_ceiling", self.super_struct_ceiling),
            ("ceiling", self.ceiling),
        ] {
            if value % POINTER_SIZE != 0 {
                return Err(ConfigError::InvalidScanWindow(format!(
                    "{} {:#x} is not pointer aligned",
                    name, value
                )));
            }
        }
        if self.super_struct_ceiling <= self.header_size || self.ceiling <= self.header_size {
            return Err(ConfigError::InvalidScanWindow(format!(
                "ceilings ({:#x}, {:#x}) must be above header_size {:#x}",
                self.super_struct_ceiling, self.ceiling, self.header_size
            )));
        }
        if self.super_struct_ceiling > self.ceiling {
            return Err(ConfigError::InvalidScanWindow(format!(
                "super_struct_ceiling {:#x} exceeds ceiling {:#x}",
                self.super_struct_ceiling, self.ceiling
            )));
        }
        if self.field_window <= POINTER_SIZE {
            return Err(ConfigError::InvalidScanWindow(format!(
                "field_window {:#x} is too small",
                self.field_window
            )));
        }
        if self.class_offset + POINTER_SIZE > self.header_size {
            return Err(ConfigError::InvalidScanWindow(format!(
                "class_offset {:#x} lies outside the header",
                self.class_offset
            )));
        }
        Ok(())
    }
}

/// Core configuration.
///
/// Loaded from `<host exe dir>/uelayout/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// Gamedata file with fallback offsets (defaults next to the config)
    pub gamedata: Option<PathBuf>,

    /// Scan window bounds
    pub scan: ScanConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            gamedata: None,
            scan: ScanConfig::default(),
        }
    }
}

impl CoreConfig {
    /// Load core config from the default path, creating it if missing.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(core_config_path()?)
    }

    /// Load config from `path`, creating a default file if missing.
    pub fn load_from<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            config.scan.validate()?;
            tracing::debug!("Loaded core config from {:?}", path);
            Ok(config)
        } else {
            let default = Self::default();
            default.save_to(path)?;
            tracing::info!("Created default core config at {:?}", path);
            Ok(default)
        }
    }

    /// Save config to the default path.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(core_config_path()?)
    }

    /// Save config to `path`, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved core config to {:?}", path);
        Ok(())
    }

    /// Reload config from `path`.
    pub fn reload_from<P: AsRef<Path>>(&mut self, path: P) -> ConfigResult<()> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        config.scan.validate()?;
        *self = config;
        tracing::debug!("Reloaded core config from {:?}", path.as_ref());
        Ok(())
    }

    /// Gamedata path: the override, or the default next to the config
    pub fn gamedata_path(&self) -> ConfigResult<PathBuf> {
        match &self.gamedata {
            Some(path) => Ok(path.clone()),
            None => gamedata_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("uelayout-config-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_core_config_default() {
        let config = CoreConfig::default();
        assert_eq!(config.version, 1);
        assert!(!config.debug);
        assert_eq!(config.scan.ceiling, 0x300);
        assert_eq!(config.scan.header_size, 0x28);
        assert!(config.scan.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: CoreConfig = toml::from_str("debug = true\n[scan]\nceiling = 0x200\n").unwrap();
        assert!(config.debug);
        assert_eq!(config.scan.ceiling, 0x200);
        assert_eq!(config.scan.super_struct_ceiling, 0x100);
    }

    #[test]
    fn test_invalid_scan_window() {
        let scan = ScanConfig {
            ceiling: 0x20,
            ..ScanConfig::default()
        };
        assert!(matches!(
            scan.validate(),
            Err(ConfigError::InvalidScanWindow(_))
        ));

        let misaligned = ScanConfig {
            header_size: 0x2c,
            ..ScanConfig::default()
        };
        assert!(misaligned.validate().is_err());
    }

    #[test]
    fn test_scan_ceilings_checked() {
        let unaligned = ScanConfig {
            ceiling: 0x2fc,
            ..ScanConfig::default()
        };
        assert!(matches!(
            unaligned.validate(),
            Err(ConfigError::InvalidScanWindow(msg)) if msg.contains("ceiling 0x2fc")
        ));

        let inverted = ScanConfig {
            super_struct_ceiling: 0x200,
            ceiling: 0x180,
            ..ScanConfig::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::InvalidScanWindow(msg)) if msg.contains("exceeds ceiling")
        ));

        let equal = ScanConfig {
            super_struct_ceiling: 0x300,
            ..ScanConfig::default()
        };
        assert!(equal.validate().is_ok());
        assert!(ScanConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_creates_default_then_reads_back() {
        let path = scratch_path("create/config.toml");
        let _ = std::fs::remove_file(&path);

        let created = CoreConfig::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.version, 1);

        let mut edited = created.clone();
        edited.debug = true;
        edited.scan.field_window = 0x80;
        edited.save_to(&path).unwrap();

        let loaded = CoreConfig::load_from(&path).unwrap();
        assert!(loaded.debug);
        assert_eq!(loaded.scan.field_window, 0x80);

        let mut reloaded = CoreConfig::default();
        reloaded.reload_from(&path).unwrap();
        assert_eq!(reloaded.scan, loaded.scan);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_gamedata_override() {
        let config = CoreConfig {
            gamedata: Some(PathBuf::from("/tmp/custom.json")),
            ..CoreConfig::default()
        };
        assert_eq!(
            config.gamedata_path().unwrap(),
            PathBuf::from("/tmp/custom.json")
        );
    }
}
