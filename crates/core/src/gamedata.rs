//! Gamedata: fallback offsets loaded from JSON
//!
//! Every layout field starts out with a fallback offset guessed from earlier
//! engine revisions. The built-in values can be overridden per platform with
//! a gamedata.json deployed next to the config, so a new game build can be
//! supported without recompiling:
//!
//! ```json
//! {
//!     "UStruct::SuperStruct": { "offsets": { "windows": 64, "linux": 64 } },
//!     "UScriptStruct::StructOps": { "offsets": { "windows": 184 } }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use uelayout_sdk::LayoutField;

/// Errors that can occur when loading gamedata
#[derive(Debug, Error)]
pub enum GamedataError {
    #[error("Failed to read gamedata file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse gamedata JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid offset for {field}: {value}")]
    InvalidOffset { field: String, value: i64 },
}

/// Platform-specific offset entry
#[derive(Debug, Deserialize)]
pub struct OffsetEntry {
    /// Windows offset value
    pub windows: Option<i64>,
    /// Linux offset value
    pub linux: Option<i64>,
}

impl OffsetEntry {
    /// Offset for the platform we were built for
    pub fn current(&self) -> Option<i64> {
        #[cfg(target_os = "linux")]
        let offset = self.linux;

        #[cfg(target_os = "windows")]
        let offset = self.windows;

        #[cfg(not(any(target_os = "linux", target_os = "windows")))]
        let offset: Option<i64> = None;

        offset
    }
}

#[derive(Debug, Deserialize)]
struct GamedataEntry {
    offsets: OffsetEntry,
}

/// Fallback offset for every layout field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackOffsets {
    offsets: [u32; LayoutField::COUNT],
}

impl Default for FallbackOffsets {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FallbackOffsets {
    /// Offsets of the last engine revision we know about
    pub const fn builtin() -> Self {
        let mut offsets = [0u32; LayoutField::COUNT];
        offsets[LayoutField::SuperStruct.index()] = 0x40;
        offsets[LayoutField::Children.index()] = 0x48;
        offsets[LayoutField::FieldName.index()] = 0x28;
        offsets[LayoutField::FieldNext.index()] = 0x20;
        offsets[LayoutField::DefaultObject.index()] = 0x118;
        offsets[LayoutField::StructOps.index()] = 0xB8;
        Self { offsets }
    }

    /// Load gamedata from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, GamedataError> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content)
    }

    /// Load gamedata from a JSON string on top of the built-in defaults
    ///
    /// Unknown keys are skipped with a warning. Entries without a value for
    /// this platform keep the built-in offset.
    pub fn load_from_str(json: &str) -> Result<Self, GamedataError> {
        let raw: HashMap<String, GamedataEntry> = serde_json::from_str(json)?;

        let mut fallback = Self::builtin();
        let mut overridden = 0;

        for (name, entry) in raw {
            let Some(field) = LayoutField::from_key(&name) else {
                tracing::warn!("Unknown gamedata key: {}", name);
                continue;
            };
            let Some(value) = entry.offsets.current() else {
                continue;
            };
            let offset = u32::try_from(value).map_err(|_| GamedataError::InvalidOffset {
                field: name.clone(),
                value,
            })?;

            fallback.set(field, offset);
            overridden += 1;
        }

        tracing::info!("Loaded gamedata: {} fallback offsets overridden", overridden);

        Ok(fallback)
    }

    /// Fallback offset of `field`
    pub fn get(&self, field: LayoutField) -> u32 {
        self.offsets[field.index()]
    }

    /// Replace the fallback offset of `field`
    pub fn set(&mut self, field: LayoutField, offset: u32) {
        self.offsets[field.index()] = offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_offsets() {
        let fallback = FallbackOffsets::builtin();
        assert_eq!(fallback.get(LayoutField::SuperStruct), 0x40);
        assert_eq!(fallback.get(LayoutField::Children), 0x48);
        assert_eq!(fallback.get(LayoutField::FieldNext), 0x20);
        assert_eq!(fallback.get(LayoutField::FieldName), 0x28);
        assert_eq!(fallback.get(LayoutField::DefaultObject), 0x118);
        assert_eq!(fallback.get(LayoutField::StructOps), 0xB8);
    }

    #[test]
    fn test_override_for_current_platform() {
        let json = r#"{
            "UStruct::SuperStruct": { "offsets": { "windows": 56, "linux": 56 } },
            "UClass::DefaultObject": { "offsets": { "windows": 296, "linux": 296 } },
            "UField::Next": { "offsets": {} }
        }"#;

        let fallback = FallbackOffsets::load_from_str(json).unwrap();

        #[cfg(any(target_os = "linux", target_os = "windows"))]
        {
            assert_eq!(fallback.get(LayoutField::SuperStruct), 0x38);
            assert_eq!(fallback.get(LayoutField::DefaultObject), 0x128);
        }
        assert_eq!(fallback.get(LayoutField::FieldNext), 0x20);
        assert_eq!(fallback.get(LayoutField::StructOps), 0xB8);
    }

    #[test]
    fn test_unknown_key_is_skipped() {
        let json = r#"{ "UObject::Flags": { "offsets": { "windows": 8, "linux": 8 } } }"#;
        let fallback = FallbackOffsets::load_from_str(json).unwrap();
        assert_eq!(fallback, FallbackOffsets::builtin());
    }

    #[cfg(any(target_os = "linux", target_os = "windows"))]
    #[test]
    fn test_negative_offset_rejected() {
        let json = r#"{ "UStruct::Children": { "offsets": { "windows": -8, "linux": -8 } } }"#;
        assert!(matches!(
            FallbackOffsets::load_from_str(json),
            Err(GamedataError::InvalidOffset { value: -8, .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            FallbackOffsets::load_from_str("{ not json"),
            Err(GamedataError::ParseError(_))
        ));
    }
}
