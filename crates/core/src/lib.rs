//! uelayout - Core Logic
//!
//! This crate contains the layout discovery engine:
//! - [`config`] - TOML configuration and scan bounds
//! - [`gamedata`] - Fallback offsets from JSON
//! - [`layout`] - Offset table, per-kind discovery state and [`ReflectionLayout`]
//! - [`bruteforce`] - The discovery passes
//! - [`descriptors`] - Typed views over descriptors using the discovered layout
//!
//! # Re-exports
//!
//! This crate re-exports the SDK and engine crates for convenience:
//! - [`sdk`] - Descriptor kinds, layout fields and landmark names
//! - [`engine`] - Target memory access and host lookups

use tracing::info;

// Re-export SDK and engine crates
pub use uelayout_engine as engine;
pub use uelayout_sdk as sdk;

pub mod bruteforce;
pub mod config;
pub mod descriptors;
pub mod gamedata;
pub mod layout;

#[cfg(test)]
mod testing;

use uelayout_engine::TargetSession;

// Re-export commonly used items
pub use bruteforce::{FieldListLayout, LayoutBruteforcer, Precision, StructOpsLayout};
pub use config::{ConfigError, ConfigResult, CoreConfig, ScanConfig};
pub use descriptors::{ClassRef, FieldIter, FieldRef, ScriptStructRef, StructRef};
pub use gamedata::{FallbackOffsets, GamedataError};
pub use layout::{DescriptorField, KindState, OffsetSource, OffsetTable, ReflectionLayout};

/// Errors while setting up a layout from configuration
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Gamedata(#[from] GamedataError),
}

/// Load the fallback offsets named by `config`
///
/// A missing gamedata file is not an error; the built-in offsets are used.
pub fn load_fallback_offsets(config: &CoreConfig) -> Result<FallbackOffsets, InitError> {
    let path = config.gamedata_path()?;
    if !path.exists() {
        info!("No gamedata at {:?}, using built-in fallback offsets", path);
        return Ok(FallbackOffsets::builtin());
    }
    Ok(FallbackOffsets::load_from_file(&path)?)
}

/// Create a layout for `target` configured by `config`
///
/// Discovery itself is lazy and starts on the first offset request.
pub fn create_layout(
    target: TargetSession,
    config: &CoreConfig,
) -> Result<ReflectionLayout, InitError> {
    config.scan.validate()?;
    let fallback = load_fallback_offsets(config)?;
    info!("uelayout ready (scan ceiling {:#x})", config.scan.ceiling);
    Ok(ReflectionLayout::new(target, config.scan, fallback))
}
