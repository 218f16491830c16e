//! FFI boundary
//!
//! - [`exports`] - `extern "C"` functions called by the host
//! - [`callbacks`] - host lookups adapted to the engine traits

pub mod callbacks;
pub mod exports;

pub use callbacks::{FfiLocator, FfiNameResolver, FindObjectFn, ResolveNameFn};
