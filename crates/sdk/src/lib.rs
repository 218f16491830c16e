//! uelayout SDK - Reflection Descriptor Type Definitions
//!
//! This crate contains the vocabulary shared by every other crate: which
//! descriptor kinds exist, which of their fields we care about, the names of
//! the landmark objects used for validation, and the packed name reference.
//! It has no dependencies and compiles quickly.
//!
//! # Modules
//!
//! - [`kinds`] - Descriptor kinds and the layout fields discovered for them
//! - [`landmarks`] - Qualified names and known sizes of landmark objects
//! - [`names`] - Packed name-table references
//! - [`uobject`] - Fixed object header layout

pub mod kinds;
pub mod landmarks;
pub mod names;
pub mod uobject;

pub use kinds::*;
pub use names::FNameRef;
