//! uelayout engine - Target Access
//!
//! This crate handles:
//! - Fault-tolerant reads of the target's memory ([`MemoryAccessor`], [`safe_read`])
//! - Pointer safety probes applied before every heuristic dereference
//! - The host-provided object locator and name resolver
//! - Loading the landmark descriptors discovery validates against
//!
//! # Architecture
//!
//! The three capabilities are bundled in a [`TargetSession`] and injected
//! into the discovery engine. Nothing in this crate holds global state, so
//! several targets (or a live target and a synthetic one) can coexist.
//!
//! # Testing
//!
//! The `mock` feature exposes [`mock::SyntheticMemory`], [`mock::MapLocator`]
//! and [`mock::MapNameResolver`] for building synthetic targets.

pub mod error;
pub mod landmarks;
pub mod locator;
pub mod memory;
pub mod probe;
pub mod process;
pub mod session;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{LandmarkError, ReadFault};
pub use landmarks::{load_landmarks, AggregatePair, BaseClasses, ClassChain, LandmarkSet};
pub use locator::{read_name, read_name_at, NameResolver, ObjectLocator};
pub use memory::{offset_address, safe_read, MemoryAccessor, Scalar};
pub use probe::{is_polymorphic, is_safe_pointer, read_polymorphic, read_safe_pointer};
pub use process::LocalMemory;
pub use session::TargetSession;
