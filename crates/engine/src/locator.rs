//! Host-provided lookups
//!
//! The discovery engine does not know how to walk the target's object
//! registry or name table. The host supplies both through these traits.

use std::panic::{self, AssertUnwindSafe};

use uelayout_sdk::FNameRef;

use crate::memory::{offset_address, safe_read, MemoryAccessor};

/// Resolves fully-qualified object names to live addresses
pub trait ObjectLocator: Send + Sync {
    /// Find an object by its full name, e.g. `"Class /Script/CoreUObject.Struct"`
    ///
    /// The returned address must stay valid for the whole discovery pass.
    fn find(&self, qualified_name: &str) -> Option<usize>;
}

/// Converts packed name references into strings
pub trait NameResolver: Send + Sync {
    /// Resolve a name reference
    ///
    /// Called with arbitrary garbage during discovery. Implementations must
    /// validate the indices and return `None` for anything out of range.
    fn resolve(&self, name: FNameRef) -> Option<String>;
}

/// Read the packed name stored at `address` and resolve it
///
/// A fault while reading, a zero index, or a panicking resolver all yield `None`.
pub fn read_name(
    memory: &dyn MemoryAccessor,
    names: &dyn NameResolver,
    address: usize,
) -> Option<String> {
    let raw = safe_read::<FNameRef>(memory, address)?;
    if raw.is_none() {
        return None;
    }

    panic::catch_unwind(AssertUnwindSafe(|| names.resolve(raw)))
        .ok()
        .flatten()
}

/// Read the name at `object + offset`
pub fn read_name_at(
    memory: &dyn MemoryAccessor,
    names: &dyn NameResolver,
    object: usize,
    offset: usize,
) -> Option<String> {
    read_name(memory, names, offset_address(object, offset)?)
}
