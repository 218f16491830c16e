//! Pointer safety probes
//!
//! Checks applied to every candidate value before the discovery engine
//! dereferences it.

use uelayout_sdk::uobject::POINTER_SIZE;

use crate::memory::{safe_read, MemoryAccessor};

/// Some reflection pointers carry a flag in their lowest bit
const TAG_BIT: usize = 1;

/// Check whether `address` may be dereferenced
///
/// True iff the address is non-null, has its tag bit clear, and a
/// pointer-sized read at it succeeds.
pub fn is_safe_pointer(memory: &dyn MemoryAccessor, address: usize) -> bool {
    address != 0 && address & TAG_BIT == 0 && memory.is_readable(address, POINTER_SIZE)
}

/// Read the pointer stored at `address`, keeping it only if it is itself safe
pub fn read_safe_pointer(memory: &dyn MemoryAccessor, address: usize) -> Option<usize> {
    let value = safe_read::<usize>(memory, address)?;
    is_safe_pointer(memory, value).then_some(value)
}

/// Check whether `object` looks like a live polymorphic object
///
/// The object must be a safe pointer, its first word (the vtable) must be a
/// safe pointer, and the first vtable slot must be non-null and readable.
pub fn is_polymorphic(memory: &dyn MemoryAccessor, object: usize) -> bool {
    if !is_safe_pointer(memory, object) {
        return false;
    }

    let Some(vtable) = read_safe_pointer(memory, object) else {
        return false;
    };

    match safe_read::<usize>(memory, vtable) {
        Some(vfunc) => vfunc != 0 && memory.is_readable(vfunc, POINTER_SIZE),
        None => false,
    }
}

/// Read a pointer at `address` and keep it only if it points at a polymorphic object
pub fn read_polymorphic(memory: &dyn MemoryAccessor, address: usize) -> Option<usize> {
    let value = safe_read::<usize>(memory, address)?;
    is_polymorphic(memory, value).then_some(value)
}
