//! Fixed object header layout
//!
//! Every reflected object starts with the same header. Unlike the descriptor
//! fields, this part has been stable across the engine revisions we target.
//!
//! UObjectBase layout:
//!   +0x00: vtable
//!   +0x08: ObjectFlags (u32)
//!   +0x0C: InternalIndex (i32)
//!   +0x10: ClassPrivate (UClass*)
//!   +0x18: NamePrivate (FName)
//!   +0x20: OuterPrivate (UObject*)

/// Size of a target pointer
pub const POINTER_SIZE: usize = 8;

/// Offset to ClassPrivate in UObjectBase
pub const UOBJECT_CLASS_OFFSET: usize = 0x10;

/// Offset to NamePrivate in UObjectBase
pub const UOBJECT_NAME_OFFSET: usize = 0x18;

/// Offset to OuterPrivate in UObjectBase
pub const UOBJECT_OUTER_OFFSET: usize = 0x20;

/// Size of UObjectBase - the first byte a derived descriptor can own
pub const UOBJECT_HEADER_SIZE: usize = 0x28;
