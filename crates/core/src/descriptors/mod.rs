//! Descriptor views
//!
//! Thin typed wrappers around descriptor addresses that read through the
//! discovered layout. All reads are fault-tolerant: a bad link ends a walk
//! instead of crashing it.

mod class;
mod field;
mod ustruct;

pub use class::{ClassRef, ScriptStructRef};
pub use field::{FieldIter, FieldRef};
pub use ustruct::StructRef;
