//! Layout bruteforcing
//!
//! Each pass walks a bounded window of candidate offsets over one or more
//! landmark descriptors and keeps the first offset that satisfies a
//! consistency predicate on all of them at once. Any read fault simply
//! rejects the candidate.
//!
//! The passes only report what they found; committing offsets and tracking
//! discovery state is the job of [`crate::layout::ReflectionLayout`].

mod default_object;
mod field_list;
mod struct_ops;
mod super_struct;

use uelayout_engine::{offset_address, read_polymorphic, safe_read, MemoryAccessor, NameResolver};
use uelayout_sdk::uobject::POINTER_SIZE;

use crate::config::ScanConfig;

pub use field_list::FieldListLayout;
pub use struct_ops::{Precision, StructOpsLayout};

/// Runs discovery passes against one target
#[derive(Clone, Copy)]
pub struct LayoutBruteforcer<'a> {
    memory: &'a dyn MemoryAccessor,
    names: &'a dyn NameResolver,
    scan: &'a ScanConfig,
}

impl<'a> LayoutBruteforcer<'a> {
    pub fn new(
        memory: &'a dyn MemoryAccessor,
        names: &'a dyn NameResolver,
        scan: &'a ScanConfig,
    ) -> Self {
        Self {
            memory,
            names,
            scan,
        }
    }

    /// Scan bounds in use
    pub fn scan(&self) -> &ScanConfig {
        self.scan
    }

    /// Read the pointer stored at `base + offset`
    fn read_ptr_at(&self, base: usize, offset: usize) -> Option<usize> {
        safe_read::<usize>(self.memory, offset_address(base, offset)?)
    }

    /// Read the pointer at `base + offset` if it leads to a polymorphic object
    fn read_polymorphic_at(&self, base: usize, offset: usize) -> Option<usize> {
        read_polymorphic(self.memory, offset_address(base, offset)?)
    }
}

/// Pointer-aligned offsets in `[start, end)`
fn pointer_steps(start: usize, end: usize) -> impl Iterator<Item = usize> {
    (start..end).step_by(POINTER_SIZE)
}
