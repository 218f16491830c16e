//! Target session
//!
//! Bundles the three capabilities the discovery engine needs to talk to one
//! target: memory, object lookup and name resolution. A session is cheap to
//! clone and can be shared between threads.

use std::fmt;
use std::sync::Arc;

use crate::locator::{NameResolver, ObjectLocator};
use crate::memory::MemoryAccessor;

/// Capabilities for one target process
#[derive(Clone)]
pub struct TargetSession {
    /// Fault-tolerant memory reader
    pub memory: Arc<dyn MemoryAccessor>,

    /// Object registry lookups
    pub locator: Arc<dyn ObjectLocator>,

    /// Name table lookups
    pub names: Arc<dyn NameResolver>,
}

impl TargetSession {
    /// Create a new session
    pub fn new(
        memory: Arc<dyn MemoryAccessor>,
        locator: Arc<dyn ObjectLocator>,
        names: Arc<dyn NameResolver>,
    ) -> Self {
        Self {
            memory,
            locator,
            names,
        }
    }

    /// Memory accessor as a trait object reference
    pub fn memory(&self) -> &dyn MemoryAccessor {
        &*self.memory
    }

    /// Name resolver as a trait object reference
    pub fn names(&self) -> &dyn NameResolver {
        &*self.names
    }

    /// Object locator as a trait object reference
    pub fn locator(&self) -> &dyn ObjectLocator {
        &*self.locator
    }
}

impl fmt::Debug for TargetSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetSession").finish_non_exhaustive()
    }
}
