//! `UClass::ClassDefaultObject` discovery

use uelayout_engine::{is_safe_pointer, offset_address, safe_read, BaseClasses};

use super::{pointer_steps, LayoutBruteforcer};

impl LayoutBruteforcer<'_> {
    /// Find the default object offset
    ///
    /// At the right offset every base class descriptor points at an object
    /// whose class pointer leads back to that descriptor.
    #[tracing::instrument(skip_all)]
    pub fn find_default_object(&self, bases: &BaseClasses) -> Option<usize> {
        let found = pointer_steps(self.scan.header_size, self.scan.ceiling)
            .find(|&offset| bases.iter().all(|class| self.owns_default_object(class, offset)))?;

        tracing::info!("[UClass] Found DefaultObject at offset {:#x}", found);
        Some(found)
    }

    fn owns_default_object(&self, class: usize, offset: usize) -> bool {
        let Some(object) = self.read_ptr_at(class, offset) else {
            return false;
        };
        if object == class || !is_safe_pointer(self.memory, object) {
            return false;
        }

        offset_address(object, self.scan.class_offset)
            .and_then(|at| safe_read::<usize>(self.memory, at))
            == Some(class)
    }
}
