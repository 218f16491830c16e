//! `UStruct::SuperStruct` discovery

use uelayout_engine::ClassChain;

use super::{pointer_steps, LayoutBruteforcer};

impl LayoutBruteforcer<'_> {
    /// Find the super struct offset
    ///
    /// The class chain `Object <- Field <- Struct <- Class` must hold at the
    /// same offset in all three derived class descriptors.
    #[tracing::instrument(skip_all)]
    pub fn find_super_struct(&self, chain: &ClassChain) -> Option<usize> {
        let links = [
            (chain.class_class, chain.struct_class),
            (chain.struct_class, chain.field_class),
            (chain.field_class, chain.object_class),
        ];

        let found = pointer_steps(self.scan.header_size, self.scan.super_struct_ceiling).find(
            |&offset| {
                links
                    .iter()
                    .all(|&(child, parent)| self.read_ptr_at(child, offset) == Some(parent))
            },
        )?;

        tracing::info!("[UStruct] Found SuperStruct at offset {:#x}", found);
        Some(found)
    }
}
