//! Struct descriptor view

use uelayout_engine::{read_name_at, read_safe_pointer};
use uelayout_sdk::uobject::UOBJECT_NAME_OFFSET;
use uelayout_sdk::LayoutField;

use super::field::{FieldIter, FieldRef};
use crate::layout::{DescriptorField, ReflectionLayout};

const SUPER_STRUCT: DescriptorField<usize> = DescriptorField::new(LayoutField::SuperStruct);
const CHILDREN: DescriptorField<usize> = DescriptorField::new(LayoutField::Children);

/// Longest super struct chain `is_a` will follow
const MAX_INHERITANCE_DEPTH: usize = 64;

/// A struct descriptor in the target
#[derive(Clone, Copy)]
pub struct StructRef<'a> {
    layout: &'a ReflectionLayout,
    address: usize,
}

impl<'a> StructRef<'a> {
    pub fn new(layout: &'a ReflectionLayout, address: usize) -> Self {
        Self { layout, address }
    }

    pub fn address(&self) -> usize {
        self.address
    }

    /// Layout used to read this descriptor
    pub fn layout(&self) -> &'a ReflectionLayout {
        self.layout
    }

    /// Object name, e.g. `Vector`
    pub fn name(&self) -> Option<String> {
        let target = self.layout.target();
        read_name_at(target.memory(), target.names(), self.address, UOBJECT_NAME_OFFSET)
    }

    /// Parent struct, if any
    pub fn super_struct(&self) -> Option<StructRef<'a>> {
        let at = SUPER_STRUCT.address(self.layout, self.address)?;
        read_safe_pointer(self.layout.target().memory(), at)
            .map(|parent| Self::new(self.layout, parent))
    }

    /// True if `ancestor` is this struct or one of its parents
    pub fn is_a(&self, ancestor: usize) -> bool {
        let mut current = Some(*self);
        for _ in 0..MAX_INHERITANCE_DEPTH {
            match current {
                Some(s) if s.address == ancestor => return true,
                Some(s) => current = s.super_struct(),
                None => return false,
            }
        }
        false
    }

    /// Head of the field list
    pub fn children(&self) -> Option<FieldRef<'a>> {
        let at = CHILDREN.address(self.layout, self.address)?;
        read_safe_pointer(self.layout.target().memory(), at)
            .map(|field| FieldRef::new(self.layout, field))
    }

    /// Iterate the field list
    pub fn fields(&self) -> FieldIter<'a> {
        FieldIter::new(self.children())
    }

    /// Find a field by name
    pub fn find_field(&self, name: &str) -> Option<FieldRef<'a>> {
        self.fields().find(|field| field.name().as_deref() == Some(name))
    }
}

impl std::fmt::Debug for StructRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructRef")
            .field("address", &format_args!("{:#x}", self.address))
            .finish()
    }
}
