//! Typed accessor for a discovered descriptor field

use std::marker::PhantomData;

use uelayout_engine::{offset_address, safe_read, Scalar};
use uelayout_sdk::LayoutField;

use super::ReflectionLayout;

/// A value of type `T` stored at a discovered offset inside a descriptor
///
/// The offset is looked up through the [`ReflectionLayout`] on every access,
/// which triggers discovery for the field's kind the first time.
///
/// # Example
///
/// ```ignore
/// const SUPER_STRUCT: DescriptorField<usize> = DescriptorField::new(LayoutField::SuperStruct);
///
/// let parent = SUPER_STRUCT.get(&layout, descriptor);
/// ```
pub struct DescriptorField<T> {
    field: LayoutField,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Scalar> DescriptorField<T> {
    pub const fn new(field: LayoutField) -> Self {
        Self {
            field,
            _marker: PhantomData,
        }
    }

    /// The layout field this accessor reads
    pub const fn field(&self) -> LayoutField {
        self.field
    }

    /// Address of the field inside `descriptor`
    pub fn address(&self, layout: &ReflectionLayout, descriptor: usize) -> Option<usize> {
        offset_address(descriptor, layout.offset(self.field))
    }

    /// Read the field from `descriptor`; `None` if the read faults
    pub fn get(&self, layout: &ReflectionLayout, descriptor: usize) -> Option<T> {
        safe_read::<T>(layout.target().memory(), self.address(layout, descriptor)?)
    }
}

impl<T> Clone for DescriptorField<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DescriptorField<T> {}

impl<T> std::fmt::Debug for DescriptorField<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptorField")
            .field("field", &self.field)
            .finish()
    }
}
