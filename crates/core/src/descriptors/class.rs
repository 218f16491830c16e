//! Class and script struct descriptor views

use uelayout_engine::{offset_address, read_safe_pointer, safe_read};
use uelayout_sdk::uobject::POINTER_SIZE;
use uelayout_sdk::LayoutField;

use super::StructRef;
use crate::layout::{DescriptorField, ReflectionLayout};

const DEFAULT_OBJECT: DescriptorField<usize> = DescriptorField::new(LayoutField::DefaultObject);
const STRUCT_OPS: DescriptorField<usize> = DescriptorField::new(LayoutField::StructOps);

/// A class descriptor in the target
#[derive(Debug, Clone, Copy)]
pub struct ClassRef<'a> {
    inner: StructRef<'a>,
}

impl<'a> ClassRef<'a> {
    pub fn new(layout: &'a ReflectionLayout, address: usize) -> Self {
        Self {
            inner: StructRef::new(layout, address),
        }
    }

    pub fn as_struct(&self) -> StructRef<'a> {
        self.inner
    }

    /// The class's default object
    pub fn default_object(&self) -> Option<usize> {
        let layout = self.inner.layout();
        let at = DEFAULT_OBJECT.address(layout, self.inner.address())?;
        read_safe_pointer(layout.target().memory(), at)
    }
}

/// A script struct descriptor in the target
#[derive(Debug, Clone, Copy)]
pub struct ScriptStructRef<'a> {
    inner: StructRef<'a>,
}

impl<'a> ScriptStructRef<'a> {
    pub fn new(layout: &'a ReflectionLayout, address: usize) -> Self {
        Self {
            inner: StructRef::new(layout, address),
        }
    }

    pub fn as_struct(&self) -> StructRef<'a> {
        self.inner
    }

    /// The struct-ops table, if the struct has one
    pub fn struct_ops(&self) -> Option<usize> {
        let layout = self.inner.layout();
        let at = STRUCT_OPS.address(layout, self.inner.address())?;
        read_safe_pointer(layout.target().memory(), at)
    }

    /// Native size of the struct, or 0 without a struct-ops table
    pub fn struct_size(&self) -> i32 {
        let memory = self.inner.layout().target().memory();
        self.struct_ops()
            .and_then(|ops| offset_address(ops, POINTER_SIZE))
            .and_then(|at| safe_read::<i32>(memory, at))
            .unwrap_or(0)
    }
}
