//! Field list element view

use uelayout_engine::{read_name, read_safe_pointer};
use uelayout_sdk::{FNameRef, LayoutField};

use crate::layout::{DescriptorField, ReflectionLayout};

const NAME: DescriptorField<FNameRef> = DescriptorField::new(LayoutField::FieldName);
const NEXT: DescriptorField<usize> = DescriptorField::new(LayoutField::FieldNext);

/// Longest field list `FieldIter` will walk
const MAX_FIELDS: usize = 1024;

/// An element of a struct's field list
#[derive(Clone, Copy)]
pub struct FieldRef<'a> {
    layout: &'a ReflectionLayout,
    address: usize,
}

impl<'a> FieldRef<'a> {
    pub fn new(layout: &'a ReflectionLayout, address: usize) -> Self {
        Self { layout, address }
    }

    pub fn address(&self) -> usize {
        self.address
    }

    pub fn name(&self) -> Option<String> {
        let target = self.layout.target();
        let at = NAME.address(self.layout, self.address)?;
        read_name(target.memory(), target.names(), at)
    }

    /// Next sibling in the list
    pub fn next(&self) -> Option<FieldRef<'a>> {
        let at = NEXT.address(self.layout, self.address)?;
        read_safe_pointer(self.layout.target().memory(), at)
            .map(|next| Self::new(self.layout, next))
    }
}

impl std::fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRef")
            .field("address", &format_args!("{:#x}", self.address))
            .finish()
    }
}

/// Walks a field list from its head
///
/// Stops at a null or unreadable link, on returning to the head, or after
/// `MAX_FIELDS` elements.
pub struct FieldIter<'a> {
    head: Option<usize>,
    next: Option<FieldRef<'a>>,
    remaining: usize,
}

impl<'a> FieldIter<'a> {
    pub(crate) fn new(head: Option<FieldRef<'a>>) -> Self {
        Self {
            head: head.map(|field| field.address),
            next: head,
            remaining: MAX_FIELDS,
        }
    }
}

impl<'a> Iterator for FieldIter<'a> {
    type Item = FieldRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let current = self.next.take()?;
        self.next = current
            .next()
            .filter(|next| Some(next.address) != self.head);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{World, WorldLayout};

    #[test]
    fn test_field_chain() {
        let world = World::build(WorldLayout::default());
        let [x, y, z] = world.fields;
        let (layout, _) = world.into_layout();

        let x = FieldRef::new(&layout, x);
        assert_eq!(x.name().as_deref(), Some("X"));
        let y_ref = x.next().unwrap();
        assert_eq!(y_ref.address(), y);
        assert_eq!(y_ref.next().map(|f| f.address()), Some(z));
        assert!(FieldRef::new(&layout, z).next().is_none());
    }

    #[test]
    fn test_cycle_stops_at_head() {
        let mut world = World::build(WorldLayout::default());
        let [x, _, z] = world.fields;
        world.memory.write_ptr(z + 0x20, x);
        let (layout, _) = world.into_layout();

        let count = FieldIter::new(Some(FieldRef::new(&layout, x))).count();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_self_loop_is_bounded() {
        let mut world = World::build(WorldLayout::default());
        let [_, y, _] = world.fields;
        world.memory.write_ptr(y + 0x20, y);
        let x = world.fields[0];
        let (layout, _) = world.into_layout();

        let count = FieldIter::new(Some(FieldRef::new(&layout, x))).count();
        assert_eq!(count, MAX_FIELDS);
    }
}
