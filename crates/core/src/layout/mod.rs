//! Reflection layout
//!
//! [`ReflectionLayout`] is the entry point for consumers: ask it for a
//! [`LayoutField`](uelayout_sdk::LayoutField) offset and it runs the owning
//! kind's discovery pass once, then serves the offset from its
//! [`OffsetTable`].

mod context;
mod field;
mod table;

pub use context::ReflectionLayout;
pub use field::DescriptorField;
pub use table::{Claim, ClaimGuard, KindState, OffsetSource, OffsetTable};
