//! Error types for target memory access and landmark loading

/// A read from target memory that could not be completed
///
/// Faults are ordinary values here: discovery treats every fault as a
/// rejected candidate and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReadFault {
    /// Address was null
    #[error("Null address")]
    Null,

    /// Address range wraps around the end of the address space
    #[error("Read of {len} bytes at {address:#x} overflows the address space")]
    Overflow { address: usize, len: usize },

    /// Some byte of the range is unmapped or not readable
    #[error("Address {0:#x} is not readable")]
    Unreadable(usize),
}

/// Error type for landmark lookups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LandmarkError {
    /// A required landmark object was not found by the object locator
    #[error("Landmark not found: {0}")]
    NotFound(&'static str),
}
