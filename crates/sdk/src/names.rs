//! Packed name-table references
//!
//! Names in the target are stored as a pair of indices into a global name
//! table. We never interpret the indices ourselves - they are handed to a
//! name resolver supplied by the host.

/// Packed name reference (FName)
///
/// Layout: `comparison_index: u32` followed by `number: u32`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FNameRef {
    /// Index into the name table
    pub comparison_index: u32,
    /// Instance number suffix (0 = none)
    pub number: u32,
}

impl FNameRef {
    /// Size of a packed name in target memory
    pub const SIZE: usize = 8;

    /// Create a name reference without a number suffix
    pub const fn new(comparison_index: u32) -> Self {
        Self {
            comparison_index,
            number: 0,
        }
    }

    /// Decode from little-endian target bytes
    pub fn from_le_bytes(bytes: [u8; Self::SIZE]) -> Self {
        Self {
            comparison_index: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            number: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }

    /// Encode to little-endian target bytes
    pub fn to_le_bytes(self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[..4].copy_from_slice(&self.comparison_index.to_le_bytes());
        out[4..].copy_from_slice(&self.number.to_le_bytes());
        out
    }

    /// A zero comparison index never names anything
    pub const fn is_none(&self) -> bool {
        self.comparison_index == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_little_endian() {
        let name = FNameRef::from_le_bytes([0x34, 0x12, 0, 0, 0x02, 0, 0, 0]);
        assert_eq!(name.comparison_index, 0x1234);
        assert_eq!(name.number, 2);
        assert!(!name.is_none());
    }

    #[test]
    fn test_default_is_none() {
        assert!(FNameRef::default().is_none());
    }
}
