//! Target memory access
//!
//! Every read the discovery engine makes goes through [`MemoryAccessor`].
//! Implementations never crash on bad addresses: a read either fills the
//! whole buffer or reports a [`ReadFault`].

use uelayout_sdk::uobject::POINTER_SIZE;
use uelayout_sdk::FNameRef;

use crate::error::ReadFault;

/// Read-only view of the target's address space
pub trait MemoryAccessor: Send + Sync {
    /// Fill `buf` with the bytes at `address`
    ///
    /// Must return an error instead of faulting when any byte of the range
    /// is unmapped or unreadable.
    fn read_bytes(&self, address: usize, buf: &mut [u8]) -> Result<(), ReadFault>;

    /// Check whether `len` bytes at `address` can be read
    fn is_readable(&self, address: usize, len: usize) -> bool {
        let mut scratch = [0u8; 64];
        if len <= scratch.len() {
            self.read_bytes(address, &mut scratch[..len]).is_ok()
        } else {
            let mut buf = vec![0u8; len];
            self.read_bytes(address, &mut buf).is_ok()
        }
    }

    /// Read a target pointer
    fn read_ptr(&self, address: usize) -> Result<usize, ReadFault> {
        let mut buf = [0u8; POINTER_SIZE];
        self.read_bytes(address, &mut buf)?;
        Ok(u64::from_le_bytes(buf) as usize)
    }

    /// Read a u32
    fn read_u32(&self, address: usize) -> Result<u32, ReadFault> {
        let mut buf = [0u8; 4];
        self.read_bytes(address, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Read an i32
    fn read_i32(&self, address: usize) -> Result<i32, ReadFault> {
        let mut buf = [0u8; 4];
        self.read_bytes(address, &mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }
}

/// Plain value that can be decoded from little-endian target bytes
pub trait Scalar: Copy + Send + Sync + 'static {
    /// Size in target memory
    const SIZE: usize;

    /// Decode from exactly `SIZE` bytes
    fn from_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn from_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_scalar!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

// Target pointers are always 8 bytes
impl Scalar for usize {
    const SIZE: usize = POINTER_SIZE;

    fn from_le(bytes: &[u8]) -> Self {
        <u64 as Scalar>::from_le(bytes) as usize
    }
}

impl Scalar for FNameRef {
    const SIZE: usize = FNameRef::SIZE;

    fn from_le(bytes: &[u8]) -> Self {
        let mut raw = [0u8; FNameRef::SIZE];
        raw.copy_from_slice(&bytes[..FNameRef::SIZE]);
        FNameRef::from_le_bytes(raw)
    }
}

/// Largest scalar `safe_read` can decode
const MAX_SCALAR_SIZE: usize = 16;

/// Fault-tolerant typed read
///
/// The single read primitive used by all heuristics: any fault becomes `None`.
#[inline]
pub fn safe_read<T: Scalar>(memory: &dyn MemoryAccessor, address: usize) -> Option<T> {
    let mut buf = [0u8; MAX_SCALAR_SIZE];
    let bytes = buf.get_mut(..T::SIZE)?;
    memory.read_bytes(address, bytes).ok()?;
    Some(T::from_le(bytes))
}

/// Compute `base + offset` without wrapping
#[inline]
pub fn offset_address(base: usize, offset: usize) -> Option<usize> {
    base.checked_add(offset)
}
