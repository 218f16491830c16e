//! In-process memory accessor
//!
//! The target's metadata lives in our own address space (we are loaded into
//! it), so reads are local. They still must never fault: on Linux the copy goes
//! through `process_vm_readv`, which reports `EFAULT` for unmapped pages. Other
//! platforms query page protection first and copy only fully readable ranges.

use crate::error::ReadFault;
use crate::memory::MemoryAccessor;

/// Fault-tolerant reader for the current process
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalMemory;

impl LocalMemory {
    pub fn new() -> Self {
        Self
    }
}

impl MemoryAccessor for LocalMemory {
    fn read_bytes(&self, address: usize, buf: &mut [u8]) -> Result<(), ReadFault> {
        if buf.is_empty() {
            return Ok(());
        }
        if address == 0 {
            return Err(ReadFault::Null);
        }
        address.checked_add(buf.len()).ok_or(ReadFault::Overflow {
            address,
            len: buf.len(),
        })?;

        #[cfg(target_os = "linux")]
        {
            match read_vm(address, buf) {
                Ok(()) => return Ok(()),
                Err(nix::errno::Errno::EFAULT) => return Err(ReadFault::Unreadable(address)),
                // Syscall unavailable (seccomp, old kernel) - use the protection check
                Err(errno) => tracing::trace!("process_vm_readv unavailable: {}", errno),
            }
        }

        read_protected(address, buf)
    }
}

#[cfg(target_os = "linux")]
fn read_vm(address: usize, buf: &mut [u8]) -> Result<(), nix::errno::Errno> {
    use nix::sys::uio::{process_vm_readv, RemoteIoVec};
    use nix::unistd::getpid;
    use std::io::IoSliceMut;

    let len = buf.len();
    let remote = [RemoteIoVec { base: address, len }];
    let mut local = [IoSliceMut::new(buf)];

    match process_vm_readv(getpid(), &mut local, &remote)? {
        n if n == len => Ok(()),
        // Partial read: the tail crossed into an unmapped page
        _ => Err(nix::errno::Errno::EFAULT),
    }
}

/// Copy `buf.len()` bytes after confirming every page in the range is readable
fn read_protected(address: usize, buf: &mut [u8]) -> Result<(), ReadFault> {
    let len = buf.len();
    let end = address + len;
    let fault = |_| ReadFault::Unreadable(address);

    let mut cursor = address;
    for region in region::query_range(address as *const u8, len).map_err(fault)? {
        let region = region.map_err(fault)?;
        let range = region.as_range();
        if range.start > cursor || !region.is_readable() || region.is_guarded() {
            return Err(ReadFault::Unreadable(cursor));
        }
        cursor = range.end;
        if cursor >= end {
            break;
        }
    }
    if cursor < end {
        return Err(ReadFault::Unreadable(cursor));
    }

    // SAFETY: every page of [address, end) was just reported mapped and readable.
    unsafe {
        std::ptr::copy_nonoverlapping(address as *const u8, buf.as_mut_ptr(), len);
    }
    Ok(())
}
