//! Host callbacks adapted to the engine's lookup traits

use std::ffi::{c_char, CString};

use uelayout_engine::{NameResolver, ObjectLocator};
use uelayout_sdk::FNameRef;

/// Look up an object by fully-qualified name; returns 0 if not found
pub type FindObjectFn = unsafe extern "C" fn(qualified_name: *const c_char) -> usize;

/// Write the string for a name reference into `buffer`
///
/// Returns the number of bytes written (no terminator needed), or 0 if the
/// reference is invalid. Must validate `comparison_index` itself.
pub type ResolveNameFn = unsafe extern "C" fn(
    comparison_index: u32,
    number: u32,
    buffer: *mut c_char,
    capacity: usize,
) -> usize;

/// Longest name the resolver callback may return
const NAME_CAPACITY: usize = 1024;

/// [`ObjectLocator`] backed by a host callback
pub struct FfiLocator {
    find: FindObjectFn,
}

impl FfiLocator {
    pub fn new(find: FindObjectFn) -> Self {
        Self { find }
    }
}

impl ObjectLocator for FfiLocator {
    fn find(&self, qualified_name: &str) -> Option<usize> {
        let name = CString::new(qualified_name).ok()?;
        // SAFETY: the host guarantees `find` accepts any NUL-terminated string.
        let address = unsafe { (self.find)(name.as_ptr()) };
        (address != 0).then_some(address)
    }
}

/// [`NameResolver`] backed by a host callback
pub struct FfiNameResolver {
    resolve: ResolveNameFn,
}

impl FfiNameResolver {
    pub fn new(resolve: ResolveNameFn) -> Self {
        Self { resolve }
    }
}

impl NameResolver for FfiNameResolver {
    fn resolve(&self, name: FNameRef) -> Option<String> {
        let mut buffer = [0u8; NAME_CAPACITY];
        // SAFETY: `buffer` is valid for `NAME_CAPACITY` bytes for the whole call.
        let len = unsafe {
            (self.resolve)(
                name.comparison_index,
                name.number,
                buffer.as_mut_ptr() as *mut c_char,
                buffer.len(),
            )
        };

        let bytes = buffer.get(..len).filter(|bytes| !bytes.is_empty())?;
        Some(String::from_utf8_lossy(bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    unsafe extern "C" fn find_vector(name: *const c_char) -> usize {
        match CStr::from_ptr(name).to_str() {
            Ok("ScriptStruct /Script/CoreUObject.Vector") => 0x5000,
            _ => 0,
        }
    }

    unsafe extern "C" fn resolve_axis(
        index: u32,
        _number: u32,
        buffer: *mut c_char,
        capacity: usize,
    ) -> usize {
        let name: &[u8] = match index {
            1 => b"X",
            2 => b"Y",
            // Claims more than fits
            3 => return capacity + 1,
            _ => return 0,
        };
        std::ptr::copy_nonoverlapping(name.as_ptr(), buffer as *mut u8, name.len());
        name.len()
    }

    #[test]
    fn test_ffi_locator() {
        let locator = FfiLocator::new(find_vector);
        assert_eq!(
            locator.find("ScriptStruct /Script/CoreUObject.Vector"),
            Some(0x5000)
        );
        assert_eq!(locator.find("Class /Script/CoreUObject.Object"), None);
        assert_eq!(locator.find("bad\0name"), None);
    }

    #[test]
    fn test_ffi_name_resolver() {
        let names = FfiNameResolver::new(resolve_axis);
        assert_eq!(names.resolve(FNameRef::new(1)).as_deref(), Some("X"));
        assert_eq!(names.resolve(FNameRef::new(2)).as_deref(), Some("Y"));
        assert_eq!(names.resolve(FNameRef::new(3)), None);
        assert_eq!(names.resolve(FNameRef::new(9)), None);
    }
}
