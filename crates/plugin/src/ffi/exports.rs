//! C-compatible exports called by the host

use std::ffi::{c_char, CStr};
use std::sync::{Arc, OnceLock};

use tracing::instrument;
use tracing_subscriber::EnvFilter;

use uelayout_core::{
    create_layout, ClassRef, CoreConfig, FallbackOffsets, ReflectionLayout, ScriptStructRef,
    StructRef,
};
use uelayout_engine::{LocalMemory, TargetSession};
use uelayout_sdk::{DescriptorKind, LayoutField};

use super::callbacks::{FfiLocator, FfiNameResolver, FindObjectFn, ResolveNameFn};

static VERSION: &[u8] = b"0.1.0\0";

/// Returned for unknown field or kind discriminants
pub const UELAYOUT_INVALID: u32 = u32::MAX;

/// Layout of the host process, set once by `uelayout_init`
static LAYOUT: OnceLock<ReflectionLayout> = OnceLock::new();

fn layout() -> Option<&'static ReflectionLayout> {
    LAYOUT.get()
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Initialize the discovery engine for the current process
///
/// `config_path` may be null to use `<exe dir>/uelayout/config.toml`.
/// Discovery does not run here; it starts on the first offset request.
///
/// # Safety
/// - `find_object` and `resolve_name` must stay callable for the life of the process
/// - `config_path` must be a valid null-terminated C string, or null
/// - `error` must be a valid pointer to a buffer of at least `maxlen` bytes, or null
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn uelayout_init(
    find_object: Option<FindObjectFn>,
    resolve_name: Option<ResolveNameFn>,
    config_path: *const c_char,
    error: *mut c_char,
    maxlen: usize,
) -> bool {
    let (Some(find_object), Some(resolve_name)) = (find_object, resolve_name) else {
        write_error(error, maxlen, "Host callbacks are null");
        return false;
    };

    if LAYOUT.get().is_some() {
        write_error(error, maxlen, "uelayout already initialized");
        return false;
    }

    let config = if config_path.is_null() {
        CoreConfig::load()
    } else {
        let path = CStr::from_ptr(config_path).to_string_lossy().into_owned();
        CoreConfig::load_from(&path)
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            init_logging(false);
            tracing::error!("Failed to load config: {}", e);
            write_error(error, maxlen, &format!("Config error: {}", e));
            return false;
        }
    };

    init_logging(config.debug);
    tracing::info!("uelayout loading...");

    let target = TargetSession::new(
        Arc::new(LocalMemory::new()),
        Arc::new(FfiLocator::new(find_object)),
        Arc::new(FfiNameResolver::new(resolve_name)),
    );

    let layout = match create_layout(target, &config) {
        Ok(layout) => layout,
        Err(e) => {
            tracing::error!("Failed to create layout: {}", e);
            write_error(error, maxlen, &format!("Init error: {}", e));
            return false;
        }
    };

    if LAYOUT.set(layout).is_err() {
        write_error(error, maxlen, "uelayout already initialized");
        return false;
    }

    tracing::info!("uelayout loaded successfully!");
    true
}

/// Offset of a layout field, discovering it on first use
///
/// Before `uelayout_init` the built-in fallback is returned.
#[no_mangle]
pub extern "C" fn uelayout_get_offset(field: u32) -> u32 {
    let Ok(field) = LayoutField::try_from(field) else {
        return UELAYOUT_INVALID;
    };
    match layout() {
        Some(layout) => layout.get(field),
        None => FallbackOffsets::builtin().get(field),
    }
}

/// Discovery state of a descriptor kind (0 not attempted, 1 attempting, 2 resolved, 3 failed)
#[no_mangle]
pub extern "C" fn uelayout_kind_state(kind: u32) -> u32 {
    let Ok(kind) = DescriptorKind::try_from(kind) else {
        return UELAYOUT_INVALID;
    };
    layout().map_or(0, |layout| layout.state(kind) as u32)
}

/// Run every discovery pass now instead of lazily
#[no_mangle]
#[instrument(skip_all)]
pub extern "C" fn uelayout_discover_all() {
    if let Some(layout) = layout() {
        layout.discover_all();
    }
}

/// Parent of a struct descriptor, or 0
#[no_mangle]
pub extern "C" fn uelayout_super_struct(descriptor: usize) -> usize {
    layout()
        .and_then(|layout| StructRef::new(layout, descriptor).super_struct())
        .map_or(0, |parent| parent.address())
}

/// True if `ancestor` is `descriptor` or one of its parents
#[no_mangle]
pub extern "C" fn uelayout_is_a(descriptor: usize, ancestor: usize) -> bool {
    layout().is_some_and(|layout| StructRef::new(layout, descriptor).is_a(ancestor))
}

/// Default object of a class descriptor, or 0
#[no_mangle]
pub extern "C" fn uelayout_default_object(class: usize) -> usize {
    layout()
        .and_then(|layout| ClassRef::new(layout, class).default_object())
        .unwrap_or(0)
}

/// Native size of a script struct, or 0 if it has no struct-ops table
#[no_mangle]
pub extern "C" fn uelayout_struct_size(script_struct: usize) -> i32 {
    layout().map_or(0, |layout| ScriptStructRef::new(layout, script_struct).struct_size())
}

#[no_mangle]
pub extern "C" fn uelayout_get_version() -> *const c_char {
    VERSION.as_ptr() as *const c_char
}

/// Helper to write error message to C buffer
///
/// # Safety
/// - `error` must be a valid pointer to a buffer of at least `maxlen` bytes, or null
unsafe fn write_error(error: *mut c_char, maxlen: usize, msg: &str) {
    if !error.is_null() && maxlen > 0 {
        let bytes = msg.as_bytes();
        let len = bytes.len().min(maxlen - 1);
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), error as *mut u8, len);
        *error.add(len) = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_truncates() {
        let mut buffer = [0x7f as c_char; 8];
        unsafe { write_error(buffer.as_mut_ptr(), buffer.len(), "Config error: missing") };
        let written = unsafe { CStr::from_ptr(buffer.as_ptr()) };
        assert_eq!(written.to_str().unwrap(), "Config ");

        unsafe { write_error(std::ptr::null_mut(), 8, "ignored") };
    }

    #[test]
    fn test_uninitialized_exports() {
        assert_eq!(uelayout_get_offset(LayoutField::StructOps as u32), 0xB8);
        assert_eq!(uelayout_get_offset(42), UELAYOUT_INVALID);
        assert_eq!(uelayout_kind_state(DescriptorKind::Struct as u32), 0);
        assert_eq!(uelayout_kind_state(9), UELAYOUT_INVALID);
        assert_eq!(uelayout_super_struct(0x1000), 0);
        assert!(!uelayout_is_a(0x1000, 0x1000));
        assert_eq!(uelayout_struct_size(0x1000), 0);
    }

    #[test]
    fn test_null_callbacks_rejected() {
        let mut buffer = [0 as c_char; 64];
        let ok = unsafe {
            uelayout_init(None, None, std::ptr::null(), buffer.as_mut_ptr(), buffer.len())
        };
        assert!(!ok);
        let written = unsafe { CStr::from_ptr(buffer.as_ptr()) };
        assert_eq!(written.to_str().unwrap(), "Host callbacks are null");
    }

    #[test]
    fn test_version_string() {
        let version = unsafe { CStr::from_ptr(uelayout_get_version()) };
        assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }
}
