//! uelayout Plugin - FFI Layer
//!
//! This crate provides the C ABI between a host that lives inside the target
//! process and the Rust discovery engine. It compiles to a cdylib (.so/.dll).
//!
//! The host supplies two callbacks (object lookup and name resolution),
//! calls `uelayout_init` once, then asks for offsets with
//! `uelayout_get_offset`. The C header is generated into `include/uelayout.h`.

pub mod ffi;
