//! Raw declarations of `gdextension_interface.h` (Godot 4.2).
//!
//! Everything except the constants below is generated by bindgen from the
//! header in `include/`. Nothing here has behaviour.

#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]
#![allow(non_snake_case)]
#![allow(clippy::all)]

include!(concat!(env!("OUT_DIR"), "/bindings.rs"));

use core::ffi::c_void;

pub const GDEXTENSION_TRUE: GDExtensionBool = 1;
pub const GDEXTENSION_FALSE: GDExtensionBool = 0;

// ---------------------------------------------------------------------------
// Opaque builtin sizes
// ---------------------------------------------------------------------------

/// Size in bytes of a `StringName` (a single pointer inside the host).
pub const GDEXTENSION_STRING_NAME_SIZE: usize = core::mem::size_of::<*const c_void>();
/// Size in bytes of a `String` (a single pointer inside the host).
pub const GDEXTENSION_STRING_SIZE: usize = core::mem::size_of::<*const c_void>();
/// Size in bytes of a `Variant`; 40 when the host uses large world coordinates.
#[cfg(not(feature = "double-precision"))]
pub const GDEXTENSION_VARIANT_SIZE: usize = 24;
#[cfg(feature = "double-precision")]
pub const GDEXTENSION_VARIANT_SIZE: usize = 40;
