pub mod ffi_guard;
pub mod logging;
pub(crate) mod opaque;
