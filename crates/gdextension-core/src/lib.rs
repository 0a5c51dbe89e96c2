pub use gdextension_sys as sys;

pub mod core;
mod internal;

pub mod types;

pub use internal::ffi_guard;
pub use internal::logging;

// Re-export main types
pub mod prelude {
    pub use crate::core::class::*;
    pub use crate::core::error::{CallError, GdError, GdResult};
    pub use crate::core::extension::{ClassLibrary, Extension};
    pub use crate::core::gstring::*;
    pub use crate::core::interface::{Interface, interface};
    pub use crate::core::method_bind::*;
    pub use crate::core::object::*;
    pub use crate::core::property::*;
    pub use crate::core::string_name::*;
    pub use crate::core::utility::*;
    pub use crate::core::variant::*;
    pub use crate::core::version::*;
    pub use crate::export_extension;
    pub use crate::types::enums::*;
    pub use crate::types::math::*;
}
