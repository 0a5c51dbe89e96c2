use crate::core::error::{GdError, GdResult};
use crate::core::interface::interface;
use crate::core::string_name::StringName;
use gdextension_sys::*;
use std::ffi::c_void;
use std::ptr::NonNull;

/// A handle to a host object.
///
/// The host owns the object; this is only the pointer. Lifetime management
/// (queue_free, reference counting) is the host's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Object {
    inner: NonNull<c_void>,
}

impl Object {
    /// Wraps a raw host pointer, `None` for null.
    ///
    /// # Safety
    /// A non-null `ptr` must be a live host object.
    pub unsafe fn from_sys(ptr: GDExtensionObjectPtr) -> Option<Self> {
        NonNull::new(ptr).map(|inner| Self { inner })
    }

    /// Looks up an engine singleton such as `OS` or `Engine`.
    pub fn singleton(name: &str) -> GdResult<Self> {
        let name = StringName::new(name)?;
        Self::singleton_by_name(&name)
    }

    pub fn singleton_by_name(name: &StringName) -> GdResult<Self> {
        let get = interface()?.global_get_singleton()?;
        unsafe { Self::from_sys(get(name.as_ptr())) }.ok_or(GdError::NullPointer)
    }

    /// Instantiates a registered class through ClassDB.
    pub fn construct(class: &StringName) -> GdResult<Self> {
        let construct = interface()?.classdb_construct_object()?;
        unsafe { Self::from_sys(construct(class.as_ptr())) }.ok_or(GdError::NullPointer)
    }

    pub fn as_ptr(&self) -> GDExtensionObjectPtr {
        self.inner.as_ptr()
    }
}
