use crate::core::error::GdResult;
use crate::core::interface::interface;
use crate::internal::opaque::Opaque;
use crate::types::enums::VariantType;
use gdextension_sys::*;
use std::ffi::CString;
use std::fmt;

/// An owned host `String`, released through the `STRING` destructor on drop.
#[repr(transparent)]
pub struct GString {
    opaque: Opaque<GDEXTENSION_STRING_SIZE>,
}

impl GString {
    /// Creates a host string from UTF-8 text.
    pub fn new(text: &str) -> GdResult<Self> {
        let ctor = interface()?.string_new_with_utf8_chars()?;
        let text = CString::new(text)?;
        let mut opaque = Opaque::uninit();
        unsafe { ctor(opaque.as_mut_ptr(), text.as_ptr()) };
        Ok(Self { opaque })
    }

    pub fn as_ptr(&self) -> GDExtensionConstStringPtr {
        self.opaque.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> GDExtensionStringPtr {
        self.opaque.as_mut_ptr()
    }
}

impl Drop for GString {
    fn drop(&mut self) {
        let destructor = interface().and_then(|iface| iface.ptr_destructor(VariantType::String));
        match destructor {
            Ok(destroy) => unsafe { destroy(self.as_mut_ptr()) },
            Err(err) => tracing::warn!("leaking String: {err}"),
        }
    }
}

impl fmt::Debug for GString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GString").field("ptr", &self.as_ptr()).finish()
    }
}
