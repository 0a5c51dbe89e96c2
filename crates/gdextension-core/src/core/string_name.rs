use crate::core::error::GdResult;
use crate::core::interface::interface;
use crate::internal::opaque::Opaque;
use crate::types::enums::VariantType;
use gdextension_sys::*;
use std::ffi::CString;
use std::fmt;

/// An owned host `StringName`.
///
/// The buffer is initialized by the host from UTF-8 and released through the
/// host's `STRING_NAME` destructor when dropped. String names are the host's
/// interned identifiers: class names, method names, property names.
///
/// `StringName` is `repr(transparent)` over the host buffer, so a pointer the
/// host hands to a callback can be viewed as `&StringName` via
/// [`StringName::borrow_sys`] without taking ownership.
#[repr(transparent)]
pub struct StringName {
    opaque: Opaque<GDEXTENSION_STRING_NAME_SIZE>,
}

impl StringName {
    /// Creates a string name from UTF-8 text.
    ///
    /// # Errors
    /// Fails if `text` contains a NUL byte or the host does not provide
    /// `string_name_new_with_utf8_chars`.
    pub fn new(text: &str) -> GdResult<Self> {
        let ctor = interface()?.string_name_new_with_utf8_chars()?;
        let text = CString::new(text)?;
        let mut opaque = Opaque::uninit();
        unsafe { ctor(opaque.as_mut_ptr(), text.as_ptr()) };
        Ok(Self { opaque })
    }

    /// Views a host-owned string name.
    ///
    /// # Safety
    /// `ptr` must point to an initialized `StringName` that outlives `'a`.
    pub unsafe fn borrow_sys<'a>(ptr: GDExtensionConstStringNamePtr) -> &'a StringName {
        unsafe { &*(ptr as *const StringName) }
    }

    pub fn as_ptr(&self) -> GDExtensionConstStringNamePtr {
        self.opaque.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> GDExtensionStringNamePtr {
        self.opaque.as_mut_ptr()
    }

    /// Compares two names with the host's `StringName == StringName` evaluator.
    pub fn equals(&self, other: &StringName) -> GdResult<bool> {
        let eq = interface()?.string_name_equal()?;
        let mut result: GDExtensionBool = GDEXTENSION_FALSE;
        unsafe {
            eq(
                self.as_ptr(),
                other.as_ptr(),
                &mut result as *mut GDExtensionBool as GDExtensionTypePtr,
            )
        };
        Ok(result != GDEXTENSION_FALSE)
    }
}

#[cfg(test)]
impl StringName {
    /// A buffer the host never saw, for tests that run without an interface.
    pub(crate) fn detached() -> Self {
        Self { opaque: Opaque::uninit() }
    }
}

impl PartialEq for StringName {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other).unwrap_or(false)
    }
}

impl Drop for StringName {
    fn drop(&mut self) {
        let destructor = interface().and_then(|iface| iface.ptr_destructor(VariantType::StringName));
        match destructor {
            Ok(destroy) => unsafe { destroy(self.as_mut_ptr()) },
            Err(err) => tracing::warn!("leaking StringName: {err}"),
        }
    }
}

impl fmt::Debug for StringName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringName").field("ptr", &self.as_ptr()).finish()
    }
}
