use crate::core::error::{CallError, GdError, GdResult};
use crate::core::interface::interface;
use crate::core::object::Object;
use crate::core::string_name::StringName;
use crate::core::variant::Variant;
use gdextension_sys::*;
use std::ffi::c_void;
use std::ptr::NonNull;

/// A host method, resolved from ClassDB by class, name and signature hash.
///
/// Methods can be invoked two ways:
///
/// - [`MethodBind::call`]: the generic convention. Arguments and the return
///   value are variants and the host type-checks the call, reporting problems
///   through a `GDExtensionCallError`.
/// - [`MethodBind::ptrcall`]: the direct convention. Arguments are raw pointers
///   to values of exactly the declared types; nothing is checked.
///
/// The hash is the method's signature hash from `extension_api.json`; a bind
/// resolved with the wrong hash is reported as [`GdError::MethodNotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodBind {
    inner: NonNull<c_void>,
}

// Method binds are immutable ClassDB entries that live as long as the class.
unsafe impl Send for MethodBind {}
unsafe impl Sync for MethodBind {}

impl MethodBind {
    /// Resolves `class.method` from ClassDB.
    pub fn get(class: &str, method: &str, hash: i64) -> GdResult<Self> {
        let get = interface()?.classdb_get_method_bind()?;
        let class_name = StringName::new(class)?;
        let method_name = StringName::new(method)?;
        let ptr = unsafe { get(class_name.as_ptr(), method_name.as_ptr(), hash) };
        NonNull::new(ptr as *mut c_void)
            .map(|inner| Self { inner })
            .ok_or_else(|| GdError::MethodNotFound {
                class: class.to_string(),
                method: method.to_string(),
                hash,
            })
    }

    /// Generic call. The returned variant is always owned by the caller.
    ///
    /// # Errors
    /// [`GdError::Call`] when the host rejects the call (bad argument type,
    /// wrong argument count, null instance, ...).
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn call(&self, object: Object, args: &[&Variant]) -> GdResult<Variant> {
        let call = interface()?.object_method_bind_call()?;
        let arg_ptrs: Vec<GDExtensionConstVariantPtr> = args.iter().map(|arg| arg.as_ptr()).collect();
        let mut error = GDExtensionCallError {
            error: GDExtensionCallErrorType_GDEXTENSION_CALL_OK,
            argument: 0,
            expected: 0,
        };

        let ret = unsafe {
            Variant::from_sys_init(|r_ret| {
                call(
                    self.as_ptr(),
                    object.as_ptr(),
                    arg_ptrs.as_ptr(),
                    arg_ptrs.len() as GDExtensionInt,
                    r_ret,
                    &mut error,
                )
            })
        };

        CallError::check(&error)?;
        Ok(ret)
    }

    /// Direct pointer call.
    ///
    /// # Safety
    /// Every entry of `args` must point to a value of the exact type the
    /// method declares at that position, and `ret` must be null or point to
    /// storage for the declared return type.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub unsafe fn ptrcall(
        &self,
        object: Object,
        args: &[GDExtensionConstTypePtr],
        ret: GDExtensionTypePtr,
    ) -> GdResult<()> {
        let ptrcall = interface()?.object_method_bind_ptrcall()?;
        unsafe { ptrcall(self.as_ptr(), object.as_ptr(), args.as_ptr(), ret) };
        Ok(())
    }

    pub fn as_ptr(&self) -> GDExtensionMethodBindPtr {
        self.inner.as_ptr()
    }
}
