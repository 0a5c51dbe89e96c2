use crate::core::error::{GdError, GdResult};
use crate::core::interface::interface;
use crate::core::string_name::StringName;
use gdextension_sys::*;
use std::os::raw::c_int;

type UtilityFn = unsafe extern "C" fn(GDExtensionTypePtr, *const GDExtensionConstTypePtr, c_int);

/// A global utility function (`@GlobalScope` math and helpers), ptr-called.
#[derive(Debug, Clone, Copy)]
pub struct UtilityFunction {
    func: UtilityFn,
}

impl UtilityFunction {
    /// Resolves a utility function by name and signature hash.
    pub fn get(name: &str, hash: i64) -> GdResult<Self> {
        let get = interface()?.variant_get_ptr_utility_function()?;
        let function_name = StringName::new(name)?;
        let func = unsafe { get(function_name.as_ptr(), hash) };
        func.map(|func| Self { func }).ok_or_else(|| GdError::UtilityNotFound {
            name: name.to_string(),
            hash,
        })
    }

    /// # Safety
    /// `args` must match the function's declared parameter types and `ret`
    /// must point to storage for its return type (or be null for `void`).
    pub unsafe fn ptrcall(&self, ret: GDExtensionTypePtr, args: &[GDExtensionConstTypePtr]) {
        unsafe { (self.func)(ret, args.as_ptr(), args.len() as c_int) }
    }

    /// Calls a `float f(float, ...)` utility. Host floats are always `double`
    /// in pointer calls.
    pub fn call_f64(&self, args: &[f64]) -> f64 {
        let arg_ptrs: Vec<GDExtensionConstTypePtr> = args
            .iter()
            .map(|arg| arg as *const f64 as GDExtensionConstTypePtr)
            .collect();
        let mut result = 0.0f64;
        unsafe { self.ptrcall(&mut result as *mut f64 as GDExtensionTypePtr, &arg_ptrs) };
        result
    }
}
