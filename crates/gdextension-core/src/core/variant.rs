use crate::core::error::{GdError, GdResult};
use crate::core::gstring::GString;
use crate::core::interface::interface;
use crate::internal::opaque::Opaque;
use crate::types::enums::{VariantOperator, VariantType};
use gdextension_sys::*;
use std::fmt;
use std::mem::ManuallyDrop;

/// An owned host `Variant`.
///
/// A variant is a fixed-size tagged buffer whose layout belongs to the host;
/// every operation goes through host functions. Dropping it calls
/// `variant_destroy`.
///
/// # Borrowed variants
///
/// Callbacks such as a class `set` receive `GDExtensionConstVariantPtr`s the
/// host still owns. [`Variant::borrow_sys`] views those as `&Variant`, which
/// never runs the destructor.
///
/// # Examples
///
/// ```ignore
/// let delta = Variant::from_f64(0.016)?;
/// assert_eq!(delta.get_type()?, VariantType::Float);
/// assert_eq!(delta.try_to_f64()?, Some(0.016));
/// ```
#[repr(transparent)]
pub struct Variant {
    opaque: Opaque<GDEXTENSION_VARIANT_SIZE>,
}

impl Variant {
    /// Creates a `null` variant.
    pub fn nil() -> GdResult<Self> {
        let ctor = interface()?.variant_new_nil()?;
        Ok(unsafe { Self::from_sys_init(|dst| ctor(dst)) })
    }

    /// Wraps a float (`double` on the host side) into a variant.
    pub fn from_f64(value: f64) -> GdResult<Self> {
        let ctor = interface()?.variant_from_type(VariantType::Float)?;
        let mut value = value;
        Ok(unsafe {
            Self::from_sys_init(|dst| ctor(dst, &mut value as *mut f64 as GDExtensionTypePtr))
        })
    }

    /// Wraps a host string into a variant. The variant holds its own reference.
    pub fn from_gstring(value: &GString) -> GdResult<Self> {
        let ctor = interface()?.variant_from_type(VariantType::String)?;
        Ok(unsafe { Self::from_sys_init(|dst| ctor(dst, value.as_ptr() as GDExtensionTypePtr)) })
    }

    /// Convenience for `from_gstring(&GString::new(text)?)`.
    pub fn from_text(text: &str) -> GdResult<Self> {
        let string = GString::new(text)?;
        Self::from_gstring(&string)
    }

    /// Runs a host initializer against an uninitialized buffer.
    ///
    /// # Safety
    /// `init` must fully initialize the variant it is given.
    pub unsafe fn from_sys_init(init: impl FnOnce(GDExtensionUninitializedVariantPtr)) -> Self {
        let mut opaque = Opaque::uninit();
        init(opaque.as_mut_ptr());
        Self { opaque }
    }

    /// Views a host-owned variant.
    ///
    /// # Safety
    /// `ptr` must point to an initialized variant that outlives `'a`.
    pub unsafe fn borrow_sys<'a>(ptr: GDExtensionConstVariantPtr) -> &'a Variant {
        unsafe { &*(ptr as *const Variant) }
    }

    /// Moves this variant into host-provided uninitialized storage.
    ///
    /// # Safety
    /// `dst` must point to writable storage of `GDEXTENSION_VARIANT_SIZE` bytes
    /// that does not currently hold a live variant.
    pub unsafe fn move_into_sys(self, dst: GDExtensionUninitializedVariantPtr) {
        let this = ManuallyDrop::new(self);
        unsafe {
            std::ptr::copy_nonoverlapping(
                this.opaque.as_ptr() as *const u8,
                dst as *mut u8,
                GDEXTENSION_VARIANT_SIZE,
            )
        };
    }

    pub fn as_ptr(&self) -> GDExtensionConstVariantPtr {
        self.opaque.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> GDExtensionVariantPtr {
        self.opaque.as_mut_ptr()
    }

    pub fn get_type(&self) -> GdResult<VariantType> {
        self.sys_type().map(VariantType::from_sys)
    }

    /// The type code exactly as the host reports it, including codes this
    /// crate has no [`VariantType`] for.
    pub fn sys_type(&self) -> GdResult<GDExtensionVariantType> {
        let get_type = interface()?.variant_get_type()?;
        Ok(unsafe { get_type(self.as_ptr()) })
    }

    /// Extracts a float, or `None` if the variant holds another type.
    pub fn try_to_f64(&self) -> GdResult<Option<f64>> {
        if self.get_type()? != VariantType::Float {
            return Ok(None);
        }
        let ctor = interface()?.variant_to_type(VariantType::Float)?;
        let mut value = 0.0f64;
        unsafe {
            ctor(
                &mut value as *mut f64 as GDExtensionUninitializedTypePtr,
                self.as_ptr() as GDExtensionVariantPtr,
            )
        };
        Ok(Some(value))
    }

    /// Like [`Variant::try_to_f64`], but a type mismatch is an error.
    pub fn to_f64(&self) -> GdResult<f64> {
        match self.try_to_f64()? {
            Some(value) => Ok(value),
            None => Err(GdError::UnexpectedVariantType {
                expected: VariantType::Float,
                actual: self.get_type()?,
            }),
        }
    }

    /// Evaluates `a <op> b` on the host.
    ///
    /// Returns `None` when the host reports the operation as invalid for the
    /// operand types.
    pub fn evaluate(op: VariantOperator, a: &Variant, b: &Variant) -> GdResult<Option<Variant>> {
        let evaluate = interface()?.variant_evaluate()?;
        let mut valid: GDExtensionBool = GDEXTENSION_FALSE;
        let result = unsafe {
            Self::from_sys_init(|dst| evaluate(op.sys(), a.as_ptr(), b.as_ptr(), dst, &mut valid))
        };
        Ok((valid != GDEXTENSION_FALSE).then_some(result))
    }
}

impl Drop for Variant {
    fn drop(&mut self) {
        match interface().and_then(|iface| iface.variant_destroy()) {
            Ok(destroy) => unsafe { destroy(self.as_mut_ptr()) },
            Err(err) => tracing::warn!("leaking Variant: {err}"),
        }
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ty = self.get_type().unwrap_or(VariantType::Max);
        f.debug_struct("Variant").field("type", &ty).finish()
    }
}
