//! The host function table.
//!
//! Every host entry point the extension uses is looked up by name through the
//! `get_proc_address` resolver handed to the entry symbol. The table is
//! resolved once and then shared process-wide; a name the host does not know
//! is only reported when something actually tries to call it.

use crate::core::error::{GdError, GdResult};
use crate::types::enums::{VariantOperator, VariantType};
use gdextension_sys::*;
use std::os::raw::c_char;
use std::sync::OnceLock;

static INTERFACE: OnceLock<Interface> = OnceLock::new();

const BUILTIN_SLOTS: usize = VariantType::Max as usize + 1;

/// Unwraps the `Option<fn>` typedefs produced for the C header.
pub trait HostFn {
    type Fn: Copy;

    fn require(self, name: &'static str) -> GdResult<Self::Fn>;
}

impl<F: Copy> HostFn for Option<F> {
    type Fn = F;

    fn require(self, name: &'static str) -> GdResult<F> {
        self.ok_or(GdError::MissingInterfaceFunction(name))
    }
}

pub type PtrDestructorFn = <GDExtensionPtrDestructor as HostFn>::Fn;
pub type VariantFromTypeFn = <GDExtensionVariantFromTypeConstructorFunc as HostFn>::Fn;
pub type TypeFromVariantFn = <GDExtensionTypeFromVariantConstructorFunc as HostFn>::Fn;
pub type PtrOperatorEvaluatorFn = <GDExtensionPtrOperatorEvaluator as HostFn>::Fn;

/// Per-type builtin helpers, resolved on first use.
struct BuiltinCache {
    destructors: [OnceLock<PtrDestructorFn>; BUILTIN_SLOTS],
    from_type: [OnceLock<VariantFromTypeFn>; BUILTIN_SLOTS],
    to_type: [OnceLock<TypeFromVariantFn>; BUILTIN_SLOTS],
    string_name_equal: OnceLock<PtrOperatorEvaluatorFn>,
}

impl Default for BuiltinCache {
    fn default() -> Self {
        Self {
            destructors: std::array::from_fn(|_| OnceLock::new()),
            from_type: std::array::from_fn(|_| OnceLock::new()),
            to_type: std::array::from_fn(|_| OnceLock::new()),
            string_name_equal: OnceLock::new(),
        }
    }
}

fn cached<F: Copy>(slot: &OnceLock<F>, resolve: impl FnOnce() -> GdResult<F>) -> GdResult<F> {
    if let Some(f) = slot.get() {
        return Ok(*f);
    }
    let f = resolve()?;
    Ok(*slot.get_or_init(|| f))
}

macro_rules! interface_table {
    ($( $name:ident : $ty:ty ),* $(,)?) => {
        /// Resolved host functions plus lazily cached builtin helpers.
        pub struct Interface {
            $( $name: $ty, )*
            builtins: BuiltinCache,
        }

        impl Interface {
            /// Resolves every host function this crate knows about.
            ///
            /// # Safety
            /// `get_proc_address` must be the resolver the host passed to the
            /// entry symbol, and must return pointers with the signatures
            /// declared in `gdextension-sys`.
            pub unsafe fn load(get_proc_address: GDExtensionInterfaceGetProcAddress) -> GdResult<Self> {
                let resolve = get_proc_address.ok_or(GdError::NullPointer)?;
                Ok(Self {
                    $(
                        $name: unsafe {
                            let raw = resolve(concat!(stringify!($name), "\0").as_ptr() as *const c_char);
                            if raw.is_none() {
                                tracing::debug!(function = stringify!($name), "host does not provide interface function");
                            }
                            std::mem::transmute::<GDExtensionInterfaceFunctionPtr, $ty>(raw)
                        },
                    )*
                    builtins: BuiltinCache::default(),
                })
            }

            $(
                pub fn $name(&self) -> GdResult<<$ty as HostFn>::Fn> {
                    self.$name.require(stringify!($name))
                }
            )*

            /// Names of the interface functions the host did not provide.
            pub fn missing_functions(&self) -> Vec<&'static str> {
                let mut missing = Vec::new();
                $(
                    if self.$name.is_none() {
                        missing.push(stringify!($name));
                    }
                )*
                missing
            }
        }
    };
}

interface_table! {
    get_godot_version: GDExtensionInterfaceGetGodotVersion,
    variant_get_ptr_utility_function: GDExtensionInterfaceVariantGetPtrUtilityFunction,
    string_name_new_with_utf8_chars: GDExtensionInterfaceStringNameNewWithUtf8Chars,
    string_new_with_utf8_chars: GDExtensionInterfaceStringNewWithUtf8Chars,
    variant_get_ptr_destructor: GDExtensionInterfaceVariantGetPtrDestructor,
    global_get_singleton: GDExtensionInterfaceGlobalGetSingleton,
    classdb_get_method_bind: GDExtensionInterfaceClassdbGetMethodBind,
    object_method_bind_call: GDExtensionInterfaceObjectMethodBindCall,
    object_method_bind_ptrcall: GDExtensionInterfaceObjectMethodBindPtrcall,
    get_variant_from_type_constructor: GDExtensionInterfaceGetVariantFromTypeConstructor,
    get_variant_to_type_constructor: GDExtensionInterfaceGetVariantToTypeConstructor,
    variant_new_nil: GDExtensionInterfaceVariantNewNil,
    variant_get_type: GDExtensionInterfaceVariantGetType,
    variant_destroy: GDExtensionInterfaceVariantDestroy,
    variant_evaluate: GDExtensionInterfaceVariantEvaluate,
    variant_get_ptr_operator_evaluator: GDExtensionInterfaceVariantGetPtrOperatorEvaluator,
    classdb_construct_object: GDExtensionInterfaceClassdbConstructObject,
    classdb_register_extension_class2: GDExtensionInterfaceClassdbRegisterExtensionClass2,
    classdb_unregister_extension_class: GDExtensionInterfaceClassdbUnregisterExtensionClass,
    object_set_instance: GDExtensionInterfaceObjectSetInstance,
}

impl Interface {
    /// Resolves the table and stores it process-wide.
    ///
    /// The host loads a library once, so the first table installed is kept and
    /// later calls return it unchanged.
    ///
    /// # Safety
    /// Same contract as [`Interface::load`].
    pub unsafe fn install(
        get_proc_address: GDExtensionInterfaceGetProcAddress,
    ) -> GdResult<&'static Interface> {
        if let Some(existing) = INTERFACE.get() {
            return Ok(existing);
        }
        let loaded = unsafe { Interface::load(get_proc_address)? };
        Ok(INTERFACE.get_or_init(|| loaded))
    }

    /// Destructor for a builtin type held in an opaque buffer.
    pub fn ptr_destructor(&self, ty: VariantType) -> GdResult<PtrDestructorFn> {
        cached(&self.builtins.destructors[ty as usize], || {
            let get = self.variant_get_ptr_destructor()?;
            unsafe { get(ty.sys()) }.ok_or(GdError::NullPointer)
        })
    }

    /// Constructor wrapping a builtin value of type `ty` into a variant.
    pub fn variant_from_type(&self, ty: VariantType) -> GdResult<VariantFromTypeFn> {
        cached(&self.builtins.from_type[ty as usize], || {
            let get = self.get_variant_from_type_constructor()?;
            unsafe { get(ty.sys()) }.ok_or(GdError::NullPointer)
        })
    }

    /// Constructor extracting a builtin value of type `ty` out of a variant.
    pub fn variant_to_type(&self, ty: VariantType) -> GdResult<TypeFromVariantFn> {
        cached(&self.builtins.to_type[ty as usize], || {
            let get = self.get_variant_to_type_constructor()?;
            unsafe { get(ty.sys()) }.ok_or(GdError::NullPointer)
        })
    }

    /// Pointer evaluator for `op` over two builtin types.
    pub fn operator_evaluator(
        &self,
        op: VariantOperator,
        left: VariantType,
        right: VariantType,
    ) -> GdResult<PtrOperatorEvaluatorFn> {
        let get = self.variant_get_ptr_operator_evaluator()?;
        unsafe { get(op.sys(), left.sys(), right.sys()) }.ok_or(GdError::NullPointer)
    }

    /// `StringName == StringName`, cached since property and virtual lookups hit it constantly.
    pub fn string_name_equal(&self) -> GdResult<PtrOperatorEvaluatorFn> {
        cached(&self.builtins.string_name_equal, || {
            self.operator_evaluator(
                VariantOperator::Equal,
                VariantType::StringName,
                VariantType::StringName,
            )
        })
    }
}

/// The installed interface.
pub fn interface() -> GdResult<&'static Interface> {
    INTERFACE.get().ok_or(GdError::InterfaceNotInitialized)
}
