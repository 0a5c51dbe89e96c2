//! Registration of Rust types as host classes.
//!
//! A type implementing [`ExtensionClass`] is registered under
//! [`ExtensionClass::NAME`] as a subclass of [`ExtensionClass::PARENT`]. The host
//! drives instances through the callbacks in `GDExtensionClassCreationInfo2`;
//! every callback here is a generic trampoline that recovers the Rust
//! instance and forwards to the trait.
//!
//! # Instance layout
//!
//! `create_instance` constructs the parent object, boxes an
//! [`InstanceStorage`] next to it and binds the two with `object_set_instance`.
//! The box pointer is what the host passes back as `p_instance` until
//! `free_instance`.
//!
//! # Virtual methods
//!
//! Overrides are looked up by name. The host asks
//! `get_virtual_call_data_func` once per virtual name; for every name listed
//! in [`ExtensionClass::VIRTUALS`] the answer is a pointer to that static
//! entry, which comes back on each `call_virtual_with_data_func` call and
//! selects the arm of [`ExtensionClass::call_virtual`].

use crate::core::error::{GdError, GdResult};
use crate::core::extension::ClassLibrary;
use crate::core::interface::interface;
use crate::core::object::Object;
use crate::core::property::{PropertyDef, PropertyList};
use crate::core::string_name::StringName;
use crate::core::variant::Variant;
use crate::internal::ffi_guard::{guard_void, guard_with_default};
use gdextension_sys::*;
use rustc_hash::FxHashMap;
use std::ffi::c_void;
use std::marker::PhantomData;

/// A Rust type exposed to the host as a class.
pub trait ExtensionClass: Sized + 'static {
    /// Name the class is registered under.
    const NAME: &'static str;
    /// Engine class this one extends. It must already be registered in ClassDB.
    const PARENT: &'static str;
    const PROPERTIES: &'static [PropertyDef] = &[];
    /// Virtual methods this class overrides, e.g. `"_process"`.
    const VIRTUALS: &'static [&'static str] = &[];

    /// Creates the Rust side of a new instance of `base`.
    fn init(base: Object) -> Self;

    /// Assigns a declared property. The value's type already matches the
    /// declaration. Return `false` to reject it.
    fn set_property(&mut self, _name: &str, _value: &Variant) -> GdResult<bool> {
        Ok(false)
    }

    fn get_property(&self, _name: &str) -> GdResult<Option<Variant>> {
        Ok(None)
    }

    /// Runs the override registered for `name`.
    fn call_virtual(&mut self, _name: &str, _args: VirtualArgs<'_>, _ret: GDExtensionTypePtr) -> GdResult<()> {
        Ok(())
    }
}

/// Pointer-call arguments of a virtual method invocation.
#[derive(Clone, Copy)]
pub struct VirtualArgs<'a> {
    args: *const GDExtensionConstTypePtr,
    _marker: PhantomData<&'a ()>,
}

impl VirtualArgs<'_> {
    /// Reads argument `index` as a `T`.
    ///
    /// # Safety
    /// The method must take at least `index + 1` arguments and the argument
    /// at `index` must have the ptrcall representation of `T` (`f64` for
    /// floats, `i64` for ints, ...).
    pub unsafe fn arg<T: Copy>(&self, index: usize) -> T {
        unsafe { *(*self.args.add(index) as *const T) }
    }
}

/// Per-class data the host hands back as `p_class_userdata`.
///
/// Caches the names the trampolines compare host `StringName`s against.
struct ClassInfo {
    class_name: StringName,
    parent_name: StringName,
    property_names: Vec<StringName>,
    virtual_names: Vec<StringName>,
}

impl ClassInfo {
    fn new<T: ExtensionClass>() -> GdResult<Self> {
        Ok(Self {
            class_name: StringName::new(T::NAME)?,
            parent_name: StringName::new(T::PARENT)?,
            property_names: T::PROPERTIES
                .iter()
                .map(|def| StringName::new(def.name))
                .collect::<GdResult<_>>()?,
            virtual_names: T::VIRTUALS
                .iter()
                .map(|name| StringName::new(name))
                .collect::<GdResult<_>>()?,
        })
    }

    fn position(names: &[StringName], name: &StringName) -> GdResult<Option<usize>> {
        for (i, candidate) in names.iter().enumerate() {
            if candidate.equals(name)? {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }
}

/// What `p_instance` points to.
struct InstanceStorage<T> {
    info: *const ClassInfo,
    base: Object,
    value: T,
    property_lists: FxHashMap<usize, PropertyList>,
}

impl<T> InstanceStorage<T> {
    unsafe fn from_instance<'a>(instance: GDExtensionClassInstancePtr) -> GdResult<&'a mut Self> {
        unsafe { (instance as *mut Self).as_mut() }.ok_or(GdError::NullPointer)
    }

    fn info(&self) -> &ClassInfo {
        unsafe { &*self.info }
    }
}

unsafe fn class_info<'a>(userdata: *mut c_void) -> GdResult<&'a ClassInfo> {
    unsafe { (userdata as *const ClassInfo).as_ref() }.ok_or(GdError::NullPointer)
}

unsafe extern "C" fn create_instance<T: ExtensionClass>(class_userdata: *mut c_void) -> GDExtensionObjectPtr {
    guard_with_default("create_instance", std::ptr::null_mut(), || {
        let info = unsafe { class_info(class_userdata)? };
        let set_instance = interface()?.object_set_instance()?;

        let base = Object::construct(&info.parent_name)?;
        let storage = Box::new(InstanceStorage {
            info: info as *const ClassInfo,
            base,
            value: T::init(base),
            property_lists: FxHashMap::default(),
        });
        let instance = Box::into_raw(storage);
        unsafe { set_instance(base.as_ptr(), info.class_name.as_ptr(), instance.cast()) };

        tracing::debug!(class = T::NAME, object = ?base.as_ptr(), "instancing is done");
        Ok(base.as_ptr())
    })
}

unsafe extern "C" fn free_instance<T: ExtensionClass>(
    _class_userdata: *mut c_void,
    instance: GDExtensionClassInstancePtr,
) {
    guard_void("free_instance", || {
        if instance.is_null() {
            return Ok(());
        }
        let storage = unsafe { Box::from_raw(instance as *mut InstanceStorage<T>) };
        tracing::debug!(class = T::NAME, object = ?storage.base.as_ptr(), "instance freed");
        drop(storage);
        Ok(())
    })
}

unsafe extern "C" fn set_property<T: ExtensionClass>(
    instance: GDExtensionClassInstancePtr,
    name: GDExtensionConstStringNamePtr,
    value: GDExtensionConstVariantPtr,
) -> GDExtensionBool {
    guard_with_default("set", GDEXTENSION_FALSE, || {
        let storage = unsafe { InstanceStorage::<T>::from_instance(instance)? };
        let name = unsafe { StringName::borrow_sys(name) };
        let Some(index) = ClassInfo::position(&storage.info().property_names, name)? else {
            return Ok(GDEXTENSION_FALSE);
        };
        let def = &T::PROPERTIES[index];
        let value = unsafe { Variant::borrow_sys(value) };
        let actual = value.get_type()?;
        if actual != def.ty {
            tracing::debug!(property = def.name, ?actual, expected = ?def.ty, "rejected property value");
            return Ok(GDEXTENSION_FALSE);
        }
        let accepted = storage.value.set_property(def.name, value)?;
        Ok(accepted as GDExtensionBool)
    })
}

unsafe extern "C" fn get_property<T: ExtensionClass>(
    instance: GDExtensionClassInstancePtr,
    name: GDExtensionConstStringNamePtr,
    ret: GDExtensionVariantPtr,
) -> GDExtensionBool {
    guard_with_default("get", GDEXTENSION_FALSE, || {
        let storage = unsafe { InstanceStorage::<T>::from_instance(instance)? };
        let name = unsafe { StringName::borrow_sys(name) };
        let Some(index) = ClassInfo::position(&storage.info().property_names, name)? else {
            return Ok(GDEXTENSION_FALSE);
        };
        match storage.value.get_property(T::PROPERTIES[index].name)? {
            Some(value) => {
                unsafe { value.move_into_sys(ret) };
                Ok(GDEXTENSION_TRUE)
            }
            None => Ok(GDEXTENSION_FALSE),
        }
    })
}

unsafe extern "C" fn get_property_list<T: ExtensionClass>(
    instance: GDExtensionClassInstancePtr,
    r_count: *mut u32,
) -> *const GDExtensionPropertyInfo {
    guard_with_default("get_property_list", std::ptr::null(), || {
        let storage = unsafe { InstanceStorage::<T>::from_instance(instance)? };
        if r_count.is_null() {
            return Err(GdError::NullPointer);
        }
        let list = PropertyList::build(T::NAME, T::PROPERTIES)?;
        let ptr = list.as_ptr();
        unsafe { *r_count = list.len() as u32 };
        storage.property_lists.insert(ptr as usize, list);
        Ok(ptr)
    })
}

unsafe extern "C" fn free_property_list<T: ExtensionClass>(
    instance: GDExtensionClassInstancePtr,
    list: *const GDExtensionPropertyInfo,
) {
    guard_void("free_property_list", || {
        let storage = unsafe { InstanceStorage::<T>::from_instance(instance)? };
        if storage.property_lists.remove(&(list as usize)).is_none() {
            tracing::warn!(class = T::NAME, "host freed a property list this instance never handed out");
        }
        Ok(())
    })
}

unsafe extern "C" fn get_virtual_call_data<T: ExtensionClass>(
    class_userdata: *mut c_void,
    name: GDExtensionConstStringNamePtr,
) -> *mut c_void {
    guard_with_default("get_virtual_call_data", std::ptr::null_mut(), || {
        let info = unsafe { class_info(class_userdata)? };
        let name = unsafe { StringName::borrow_sys(name) };
        Ok(match ClassInfo::position(&info.virtual_names, name)? {
            Some(index) => &T::VIRTUALS[index] as *const &'static str as *mut c_void,
            None => std::ptr::null_mut(),
        })
    })
}

#[cfg_attr(feature = "profiling", profiling::function)]
unsafe extern "C" fn call_virtual_with_data<T: ExtensionClass>(
    instance: GDExtensionClassInstancePtr,
    _name: GDExtensionConstStringNamePtr,
    call_data: *mut c_void,
    args: *const GDExtensionConstTypePtr,
    ret: GDExtensionTypePtr,
) {
    guard_void("call_virtual_with_data", || {
        let storage = unsafe { InstanceStorage::<T>::from_instance(instance)? };
        let name: &'static str = unsafe { *(call_data as *const &'static str).as_ref().ok_or(GdError::NullPointer)? };
        let args = VirtualArgs {
            args,
            _marker: PhantomData,
        };
        storage.value.call_virtual(name, args, ret)
    })
}

/// A class registered with the host. Unregister it before the library unloads.
pub struct ClassRegistration {
    library: ClassLibrary,
    name: &'static str,
    info: Box<ClassInfo>,
}

impl ClassRegistration {
    /// Registers `T` with ClassDB.
    ///
    /// The parent class must already be known to the host, so classes that
    /// extend scene types can only be registered at the SCENE level or later.
    pub fn register<T: ExtensionClass>(library: ClassLibrary) -> GdResult<Self> {
        let register = interface()?.classdb_register_extension_class2()?;
        let mut info = Box::new(ClassInfo::new::<T>()?);
        let has_properties = !T::PROPERTIES.is_empty();
        let has_virtuals = !T::VIRTUALS.is_empty();

        let creation_info = GDExtensionClassCreationInfo2 {
            is_virtual: GDEXTENSION_FALSE,
            is_abstract: GDEXTENSION_FALSE,
            is_exposed: GDEXTENSION_TRUE,
            set_func: has_properties.then_some(set_property::<T> as _),
            get_func: has_properties.then_some(get_property::<T> as _),
            get_property_list_func: has_properties.then_some(get_property_list::<T> as _),
            free_property_list_func: has_properties.then_some(free_property_list::<T> as _),
            property_can_revert_func: None,
            property_get_revert_func: None,
            validate_property_func: None,
            notification_func: None,
            to_string_func: None,
            reference_func: None,
            unreference_func: None,
            create_instance_func: Some(create_instance::<T>),
            free_instance_func: Some(free_instance::<T>),
            recreate_instance_func: None,
            get_virtual_func: None,
            get_virtual_call_data_func: has_virtuals.then_some(get_virtual_call_data::<T> as _),
            call_virtual_with_data_func: has_virtuals.then_some(call_virtual_with_data::<T> as _),
            get_rid_func: None,
            class_userdata: info.as_mut() as *mut ClassInfo as *mut c_void,
        };

        unsafe {
            register(
                library.as_ptr(),
                info.class_name.as_ptr(),
                info.parent_name.as_ptr(),
                &creation_info,
            )
        };
        tracing::info!(class = T::NAME, parent = T::PARENT, "registered class");

        Ok(Self {
            library,
            name: T::NAME,
            info,
        })
    }

    pub fn class_name(&self) -> &'static str {
        self.name
    }

    /// Removes the class from ClassDB and releases its cached names.
    ///
    /// If the host cannot unregister, the class stays registered and its
    /// userdata is leaked so instances created later still find it.
    pub fn unregister(self) -> GdResult<()> {
        let unregister = match interface().and_then(|iface| iface.classdb_unregister_extension_class()) {
            Ok(unregister) => unregister,
            Err(err) => {
                tracing::warn!(class = self.name, "class left registered: {err}");
                std::mem::forget(self.info);
                return Err(err);
            }
        };
        unsafe { unregister(self.library.as_ptr(), self.info.class_name.as_ptr()) };
        tracing::info!(class = self.name, "unregistered class");
        Ok(())
    }
}

impl std::fmt::Debug for ClassRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassRegistration").field("name", &self.name).finish()
    }
}
