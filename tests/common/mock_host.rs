//! An in-process stand-in for the engine side of the GDExtension interface.
//!
//! `get_proc_address` serves plain `extern "C"` functions that implement just
//! enough of the host for the demos: string names, strings and variants
//! (float, string, nil), a few ClassDB entries, the `OS` singleton and the
//! `rad_to_deg` utility.
//!
//! Handle representations:
//!
//! - `StringName` / `String`: the 8-byte buffer holds a `*mut String`.
//! - `Variant`: bytes `0..8` hold the variant type, bytes `8..16` the payload
//!   (an `f64`, or a `*mut String` for strings).
//!
//! All state is thread-local, so tests can run in parallel even though the
//! extension's interface table is installed once per process. Live handle
//! counters go up on construction and down on destruction on either side of
//! the boundary; a test that ends with all of them at zero leaked nothing.

#![allow(dead_code)]

use gdextension_core::sys::*;
use gdextension_core::types::math::Vector2;
use std::cell::RefCell;
use std::ffi::{CStr, CString, c_char, c_int, c_void};
use std::ptr;

pub type EntryFn = unsafe extern "C" fn(
    GDExtensionInterfaceGetProcAddress,
    GDExtensionClassLibraryPtr,
    *mut GDExtensionInitialization,
) -> GDExtensionBool;

pub const GODOT_VERSION_STRING: &CStr = c"Godot Engine v4.2.1.stable.mock";

const OS_ALERT_HASH: i64 = 1783970740;
const SET_POSITION_HASH: i64 = 743155724;
const RAD_TO_DEG_HASH: i64 = 2140049587;

static LIBRARY: u8 = 0x1B;
static OS_ALERT_BIND: u8 = 0xA1;
static SET_POSITION_BIND: u8 = 0xB2;

const TYPE_NIL: GDExtensionVariantType = GDExtensionVariantType_GDEXTENSION_VARIANT_TYPE_NIL;
const TYPE_FLOAT: GDExtensionVariantType = GDExtensionVariantType_GDEXTENSION_VARIANT_TYPE_FLOAT;
const TYPE_STRING: GDExtensionVariantType = GDExtensionVariantType_GDEXTENSION_VARIANT_TYPE_STRING;
const TYPE_STRING_NAME: GDExtensionVariantType = GDExtensionVariantType_GDEXTENSION_VARIANT_TYPE_STRING_NAME;

// =============================================================================
// State
// =============================================================================

/// An engine object created by the mock.
pub struct MockObject {
    pub class: String,
    pub extension_class: Option<String>,
    pub instance: GDExtensionClassInstancePtr,
    pub positions: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub text: String,
    pub title: String,
    pub convention: CallConvention,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallConvention {
    Generic,
    Ptrcall,
}

/// A class registered through `classdb_register_extension_class2`.
#[derive(Clone)]
pub struct RegisteredClass {
    pub name: String,
    pub parent: String,
    pub library: GDExtensionClassLibraryPtr,
    pub info: GDExtensionClassCreationInfo2,
}

#[derive(Default)]
struct HostState {
    live_string_names: isize,
    live_strings: isize,
    live_variants: isize,
    objects: Vec<Box<MockObject>>,
    os: Option<GDExtensionObjectPtr>,
    classes: Vec<RegisteredClass>,
    unregistered: Vec<String>,
    alerts: Vec<Alert>,
    calls: Vec<&'static str>,
}

thread_local! {
    static HOST: RefCell<HostState> = RefCell::new(HostState::default());
}

fn with_host<R>(f: impl FnOnce(&mut HostState) -> R) -> R {
    HOST.with(|host| f(&mut host.borrow_mut()))
}

fn record(function: &'static str) {
    with_host(|host| host.calls.push(function));
}

// =============================================================================
// Raw handle helpers
// =============================================================================

unsafe fn read_string_slot(ptr: *const c_void) -> String {
    unsafe {
        let slot = *(ptr as *const *const String);
        (*slot).clone()
    }
}

unsafe fn write_string_slot(ptr: *mut c_void, text: String) {
    unsafe { *(ptr as *mut *mut String) = Box::into_raw(Box::new(text)) };
}

unsafe fn free_string_slot(ptr: *mut c_void) {
    unsafe { drop(Box::from_raw(*(ptr as *mut *mut String))) };
}

unsafe fn variant_tag(ptr: *const c_void) -> GDExtensionVariantType {
    unsafe { *(ptr as *const u64) as GDExtensionVariantType }
}

unsafe fn variant_payload(ptr: *const c_void) -> *const c_void {
    unsafe { (ptr as *const u8).add(8) as *const c_void }
}

unsafe fn write_variant(ptr: *mut c_void, tag: GDExtensionVariantType, payload: u64) {
    unsafe {
        *(ptr as *mut u64) = tag as u64;
        *((ptr as *mut u8).add(8) as *mut u64) = payload;
    }
    with_host(|host| host.live_variants += 1);
}

// =============================================================================
// Interface functions
// =============================================================================

unsafe extern "C" fn get_godot_version(r_version: *mut GDExtensionGodotVersion) {
    record("get_godot_version");
    unsafe {
        *r_version = GDExtensionGodotVersion {
            major: 4,
            minor: 2,
            patch: 1,
            string: GODOT_VERSION_STRING.as_ptr(),
        }
    };
}

unsafe extern "C" fn string_name_new_with_utf8_chars(r_dest: GDExtensionUninitializedStringNamePtr, p_contents: *const c_char) {
    let text = unsafe { CStr::from_ptr(p_contents) }.to_string_lossy().into_owned();
    unsafe { write_string_slot(r_dest, text) };
    with_host(|host| host.live_string_names += 1);
}

unsafe extern "C" fn string_new_with_utf8_chars(r_dest: GDExtensionUninitializedStringPtr, p_contents: *const c_char) {
    let text = unsafe { CStr::from_ptr(p_contents) }.to_string_lossy().into_owned();
    unsafe { write_string_slot(r_dest, text) };
    with_host(|host| host.live_strings += 1);
}

unsafe extern "C" fn destroy_string_name(p_base: GDExtensionTypePtr) {
    unsafe { free_string_slot(p_base) };
    with_host(|host| host.live_string_names -= 1);
}

unsafe extern "C" fn destroy_string(p_base: GDExtensionTypePtr) {
    unsafe { free_string_slot(p_base) };
    with_host(|host| host.live_strings -= 1);
}

unsafe extern "C" fn variant_get_ptr_destructor(p_type: GDExtensionVariantType) -> GDExtensionPtrDestructor {
    match p_type {
        TYPE_STRING_NAME => Some(destroy_string_name),
        TYPE_STRING => Some(destroy_string),
        _ => None,
    }
}

unsafe extern "C" fn string_name_equal(
    p_left: GDExtensionConstTypePtr,
    p_right: GDExtensionConstTypePtr,
    r_result: GDExtensionTypePtr,
) {
    let equal = unsafe { read_string_slot(p_left) == read_string_slot(p_right) };
    unsafe { *(r_result as *mut GDExtensionBool) = equal as GDExtensionBool };
}

unsafe extern "C" fn variant_get_ptr_operator_evaluator(
    p_operator: GDExtensionVariantOperator,
    p_type_a: GDExtensionVariantType,
    p_type_b: GDExtensionVariantType,
) -> GDExtensionPtrOperatorEvaluator {
    let is_equal = p_operator == GDExtensionVariantOperator_GDEXTENSION_VARIANT_OP_EQUAL;
    if is_equal && p_type_a == TYPE_STRING_NAME && p_type_b == TYPE_STRING_NAME {
        Some(string_name_equal)
    } else {
        None
    }
}

unsafe extern "C" fn variant_from_float(r_dest: GDExtensionUninitializedVariantPtr, p_src: GDExtensionTypePtr) {
    let value = unsafe { *(p_src as *const f64) };
    unsafe { write_variant(r_dest, TYPE_FLOAT, value.to_bits()) };
}

unsafe extern "C" fn variant_from_string(r_dest: GDExtensionUninitializedVariantPtr, p_src: GDExtensionTypePtr) {
    let text = unsafe { read_string_slot(p_src) };
    let payload = Box::into_raw(Box::new(text)) as u64;
    unsafe { write_variant(r_dest, TYPE_STRING, payload) };
}

unsafe extern "C" fn float_from_variant(r_dest: GDExtensionUninitializedTypePtr, p_src: GDExtensionVariantPtr) {
    unsafe { *(r_dest as *mut f64) = *(variant_payload(p_src) as *const f64) };
}

unsafe extern "C" fn get_variant_from_type_constructor(
    p_type: GDExtensionVariantType,
) -> GDExtensionVariantFromTypeConstructorFunc {
    match p_type {
        TYPE_FLOAT => Some(variant_from_float),
        TYPE_STRING => Some(variant_from_string),
        _ => None,
    }
}

unsafe extern "C" fn get_variant_to_type_constructor(
    p_type: GDExtensionVariantType,
) -> GDExtensionTypeFromVariantConstructorFunc {
    match p_type {
        TYPE_FLOAT => Some(float_from_variant),
        _ => None,
    }
}

unsafe extern "C" fn variant_new_nil(r_dest: GDExtensionUninitializedVariantPtr) {
    unsafe { write_variant(r_dest, TYPE_NIL, 0) };
}

unsafe extern "C" fn variant_get_type(p_self: GDExtensionConstVariantPtr) -> GDExtensionVariantType {
    unsafe { variant_tag(p_self) }
}

unsafe extern "C" fn variant_destroy(p_self: GDExtensionVariantPtr) {
    unsafe {
        if variant_tag(p_self) == TYPE_STRING {
            drop(Box::from_raw(*(variant_payload(p_self) as *const *mut String)));
        }
        *(p_self as *mut u64) = TYPE_NIL as u64;
    }
    with_host(|host| host.live_variants -= 1);
}

unsafe extern "C" fn variant_evaluate(
    p_op: GDExtensionVariantOperator,
    p_a: GDExtensionConstVariantPtr,
    p_b: GDExtensionConstVariantPtr,
    r_return: GDExtensionUninitializedVariantPtr,
    r_valid: *mut GDExtensionBool,
) {
    let floats = unsafe {
        (variant_tag(p_a) == TYPE_FLOAT && variant_tag(p_b) == TYPE_FLOAT).then(|| {
            (
                *(variant_payload(p_a) as *const f64),
                *(variant_payload(p_b) as *const f64),
            )
        })
    };
    let result = match (p_op, floats) {
        (GDExtensionVariantOperator_GDEXTENSION_VARIANT_OP_ADD, Some((a, b))) => Some(a + b),
        (GDExtensionVariantOperator_GDEXTENSION_VARIANT_OP_MULTIPLY, Some((a, b))) => Some(a * b),
        _ => None,
    };
    unsafe {
        match result {
            Some(value) => write_variant(r_return, TYPE_FLOAT, value.to_bits()),
            None => write_variant(r_return, TYPE_NIL, 0),
        }
        *r_valid = result.is_some() as GDExtensionBool;
    }
}

unsafe extern "C" fn rad_to_deg(r_return: GDExtensionTypePtr, p_args: *const GDExtensionConstTypePtr, p_argument_count: c_int) {
    record("rad_to_deg");
    assert_eq!(p_argument_count, 1);
    unsafe {
        let radians = *(*p_args as *const f64);
        *(r_return as *mut f64) = radians.to_degrees();
    }
}

unsafe extern "C" fn variant_get_ptr_utility_function(
    p_function: GDExtensionConstStringNamePtr,
    p_hash: GDExtensionInt,
) -> GDExtensionPtrUtilityFunction {
    let name = unsafe { read_string_slot(p_function) };
    match (name.as_str(), p_hash) {
        ("rad_to_deg", RAD_TO_DEG_HASH) => Some(rad_to_deg),
        _ => None,
    }
}

unsafe extern "C" fn global_get_singleton(p_name: GDExtensionConstStringNamePtr) -> GDExtensionObjectPtr {
    record("global_get_singleton");
    if unsafe { read_string_slot(p_name) } != "OS" {
        return ptr::null_mut();
    }
    with_host(|host| {
        if let Some(os) = host.os {
            return os;
        }
        let os = new_object(host, "OS");
        host.os = Some(os);
        os
    })
}

fn new_object(host: &mut HostState, class: &str) -> GDExtensionObjectPtr {
    let mut object = Box::new(MockObject {
        class: class.to_string(),
        extension_class: None,
        instance: ptr::null_mut(),
        positions: Vec::new(),
    });
    let ptr = object.as_mut() as *mut MockObject as GDExtensionObjectPtr;
    host.objects.push(object);
    ptr
}

fn find_object(host: &mut HostState, object: GDExtensionObjectPtr) -> Option<&mut MockObject> {
    host.objects
        .iter_mut()
        .map(|boxed| boxed.as_mut())
        .find(|candidate| ptr::eq(&**candidate as *const MockObject as *const c_void, object))
}

unsafe extern "C" fn classdb_get_method_bind(
    p_classname: GDExtensionConstStringNamePtr,
    p_methodname: GDExtensionConstStringNamePtr,
    p_hash: GDExtensionInt,
) -> GDExtensionMethodBindPtr {
    record("classdb_get_method_bind");
    let class = unsafe { read_string_slot(p_classname) };
    let method = unsafe { read_string_slot(p_methodname) };
    match (class.as_str(), method.as_str(), p_hash) {
        ("OS", "alert", OS_ALERT_HASH) => &OS_ALERT_BIND as *const u8 as GDExtensionMethodBindPtr,
        ("Node2D", "set_position", SET_POSITION_HASH) => &SET_POSITION_BIND as *const u8 as GDExtensionMethodBindPtr,
        _ => ptr::null(),
    }
}

fn is_bind(bind: GDExtensionMethodBindPtr, marker: &'static u8) -> bool {
    ptr::eq(bind, marker as *const u8 as *const c_void)
}

unsafe extern "C" fn object_method_bind_call(
    p_method_bind: GDExtensionMethodBindPtr,
    p_instance: GDExtensionObjectPtr,
    p_args: *const GDExtensionConstVariantPtr,
    p_arg_count: GDExtensionInt,
    r_ret: GDExtensionUninitializedVariantPtr,
    r_error: *mut GDExtensionCallError,
) {
    record("object_method_bind_call");
    unsafe { write_variant(r_ret, TYPE_NIL, 0) };

    let fail = |error: GDExtensionCallErrorType, argument: i32, expected: i32| unsafe {
        *r_error = GDExtensionCallError {
            error,
            argument,
            expected,
        };
    };

    if !is_bind(p_method_bind, &OS_ALERT_BIND) {
        return fail(GDExtensionCallErrorType_GDEXTENSION_CALL_ERROR_INVALID_METHOD, 0, 0);
    }
    if p_instance.is_null() {
        return fail(GDExtensionCallErrorType_GDEXTENSION_CALL_ERROR_INSTANCE_IS_NULL, 0, 0);
    }
    if p_arg_count < 1 {
        return fail(GDExtensionCallErrorType_GDEXTENSION_CALL_ERROR_TOO_FEW_ARGUMENTS, 0, 1);
    }
    if p_arg_count > 2 {
        return fail(GDExtensionCallErrorType_GDEXTENSION_CALL_ERROR_TOO_MANY_ARGUMENTS, 0, 2);
    }

    let args = unsafe { std::slice::from_raw_parts(p_args, p_arg_count as usize) };
    let mut texts = Vec::with_capacity(args.len());
    for (index, arg) in args.iter().enumerate() {
        if unsafe { variant_tag(*arg) } != TYPE_STRING {
            return fail(
                GDExtensionCallErrorType_GDEXTENSION_CALL_ERROR_INVALID_ARGUMENT,
                index as i32,
                TYPE_STRING as i32,
            );
        }
        texts.push(unsafe { read_string_slot(variant_payload(*arg)) });
    }

    let title = texts.get(1).cloned().unwrap_or_else(|| "Alert!".to_string());
    with_host(|host| {
        host.alerts.push(Alert {
            text: texts[0].clone(),
            title,
            convention: CallConvention::Generic,
        })
    });
    fail(GDExtensionCallErrorType_GDEXTENSION_CALL_OK, 0, 0);
}

unsafe extern "C" fn object_method_bind_ptrcall(
    p_method_bind: GDExtensionMethodBindPtr,
    p_instance: GDExtensionObjectPtr,
    p_args: *const GDExtensionConstTypePtr,
    _r_ret: GDExtensionTypePtr,
) {
    record("object_method_bind_ptrcall");
    if is_bind(p_method_bind, &OS_ALERT_BIND) {
        let (text, title) = unsafe { (read_string_slot(*p_args), read_string_slot(*p_args.add(1))) };
        with_host(|host| {
            host.alerts.push(Alert {
                text,
                title,
                convention: CallConvention::Ptrcall,
            })
        });
    } else if is_bind(p_method_bind, &SET_POSITION_BIND) {
        let position = unsafe { *(*p_args as *const Vector2) };
        with_host(|host| {
            if let Some(object) = find_object(host, p_instance) {
                object.positions.push((position.x as f64, position.y as f64));
            }
        });
    } else {
        panic!("ptrcall through an unknown method bind");
    }
}

unsafe extern "C" fn classdb_construct_object(p_classname: GDExtensionConstStringNamePtr) -> GDExtensionObjectPtr {
    record("classdb_construct_object");
    let class = unsafe { read_string_slot(p_classname) };
    with_host(|host| new_object(host, &class))
}

unsafe extern "C" fn classdb_register_extension_class2(
    p_library: GDExtensionClassLibraryPtr,
    p_class_name: GDExtensionConstStringNamePtr,
    p_parent_class_name: GDExtensionConstStringNamePtr,
    p_extension_funcs: *const GDExtensionClassCreationInfo2,
) {
    record("classdb_register_extension_class2");
    let class = RegisteredClass {
        name: unsafe { read_string_slot(p_class_name) },
        parent: unsafe { read_string_slot(p_parent_class_name) },
        library: p_library,
        info: unsafe { *p_extension_funcs },
    };
    with_host(|host| host.classes.push(class));
}

unsafe extern "C" fn classdb_unregister_extension_class(
    _p_library: GDExtensionClassLibraryPtr,
    p_class_name: GDExtensionConstStringNamePtr,
) {
    record("classdb_unregister_extension_class");
    let name = unsafe { read_string_slot(p_class_name) };
    with_host(|host| {
        host.classes.retain(|class| class.name != name);
        host.unregistered.push(name);
    });
}

unsafe extern "C" fn object_set_instance(
    p_o: GDExtensionObjectPtr,
    p_classname: GDExtensionConstStringNamePtr,
    p_instance: GDExtensionClassInstancePtr,
) {
    record("object_set_instance");
    let class = unsafe { read_string_slot(p_classname) };
    with_host(|host| {
        let object = find_object(host, p_o).expect("object_set_instance on an unknown object");
        object.extension_class = Some(class);
        object.instance = p_instance;
    });
}

macro_rules! erase {
    ($f:expr) => {
        Some(unsafe { std::mem::transmute::<*const (), unsafe extern "C" fn()>($f as *const ()) })
    };
}

/// The resolver handed to entry symbols.
pub unsafe extern "C" fn get_proc_address(p_function_name: *const c_char) -> GDExtensionInterfaceFunctionPtr {
    let name = unsafe { CStr::from_ptr(p_function_name) };
    match name.to_bytes() {
        b"get_godot_version" => erase!(get_godot_version),
        b"variant_get_ptr_utility_function" => erase!(variant_get_ptr_utility_function),
        b"string_name_new_with_utf8_chars" => erase!(string_name_new_with_utf8_chars),
        b"string_new_with_utf8_chars" => erase!(string_new_with_utf8_chars),
        b"variant_get_ptr_destructor" => erase!(variant_get_ptr_destructor),
        b"global_get_singleton" => erase!(global_get_singleton),
        b"classdb_get_method_bind" => erase!(classdb_get_method_bind),
        b"object_method_bind_call" => erase!(object_method_bind_call),
        b"object_method_bind_ptrcall" => erase!(object_method_bind_ptrcall),
        b"get_variant_from_type_constructor" => erase!(get_variant_from_type_constructor),
        b"get_variant_to_type_constructor" => erase!(get_variant_to_type_constructor),
        b"variant_new_nil" => erase!(variant_new_nil),
        b"variant_get_type" => erase!(variant_get_type),
        b"variant_destroy" => erase!(variant_destroy),
        b"variant_evaluate" => erase!(variant_evaluate),
        b"variant_get_ptr_operator_evaluator" => erase!(variant_get_ptr_operator_evaluator),
        b"classdb_construct_object" => erase!(classdb_construct_object),
        b"classdb_register_extension_class2" => erase!(classdb_register_extension_class2),
        b"classdb_unregister_extension_class" => erase!(classdb_unregister_extension_class),
        b"object_set_instance" => erase!(object_set_instance),
        _ => None,
    }
}

pub fn library() -> GDExtensionClassLibraryPtr {
    &LIBRARY as *const u8 as GDExtensionClassLibraryPtr
}

// =============================================================================
// Host-owned values used to drive extension callbacks
// =============================================================================

/// A `StringName` owned by the host side.
pub struct HostName {
    slot: Box<*mut String>,
}

impl HostName {
    pub fn new(text: &str) -> Self {
        let mut slot = Box::new(ptr::null_mut::<String>());
        let text = CString::new(text).unwrap();
        unsafe { string_name_new_with_utf8_chars(slot.as_mut() as *mut *mut String as *mut c_void, text.as_ptr()) };
        Self { slot }
    }

    pub fn as_ptr(&self) -> GDExtensionConstStringNamePtr {
        self.slot.as_ref() as *const *mut String as *const c_void
    }
}

impl Drop for HostName {
    fn drop(&mut self) {
        unsafe { destroy_string_name(self.slot.as_mut() as *mut *mut String as *mut c_void) };
    }
}

/// A value the host passes into or reads out of a variant.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Nil,
    Float(f64),
    Text(String),
}

#[repr(C, align(8))]
struct RawVariant([u8; GDEXTENSION_VARIANT_SIZE]);

/// A `Variant` owned by the host side.
pub struct HostVariant {
    raw: Box<RawVariant>,
    initialized: bool,
}

impl HostVariant {
    pub fn new(value: &HostValue) -> Self {
        let mut variant = Self::uninit();
        let dst = variant.as_mut_ptr();
        unsafe {
            match value {
                HostValue::Nil => variant_new_nil(dst),
                HostValue::Float(value) => {
                    let mut value = *value;
                    variant_from_float(dst, &mut value as *mut f64 as *mut c_void)
                }
                HostValue::Text(text) => {
                    let mut slot: *mut String = Box::into_raw(Box::new(text.clone()));
                    variant_from_string(dst, &mut slot as *mut *mut String as *mut c_void);
                    drop(Box::from_raw(slot));
                }
            }
        }
        variant.initialized = true;
        variant
    }

    fn uninit() -> Self {
        Self {
            raw: Box::new(RawVariant([0; GDEXTENSION_VARIANT_SIZE])),
            initialized: false,
        }
    }

    pub fn as_ptr(&self) -> GDExtensionConstVariantPtr {
        self.raw.0.as_ptr() as *const c_void
    }

    pub fn as_mut_ptr(&mut self) -> GDExtensionVariantPtr {
        self.raw.0.as_mut_ptr() as *mut c_void
    }

    pub fn value(&self) -> HostValue {
        unsafe {
            match variant_tag(self.as_ptr()) {
                TYPE_FLOAT => HostValue::Float(*(variant_payload(self.as_ptr()) as *const f64)),
                TYPE_STRING => HostValue::Text(read_string_slot(variant_payload(self.as_ptr()))),
                _ => HostValue::Nil,
            }
        }
    }
}

impl Drop for HostVariant {
    fn drop(&mut self) {
        if self.initialized {
            unsafe { variant_destroy(self.as_mut_ptr()) };
        }
    }
}

// =============================================================================
// Driving an extension
// =============================================================================

/// An extension whose entry symbol succeeded.
pub struct LoadedExtension {
    pub init: GDExtensionInitialization,
}

/// Calls `entry` the way the engine does after `dlopen`.
pub fn load(entry: EntryFn) -> Option<LoadedExtension> {
    let mut init = GDExtensionInitialization {
        minimum_initialization_level: GDExtensionInitializationLevel_GDEXTENSION_MAX_INITIALIZATION_LEVEL,
        userdata: ptr::null_mut(),
        initialize: None,
        deinitialize: None,
    };
    let ok = unsafe { entry(Some(get_proc_address), library(), &mut init) };
    (ok != GDEXTENSION_FALSE).then_some(LoadedExtension { init })
}

impl LoadedExtension {
    pub fn initialize(&self, level: GDExtensionInitializationLevel) {
        let initialize = self.init.initialize.expect("initialize callback");
        unsafe { initialize(self.init.userdata, level) };
    }

    pub fn deinitialize(&self, level: GDExtensionInitializationLevel) {
        let deinitialize = self.init.deinitialize.expect("deinitialize callback");
        unsafe { deinitialize(self.init.userdata, level) };
    }

    /// Initializes every level from `CORE` up. The engine does not consult
    /// `minimum_initialization_level` when it walks the levels.
    pub fn startup(&self) {
        for level in 0..GDExtensionInitializationLevel_GDEXTENSION_MAX_INITIALIZATION_LEVEL {
            self.initialize(level);
        }
    }

    /// Deinitializes every level down to `CORE`. The extension state is gone
    /// afterwards.
    pub fn shutdown(self) {
        for level in (0..GDExtensionInitializationLevel_GDEXTENSION_MAX_INITIALIZATION_LEVEL).rev() {
            self.deinitialize(level);
        }
    }
}

pub fn registered_class(name: &str) -> Option<RegisteredClass> {
    with_host(|host| host.classes.iter().find(|class| class.name == name).cloned())
}

fn class_of(object: GDExtensionObjectPtr) -> (RegisteredClass, GDExtensionClassInstancePtr) {
    let (class, instance) = with_host(|host| {
        let object = find_object(host, object).expect("unknown object");
        (object.extension_class.clone().expect("object has no extension instance"), object.instance)
    });
    (registered_class(&class).expect("class is not registered"), instance)
}

/// `ClassDB.instantiate(name)`.
pub fn instantiate(class: &str) -> GDExtensionObjectPtr {
    let class = registered_class(class).expect("class is not registered");
    let create = class.info.create_instance_func.expect("create_instance_func");
    unsafe { create(class.info.class_userdata) }
}

/// Frees the extension instance bound to `object`.
pub fn free(object: GDExtensionObjectPtr) {
    let (class, instance) = class_of(object);
    let free = class.info.free_instance_func.expect("free_instance_func");
    unsafe { free(class.info.class_userdata, instance) };
    with_host(|host| {
        if let Some(object) = find_object(host, object) {
            object.instance = ptr::null_mut();
        }
    });
}

pub fn set_property(object: GDExtensionObjectPtr, name: &str, value: &HostValue) -> bool {
    let (class, instance) = class_of(object);
    let set = class.info.set_func.expect("set_func");
    let name = HostName::new(name);
    let value = HostVariant::new(value);
    unsafe { set(instance, name.as_ptr(), value.as_ptr()) != GDEXTENSION_FALSE }
}

pub fn get_property(object: GDExtensionObjectPtr, name: &str) -> Option<HostValue> {
    let (class, instance) = class_of(object);
    let get = class.info.get_func.expect("get_func");
    let name = HostName::new(name);
    let mut ret = HostVariant::uninit();
    let found = unsafe { get(instance, name.as_ptr(), ret.as_mut_ptr()) != GDEXTENSION_FALSE };
    ret.initialized = found;
    found.then(|| ret.value())
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySnapshot {
    pub name: String,
    pub class_name: String,
    pub ty: GDExtensionVariantType,
    pub hint: u32,
    pub hint_string: String,
    pub usage: u32,
}

/// Fetches the property list, copies it out and hands it back to the extension.
pub fn property_list(object: GDExtensionObjectPtr) -> Vec<PropertySnapshot> {
    let (class, instance) = class_of(object);
    let get_list = class.info.get_property_list_func.expect("get_property_list_func");
    let free_list = class.info.free_property_list_func.expect("free_property_list_func");

    let mut count = 0u32;
    let list = unsafe { get_list(instance, &mut count) };
    assert!(!list.is_null());
    let snapshot = unsafe { std::slice::from_raw_parts(list, count as usize) }
        .iter()
        .map(|info| unsafe {
            PropertySnapshot {
                name: read_string_slot(info.name),
                class_name: read_string_slot(info.class_name),
                ty: info.type_,
                hint: info.hint,
                hint_string: read_string_slot(info.hint_string),
                usage: info.usage,
            }
        })
        .collect();
    unsafe { free_list(instance, list) };
    snapshot
}

/// Whether the class answers the host's lookup for virtual `name`.
pub fn overrides(class: &str, name: &str) -> bool {
    let class = registered_class(class).expect("class is not registered");
    let Some(get_call_data) = class.info.get_virtual_call_data_func else {
        return false;
    };
    let name = HostName::new(name);
    !unsafe { get_call_data(class.info.class_userdata, name.as_ptr()) }.is_null()
}

/// Runs one frame: `_process(delta)` on the instance bound to `object`.
pub fn process(object: GDExtensionObjectPtr, delta: f64) {
    let (class, instance) = class_of(object);
    let get_call_data = class.info.get_virtual_call_data_func.expect("get_virtual_call_data_func");
    let call = class.info.call_virtual_with_data_func.expect("call_virtual_with_data_func");
    let name = HostName::new("_process");
    let call_data = unsafe { get_call_data(class.info.class_userdata, name.as_ptr()) };
    assert!(!call_data.is_null(), "_process is not overridden");
    let args = [&delta as *const f64 as GDExtensionConstTypePtr];
    unsafe { call(instance, name.as_ptr(), call_data, args.as_ptr(), ptr::null_mut()) };
}

// =============================================================================
// Inspection
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveHandles {
    pub string_names: isize,
    pub strings: isize,
    pub variants: isize,
}

impl LiveHandles {
    pub const NONE: LiveHandles = LiveHandles {
        string_names: 0,
        strings: 0,
        variants: 0,
    };
}

pub fn live_handles() -> LiveHandles {
    with_host(|host| LiveHandles {
        string_names: host.live_string_names,
        strings: host.live_strings,
        variants: host.live_variants,
    })
}

pub fn alerts() -> Vec<Alert> {
    with_host(|host| host.alerts.clone())
}

pub fn positions(object: GDExtensionObjectPtr) -> Vec<(f64, f64)> {
    with_host(|host| find_object(host, object).map(|object| object.positions.clone()).unwrap_or_default())
}

pub fn object_class(object: GDExtensionObjectPtr) -> Option<(String, Option<String>)> {
    with_host(|host| find_object(host, object).map(|object| (object.class.clone(), object.extension_class.clone())))
}

pub fn unregistered() -> Vec<String> {
    with_host(|host| host.unregistered.clone())
}

pub fn calls(function: &str) -> usize {
    with_host(|host| host.calls.iter().filter(|call| **call == function).count())
}
