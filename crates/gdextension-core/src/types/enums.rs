#![allow(non_upper_case_globals)]

use crate::core::error::{GdError, GdResult};
use bitflags::bitflags;
use gdextension_sys::*;
use num_enum::{FromPrimitive, IntoPrimitive, TryFromPrimitive};

/// Builtin variant types known to the host.
///
/// Values match `GDExtensionVariantType`. Anything the host reports outside
/// the known range collapses to [`VariantType::Max`], the header's sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, FromPrimitive)]
#[repr(u32)]
pub enum VariantType {
    Nil = 0,
    Bool = 1,
    Int = 2,
    Float = 3,
    String = 4,
    Vector2 = 5,
    Vector2i = 6,
    Rect2 = 7,
    Rect2i = 8,
    Vector3 = 9,
    Vector3i = 10,
    Transform2D = 11,
    Vector4 = 12,
    Vector4i = 13,
    Plane = 14,
    Quaternion = 15,
    Aabb = 16,
    Basis = 17,
    Transform3D = 18,
    Projection = 19,
    Color = 20,
    StringName = 21,
    NodePath = 22,
    Rid = 23,
    Object = 24,
    Callable = 25,
    Signal = 26,
    Dictionary = 27,
    Array = 28,
    PackedByteArray = 29,
    PackedInt32Array = 30,
    PackedInt64Array = 31,
    PackedFloat32Array = 32,
    PackedFloat64Array = 33,
    PackedStringArray = 34,
    PackedVector2Array = 35,
    PackedVector3Array = 36,
    PackedColorArray = 37,
    #[num_enum(default)]
    Max = 38,
}

impl VariantType {
    pub fn from_sys(value: GDExtensionVariantType) -> Self {
        Self::from(value)
    }

    pub fn sys(self) -> GDExtensionVariantType {
        self.into()
    }
}

/// Variant operators, as consumed by `variant_evaluate` and
/// `variant_get_ptr_operator_evaluator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive)]
#[repr(u32)]
pub enum VariantOperator {
    Equal = 0,
    NotEqual = 1,
    Less = 2,
    LessEqual = 3,
    Greater = 4,
    GreaterEqual = 5,
    Add = 6,
    Subtract = 7,
    Multiply = 8,
    Divide = 9,
    Negate = 10,
    Positive = 11,
    Module = 12,
    Power = 13,
    ShiftLeft = 14,
    ShiftRight = 15,
    BitAnd = 16,
    BitOr = 17,
    BitXor = 18,
    BitNegate = 19,
    And = 20,
    Or = 21,
    Xor = 22,
    Not = 23,
    In = 24,
}

impl VariantOperator {
    pub fn sys(self) -> GDExtensionVariantOperator {
        self.into()
    }
}

/// The points in engine startup at which an extension is initialized.
///
/// The host initializes levels in ascending order and deinitializes them in
/// descending order, skipping anything below the extension's minimum level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u32)]
pub enum InitLevel {
    Core = 0,
    Servers = 1,
    Scene = 2,
    Editor = 3,
}

impl InitLevel {
    pub fn from_sys(value: GDExtensionInitializationLevel) -> GdResult<Self> {
        Self::try_from(value).map_err(|_| GdError::InvalidInitializationLevel(value))
    }

    pub fn sys(self) -> GDExtensionInitializationLevel {
        self.into()
    }
}

/// Outcome of a generic call, from `GDExtensionCallError::error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, FromPrimitive)]
#[repr(u32)]
pub enum CallErrorKind {
    Ok = 0,
    InvalidMethod = 1,
    InvalidArgument = 2,
    TooManyArguments = 3,
    TooFewArguments = 4,
    InstanceIsNull = 5,
    MethodNotConst = 6,
    #[num_enum(default)]
    Unknown = 0xFFFF_FFFF,
}

/// Editor hint attached to a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive)]
#[repr(u32)]
pub enum PropertyHint {
    #[default]
    None = 0,
    Range = 1,
    Enum = 2,
    EnumSuggestion = 3,
    ExpEasing = 4,
    Link = 5,
    Flags = 6,
}

// Property usage flags
bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PropertyUsageFlags: u32 {
        const NONE = 0;
        const STORAGE = 1 << 1;
        const EDITOR = 1 << 2;
        const INTERNAL = 1 << 3;
        const CHECKABLE = 1 << 4;
        const CHECKED = 1 << 5;
        const GROUP = 1 << 6;
        const CATEGORY = 1 << 7;
        const SUBGROUP = 1 << 8;
        const CLASS_IS_BITFIELD = 1 << 9;
        const NO_INSTANCE_STATE = 1 << 10;
        const RESTART_IF_CHANGED = 1 << 11;
        const SCRIPT_VARIABLE = 1 << 12;
        const DEFAULT = Self::STORAGE.bits() | Self::EDITOR.bits();
    }
}

impl Default for PropertyUsageFlags {
    fn default() -> Self {
        PropertyUsageFlags::DEFAULT
    }
}
