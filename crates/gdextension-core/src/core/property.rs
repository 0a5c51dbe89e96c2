use crate::core::error::GdResult;
use crate::core::gstring::GString;
use crate::core::string_name::StringName;
use crate::types::enums::{PropertyHint, PropertyUsageFlags, VariantType};
use gdextension_sys::GDExtensionPropertyInfo;

/// Declaration of a property exposed to the editor and scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDef {
    pub name: &'static str,
    pub ty: VariantType,
    pub hint: PropertyHint,
    pub usage: PropertyUsageFlags,
}

impl PropertyDef {
    /// A property with no hint and default usage (stored and shown in the editor).
    pub const fn new(name: &'static str, ty: VariantType) -> Self {
        Self {
            name,
            ty,
            hint: PropertyHint::None,
            usage: PropertyUsageFlags::DEFAULT,
        }
    }
}

/// A property list handed to the host from `get_property_list_func`.
///
/// Owns every `StringName` and `String` the `GDExtensionPropertyInfo` entries
/// point into. The host returns the list through `free_property_list_func`,
/// at which point dropping this releases all of them.
pub struct PropertyList {
    infos: Vec<GDExtensionPropertyInfo>,
    names: Vec<StringName>,
    class_names: Vec<StringName>,
    hint_strings: Vec<GString>,
}

impl PropertyList {
    pub fn build(class_name: &str, defs: &[PropertyDef]) -> GdResult<Self> {
        let mut names = Vec::with_capacity(defs.len());
        let mut class_names = Vec::with_capacity(defs.len());
        let mut hint_strings = Vec::with_capacity(defs.len());
        for def in defs {
            names.push(StringName::new(def.name)?);
            class_names.push(StringName::new(class_name)?);
            hint_strings.push(GString::new("")?);
        }

        // The vectors are never pushed to again, so these pointers stay valid
        // for as long as the list lives.
        let infos = defs
            .iter()
            .enumerate()
            .map(|(i, def)| GDExtensionPropertyInfo {
                type_: def.ty.sys(),
                name: names[i].as_ptr() as *mut _,
                class_name: class_names[i].as_ptr() as *mut _,
                hint: def.hint.into(),
                hint_string: hint_strings[i].as_ptr() as *mut _,
                usage: def.usage.bits(),
            })
            .collect();

        Ok(Self {
            infos,
            names,
            class_names,
            hint_strings,
        })
    }

    pub fn as_ptr(&self) -> *const GDExtensionPropertyInfo {
        self.infos.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Number of host handles this list keeps alive.
    pub fn handle_count(&self) -> usize {
        self.names.len() + self.class_names.len() + self.hint_strings.len()
    }
}
