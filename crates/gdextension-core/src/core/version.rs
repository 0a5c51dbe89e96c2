use crate::core::error::{GdError, GdResult};
use crate::core::interface::interface;
use gdextension_sys::GDExtensionGodotVersion;
use std::ffi::CStr;
use std::fmt;

/// Version of the running host, as reported by `get_godot_version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GodotVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub string: String,
}

impl GodotVersion {
    pub fn query() -> GdResult<Self> {
        let get_version = interface()?.get_godot_version()?;
        let mut raw = GDExtensionGodotVersion {
            major: 0,
            minor: 0,
            patch: 0,
            string: std::ptr::null(),
        };
        unsafe { get_version(&mut raw) };
        unsafe { Self::from_sys(&raw) }
    }

    /// # Safety
    /// `raw.string` must be null or a NUL-terminated string.
    pub unsafe fn from_sys(raw: &GDExtensionGodotVersion) -> GdResult<Self> {
        if raw.string.is_null() {
            return Err(GdError::NullPointer);
        }
        let string = unsafe { CStr::from_ptr(raw.string) }.to_str()?.to_owned();
        Ok(Self {
            major: raw.major,
            minor: raw.minor,
            patch: raw.patch,
            string,
        })
    }

    /// True when the host is at least `major.minor`.
    pub fn at_least(&self, major: u32, minor: u32) -> bool {
        (self.major, self.minor) >= (major, minor)
    }
}

impl fmt::Display for GodotVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{} ({})", self.major, self.minor, self.patch, self.string)
    }
}
