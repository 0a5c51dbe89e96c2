//! Resolves a host function by name inside the entry symbol and calls it.

use gdextension_core::prelude::*;

pub struct ProcAddress;

/// The lines printed for a host version.
pub fn version_report(version: &GodotVersion) -> String {
    format!(
        "GDExtensionGodotVersion godot_version\n.major: {}\n.minor: {}\n.patch: {}\n.string: {}",
        version.major, version.minor, version.patch, version.string
    )
}

impl Extension for ProcAddress {
    fn load(_library: ClassLibrary) -> GdResult<Self> {
        let version = GodotVersion::query()?;
        println!("{}", version_report(&version));
        Ok(Self)
    }
}

export_extension!(hello_proc_address_entry => ProcAddress);
