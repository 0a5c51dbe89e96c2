//! The smallest possible extension: print a line at each lifecycle step.

use gdextension_core::prelude::*;

pub struct HelloGdExtension;

impl HelloGdExtension {
    pub fn greeting(level: InitLevel) -> Option<&'static str> {
        match level {
            InitLevel::Scene => Some("hello from scene!"),
            InitLevel::Editor => Some("hello from editor!"),
            _ => None,
        }
    }

    pub fn farewell(level: InitLevel) -> Option<&'static str> {
        match level {
            InitLevel::Scene => Some("goodbye from scene!"),
            InitLevel::Editor => Some("goodbye from editor!"),
            _ => None,
        }
    }
}

impl Extension for HelloGdExtension {
    fn load(_library: ClassLibrary) -> GdResult<Self> {
        Ok(Self)
    }

    fn initialize(&mut self, level: InitLevel, _library: ClassLibrary) -> GdResult<()> {
        if let Some(line) = Self::greeting(level) {
            println!("{line}");
        }
        Ok(())
    }

    fn deinitialize(&mut self, level: InitLevel) -> GdResult<()> {
        if let Some(line) = Self::farewell(level) {
            println!("{line}");
        }
        Ok(())
    }
}

export_extension!(hello_gdextension_entry => HelloGdExtension);
