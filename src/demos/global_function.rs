//! Calls a global utility function (`rad_to_deg`) with the pointer convention.

use gdextension_core::prelude::*;

/// Signature hash of `float rad_to_deg(float)`.
pub const RAD_TO_DEG_HASH: i64 = 2140049587;

#[allow(clippy::approx_constant)]
pub const RADIANS: f64 = 3.14;

pub fn rad_to_deg(radians: f64) -> GdResult<f64> {
    let function = UtilityFunction::get("rad_to_deg", RAD_TO_DEG_HASH)?;
    Ok(function.call_f64(&[radians]))
}

pub struct GlobalFunction;

impl Extension for GlobalFunction {
    fn load(_library: ClassLibrary) -> GdResult<Self> {
        Ok(Self)
    }

    fn initialize(&mut self, level: InitLevel, _library: ClassLibrary) -> GdResult<()> {
        if level == InitLevel::Scene {
            let degrees = rad_to_deg(RADIANS)?;
            println!("{RADIANS}rad is equal to {degrees:.6} deg");
        }
        Ok(())
    }
}

export_extension!(hello_global_function_entry => GlobalFunction);
