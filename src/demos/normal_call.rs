//! Calls `OS.alert` with the generic (variant) calling convention.
//!
//! The argument is boxed into a `Variant`, the host type-checks the call and
//! the result comes back as a `Variant` too. A rejected call is fatal.

use gdextension_core::prelude::*;
use gdextension_core::sys::GDExtensionVariantType;

/// Signature hash of `void OS.alert(String text, String title = "Alert!")`.
pub const OS_ALERT_HASH: i64 = 1783970740;

pub const ALERT_BODY: &str = "Hello normal OS.alert call!";

/// Shows an alert and returns the raw type code of the value the call returned.
pub fn alert(body: &str) -> GdResult<GDExtensionVariantType> {
    let os = Object::singleton("OS")?;
    let alert = MethodBind::get("OS", "alert", OS_ALERT_HASH)?;
    let body = Variant::from_text(body)?;
    let response = alert.call(os, &[&body])?;
    response.sys_type()
}

pub fn response_line(type_code: GDExtensionVariantType) -> String {
    format!("Response variant type is {type_code}")
}

/// What gets written to stderr when the host rejects the call.
pub fn call_error_report(error: &CallError) -> String {
    format!(
        "you messed up in calling OS.alert!\ncode: {}\nargument: {}\nexpected: {}",
        error.code(),
        error.argument,
        error.expected
    )
}

pub struct NormalCall;

impl Extension for NormalCall {
    fn load(_library: ClassLibrary) -> GdResult<Self> {
        Ok(Self)
    }

    fn initialize(&mut self, level: InitLevel, _library: ClassLibrary) -> GdResult<()> {
        if level != InitLevel::Scene {
            return Ok(());
        }
        match alert(ALERT_BODY) {
            Ok(type_code) => {
                println!("{}", response_line(type_code));
                Ok(())
            }
            Err(GdError::Call(error)) => {
                eprintln!("{}", call_error_report(&error));
                std::process::exit(1);
            }
            Err(other) => Err(other),
        }
    }
}

export_extension!(hello_normal_call_entry => NormalCall);
