//! Calls `OS.alert` with the pointer calling convention.
//!
//! Arguments are passed as raw pointers to host `String`s, in declaration
//! order (text, then title). `alert` returns nothing, so no return pointer.

use gdextension_core::prelude::*;

pub use super::normal_call::OS_ALERT_HASH;

pub const ALERT_BODY: &str = "The example was successful.";
pub const ALERT_TITLE: &str = "Hello OS ptrcall!";

pub fn alert(body: &str, title: &str) -> GdResult<()> {
    let os = Object::singleton("OS")?;
    let alert = MethodBind::get("OS", "alert", OS_ALERT_HASH)?;
    let body = GString::new(body)?;
    let title = GString::new(title)?;
    let args = [body.as_ptr(), title.as_ptr()];
    unsafe { alert.ptrcall(os, &args, std::ptr::null_mut()) }
}

pub struct PtrCall;

impl Extension for PtrCall {
    fn load(_library: ClassLibrary) -> GdResult<Self> {
        Ok(Self)
    }

    fn initialize(&mut self, level: InitLevel, _library: ClassLibrary) -> GdResult<()> {
        if level == InitLevel::Scene {
            alert(ALERT_BODY, ALERT_TITLE)?;
        }
        Ok(())
    }
}

export_extension!(hello_ptrcall_entry => PtrCall);
