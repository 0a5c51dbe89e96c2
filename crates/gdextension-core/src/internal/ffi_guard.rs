//! Panic and error guards for callbacks invoked by the host.
//!
//! Unwinding out of an `extern "C"` function aborts the host process, and the
//! host has no channel for Rust errors. Every callback body therefore runs
//! through one of these helpers, which log the failure and hand the host a
//! neutral value instead.

use crate::core::error::GdResult;

/// Extract a human-readable message from a panic payload.
pub fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        return (*msg).to_string();
    }
    if let Some(msg) = payload.downcast_ref::<String>() {
        return msg.clone();
    }
    "non-string panic payload".to_string()
}

/// Catch panics in callbacks that return nothing.
pub fn guard_void(op: &'static str, f: impl FnOnce() -> GdResult<()>) {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        Ok(Ok(())) => {}
        Ok(Err(err)) => tracing::error!(callback = op, "{err}"),
        Err(payload) => {
            let msg = panic_message(payload);
            tracing::error!(callback = op, "panic in extension callback: {msg}");
        }
    }
}

/// Catch panics and errors in callbacks that return a value with a known safe default.
pub fn guard_with_default<T>(op: &'static str, default: T, f: impl FnOnce() -> GdResult<T>) -> T {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        Ok(Ok(value)) => value,
        Ok(Err(err)) => {
            tracing::error!(callback = op, "{err}");
            default
        }
        Err(payload) => {
            let msg = panic_message(payload);
            tracing::error!(callback = op, "panic in extension callback: {msg}");
            default
        }
    }
}
