use crate::types::enums::{CallErrorKind, VariantType};
use gdextension_sys::GDExtensionCallError;
use std::ffi::NulError;
use std::fmt;
use std::str::Utf8Error;
use std::sync::{MutexGuard, PoisonError};
use thiserror::Error;

pub type GdResult<T> = anyhow::Result<T, GdError>;

#[derive(Error, Debug)]
pub enum GdError {
    #[error("GDExtension interface has not been installed")]
    InterfaceNotInitialized,

    #[error("Host does not provide interface function `{0}`")]
    MissingInterfaceFunction(&'static str),

    #[error("Null pointer encountered")]
    NullPointer,

    #[error("String conversion error: {0}")]
    StringConversion(#[from] NulError),

    #[error("UTF-8 conversion error: {0}")]
    Utf8Conversion(#[from] Utf8Error),

    #[error("Method bind not found: {class}.{method} (hash {hash})")]
    MethodNotFound {
        class: String,
        method: String,
        hash: i64,
    },

    #[error("Utility function not found: {name} (hash {hash})")]
    UtilityNotFound { name: String, hash: i64 },

    #[error("Host call failed: {0}")]
    Call(CallError),

    #[error("Unexpected variant type: expected {expected:?}, got {actual:?}")]
    UnexpectedVariantType {
        expected: VariantType,
        actual: VariantType,
    },

    #[error("Invalid initialization level: {0}")]
    InvalidInitializationLevel(u32),

    #[error("Panic across the extension boundary: {0}")]
    Panic(String),

    #[error("Mutex poisoned")]
    MutexPoisoned,
}

impl<T> From<PoisonError<MutexGuard<'_, T>>> for GdError {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        GdError::MutexPoisoned
    }
}

/// A failed generic call, as reported by the host in `GDExtensionCallError`.
///
/// `argument` is the index of the offending argument and `expected` is either
/// the expected variant type or the expected argument count, depending on
/// [`CallErrorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallError {
    pub kind: CallErrorKind,
    pub argument: i32,
    pub expected: i32,
}

impl CallError {
    /// Converts the raw host struct, returning `Ok(())` for `GDEXTENSION_CALL_OK`.
    pub fn check(raw: &GDExtensionCallError) -> GdResult<()> {
        match CallErrorKind::from(raw.error) {
            CallErrorKind::Ok => Ok(()),
            kind => Err(GdError::Call(CallError {
                kind,
                argument: raw.argument,
                expected: raw.expected,
            })),
        }
    }

    /// The raw error code the host used.
    pub fn code(&self) -> u32 {
        self.kind.into()
    }
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} (code {}, argument {}, expected {})",
            self.kind,
            self.code(),
            self.argument,
            self.expected
        )
    }
}
