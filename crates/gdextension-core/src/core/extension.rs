//! Entry point and initialization lifecycle.
//!
//! The host loads the library, calls the entry symbol named in the
//! `.gdextension` manifest, and then drives the returned
//! `GDExtensionInitialization` through each [`InitLevel`]: `initialize` in
//! ascending order while the engine starts, `deinitialize` in descending
//! order at shutdown. The host calls both at every level, including those
//! below the extension's minimum; those calls never reach the [`Extension`].
//! `deinitialize(Core)` is always the last call and releases the state.
//!
//! [`entry`] does the bookkeeping for an [`Extension`] type; the
//! [`export_extension!`](crate::export_extension) macro exports it under a
//! C symbol.

use crate::core::error::{GdError, GdResult};
use crate::core::interface::Interface;
use crate::internal::ffi_guard::{guard_void, guard_with_default};
use crate::internal::logging;
use crate::types::enums::InitLevel;
use gdextension_sys::*;
use std::ffi::c_void;

/// The library handle the host passed to the entry symbol.
///
/// Class registration needs it to associate classes with this library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassLibrary(GDExtensionClassLibraryPtr);

impl ClassLibrary {
    pub fn from_sys(ptr: GDExtensionClassLibraryPtr) -> Self {
        Self(ptr)
    }

    pub fn as_ptr(&self) -> GDExtensionClassLibraryPtr {
        self.0
    }
}

/// Lifecycle hooks of a loadable extension.
pub trait Extension: Sized + 'static {
    /// First level the host initializes this extension at.
    const MINIMUM_LEVEL: InitLevel = InitLevel::Scene;

    /// Runs inside the entry symbol, after the interface is installed.
    fn load(library: ClassLibrary) -> GdResult<Self>;

    fn initialize(&mut self, _level: InitLevel, _library: ClassLibrary) -> GdResult<()> {
        Ok(())
    }

    fn deinitialize(&mut self, _level: InitLevel) -> GdResult<()> {
        Ok(())
    }
}

/// What the host holds as `userdata` between entry and final deinitialization.
struct ExtensionState<E> {
    library: ClassLibrary,
    extension: E,
}

unsafe fn state_mut<'a, E>(userdata: *mut c_void) -> GdResult<&'a mut ExtensionState<E>> {
    unsafe { (userdata as *mut ExtensionState<E>).as_mut() }.ok_or(GdError::NullPointer)
}

/// Implements an entry symbol for `E`.
///
/// Installs logging and the interface table, creates the extension state and
/// fills `r_initialization`. Returns false (and logs why) if anything fails,
/// which makes the host refuse to load the library.
///
/// # Safety
/// Must be called with the arguments the host passed to the entry symbol.
pub unsafe fn entry<E: Extension>(
    get_proc_address: GDExtensionInterfaceGetProcAddress,
    library: GDExtensionClassLibraryPtr,
    r_initialization: *mut GDExtensionInitialization,
) -> GDExtensionBool {
    guard_with_default("entry", GDEXTENSION_FALSE, || {
        logging::init();
        if r_initialization.is_null() || get_proc_address.is_none() {
            return Err(GdError::NullPointer);
        }
        let interface = unsafe { Interface::install(get_proc_address)? };
        let missing = interface.missing_functions();
        if !missing.is_empty() {
            tracing::debug!(?missing, "interface functions unavailable");
        }

        let library = ClassLibrary::from_sys(library);
        let state = Box::new(ExtensionState {
            library,
            extension: E::load(library)?,
        });

        unsafe {
            r_initialization.write(GDExtensionInitialization {
                minimum_initialization_level: E::MINIMUM_LEVEL.sys(),
                userdata: Box::into_raw(state).cast(),
                initialize: Some(initialize::<E>),
                deinitialize: Some(deinitialize::<E>),
            })
        };
        tracing::debug!(extension = std::any::type_name::<E>(), "entry complete");
        Ok(GDEXTENSION_TRUE)
    })
}

unsafe extern "C" fn initialize<E: Extension>(userdata: *mut c_void, level: GDExtensionInitializationLevel) {
    guard_void("initialize", || {
        let level = InitLevel::from_sys(level)?;
        if level < E::MINIMUM_LEVEL {
            return Ok(());
        }
        let state = unsafe { state_mut::<E>(userdata)? };
        tracing::debug!(?level, "initialize");
        state.extension.initialize(level, state.library)
    })
}

unsafe extern "C" fn deinitialize<E: Extension>(userdata: *mut c_void, level: GDExtensionInitializationLevel) {
    guard_void("deinitialize", || {
        let level = InitLevel::from_sys(level)?;
        let state = unsafe { state_mut::<E>(userdata)? };
        let result = if level >= E::MINIMUM_LEVEL {
            tracing::debug!(?level, "deinitialize");
            state.extension.deinitialize(level)
        } else {
            Ok(())
        };
        if level == InitLevel::Core {
            drop(unsafe { Box::from_raw(userdata as *mut ExtensionState<E>) });
            tracing::debug!(extension = std::any::type_name::<E>(), "extension state released");
        }
        result
    })
}

/// Exports `$symbol` as the entry point of extension type `$ty`.
///
/// ```ignore
/// export_extension!(my_library_entry => MyExtension);
/// ```
#[macro_export]
macro_rules! export_extension {
    ($symbol:ident => $ty:ty) => {
        /// Entry symbol named in the `.gdextension` manifest.
        ///
        /// # Safety
        /// Only the host may call this, with a valid resolver and output struct.
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $symbol(
            get_proc_address: $crate::sys::GDExtensionInterfaceGetProcAddress,
            library: $crate::sys::GDExtensionClassLibraryPtr,
            r_initialization: *mut $crate::sys::GDExtensionInitialization,
        ) -> $crate::sys::GDExtensionBool {
            unsafe { $crate::core::extension::entry::<$ty>(get_proc_address, library, r_initialization) }
        }
    };
}
