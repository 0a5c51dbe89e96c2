use std::ffi::c_void;
use std::mem::MaybeUninit;

/// Storage for a host builtin whose layout is only known by size.
///
/// The host may write pointers into it, so it is kept pointer-aligned (8 is
/// enough for every supported target).
#[repr(C, align(8))]
pub(crate) struct Opaque<const N: usize>([MaybeUninit<u8>; N]);

impl<const N: usize> Opaque<N> {
    pub(crate) fn uninit() -> Self {
        Self([MaybeUninit::uninit(); N])
    }

    pub(crate) fn as_ptr(&self) -> *const c_void {
        self.0.as_ptr().cast()
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut c_void {
        self.0.as_mut_ptr().cast()
    }
}
