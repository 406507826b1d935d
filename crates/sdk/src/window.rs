//! Native window handle
//!
//! The window is owned by the host. We only carry its pointer around until a
//! graphics surface is created against it.

use std::ffi::c_void;
use std::ptr::NonNull;

/// Opaque type for ANativeWindow
#[repr(C)]
pub struct ANativeWindow {
    _opaque: [u8; 0],
}

/// Non-null handle to a host-owned native window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeWindow(NonNull<ANativeWindow>);

// SAFETY: ANativeWindow is reference counted by the platform and may be used
// from any thread. The host keeps it alive until the engine acknowledges
// TERM_WINDOW.
unsafe impl Send for NativeWindow {}
unsafe impl Sync for NativeWindow {}

impl NativeWindow {
    /// Wrap a raw window pointer
    ///
    /// # Returns
    /// `None` if the pointer is null
    pub fn new(ptr: *mut ANativeWindow) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    /// Get the raw window pointer
    pub fn as_ptr(self) -> *mut ANativeWindow {
        self.0.as_ptr()
    }

    /// Get the raw window pointer as an untyped pointer
    pub fn as_raw(self) -> *mut c_void {
        self.0.as_ptr() as *mut c_void
    }
}
