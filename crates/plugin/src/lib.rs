//! Tunnel - Native Library
//!
//! This crate provides the JNI boundary between the host activity and the
//! Rust core logic. It compiles to a cdylib (`libtunnel.so`) loaded by the
//! activity, and owns the pieces that only make sense against a real host:
//!
//! - [`ffi`] - JNI exports, the JNI [`PlatformBridge`](tunnel_platform::PlatformBridge)
//!   and the runtime that owns the engine and dispatcher threads
//! - [`egl`] - EGL/GLES graphics backend (Android only)
//! - [`scenes`] - The game's screens

#[cfg(target_os = "android")]
pub mod egl;
pub mod ffi;
pub mod scenes;

pub use ffi::runtime::shutdown;

#[cfg(test)]
mod testing;
