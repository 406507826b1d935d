//! Tunnel SDK - Raw Platform Type Definitions
//!
//! This crate contains the raw shapes exchanged with the host platform.
//! It has no dependencies and compiles quickly, allowing parallel compilation
//! of dependent crates.
//!
//! # Modules
//!
//! - [`lifecycle`] - Lifecycle command codes delivered by the host activity
//! - [`input`] - Raw input events and the platform input constants
//! - [`window`] - Opaque native window handle
//! - [`entrypoints`] - Java methods the native side calls through JNI

pub mod entrypoints;
pub mod input;
pub mod lifecycle;
pub mod window;

pub use entrypoints::ENTRYPOINTS;
pub use input::{RawInputEvent, RawKeyEvent, RawMotionEvent};
pub use lifecycle::LifecycleCommand;
pub use window::{ANativeWindow, NativeWindow};
