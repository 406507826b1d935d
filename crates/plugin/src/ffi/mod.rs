//! JNI boundary
//!
//! - [`exports`] - `Java_*` functions the host activity calls
//! - [`bridge`] - Calls from native code back into the activity
//! - [`runtime`] - Threads and channels living between `nativeOnCreate`
//!   and `nativeOnDestroy`

pub mod bridge;
pub mod exports;
pub mod runtime;

pub use bridge::JniBridge;
pub use runtime::{Runtime, RuntimeError};
