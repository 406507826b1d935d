//! Native engine lifecycle
//!
//! The host delivers lifecycle commands and input on its own thread; the
//! engine consumes them on the game thread through a bounded channel and
//! keeps the graphics stack in step with them.
//!
//! # Modules
//!
//! - [`graphics`] - Display, surface and context ownership
//! - [`host`] - Host-to-engine event channel
//! - [`state`] - Lifecycle flags and the derived stage
//! - [`engine`] - The engine itself and its frame loop

pub mod engine;
pub mod graphics;
pub mod host;
pub mod state;

pub use engine::{FrameStats, NativeEngine};
pub use graphics::{
    egl_error_name, GraphicsApi, GraphicsError, GraphicsStack, GraphicsStep, PixelFormat,
    Recovery, EGL_BAD_ACCESS, EGL_BAD_ALLOC, EGL_BAD_ATTRIBUTE, EGL_BAD_CONFIG, EGL_BAD_CONTEXT,
    EGL_BAD_CURRENT_SURFACE, EGL_BAD_DISPLAY, EGL_BAD_MATCH, EGL_BAD_NATIVE_PIXMAP,
    EGL_BAD_NATIVE_WINDOW, EGL_BAD_PARAMETER, EGL_BAD_SURFACE, EGL_CONTEXT_LOST,
    EGL_NOT_INITIALIZED, EGL_SUCCESS,
};
pub use host::{host_channel, Disconnected, EngineCommand, HostEvent, HostReceiver, HostSender};
pub use state::{EngineState, LifecycleStage};
