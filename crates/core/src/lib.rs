//! Tunnel - Core Logic
//!
//! This crate contains the platform-independent half of the game's native
//! side: the lifecycle-driven engine, the platform service facade, input
//! normalization and the scene layer. The host binding lives in the plugin
//! crate and reaches everything here through [`PlatformBridge`] and
//! [`GraphicsApi`].
//!
//! # Re-exports
//!
//! This crate re-exports the SDK and platform crates for convenience:
//! - [`sdk`] - Raw platform types and Java entrypoint table
//! - [`platform`] - Bridge trait and the asynchronous report board

pub use tunnel_platform as platform;
pub use tunnel_sdk as sdk;

pub mod config;
pub mod error;
pub mod input;
pub mod lifecycle;
pub mod scene;
pub mod services;

#[cfg(test)]
mod testing;

// Re-export commonly used items
pub use config::{ConfigError, ConfigResult, CoreConfig};
pub use error::EngineError;
pub use input::{CookedEvent, InputNormalizer, Key, PointerEvent};
pub use lifecycle::{
    host_channel, EngineCommand, EngineState, GraphicsApi, GraphicsError, HostReceiver,
    HostSender, LifecycleStage, NativeEngine, PixelFormat,
};
pub use scene::{ButtonId, Scene, SceneContext, SceneManager, SurfaceInfo};
pub use services::{PlatformServices, RequestQueue, SaveError, ServiceDispatcher};

pub use tunnel_platform::{
    reports, BridgeError, CloudData, MotionRange, PlatformBridge, ReportBoard, ServiceRequest,
    SignInStatus,
};
