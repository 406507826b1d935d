//! Configuration for the native side
//!
//! This module provides:
//! - A serde-backed [`CoreConfig`] with per-section defaults
//! - TOML file format
//! - Auto-generation of the default file on first load
//! - Manual reload
//!
//! The file lives under the app's files directory, so nothing can be loaded
//! until the host has told us where that is.
//!
//! # Example
//!
//! ```ignore
//! use tunnel_core::CoreConfig;
//!
//! let config = CoreConfig::load(&files_dir).unwrap_or_default();
//! println!("Dead zone: {}", config.input.dead_zone);
//! ```

mod loader;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use loader::{configs_dir, core_config_path};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Framebuffer format requested when choosing a display config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsConfig {
    pub red_bits: u8,
    pub green_bits: u8,
    pub blue_bits: u8,
    pub depth_bits: u8,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            depth_bits: 16,
        }
    }
}

/// Input cooking parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Joystick axis magnitude below which input reads as centered
    pub dead_zone: f32,

    /// Multiplier applied to trackball deltas before clamping
    pub trackball_scale: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dead_zone: 0.1,
            trackball_scale: 1.0,
        }
    }
}

/// Channel capacities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Lifecycle commands and cooked input waiting for the engine thread
    pub host_events: usize,

    /// Fire-and-forget service requests waiting for the dispatcher
    pub service_requests: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            host_events: 256,
            service_requests: 64,
        }
    }
}

/// Core configuration.
///
/// Loaded from `<files_dir>/configs/core.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// Frames slower than this are logged as warnings
    pub frame_budget_ms: u64,

    pub graphics: GraphicsConfig,

    pub input: InputConfig,

    pub queues: QueueConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            frame_budget_ms: 33,
            graphics: GraphicsConfig::default(),
            input: InputConfig::default(),
            queues: QueueConfig::default(),
        }
    }
}

impl CoreConfig {
    /// Load core config from file, creating default if missing.
    ///
    /// # Arguments
    /// * `files_dir` - The app's writable files directory
    pub fn load(files_dir: &Path) -> ConfigResult<Self> {
        let path = core_config_path(files_dir);

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::debug!("Loaded core config from {:?}", path);
            Ok(config)
        } else {
            let default = Self::default();
            default.save(files_dir)?;
            tracing::info!("Created default core config at {:?}", path);
            Ok(default)
        }
    }

    /// Save core config to file.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, files_dir: &Path) -> ConfigResult<()> {
        let path = core_config_path(files_dir);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        tracing::debug!("Saved core config to {:?}", path);
        Ok(())
    }

    /// Reload core config from file.
    pub fn reload(&mut self, files_dir: &Path) -> ConfigResult<()> {
        let path = core_config_path(files_dir);
        let content = std::fs::read_to_string(&path)?;
        *self = toml::from_str(&content)?;
        tracing::debug!("Reloaded core config from {:?}", path);
        Ok(())
    }

    /// Frame budget as a duration
    pub fn frame_budget(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.frame_budget_ms)
    }
}
