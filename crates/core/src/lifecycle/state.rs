//! Engine lifecycle flags

use std::fmt;

/// Lifecycle flags and surface bookkeeping
///
/// Mutated only by command handlers and the per-frame driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineState {
    pub has_focus: bool,
    pub is_visible: bool,
    pub has_window: bool,

    /// Scene assets that need a live context are loaded
    pub has_graphics_objects: bool,

    /// Pipeline state must be configured before the next frame
    pub is_first_frame: bool,

    pub surface_width: i32,
    pub surface_height: i32,

    /// Platform API level, 0 if unknown
    pub api_version: i32,
}

impl EngineState {
    /// Whether frames should be produced
    pub fn is_animating(&self) -> bool {
        self.has_focus && self.is_visible && self.has_window
    }
}

/// Coarse stage of the graphics lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleStage {
    NoWindow,
    DisplayReady,
    SurfaceReady,
    ContextReady,
    Rendering,
}

impl LifecycleStage {
    /// Derive the stage from the flags and what the graphics stack holds
    pub fn derive(
        state: &EngineState,
        has_display: bool,
        has_surface: bool,
        has_context: bool,
    ) -> Self {
        if !state.has_window || !has_display {
            Self::NoWindow
        } else if !has_surface {
            Self::DisplayReady
        } else if !has_context {
            Self::SurfaceReady
        } else if !state.is_animating() {
            Self::ContextReady
        } else {
            Self::Rendering
        }
    }
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoWindow => "no window",
            Self::DisplayReady => "display ready",
            Self::SurfaceReady => "surface ready",
            Self::ContextReady => "context ready",
            Self::Rendering => "rendering",
        };
        f.write_str(name)
    }
}
