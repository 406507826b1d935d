//! Scene layer
//!
//! A scene is whatever currently owns the screen. The engine drives exactly
//! one through the [`SceneManager`]: one frame at a time, one cooked input
//! event at a time. Replacing the scene is a request that takes effect at
//! the next frame boundary, never in the middle of a frame.

mod manager;

pub use manager::SceneManager;

use crate::input::CookedEvent;
use crate::services::PlatformServices;

/// Opaque id of a clickable widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ButtonId(pub u32);

/// Surface dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceInfo {
    pub width: i32,
    pub height: i32,
}

impl SurfaceInfo {
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// What a scene may reach while it runs
pub struct SceneContext<'a> {
    services: &'a PlatformServices,
    surface: SurfaceInfo,
    frame: u64,
    next_scene: &'a mut Option<Box<dyn Scene>>,
}

impl<'a> SceneContext<'a> {
    pub(crate) fn new(
        services: &'a PlatformServices,
        surface: SurfaceInfo,
        frame: u64,
        next_scene: &'a mut Option<Box<dyn Scene>>,
    ) -> Self {
        Self {
            services,
            surface,
            frame,
            next_scene,
        }
    }

    pub fn services(&self) -> &PlatformServices {
        self.services
    }

    pub fn surface(&self) -> SurfaceInfo {
        self.surface
    }

    /// Frames rendered so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Replace the current scene at the next frame boundary
    ///
    /// A later request in the same frame overrides an earlier one.
    pub fn request_scene(&mut self, scene: Box<dyn Scene>) {
        *self.next_scene = Some(scene);
    }
}

/// A screen of the game
///
/// Every hook has an empty default, so scenes implement only what they use.
#[allow(unused_variables)]
pub trait Scene {
    /// Name for log output
    fn name(&self) -> &'static str;

    /// Became the current scene
    fn on_install(&mut self, ctx: &mut SceneContext<'_>) {}

    /// A render context is live; load assets that need it
    fn on_start_graphics(&mut self, ctx: &mut SceneContext<'_>) {}

    /// The render context is going away; drop assets that need it
    fn on_kill_graphics(&mut self, ctx: &mut SceneContext<'_>) {}

    /// Per-frame update, before rendering
    fn on_frame(&mut self, ctx: &mut SceneContext<'_>) {}

    fn render_background(&mut self, ctx: &mut SceneContext<'_>) {}

    fn render_ui(&mut self, ctx: &mut SceneContext<'_>) {}

    /// Handle a cooked input event
    ///
    /// # Returns
    /// `true` if the event was consumed
    fn on_input(&mut self, ctx: &mut SceneContext<'_>, event: &CookedEvent) -> bool {
        false
    }

    fn on_button_clicked(&mut self, ctx: &mut SceneContext<'_>, id: ButtonId) {}

    fn on_pause(&mut self, ctx: &mut SceneContext<'_>) {}

    fn on_resume(&mut self, ctx: &mut SceneContext<'_>) {}

    /// The host asked for state to be persisted
    fn on_save_state(&mut self, ctx: &mut SceneContext<'_>) {}

    /// About to be replaced or dropped
    fn on_uninstall(&mut self, ctx: &mut SceneContext<'_>) {}
}
