//! Current scene ownership and dispatch

use tracing::{debug, info};

use super::{ButtonId, Scene, SceneContext, SurfaceInfo};
use crate::input::CookedEvent;
use crate::services::PlatformServices;

/// Owns the current scene and forwards engine calls to it
pub struct SceneManager {
    services: PlatformServices,
    current: Option<Box<dyn Scene>>,
    pending: Option<Box<dyn Scene>>,
    surface: SurfaceInfo,
    graphics_live: bool,
    frames: u64,
}

impl SceneManager {
    /// Create a manager with no scene
    pub fn new(services: PlatformServices) -> Self {
        Self {
            services,
            current: None,
            pending: None,
            surface: SurfaceInfo::default(),
            graphics_live: false,
            frames: 0,
        }
    }

    /// Create a manager whose first scene installs on the first frame
    pub fn with_scene(services: PlatformServices, scene: Box<dyn Scene>) -> Self {
        let mut manager = Self::new(services);
        manager.pending = Some(scene);
        manager
    }

    pub fn services(&self) -> &PlatformServices {
        &self.services
    }

    /// Replace the current scene at the next frame boundary
    pub fn request_scene(&mut self, scene: Box<dyn Scene>) {
        debug!("Scene {} requested", scene.name());
        self.pending = Some(scene);
    }

    pub fn current_name(&self) -> Option<&'static str> {
        self.current.as_ref().map(|scene| scene.name())
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn graphics_live(&self) -> bool {
        self.graphics_live
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn set_surface(&mut self, width: i32, height: i32) {
        self.surface = SurfaceInfo { width, height };
    }

    /// Render one frame through the current scene
    ///
    /// A pending replacement is installed first.
    pub fn do_frame(&mut self) {
        self.apply_pending();
        self.with_current(|scene, ctx| {
            scene.on_frame(ctx);
            scene.render_background(ctx);
            scene.render_ui(ctx);
        });
        self.frames += 1;
    }

    /// Forward a cooked input event
    ///
    /// # Returns
    /// `true` if the current scene consumed it
    pub fn dispatch_input(&mut self, event: &CookedEvent) -> bool {
        self.with_current(|scene, ctx| scene.on_input(ctx, event))
            .unwrap_or(false)
    }

    pub fn click_button(&mut self, id: ButtonId) {
        self.with_current(|scene, ctx| scene.on_button_clicked(ctx, id));
    }

    /// A render context is live
    pub fn start_graphics(&mut self) {
        if self.graphics_live {
            return;
        }
        self.graphics_live = true;
        self.with_current(|scene, ctx| scene.on_start_graphics(ctx));
    }

    /// The render context is going away
    pub fn kill_graphics(&mut self) {
        if !self.graphics_live {
            return;
        }
        self.with_current(|scene, ctx| scene.on_kill_graphics(ctx));
        self.graphics_live = false;
    }

    pub fn pause(&mut self) {
        self.with_current(|scene, ctx| scene.on_pause(ctx));
    }

    pub fn resume(&mut self) {
        self.with_current(|scene, ctx| scene.on_resume(ctx));
    }

    pub fn save_state(&mut self) {
        self.with_current(|scene, ctx| scene.on_save_state(ctx));
    }

    /// Drop the current scene and any pending one
    pub fn uninstall(&mut self) {
        self.kill_graphics();
        self.with_current(|scene, ctx| scene.on_uninstall(ctx));
        if let Some(scene) = self.current.take() {
            info!("Scene {} uninstalled", scene.name());
        }
        self.pending = None;
    }

    fn with_current<R>(
        &mut self,
        f: impl FnOnce(&mut dyn Scene, &mut SceneContext<'_>) -> R,
    ) -> Option<R> {
        let scene = self.current.as_deref_mut()?;
        let mut ctx =
            SceneContext::new(&self.services, self.surface, self.frames, &mut self.pending);
        Some(f(scene, &mut ctx))
    }

    fn apply_pending(&mut self) {
        let Some(next) = self.pending.take() else {
            return;
        };

        if let Some(mut old) = self.current.take() {
            let mut ctx =
                SceneContext::new(&self.services, self.surface, self.frames, &mut self.pending);
            if self.graphics_live {
                old.on_kill_graphics(&mut ctx);
            }
            old.on_uninstall(&mut ctx);
            info!("Scene {} uninstalled", old.name());
        }
        // The outgoing scene does not get to pick its successor
        self.pending = None;

        info!("Installing scene {}", next.name());
        self.current = Some(next);

        let graphics_live = self.graphics_live;
        self.with_current(|scene, ctx| {
            scene.on_install(ctx);
            if graphics_live {
                scene.on_start_graphics(ctx);
            }
        });
    }
}

impl Drop for SceneManager {
    fn drop(&mut self) {
        self.uninstall();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{services_with, MockBridge, RecordingScene, SceneLog};

    fn manager() -> SceneManager {
        let (services, _dispatcher, _bridge) = services_with(MockBridge::default());
        SceneManager::new(services)
    }

    #[test]
    fn test_first_scene_installs_on_first_frame() {
        let log = SceneLog::default();
        let mut mgr = manager();
        mgr.request_scene(RecordingScene::boxed("a", &log));
        assert_eq!(mgr.current_name(), None);

        mgr.do_frame();
        assert_eq!(mgr.current_name(), Some("a"));
        assert_eq!(
            log.take(),
            vec!["a:install", "a:frame", "a:background", "a:ui"]
        );
    }

    #[test]
    fn test_replacement_waits_for_frame_boundary() {
        let log = SceneLog::default();
        let mut mgr = manager();
        mgr.request_scene(RecordingScene::boxed("a", &log));
        mgr.start_graphics();
        mgr.do_frame();
        log.take();

        mgr.request_scene(RecordingScene::boxed("b", &log));
        assert!(mgr.dispatch_input(&CookedEvent::Back));
        mgr.click_button(ButtonId(3));
        assert_eq!(mgr.current_name(), Some("a"));

        mgr.do_frame();
        assert_eq!(
            log.take(),
            vec![
                "a:input",
                "a:click:3",
                "a:kill_graphics",
                "a:uninstall",
                "b:install",
                "b:start_graphics",
                "b:frame",
                "b:background",
                "b:ui",
            ]
        );
    }

    #[test]
    fn test_scene_can_request_successor() {
        let log = SceneLog::default();
        let mut mgr = manager();
        let mut first = RecordingScene::new("a", &log);
        first.next_on_input = Some(RecordingScene::boxed("b", &log));
        mgr.request_scene(Box::new(first));
        mgr.do_frame();

        mgr.dispatch_input(&CookedEvent::Back);
        assert!(mgr.has_pending());
        assert_eq!(mgr.current_name(), Some("a"));

        mgr.do_frame();
        assert_eq!(mgr.current_name(), Some("b"));
    }

    #[test]
    fn test_graphics_hooks_are_paired() {
        let log = SceneLog::default();
        let mut mgr = manager();
        mgr.request_scene(RecordingScene::boxed("a", &log));
        mgr.do_frame();
        log.take();

        mgr.kill_graphics();
        mgr.start_graphics();
        mgr.start_graphics();
        mgr.kill_graphics();
        mgr.kill_graphics();
        assert_eq!(log.take(), vec!["a:start_graphics", "a:kill_graphics"]);
    }

    #[test]
    fn test_no_scene_consumes_nothing() {
        let mut mgr = manager();
        assert!(!mgr.dispatch_input(&CookedEvent::Back));
        mgr.do_frame();
        assert_eq!(mgr.frames(), 1);
    }

    #[test]
    fn test_uninstall_on_drop() {
        let log = SceneLog::default();
        {
            let mut mgr = manager();
            mgr.request_scene(RecordingScene::boxed("a", &log));
            mgr.start_graphics();
            mgr.do_frame();
            log.take();
        }
        assert_eq!(log.take(), vec!["a:kill_graphics", "a:uninstall"]);
    }
}
