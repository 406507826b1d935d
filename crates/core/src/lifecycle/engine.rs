//! The native engine
//!
//! Owns the graphics stack for the process and keeps it consistent with the
//! lifecycle commands the host delivers, while driving the frame loop.

use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use tunnel_sdk::{NativeWindow, RawInputEvent};

use super::graphics::{GraphicsApi, GraphicsError, GraphicsStack, PixelFormat, Recovery};
use super::host::{Disconnected, EngineCommand, HostEvent, HostReceiver};
use super::state::{EngineState, LifecycleStage};
use crate::config::CoreConfig;
use crate::error::EngineError;
use crate::input::{CookedEvent, InputNormalizer};
use crate::scene::SceneManager;
use crate::services::PlatformServices;

/// Frame counter and timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    frames: u64,
    last_frame: Duration,
    budget: Duration,
}

impl FrameStats {
    pub fn new(budget: Duration) -> Self {
        Self {
            frames: 0,
            last_frame: Duration::ZERO,
            budget,
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn last_frame_time(&self) -> Duration {
        self.last_frame
    }

    fn record(&mut self, elapsed: Duration) {
        self.frames += 1;
        self.last_frame = elapsed;

        if elapsed > self.budget {
            warn!(
                "Frame took {}ms (frame {})",
                elapsed.as_millis(),
                self.frames
            );
        }
    }
}

/// Lifecycle-driven owner of the graphics stack and the frame loop
pub struct NativeEngine<G: GraphicsApi> {
    graphics: GraphicsStack<G>,
    state: EngineState,
    window: Option<NativeWindow>,
    services: PlatformServices,
    scenes: SceneManager,
    normalizer: InputNormalizer,
    host: HostReceiver,
    stats: FrameStats,
    destroy_requested: bool,
}

impl<G: GraphicsApi> NativeEngine<G> {
    /// Create an engine
    ///
    /// # Arguments
    /// * `api` - Graphics backend
    /// * `scenes` - Scene manager, usually with the first scene pending
    /// * `host` - Receiving half of the host event channel
    /// * `config` - Pixel format, input tuning and frame budget
    pub fn new(api: G, scenes: SceneManager, host: HostReceiver, config: &CoreConfig) -> Self {
        let services = scenes.services().clone();
        let state = EngineState {
            api_version: services.api_level(),
            ..EngineState::default()
        };
        info!("Engine created (API level {})", state.api_version);

        Self {
            graphics: GraphicsStack::new(api, PixelFormat::from(&config.graphics)),
            state,
            window: None,
            services,
            scenes,
            normalizer: InputNormalizer::new(&config.input),
            host,
            stats: FrameStats::new(config.frame_budget()),
            destroy_requested: false,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn stage(&self) -> LifecycleStage {
        LifecycleStage::derive(
            &self.state,
            self.graphics.has_display(),
            self.graphics.has_surface(),
            self.graphics.has_context(),
        )
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn graphics(&self) -> &GraphicsStack<G> {
        &self.graphics
    }

    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    pub fn is_animating(&self) -> bool {
        self.state.is_animating()
    }

    /// Whether a frame can be produced right now
    pub fn can_render(&self) -> bool {
        self.is_animating() && self.graphics.is_ready()
    }

    pub fn destroy_requested(&self) -> bool {
        self.destroy_requested
    }

    // === Commands ===

    /// Apply one lifecycle command
    ///
    /// # Errors
    /// [`EngineError::NoUsableDisplay`] if the display cannot be opened at all
    pub fn handle_command(&mut self, command: EngineCommand) -> Result<(), EngineError> {
        info!("Command: {}", command.name());

        match command {
            EngineCommand::WindowCreated(window) => {
                // A surface bound to another window is useless now
                if self.window.is_some_and(|old| old != window) {
                    self.kill_graphics_objects();
                    self.graphics.kill_surface();
                }
                self.window = Some(window);
                self.state.has_window = true;
            }
            EngineCommand::WindowDestroyed => {
                self.kill_graphics_objects();
                self.graphics.kill_surface();
                self.window = None;
                self.state.has_window = false;
            }
            EngineCommand::WindowResized => {
                // Size is re-queried on the next frame
            }
            EngineCommand::GainedFocus => self.state.has_focus = true,
            EngineCommand::LostFocus => self.state.has_focus = false,
            EngineCommand::Start => self.state.is_visible = true,
            EngineCommand::Stop => self.state.is_visible = false,
            EngineCommand::Pause => {
                self.scenes.pause();
                self.kill_display();
            }
            EngineCommand::Resume => self.scenes.resume(),
            EngineCommand::LowMemory => {
                if !self.state.has_window {
                    self.kill_graphics_objects();
                }
            }
            EngineCommand::SaveState => self.scenes.save_state(),
            EngineCommand::Destroy => self.destroy_requested = true,
        }

        if command.retries_acquisition() {
            self.acquire_graphics()?;
        }

        debug!("Stage: {}", self.stage());
        Ok(())
    }

    /// Dispatch a cooked input event to the current scene
    pub fn handle_input(&mut self, event: &CookedEvent) -> bool {
        self.scenes.dispatch_input(event)
    }

    /// Cook a raw input event and dispatch it
    pub fn handle_raw_input(&mut self, event: &RawInputEvent) -> bool {
        let Self {
            normalizer,
            services,
            scenes,
            ..
        } = self;
        normalizer.cook(event, &*services, |cooked| scenes.dispatch_input(&cooked))
    }

    /// Release every graphics resource
    ///
    /// Safe to call repeatedly and from any state.
    pub fn kill_display(&mut self) {
        self.kill_graphics_objects();
        self.graphics.kill_display();
    }

    // === Frame loop ===

    /// Run until the host asks for destruction or hangs up
    ///
    /// Blocks on the host channel whenever no frame can be produced, so a
    /// backgrounded game does not spin. Tears the graphics stack down on exit.
    ///
    /// # Errors
    /// [`EngineError::NoUsableDisplay`] if the display cannot be opened at all
    #[tracing::instrument(skip_all)]
    pub fn game_loop(&mut self) -> Result<(), EngineError> {
        info!("Entering game loop");

        let result = loop {
            match self.service_host_events() {
                Ok(true) => {}
                Ok(false) => break Ok(()),
                Err(e) => break Err(e),
            }

            if self.can_render() {
                self.do_frame();
            }
        };

        self.kill_display();
        self.scenes.uninstall();
        info!("Left game loop after {} frames", self.stats.frame_count());
        result
    }

    /// Handle pending host events
    ///
    /// # Returns
    /// `false` once the loop should end
    fn service_host_events(&mut self) -> Result<bool, EngineError> {
        if !self.can_render() {
            match self.host.recv() {
                Ok(event) => self.handle_event(event)?,
                Err(Disconnected) => {
                    info!("Host channel closed");
                    return Ok(false);
                }
            }
        }

        loop {
            if self.destroy_requested {
                return Ok(false);
            }
            match self.host.try_recv() {
                Ok(Some(event)) => self.handle_event(event)?,
                Ok(None) => return Ok(true),
                Err(Disconnected) => {
                    info!("Host channel closed");
                    return Ok(false);
                }
            }
        }
    }

    fn handle_event(&mut self, event: HostEvent) -> Result<(), EngineError> {
        match event {
            HostEvent::Command(command) => self.handle_command(command)?,
            HostEvent::Input(cooked) => {
                self.handle_input(&cooked);
            }
            HostEvent::Query { event, reply } => {
                let consumed = self.handle_input(&event);
                let _ = reply.send(consumed);
            }
            HostEvent::Barrier(ack) => {
                let _ = ack.send(());
            }
        }
        Ok(())
    }

    /// Render one frame
    ///
    /// Call only when [`can_render`](Self::can_render) holds.
    pub fn do_frame(&mut self) {
        let start = Instant::now();

        if let Some((width, height)) = self.graphics.surface_size() {
            if width != self.state.surface_width || height != self.state.surface_height {
                info!("Surface size {}x{}", width, height);
                self.state.surface_width = width;
                self.state.surface_height = height;
                self.state.is_first_frame = true;
            }
        }

        if self.state.is_first_frame {
            self.graphics
                .configure_pipeline(self.state.surface_width, self.state.surface_height);
            self.scenes
                .set_surface(self.state.surface_width, self.state.surface_height);
            self.state.is_first_frame = false;
        }

        if !self.state.has_graphics_objects {
            debug!("Loading graphics objects");
            self.scenes.start_graphics();
            self.state.has_graphics_objects = true;
        }

        self.scenes.do_frame();

        if let Err(e) = self.graphics.swap_buffers() {
            self.recover_from_swap(e);
        }

        self.stats.record(start.elapsed());
    }

    // === Graphics acquisition ===

    /// Bring the graphics stack up against the current window
    ///
    /// A display that cannot be opened is fatal. Any later failure tears
    /// everything down; the next relevant command retries.
    fn acquire_graphics(&mut self) -> Result<(), EngineError> {
        let Some(window) = self.window else {
            return Ok(());
        };
        if self.graphics.is_ready() {
            return Ok(());
        }

        if let Err(e) = self.graphics.init_display() {
            error!("No usable display: {}", e);
            return Err(EngineError::NoUsableDisplay(e));
        }

        let acquired = self
            .graphics
            .init_surface(window)
            .and_then(|()| self.graphics.init_context())
            .and_then(|()| self.graphics.make_current());

        match acquired {
            Ok(()) => {
                info!("Graphics ready");
                self.state.is_first_frame = true;
            }
            Err(e) => {
                error!("Graphics acquisition failed, waiting for next command: {}", e);
                self.kill_display();
            }
        }
        Ok(())
    }

    fn recover_from_swap(&mut self, e: GraphicsError) {
        if self.graphics.recover(&e) == Recovery::None {
            error!("Swap failed with no known recovery: {}", e);
            return;
        }
        error!("Swap failed, rebuilding: {}", e);

        if !self.graphics.has_context() {
            self.kill_graphics_objects();
        }
        // A lost display has nothing to reopen on; other losses rebuild at once
        if self.graphics.has_display() {
            if let Err(e) = self.acquire_graphics() {
                error!("Rebuild failed: {}", e);
            }
        }
    }

    fn kill_graphics_objects(&mut self) {
        if self.state.has_graphics_objects {
            debug!("Unloading graphics objects");
            self.scenes.kill_graphics();
            self.state.has_graphics_objects = false;
        }
    }
}

impl<G: GraphicsApi> Drop for NativeEngine<G> {
    fn drop(&mut self) {
        self.kill_display();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::graphics::{EGL_BAD_SURFACE, EGL_CONTEXT_LOST};
    use crate::lifecycle::host::{host_channel, HostSender};
    use crate::testing::{
        other_test_window, services_with, test_window, MockBridge, MockGraphics, RecordingScene,
        SceneLog,
    };

    fn engine_with(api: MockGraphics) -> (NativeEngine<MockGraphics>, HostSender, SceneLog) {
        let (services, _dispatcher, _bridge) = services_with(MockBridge::default());
        let log = SceneLog::default();
        let scenes = SceneManager::with_scene(services, RecordingScene::boxed("game", &log));
        let (sender, receiver) = host_channel(64);
        let engine = NativeEngine::new(api, scenes, receiver, &CoreConfig::default());
        (engine, sender, log)
    }

    fn bring_up(engine: &mut NativeEngine<MockGraphics>) {
        engine
            .handle_command(EngineCommand::WindowCreated(test_window()))
            .unwrap();
        engine.handle_command(EngineCommand::Start).unwrap();
        engine.handle_command(EngineCommand::GainedFocus).unwrap();
    }

    #[test]
    fn test_api_level_queried_at_creation() {
        let (engine, _sender, _log) = engine_with(MockGraphics::default());
        assert_eq!(engine.state().api_version, MockBridge::API_LEVEL);
    }

    #[test]
    fn test_window_created_acquires_everything() {
        let (mut engine, _sender, _log) = engine_with(MockGraphics::default());
        assert_eq!(engine.stage(), LifecycleStage::NoWindow);

        engine
            .handle_command(EngineCommand::WindowCreated(test_window()))
            .unwrap();
        assert!(engine.graphics().is_ready());
        assert_eq!(engine.stage(), LifecycleStage::ContextReady);
        assert!(!engine.can_render());

        engine.handle_command(EngineCommand::Start).unwrap();
        engine.handle_command(EngineCommand::GainedFocus).unwrap();
        assert_eq!(engine.stage(), LifecycleStage::Rendering);
        assert!(engine.can_render());
    }

    #[test]
    fn test_window_recreation_reuses_display_and_context() {
        let (mut engine, _sender, _log) = engine_with(MockGraphics::default());
        bring_up(&mut engine);

        engine.handle_command(EngineCommand::WindowDestroyed).unwrap();
        assert!(!engine.state().has_window);
        assert!(engine.graphics().has_display());
        assert!(engine.graphics().has_context());
        assert!(!engine.graphics().has_surface());

        engine
            .handle_command(EngineCommand::WindowCreated(test_window()))
            .unwrap();
        assert!(engine.can_render());

        let api = engine.graphics().api();
        assert_eq!(api.displays_opened, 1);
        assert_eq!(api.configs_chosen, 1);
        assert_eq!(api.contexts_created, 1);
        assert_eq!(api.surfaces_created, 2);
        assert_eq!(api.surfaces_alive(), 1);
    }

    #[test]
    fn test_different_window_rebinds_surface() {
        let (mut engine, _sender, log) = engine_with(MockGraphics::default());
        bring_up(&mut engine);
        engine.do_frame();
        log.take();

        // Same window again keeps the surface
        engine
            .handle_command(EngineCommand::WindowCreated(test_window()))
            .unwrap();
        assert_eq!(engine.graphics().api().surfaces_created, 1);

        engine
            .handle_command(EngineCommand::WindowCreated(other_test_window()))
            .unwrap();
        assert!(engine.can_render());
        assert!(!engine.state().has_graphics_objects);
        assert_eq!(log.take(), vec!["game:kill_graphics"]);

        let api = engine.graphics().api();
        assert_eq!(api.surfaces_created, 2);
        assert_eq!(api.surfaces_alive(), 1);
        assert_eq!(api.contexts_created, 1);
    }

    #[test]
    fn test_window_destroyed_unloads_graphics_objects() {
        let (mut engine, _sender, log) = engine_with(MockGraphics::default());
        bring_up(&mut engine);
        engine.do_frame();
        assert!(engine.state().has_graphics_objects);
        log.take();

        engine.handle_command(EngineCommand::WindowDestroyed).unwrap();
        assert!(!engine.state().has_graphics_objects);
        assert_eq!(log.take(), vec!["game:kill_graphics"]);
    }

    #[test]
    fn test_kill_display_twice() {
        let (mut engine, _sender, _log) = engine_with(MockGraphics::default());
        bring_up(&mut engine);
        engine.do_frame();

        engine.kill_display();
        engine.kill_display();

        let api = engine.graphics().api();
        assert_eq!(api.displays_closed, 1);
        assert_eq!(api.contexts_destroyed, 1);
        assert_eq!(api.surfaces_destroyed, 1);
        assert!(!engine.state().has_graphics_objects);
    }

    #[test]
    fn test_kill_display_before_anything() {
        let (mut engine, _sender, _log) = engine_with(MockGraphics::default());
        engine.kill_display();
        assert_eq!(engine.graphics().api().displays_closed, 0);
    }

    #[test]
    fn test_pause_is_full_teardown_and_resume_rebuilds() {
        let (mut engine, _sender, log) = engine_with(MockGraphics::default());
        bring_up(&mut engine);
        engine.do_frame();
        log.take();

        engine.handle_command(EngineCommand::Pause).unwrap();
        assert!(!engine.graphics().has_display());
        assert!(!engine.can_render());
        assert!(engine.is_animating());
        assert_eq!(log.take(), vec!["game:pause", "game:kill_graphics"]);

        engine.handle_command(EngineCommand::Pause).unwrap();
        assert_eq!(engine.graphics().api().displays_closed, 1);
        log.take();

        engine.handle_command(EngineCommand::Resume).unwrap();
        assert!(engine.can_render());
        assert_eq!(engine.graphics().api().displays_opened, 2);
        assert_eq!(log.take(), vec!["game:resume"]);
    }

    #[test]
    fn test_surface_failure_retries_on_next_command() {
        let mut api = MockGraphics::default();
        api.fail_surfaces = 1;
        let (mut engine, _sender, _log) = engine_with(api);

        engine
            .handle_command(EngineCommand::WindowCreated(test_window()))
            .unwrap();
        assert!(engine.state().has_window);
        assert!(!engine.graphics().has_display());
        assert_eq!(engine.stage(), LifecycleStage::NoWindow);
        assert_eq!(engine.graphics().api().displays_closed, 1);

        engine.handle_command(EngineCommand::GainedFocus).unwrap();
        assert!(engine.graphics().is_ready());
    }

    #[test]
    fn test_unusable_display_is_fatal() {
        let mut api = MockGraphics::default();
        api.fail_display = true;
        let (mut engine, _sender, _log) = engine_with(api);

        let result = engine.handle_command(EngineCommand::WindowCreated(test_window()));
        assert!(matches!(result, Err(EngineError::NoUsableDisplay(_))));
    }

    #[test]
    fn test_first_frame_configures_pipeline() {
        let (mut engine, _sender, _log) = engine_with(MockGraphics::sized(1280, 720));
        bring_up(&mut engine);

        engine.do_frame();
        engine.do_frame();
        assert_eq!(engine.graphics().api().pipeline_configs, vec![(1280, 720)]);
        assert_eq!(engine.scenes().frames(), 2);
        assert_eq!(engine.stats().frame_count(), 2);

        engine.graphics.api_mut().size = (720, 1280);
        engine.handle_command(EngineCommand::WindowResized).unwrap();
        engine.do_frame();
        assert_eq!(
            engine.graphics().api().pipeline_configs,
            vec![(1280, 720), (720, 1280)]
        );
        assert_eq!(engine.state().surface_width, 720);
    }

    #[test]
    fn test_pipeline_reconfigured_after_surface_rebuild() {
        let (mut engine, _sender, _log) = engine_with(MockGraphics::sized(800, 600));
        bring_up(&mut engine);
        engine.do_frame();

        engine.handle_command(EngineCommand::WindowDestroyed).unwrap();
        engine
            .handle_command(EngineCommand::WindowCreated(test_window()))
            .unwrap();
        engine.do_frame();
        assert_eq!(engine.graphics().api().pipeline_configs.len(), 2);
    }

    #[test]
    fn test_bad_surface_swap_rebuilds_surface() {
        let (mut engine, _sender, log) = engine_with(MockGraphics::default());
        bring_up(&mut engine);
        engine.do_frame();
        log.take();

        engine.graphics.api_mut().swap_error = Some(EGL_BAD_SURFACE);
        engine.do_frame();

        assert!(engine.can_render());
        let api = engine.graphics().api();
        assert_eq!(api.surfaces_created, 2);
        assert_eq!(api.contexts_created, 1);
        assert!(engine.state().has_graphics_objects);
        assert!(!log.take().contains(&"game:kill_graphics".to_string()));
    }

    #[test]
    fn test_context_loss_reloads_graphics_objects() {
        let (mut engine, _sender, log) = engine_with(MockGraphics::default());
        bring_up(&mut engine);
        engine.do_frame();
        log.take();

        engine.graphics.api_mut().swap_error = Some(EGL_CONTEXT_LOST);
        engine.do_frame();
        assert!(engine.can_render());
        assert_eq!(engine.graphics().api().contexts_created, 2);
        assert!(!engine.state().has_graphics_objects);

        engine.do_frame();
        let entries = log.take();
        assert!(entries.contains(&"game:kill_graphics".to_string()));
        assert!(entries.contains(&"game:start_graphics".to_string()));
    }

    #[test]
    fn test_low_memory_only_unloads_without_window() {
        let (mut engine, _sender, _log) = engine_with(MockGraphics::default());
        bring_up(&mut engine);
        engine.do_frame();

        engine.handle_command(EngineCommand::LowMemory).unwrap();
        assert!(engine.state().has_graphics_objects);

        engine.handle_command(EngineCommand::LostFocus).unwrap();
        engine.handle_command(EngineCommand::LowMemory).unwrap();
        assert!(engine.state().has_graphics_objects);

        engine.handle_command(EngineCommand::WindowDestroyed).unwrap();
        engine.handle_command(EngineCommand::LowMemory).unwrap();
        assert!(!engine.state().has_graphics_objects);
        assert!(engine.graphics().has_context());
    }

    #[test]
    fn test_save_state_reaches_scene() {
        let (mut engine, _sender, log) = engine_with(MockGraphics::default());
        bring_up(&mut engine);
        engine.do_frame();
        log.take();

        engine.handle_command(EngineCommand::SaveState).unwrap();
        assert_eq!(log.take(), vec!["game:save_state"]);
    }

    #[test]
    fn test_raw_back_press_reaches_scene() {
        use tunnel_sdk::input::{KEYCODE_BACK, KEY_ACTION_DOWN, SOURCE_KEYBOARD};
        use tunnel_sdk::RawKeyEvent;

        let (mut engine, _sender, log) = engine_with(MockGraphics::default());
        bring_up(&mut engine);
        engine.do_frame();
        log.take();

        let event = RawInputEvent::Key(RawKeyEvent {
            device_id: 1,
            source: SOURCE_KEYBOARD,
            action: KEY_ACTION_DOWN,
            key_code: KEYCODE_BACK,
            repeat_count: 0,
        });
        assert!(engine.handle_raw_input(&event));
        assert_eq!(log.take(), vec!["game:input"]);
    }

    #[test]
    fn test_query_answers_with_scene_verdict() {
        let (mut engine, _sender, log) = engine_with(MockGraphics::default());
        bring_up(&mut engine);
        engine.do_frame();

        let (reply, answer) = crossbeam_channel::bounded(1);
        engine
            .handle_event(HostEvent::Query {
                event: CookedEvent::Back,
                reply,
            })
            .unwrap();
        assert_eq!(answer.try_recv(), Ok(true));

        let mut menu = RecordingScene::new("menu", &log);
        menu.consumes_input = false;
        engine.scenes.request_scene(Box::new(menu));
        engine.do_frame();
        log.take();

        let (reply, answer) = crossbeam_channel::bounded(1);
        engine
            .handle_event(HostEvent::Query {
                event: CookedEvent::Back,
                reply,
            })
            .unwrap();
        assert_eq!(answer.try_recv(), Ok(false));
        assert_eq!(log.take(), vec!["menu:input"]);
    }

    /// Replays a pseudo-random command sequence against a plain flag model
    #[test]
    fn test_animating_matches_reference_simulation() {
        let commands = [
            EngineCommand::WindowCreated(test_window()),
            EngineCommand::WindowDestroyed,
            EngineCommand::GainedFocus,
            EngineCommand::LostFocus,
            EngineCommand::Start,
            EngineCommand::Stop,
            EngineCommand::Pause,
            EngineCommand::Resume,
            EngineCommand::LowMemory,
            EngineCommand::WindowResized,
            EngineCommand::SaveState,
        ];

        for seed in 0..16u64 {
            let (mut engine, _sender, _log) = engine_with(MockGraphics::default());
            let (mut focus, mut visible, mut window) = (false, false, false);
            let mut rng = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;

            for _ in 0..200 {
                rng = rng
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                let command = commands[((rng >> 33) % commands.len() as u64) as usize];

                match command {
                    EngineCommand::WindowCreated(_) => window = true,
                    EngineCommand::WindowDestroyed => window = false,
                    EngineCommand::GainedFocus => focus = true,
                    EngineCommand::LostFocus => focus = false,
                    EngineCommand::Start => visible = true,
                    EngineCommand::Stop => visible = false,
                    _ => {}
                }
                engine.handle_command(command).unwrap();

                assert_eq!(engine.is_animating(), focus && visible && window);
                if engine.can_render() {
                    assert!(engine.is_animating());
                    engine.do_frame();
                }
                if engine.state().has_graphics_objects {
                    let graphics = engine.graphics();
                    assert!(graphics.has_display());
                    assert!(graphics.has_surface() && graphics.has_context());
                }
            }

            let api = engine.graphics().api();
            assert!(api.surfaces_alive() <= 1);
        }
    }

    #[test]
    fn test_game_loop_ends_on_destroy_and_tears_down() {
        let (mut engine, sender, _log) = engine_with(MockGraphics::default());
        sender.send_command(EngineCommand::WindowCreated(test_window()));
        sender.send_command(EngineCommand::Start);
        sender.send_command(EngineCommand::GainedFocus);
        sender.send_command(EngineCommand::Destroy);

        engine.game_loop().unwrap();

        assert!(!engine.graphics().has_display());
        assert_eq!(engine.graphics().api().displays_closed, 1);
        assert_eq!(engine.scenes().current_name(), None);
        assert!(engine.destroy_requested());
    }

    #[test]
    fn test_game_loop_ends_on_disconnect() {
        let (mut engine, sender, _log) = engine_with(MockGraphics::default());
        drop(sender);
        engine.game_loop().unwrap();
    }

    #[test]
    fn test_game_loop_returns_fatal_display_error() {
        let mut api = MockGraphics::default();
        api.fail_display = true;
        let (mut engine, sender, _log) = engine_with(api);
        sender.send_command(EngineCommand::WindowCreated(test_window()));

        assert!(matches!(engine.game_loop(), Err(EngineError::NoUsableDisplay(_))));
    }

    #[test]
    fn test_game_loop_renders_until_destroy() {
        let (mut engine, sender, log) = engine_with(MockGraphics::default());

        let driver_log = log.clone();
        let driver = std::thread::spawn(move || {
            sender.send_command(EngineCommand::WindowCreated(test_window()));
            sender.send_command(EngineCommand::Start);
            sender.send_command(EngineCommand::GainedFocus);
            assert!(sender.barrier(Duration::from_secs(5)));

            let deadline = Instant::now() + Duration::from_secs(5);
            let mut seen = Vec::new();
            while Instant::now() < deadline {
                seen.extend(driver_log.take());
                if seen.iter().filter(|e| e.as_str() == "game:frame").count() >= 3 {
                    break;
                }
                std::thread::sleep(Duration::from_millis(1));
            }
            sender.send_command(EngineCommand::Destroy);
            seen
        });

        engine.game_loop().unwrap();
        let seen = driver.join().unwrap();

        assert!(seen.iter().filter(|e| e.as_str() == "game:frame").count() >= 3);
        assert!(engine.graphics().api().swaps >= 3);
        assert!(!engine.graphics().has_display());
    }
}
