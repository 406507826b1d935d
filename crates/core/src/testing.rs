//! Test doubles shared by the unit tests

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use tunnel_platform::{BridgeError, MotionRange, PlatformBridge, ReportBoard, ServiceRequest};
use tunnel_sdk::{ANativeWindow, NativeWindow};

use crate::input::CookedEvent;
use crate::lifecycle::{
    GraphicsApi, GraphicsError, GraphicsStep, PixelFormat, EGL_BAD_CONFIG, EGL_BAD_DISPLAY,
    EGL_BAD_NATIVE_WINDOW,
};
use crate::scene::{ButtonId, Scene, SceneContext};
use crate::services::{PlatformServices, ServiceDispatcher};

/// A window handle that is never dereferenced
pub fn test_window() -> NativeWindow {
    NativeWindow::new(NonNull::<ANativeWindow>::dangling().as_ptr()).unwrap()
}

/// A second window handle, distinct from [`test_window`]
pub fn other_test_window() -> NativeWindow {
    NativeWindow::new(0x1000 as *mut ANativeWindow).unwrap()
}

/// Facade over `bridge` with a fresh report board
pub fn services_with(
    bridge: MockBridge,
) -> (PlatformServices, ServiceDispatcher, Arc<MockBridge>) {
    let bridge = Arc::new(bridge);
    let (services, dispatcher) =
        PlatformServices::connect(bridge.clone(), Arc::new(ReportBoard::new()), 16);
    (services, dispatcher, bridge)
}

// === Bridge ===

#[derive(Default)]
pub struct MockBridge {
    posted: Mutex<Vec<ServiceRequest>>,
    files_dir: Option<PathBuf>,
    motion_ranges: Mutex<HashMap<i32, MotionRange>>,
    fail: AtomicBool,
    missing: AtomicBool,
    files_dir_calls: AtomicUsize,
    api_level_calls: AtomicUsize,
    motion_range_calls: AtomicUsize,
}

impl MockBridge {
    pub const API_LEVEL: i32 = 34;

    pub fn with_files_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            files_dir: Some(dir.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    pub fn posted(&self) -> Vec<ServiceRequest> {
        self.posted.lock().clone()
    }

    pub fn fail_calls(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn missing_entrypoints(&self, missing: bool) {
        self.missing.store(missing, Ordering::SeqCst);
    }

    pub fn set_motion_range(&self, device_id: i32, range: MotionRange) {
        self.motion_ranges.lock().insert(device_id, range);
    }

    pub fn files_dir_calls(&self) -> usize {
        self.files_dir_calls.load(Ordering::SeqCst)
    }

    pub fn api_level_calls(&self) -> usize {
        self.api_level_calls.load(Ordering::SeqCst)
    }

    pub fn motion_range_calls(&self) -> usize {
        self.motion_range_calls.load(Ordering::SeqCst)
    }

    fn check(&self, name: &'static str) -> Result<(), BridgeError> {
        if self.missing.load(Ordering::SeqCst) {
            return Err(BridgeError::MissingEntrypoint {
                name,
                signature: "()V",
            });
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(BridgeError::CallFailed {
                name,
                reason: "mock failure".into(),
            });
        }
        Ok(())
    }
}

impl PlatformBridge for MockBridge {
    fn post(&self, request: &ServiceRequest) -> Result<(), BridgeError> {
        self.check(request.name())?;
        self.posted.lock().push(request.clone());
        Ok(())
    }

    fn api_level(&self) -> Result<i32, BridgeError> {
        self.api_level_calls.fetch_add(1, Ordering::SeqCst);
        self.check("getApiLevel")?;
        Ok(Self::API_LEVEL)
    }

    fn files_dir(&self) -> Result<PathBuf, BridgeError> {
        self.files_dir_calls.fetch_add(1, Ordering::SeqCst);
        self.check("getSavePath")?;
        self.files_dir.clone().ok_or(BridgeError::CallFailed {
            name: "getSavePath",
            reason: "no files dir".into(),
        })
    }

    fn device_motion_range(
        &self,
        device_id: i32,
        _source: i32,
    ) -> Result<MotionRange, BridgeError> {
        self.motion_range_calls.fetch_add(1, Ordering::SeqCst);
        self.check("getDeviceMotionRangeMinX")?;
        Ok(self
            .motion_ranges
            .lock()
            .get(&device_id)
            .copied()
            .unwrap_or(MotionRange::ZERO))
    }
}

// === Graphics ===

/// Counting graphics backend with failure injection
#[derive(Debug, Default)]
pub struct MockGraphics {
    next_handle: u32,
    pub size: (i32, i32),

    pub fail_display: bool,
    pub fail_config: bool,
    /// Number of upcoming surface creations that fail
    pub fail_surfaces: u32,
    /// Error code returned by the next swap
    pub swap_error: Option<i32>,

    pub displays_opened: u32,
    pub configs_chosen: u32,
    pub surfaces_created: u32,
    pub contexts_created: u32,
    pub surfaces_destroyed: u32,
    pub contexts_destroyed: u32,
    pub displays_closed: u32,
    pub swaps: u32,
    pub pipeline_configs: Vec<(i32, i32)>,
}

impl MockGraphics {
    pub fn sized(width: i32, height: i32) -> Self {
        Self {
            size: (width, height),
            ..Self::default()
        }
    }

    fn handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Live surfaces
    pub fn surfaces_alive(&self) -> u32 {
        self.surfaces_created - self.surfaces_destroyed
    }
}

impl GraphicsApi for MockGraphics {
    type Display = u32;
    type Config = u32;
    type Context = u32;
    type Surface = u32;

    fn open_display(&mut self) -> Result<u32, GraphicsError> {
        if self.fail_display {
            return Err(GraphicsError::new(GraphicsStep::OpenDisplay, EGL_BAD_DISPLAY));
        }
        self.displays_opened += 1;
        Ok(self.handle())
    }

    fn choose_config(
        &mut self,
        _display: u32,
        _format: &PixelFormat,
    ) -> Result<u32, GraphicsError> {
        if self.fail_config {
            return Err(GraphicsError::new(GraphicsStep::ChooseConfig, EGL_BAD_CONFIG));
        }
        self.configs_chosen += 1;
        Ok(self.handle())
    }

    fn create_surface(
        &mut self,
        _display: u32,
        _config: u32,
        _window: NativeWindow,
    ) -> Result<u32, GraphicsError> {
        if self.fail_surfaces > 0 {
            self.fail_surfaces -= 1;
            return Err(GraphicsError::new(GraphicsStep::CreateSurface, EGL_BAD_NATIVE_WINDOW));
        }
        self.surfaces_created += 1;
        Ok(self.handle())
    }

    fn create_context(&mut self, _display: u32, _config: u32) -> Result<u32, GraphicsError> {
        self.contexts_created += 1;
        Ok(self.handle())
    }

    fn make_current(
        &mut self,
        _display: u32,
        _surface: u32,
        _context: u32,
    ) -> Result<(), GraphicsError> {
        Ok(())
    }

    fn release_current(&mut self, _display: u32) {}

    fn destroy_surface(&mut self, _display: u32, _surface: u32) {
        self.surfaces_destroyed += 1;
    }

    fn destroy_context(&mut self, _display: u32, _context: u32) {
        self.contexts_destroyed += 1;
    }

    fn close_display(&mut self, _display: u32) {
        self.displays_closed += 1;
    }

    fn surface_size(&mut self, _display: u32, _surface: u32) -> (i32, i32) {
        self.size
    }

    fn swap_buffers(&mut self, _display: u32, _surface: u32) -> Result<(), GraphicsError> {
        self.swaps += 1;
        match self.swap_error.take() {
            Some(code) => Err(GraphicsError::new(GraphicsStep::SwapBuffers, code)),
            None => Ok(()),
        }
    }

    fn configure_pipeline(&mut self, width: i32, height: i32) {
        self.pipeline_configs.push((width, height));
    }
}

// === Scenes ===

/// Shared log of scene hook calls
#[derive(Debug, Clone, Default)]
pub struct SceneLog(Arc<Mutex<Vec<String>>>);

impl SceneLog {
    pub fn push(&self, entry: String) {
        self.0.lock().push(entry);
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock())
    }
}

/// Scene that records every hook it receives
pub struct RecordingScene {
    name: &'static str,
    log: SceneLog,
    /// Scene requested from the next `on_input`
    pub next_on_input: Option<Box<dyn Scene>>,
    /// Answer returned from `on_input`
    pub consumes_input: bool,
}

impl RecordingScene {
    pub fn new(name: &'static str, log: &SceneLog) -> Self {
        Self {
            name,
            log: log.clone(),
            next_on_input: None,
            consumes_input: true,
        }
    }

    pub fn boxed(name: &'static str, log: &SceneLog) -> Box<dyn Scene> {
        Box::new(Self::new(name, log))
    }

    fn record(&self, hook: &str) {
        self.log.push(format!("{}:{}", self.name, hook));
    }
}

impl Scene for RecordingScene {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_install(&mut self, _ctx: &mut SceneContext<'_>) {
        self.record("install");
    }

    fn on_start_graphics(&mut self, _ctx: &mut SceneContext<'_>) {
        self.record("start_graphics");
    }

    fn on_kill_graphics(&mut self, _ctx: &mut SceneContext<'_>) {
        self.record("kill_graphics");
    }

    fn on_frame(&mut self, _ctx: &mut SceneContext<'_>) {
        self.record("frame");
    }

    fn render_background(&mut self, _ctx: &mut SceneContext<'_>) {
        self.record("background");
    }

    fn render_ui(&mut self, _ctx: &mut SceneContext<'_>) {
        self.record("ui");
    }

    fn on_input(&mut self, ctx: &mut SceneContext<'_>, _event: &CookedEvent) -> bool {
        self.record("input");
        if let Some(next) = self.next_on_input.take() {
            ctx.request_scene(next);
        }
        self.consumes_input
    }

    fn on_button_clicked(&mut self, _ctx: &mut SceneContext<'_>, id: ButtonId) {
        self.record(&format!("click:{}", id.0));
    }

    fn on_pause(&mut self, _ctx: &mut SceneContext<'_>) {
        self.record("pause");
    }

    fn on_resume(&mut self, _ctx: &mut SceneContext<'_>) {
        self.record("resume");
    }

    fn on_save_state(&mut self, _ctx: &mut SceneContext<'_>) {
        self.record("save_state");
    }

    fn on_uninstall(&mut self, _ctx: &mut SceneContext<'_>) {
        self.record("uninstall");
    }
}
