//! Test doubles for the plugin's unit tests

use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use tunnel_core::lifecycle::{GraphicsApi, GraphicsError, PixelFormat};
use tunnel_core::{PlatformServices, SceneManager, ServiceDispatcher};
use tunnel_platform::{BridgeError, MotionRange, PlatformBridge, ReportBoard, ServiceRequest};
use tunnel_sdk::{ANativeWindow, NativeWindow};

/// A window handle that is never dereferenced
pub fn test_window() -> NativeWindow {
    NativeWindow::new(NonNull::<ANativeWindow>::dangling().as_ptr()).unwrap()
}

/// A second window handle, distinct from [`test_window`]
pub fn other_test_window() -> NativeWindow {
    NativeWindow::new(0x1000 as *mut ANativeWindow).unwrap()
}

/// Scene manager over a stub host, with a 1280x720 surface
pub fn scene_manager(bridge: StubBridge) -> (SceneManager, ServiceDispatcher, Arc<StubBridge>) {
    let bridge = Arc::new(bridge);
    let (services, dispatcher) =
        PlatformServices::connect(bridge.clone(), Arc::new(ReportBoard::new()), 64);
    let mut manager = SceneManager::new(services);
    manager.set_surface(1280, 720);
    (manager, dispatcher, bridge)
}

/// Host bridge that records posts and answers queries with fixed values
#[derive(Default)]
pub struct StubBridge {
    posted: Mutex<Vec<ServiceRequest>>,
    files_dir: Option<PathBuf>,
    missing: AtomicBool,
    api_level_calls: AtomicUsize,
}

impl StubBridge {
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

    pub fn missing_entrypoints(&self, missing: bool) {
        self.missing.store(missing, Ordering::SeqCst);
    }

    pub fn api_level_calls(&self) -> usize {
        self.api_level_calls.load(Ordering::SeqCst)
    }

    fn check(&self, name: &'static str) -> Result<(), BridgeError> {
        if self.missing.load(Ordering::SeqCst) {
            return Err(BridgeError::MissingEntrypoint {
                name,
                signature: "()V",
            });
        }
        Ok(())
    }
}

impl PlatformBridge for StubBridge {
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
        self.check("getSavePath")?;
        self.files_dir.clone().ok_or(BridgeError::CallFailed {
            name: "getSavePath",
            reason: "no files dir".into(),
        })
    }

    fn device_motion_range(
        &self,
        _device_id: i32,
        _source: i32,
    ) -> Result<MotionRange, BridgeError> {
        self.check("getDeviceMotionRangeMinX")?;
        Ok(MotionRange::ZERO)
    }
}

/// Graphics backend that never fails and counts presented frames
#[derive(Debug, Default)]
pub struct HeadlessGraphics {
    next_handle: u32,
    frames: Arc<AtomicU32>,
}

impl HeadlessGraphics {
    /// Shared counter of successful swaps
    pub fn frames(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.frames)
    }

    fn handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl GraphicsApi for HeadlessGraphics {
    type Display = u32;
    type Config = u32;
    type Context = u32;
    type Surface = u32;

    fn open_display(&mut self) -> Result<u32, GraphicsError> {
        Ok(self.handle())
    }

    fn choose_config(
        &mut self,
        _display: u32,
        _format: &PixelFormat,
    ) -> Result<u32, GraphicsError> {
        Ok(self.handle())
    }

    fn create_surface(
        &mut self,
        _display: u32,
        _config: u32,
        _window: NativeWindow,
    ) -> Result<u32, GraphicsError> {
        Ok(self.handle())
    }

    fn create_context(&mut self, _display: u32, _config: u32) -> Result<u32, GraphicsError> {
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

    fn destroy_surface(&mut self, _display: u32, _surface: u32) {}

    fn destroy_context(&mut self, _display: u32, _context: u32) {}

    fn close_display(&mut self, _display: u32) {}

    fn surface_size(&mut self, _display: u32, _surface: u32) -> (i32, i32) {
        (1280, 720)
    }

    fn swap_buffers(&mut self, _display: u32, _surface: u32) -> Result<(), GraphicsError> {
        self.frames.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn configure_pipeline(&mut self, _width: i32, _height: i32) {}
}
