//! Graphics stack ownership
//!
//! The display, config, context and surface form a dependency chain:
//! display → config → context → surface. [`GraphicsStack`] acquires them in
//! that order and releases them in reverse. Every release step is a no-op
//! when its handle is already gone, so teardown can run from any state.

use std::fmt;

use tunnel_sdk::NativeWindow;

use crate::config::GraphicsConfig;

// EGL error codes, as returned by eglGetError
pub const EGL_SUCCESS: i32 = 0x3000;
pub const EGL_NOT_INITIALIZED: i32 = 0x3001;
pub const EGL_BAD_ACCESS: i32 = 0x3002;
pub const EGL_BAD_ALLOC: i32 = 0x3003;
pub const EGL_BAD_ATTRIBUTE: i32 = 0x3004;
pub const EGL_BAD_CONFIG: i32 = 0x3005;
pub const EGL_BAD_CONTEXT: i32 = 0x3006;
pub const EGL_BAD_CURRENT_SURFACE: i32 = 0x3007;
pub const EGL_BAD_DISPLAY: i32 = 0x3008;
pub const EGL_BAD_MATCH: i32 = 0x3009;
pub const EGL_BAD_NATIVE_PIXMAP: i32 = 0x300A;
pub const EGL_BAD_NATIVE_WINDOW: i32 = 0x300B;
pub const EGL_BAD_PARAMETER: i32 = 0x300C;
pub const EGL_BAD_SURFACE: i32 = 0x300D;
pub const EGL_CONTEXT_LOST: i32 = 0x300E;

/// Name of an EGL error code for log output
pub fn egl_error_name(code: i32) -> &'static str {
    match code {
        EGL_SUCCESS => "EGL_SUCCESS",
        EGL_NOT_INITIALIZED => "EGL_NOT_INITIALIZED",
        EGL_BAD_ACCESS => "EGL_BAD_ACCESS",
        EGL_BAD_ALLOC => "EGL_BAD_ALLOC",
        EGL_BAD_ATTRIBUTE => "EGL_BAD_ATTRIBUTE",
        EGL_BAD_CONFIG => "EGL_BAD_CONFIG",
        EGL_BAD_CONTEXT => "EGL_BAD_CONTEXT",
        EGL_BAD_CURRENT_SURFACE => "EGL_BAD_CURRENT_SURFACE",
        EGL_BAD_DISPLAY => "EGL_BAD_DISPLAY",
        EGL_BAD_MATCH => "EGL_BAD_MATCH",
        EGL_BAD_NATIVE_PIXMAP => "EGL_BAD_NATIVE_PIXMAP",
        EGL_BAD_NATIVE_WINDOW => "EGL_BAD_NATIVE_WINDOW",
        EGL_BAD_PARAMETER => "EGL_BAD_PARAMETER",
        EGL_BAD_SURFACE => "EGL_BAD_SURFACE",
        EGL_CONTEXT_LOST => "EGL_CONTEXT_LOST",
        _ => "unknown",
    }
}

/// Step of the graphics stack that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphicsStep {
    OpenDisplay,
    ChooseConfig,
    CreateSurface,
    CreateContext,
    MakeCurrent,
    SwapBuffers,
}

impl fmt::Display for GraphicsStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OpenDisplay => "open display",
            Self::ChooseConfig => "choose config",
            Self::CreateSurface => "create surface",
            Self::CreateContext => "create context",
            Self::MakeCurrent => "make current",
            Self::SwapBuffers => "swap buffers",
        };
        f.write_str(name)
    }
}

/// What to tear down after a failed call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// The surface is unusable; display and context survive
    KillSurface,
    /// The context is unusable; display and surface survive
    KillContext,
    /// The display itself is gone; everything goes
    KillDisplay,
    /// No known recovery; log and carry on
    None,
}

/// A graphics call failed with a backend reason code
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{step} failed: {} ({code:#06x})", egl_error_name(*.code))]
pub struct GraphicsError {
    pub step: GraphicsStep,
    pub code: i32,
}

impl GraphicsError {
    pub fn new(step: GraphicsStep, code: i32) -> Self {
        Self { step, code }
    }

    /// Classify the reason code into a recovery action
    pub fn recovery(&self) -> Recovery {
        match self.code {
            EGL_BAD_SURFACE | EGL_BAD_NATIVE_WINDOW | EGL_BAD_CURRENT_SURFACE => {
                Recovery::KillSurface
            }
            EGL_CONTEXT_LOST | EGL_BAD_CONTEXT => Recovery::KillContext,
            EGL_BAD_DISPLAY | EGL_NOT_INITIALIZED => Recovery::KillDisplay,
            _ => Recovery::None,
        }
    }
}

/// Framebuffer format requested from the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub red_bits: u8,
    pub green_bits: u8,
    pub blue_bits: u8,
    pub depth_bits: u8,
}

impl From<&GraphicsConfig> for PixelFormat {
    fn from(config: &GraphicsConfig) -> Self {
        Self {
            red_bits: config.red_bits,
            green_bits: config.green_bits,
            blue_bits: config.blue_bits,
            depth_bits: config.depth_bits,
        }
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        Self::from(&GraphicsConfig::default())
    }
}

/// Backend that creates and destroys the raw graphics handles
///
/// Handles are plain copyable values; ownership is tracked by
/// [`GraphicsStack`], never by the backend.
pub trait GraphicsApi {
    type Display: Copy;
    type Config: Copy;
    type Context: Copy;
    type Surface: Copy;

    /// Open and initialize the default display
    fn open_display(&mut self) -> Result<Self::Display, GraphicsError>;

    /// Choose a config matching the pixel format
    fn choose_config(
        &mut self,
        display: Self::Display,
        format: &PixelFormat,
    ) -> Result<Self::Config, GraphicsError>;

    /// Create a window surface
    fn create_surface(
        &mut self,
        display: Self::Display,
        config: Self::Config,
        window: NativeWindow,
    ) -> Result<Self::Surface, GraphicsError>;

    /// Create a render context
    fn create_context(
        &mut self,
        display: Self::Display,
        config: Self::Config,
    ) -> Result<Self::Context, GraphicsError>;

    /// Bind surface and context to the calling thread
    fn make_current(
        &mut self,
        display: Self::Display,
        surface: Self::Surface,
        context: Self::Context,
    ) -> Result<(), GraphicsError>;

    /// Unbind whatever is current on the calling thread
    fn release_current(&mut self, display: Self::Display);

    fn destroy_surface(&mut self, display: Self::Display, surface: Self::Surface);

    fn destroy_context(&mut self, display: Self::Display, context: Self::Context);

    fn close_display(&mut self, display: Self::Display);

    /// Current surface size in pixels
    fn surface_size(&mut self, display: Self::Display, surface: Self::Surface) -> (i32, i32);

    /// Present the back buffer
    fn swap_buffers(
        &mut self,
        display: Self::Display,
        surface: Self::Surface,
    ) -> Result<(), GraphicsError>;

    /// One-time pipeline state for a fresh surface (viewport, depth, blending)
    fn configure_pipeline(&mut self, width: i32, height: i32);
}

/// Exclusively owned display, config, context and surface
pub struct GraphicsStack<G: GraphicsApi> {
    api: G,
    format: PixelFormat,
    display: Option<G::Display>,
    config: Option<G::Config>,
    context: Option<G::Context>,
    surface: Option<G::Surface>,
    current: bool,
}

impl<G: GraphicsApi> GraphicsStack<G> {
    pub fn new(api: G, format: PixelFormat) -> Self {
        Self {
            api,
            format,
            display: None,
            config: None,
            context: None,
            surface: None,
            current: false,
        }
    }

    pub fn api(&self) -> &G {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut G {
        &mut self.api
    }

    pub fn has_display(&self) -> bool {
        self.display.is_some() && self.config.is_some()
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    /// Whether a frame can be drawn right now
    pub fn is_ready(&self) -> bool {
        self.has_display() && self.has_surface() && self.has_context() && self.current
    }

    /// Open the display and choose a config, if not already done
    ///
    /// A display whose config cannot be chosen is closed again.
    pub fn init_display(&mut self) -> Result<(), GraphicsError> {
        if self.has_display() {
            return Ok(());
        }

        let display = self.api.open_display()?;
        match self.api.choose_config(display, &self.format) {
            Ok(config) => {
                self.display = Some(display);
                self.config = Some(config);
                tracing::info!("Display initialized");
                Ok(())
            }
            Err(e) => {
                self.api.close_display(display);
                Err(e)
            }
        }
    }

    /// Create the window surface, if not already present
    ///
    /// Requires the display.
    pub fn init_surface(&mut self, window: NativeWindow) -> Result<(), GraphicsError> {
        if self.surface.is_some() {
            return Ok(());
        }
        let (Some(display), Some(config)) = (self.display, self.config) else {
            return Err(GraphicsError::new(GraphicsStep::CreateSurface, EGL_NOT_INITIALIZED));
        };

        self.surface = Some(self.api.create_surface(display, config, window)?);
        tracing::debug!("Surface created");
        Ok(())
    }

    /// Create the render context, if not already present
    ///
    /// Requires the display.
    pub fn init_context(&mut self) -> Result<(), GraphicsError> {
        if self.context.is_some() {
            return Ok(());
        }
        let (Some(display), Some(config)) = (self.display, self.config) else {
            return Err(GraphicsError::new(GraphicsStep::CreateContext, EGL_NOT_INITIALIZED));
        };

        self.context = Some(self.api.create_context(display, config)?);
        tracing::debug!("Context created");
        Ok(())
    }

    /// Bind surface and context
    pub fn make_current(&mut self) -> Result<(), GraphicsError> {
        let (Some(display), Some(surface), Some(context)) =
            (self.display, self.surface, self.context)
        else {
            return Err(GraphicsError::new(GraphicsStep::MakeCurrent, EGL_NOT_INITIALIZED));
        };

        self.api.make_current(display, surface, context)?;
        self.current = true;
        Ok(())
    }

    fn release_current(&mut self) {
        if let Some(display) = self.display {
            if self.current {
                self.api.release_current(display);
            }
        }
        self.current = false;
    }

    pub fn kill_surface(&mut self) {
        self.release_current();
        if let (Some(display), Some(surface)) = (self.display, self.surface.take()) {
            self.api.destroy_surface(display, surface);
            tracing::debug!("Surface destroyed");
        }
    }

    pub fn kill_context(&mut self) {
        self.release_current();
        if let (Some(display), Some(context)) = (self.display, self.context.take()) {
            self.api.destroy_context(display, context);
            tracing::debug!("Context destroyed");
        }
    }

    /// Release everything in reverse acquisition order
    pub fn kill_display(&mut self) {
        self.kill_surface();
        self.kill_context();
        self.config = None;
        if let Some(display) = self.display.take() {
            self.api.close_display(display);
            tracing::info!("Display closed");
        }
    }

    /// Apply the teardown a failure's reason code calls for
    pub fn recover(&mut self, error: &GraphicsError) -> Recovery {
        let recovery = error.recovery();
        match recovery {
            Recovery::KillSurface => self.kill_surface(),
            Recovery::KillContext => self.kill_context(),
            Recovery::KillDisplay => self.kill_display(),
            Recovery::None => {}
        }
        recovery
    }

    pub fn surface_size(&mut self) -> Option<(i32, i32)> {
        let (display, surface) = (self.display?, self.surface?);
        Some(self.api.surface_size(display, surface))
    }

    pub fn swap_buffers(&mut self) -> Result<(), GraphicsError> {
        let (Some(display), Some(surface)) = (self.display, self.surface) else {
            return Err(GraphicsError::new(GraphicsStep::SwapBuffers, EGL_BAD_SURFACE));
        };
        self.api.swap_buffers(display, surface)
    }

    pub fn configure_pipeline(&mut self, width: i32, height: i32) {
        self.api.configure_pipeline(width, height);
    }
}

impl<G: GraphicsApi> Drop for GraphicsStack<G> {
    fn drop(&mut self) {
        self.kill_display();
    }
}
