//! EGL / GLES backend
//!
//! Raw bindings to the platform's `libEGL`, `libGLESv2` and the native
//! window functions of `libandroid`. Only the calls the graphics stack makes
//! are declared.

use std::ffi::c_void;
use std::ptr;

use jni::objects::JObject;
use jni::JNIEnv;

use tunnel_core::lifecycle::{GraphicsApi, GraphicsError, GraphicsStep, PixelFormat};
use tunnel_core::lifecycle::{EGL_BAD_CONFIG, EGL_BAD_DISPLAY};
use tunnel_sdk::{ANativeWindow, NativeWindow};

type EGLDisplay = *mut c_void;
type EGLConfig = *mut c_void;
type EGLSurface = *mut c_void;
type EGLContext = *mut c_void;
type EGLBoolean = u32;
type EGLint = i32;

const EGL_FALSE: EGLBoolean = 0;
const EGL_DEFAULT_DISPLAY: *mut c_void = ptr::null_mut();
const EGL_NO_DISPLAY: EGLDisplay = ptr::null_mut();
const EGL_NO_SURFACE: EGLSurface = ptr::null_mut();
const EGL_NO_CONTEXT: EGLContext = ptr::null_mut();

const EGL_BLUE_SIZE: EGLint = 0x3022;
const EGL_GREEN_SIZE: EGLint = 0x3023;
const EGL_RED_SIZE: EGLint = 0x3024;
const EGL_DEPTH_SIZE: EGLint = 0x3025;
const EGL_SURFACE_TYPE: EGLint = 0x3033;
const EGL_NONE: EGLint = 0x3038;
const EGL_RENDERABLE_TYPE: EGLint = 0x3040;
const EGL_HEIGHT: EGLint = 0x3056;
const EGL_WIDTH: EGLint = 0x3057;
const EGL_CONTEXT_CLIENT_VERSION: EGLint = 0x3098;
const EGL_WINDOW_BIT: EGLint = 0x0004;
const EGL_OPENGL_ES2_BIT: EGLint = 0x0004;

const GL_DEPTH_TEST: u32 = 0x0B71;
const GL_CULL_FACE: u32 = 0x0B44;
const GL_LEQUAL: u32 = 0x0203;

#[link(name = "EGL")]
extern "C" {
    fn eglGetDisplay(display_id: *mut c_void) -> EGLDisplay;
    fn eglInitialize(display: EGLDisplay, major: *mut EGLint, minor: *mut EGLint) -> EGLBoolean;
    fn eglChooseConfig(
        display: EGLDisplay,
        attrib_list: *const EGLint,
        configs: *mut EGLConfig,
        config_size: EGLint,
        num_config: *mut EGLint,
    ) -> EGLBoolean;
    fn eglCreateWindowSurface(
        display: EGLDisplay,
        config: EGLConfig,
        window: *mut c_void,
        attrib_list: *const EGLint,
    ) -> EGLSurface;
    fn eglCreateContext(
        display: EGLDisplay,
        config: EGLConfig,
        share_context: EGLContext,
        attrib_list: *const EGLint,
    ) -> EGLContext;
    fn eglMakeCurrent(
        display: EGLDisplay,
        draw: EGLSurface,
        read: EGLSurface,
        context: EGLContext,
    ) -> EGLBoolean;
    fn eglDestroySurface(display: EGLDisplay, surface: EGLSurface) -> EGLBoolean;
    fn eglDestroyContext(display: EGLDisplay, context: EGLContext) -> EGLBoolean;
    fn eglTerminate(display: EGLDisplay) -> EGLBoolean;
    fn eglQuerySurface(
        display: EGLDisplay,
        surface: EGLSurface,
        attribute: EGLint,
        value: *mut EGLint,
    ) -> EGLBoolean;
    fn eglSwapBuffers(display: EGLDisplay, surface: EGLSurface) -> EGLBoolean;
    fn eglGetError() -> EGLint;
}

#[link(name = "GLESv2")]
extern "C" {
    fn glViewport(x: i32, y: i32, width: i32, height: i32);
    fn glEnable(cap: u32);
    fn glDepthFunc(func: u32);
}

#[link(name = "android")]
extern "C" {
    fn ANativeWindow_fromSurface(
        env: *mut jni::sys::JNIEnv,
        surface: jni::sys::jobject,
    ) -> *mut ANativeWindow;
    fn ANativeWindow_release(window: *mut ANativeWindow);
}

/// Take a reference to the native window behind a `Surface`
///
/// The reference must be given back with [`release_window`].
pub fn window_from_surface(env: &JNIEnv<'_>, surface: &JObject<'_>) -> Option<NativeWindow> {
    if surface.is_null() {
        return None;
    }
    // SAFETY: env belongs to the calling thread and surface is a live
    // android.view.Surface local reference
    NativeWindow::new(unsafe { ANativeWindow_fromSurface(env.get_raw(), surface.as_raw()) })
}

/// Drop the reference taken by [`window_from_surface`]
pub fn release_window(window: NativeWindow) {
    // SAFETY: the window came from ANativeWindow_fromSurface and is released once
    unsafe { ANativeWindow_release(window.as_ptr()) }
}

fn last_error(step: GraphicsStep) -> GraphicsError {
    // SAFETY: eglGetError has no preconditions
    GraphicsError::new(step, unsafe { eglGetError() })
}

/// EGL 1.4 window rendering with a GLES 2 context
#[derive(Debug, Default)]
pub struct EglGraphics;

impl EglGraphics {
    pub fn new() -> Self {
        Self
    }
}

// SAFETY (all blocks below): handles passed in were produced by this backend
// and are still owned by the graphics stack.
impl GraphicsApi for EglGraphics {
    type Display = EGLDisplay;
    type Config = EGLConfig;
    type Context = EGLContext;
    type Surface = EGLSurface;

    fn open_display(&mut self) -> Result<EGLDisplay, GraphicsError> {
        let display = unsafe { eglGetDisplay(EGL_DEFAULT_DISPLAY) };
        if display == EGL_NO_DISPLAY {
            return Err(GraphicsError::new(GraphicsStep::OpenDisplay, EGL_BAD_DISPLAY));
        }
        if unsafe { eglInitialize(display, ptr::null_mut(), ptr::null_mut()) } == EGL_FALSE {
            return Err(last_error(GraphicsStep::OpenDisplay));
        }
        Ok(display)
    }

    fn choose_config(
        &mut self,
        display: EGLDisplay,
        format: &PixelFormat,
    ) -> Result<EGLConfig, GraphicsError> {
        let attribs = [
            EGL_RENDERABLE_TYPE,
            EGL_OPENGL_ES2_BIT,
            EGL_SURFACE_TYPE,
            EGL_WINDOW_BIT,
            EGL_RED_SIZE,
            EGLint::from(format.red_bits),
            EGL_GREEN_SIZE,
            EGLint::from(format.green_bits),
            EGL_BLUE_SIZE,
            EGLint::from(format.blue_bits),
            EGL_DEPTH_SIZE,
            EGLint::from(format.depth_bits),
            EGL_NONE,
        ];

        let mut config = ptr::null_mut();
        let mut count = 0;
        let ok = unsafe { eglChooseConfig(display, attribs.as_ptr(), &mut config, 1, &mut count) };
        if ok == EGL_FALSE {
            return Err(last_error(GraphicsStep::ChooseConfig));
        }
        if count < 1 {
            return Err(GraphicsError::new(GraphicsStep::ChooseConfig, EGL_BAD_CONFIG));
        }
        Ok(config)
    }

    fn create_surface(
        &mut self,
        display: EGLDisplay,
        config: EGLConfig,
        window: NativeWindow,
    ) -> Result<EGLSurface, GraphicsError> {
        let surface =
            unsafe { eglCreateWindowSurface(display, config, window.as_raw(), ptr::null()) };
        if surface == EGL_NO_SURFACE {
            return Err(last_error(GraphicsStep::CreateSurface));
        }
        Ok(surface)
    }

    fn create_context(
        &mut self,
        display: EGLDisplay,
        config: EGLConfig,
    ) -> Result<EGLContext, GraphicsError> {
        let attribs = [EGL_CONTEXT_CLIENT_VERSION, 2, EGL_NONE];
        let context =
            unsafe { eglCreateContext(display, config, EGL_NO_CONTEXT, attribs.as_ptr()) };
        if context == EGL_NO_CONTEXT {
            return Err(last_error(GraphicsStep::CreateContext));
        }
        Ok(context)
    }

    fn make_current(
        &mut self,
        display: EGLDisplay,
        surface: EGLSurface,
        context: EGLContext,
    ) -> Result<(), GraphicsError> {
        if unsafe { eglMakeCurrent(display, surface, surface, context) } == EGL_FALSE {
            return Err(last_error(GraphicsStep::MakeCurrent));
        }
        Ok(())
    }

    fn release_current(&mut self, display: EGLDisplay) {
        unsafe { eglMakeCurrent(display, EGL_NO_SURFACE, EGL_NO_SURFACE, EGL_NO_CONTEXT) };
    }

    fn destroy_surface(&mut self, display: EGLDisplay, surface: EGLSurface) {
        unsafe { eglDestroySurface(display, surface) };
    }

    fn destroy_context(&mut self, display: EGLDisplay, context: EGLContext) {
        unsafe { eglDestroyContext(display, context) };
    }

    fn close_display(&mut self, display: EGLDisplay) {
        unsafe { eglTerminate(display) };
    }

    fn surface_size(&mut self, display: EGLDisplay, surface: EGLSurface) -> (i32, i32) {
        let (mut width, mut height) = (0, 0);
        unsafe {
            eglQuerySurface(display, surface, EGL_WIDTH, &mut width);
            eglQuerySurface(display, surface, EGL_HEIGHT, &mut height);
        }
        (width, height)
    }

    fn swap_buffers(
        &mut self,
        display: EGLDisplay,
        surface: EGLSurface,
    ) -> Result<(), GraphicsError> {
        if unsafe { eglSwapBuffers(display, surface) } == EGL_FALSE {
            return Err(last_error(GraphicsStep::SwapBuffers));
        }
        Ok(())
    }

    fn configure_pipeline(&mut self, width: i32, height: i32) {
        unsafe {
            glViewport(0, 0, width, height);
            glEnable(GL_DEPTH_TEST);
            glDepthFunc(GL_LEQUAL);
            glEnable(GL_CULL_FACE);
        }
    }
}
