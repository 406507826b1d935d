//! JNI exports called by the host activity
//!
//! Every export runs on the activity's UI thread. A panic must not unwind
//! into the JVM, so each body runs under [`guarded`], which logs the panic
//! and aborts.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use jni::objects::{JFloatArray, JIntArray, JObject};
use jni::sys::{jboolean, jfloat, jint, JNI_FALSE, JNI_TRUE};
use jni::JNIEnv;
use tracing::instrument;

use tunnel_platform::reports;
use tunnel_sdk::input::RawPointer;
use tunnel_sdk::{NativeWindow, RawInputEvent, RawKeyEvent, RawMotionEvent};

use super::bridge::JniBridge;
use super::runtime;

/// Called from `Activity.onCreate` once the activity can answer calls
#[no_mangle]
#[instrument(skip_all)]
pub extern "system" fn Java_com_example_tunnel_TunnelActivity_nativeOnCreate(
    mut env: JNIEnv<'_>,
    activity: JObject<'_>,
) {
    guarded("nativeOnCreate", || {
        let bridge = match JniBridge::new(&mut env, &activity) {
            Ok(bridge) => bridge,
            Err(e) if e.is_integration_error() => panic!("{}", e),
            Err(e) => {
                runtime::init_logging(false);
                tracing::error!("Failed to bind host activity: {}", e);
                return;
            }
        };
        start_runtime(Arc::new(bridge));
    })
}

#[cfg(target_os = "android")]
fn start_runtime(bridge: Arc<JniBridge>) {
    if let Err(e) = runtime::start(bridge, crate::egl::EglGraphics::new) {
        tracing::error!("Failed to start native runtime: {}", e);
    }
}

#[cfg(not(target_os = "android"))]
fn start_runtime(_bridge: Arc<JniBridge>) {
    runtime::init_logging(false);
    tracing::error!("No graphics backend for this target, native runtime not started");
}

/// Called from `Activity.onDestroy`
#[no_mangle]
#[instrument(skip_all)]
pub extern "system" fn Java_com_example_tunnel_TunnelActivity_nativeOnDestroy(
    _env: JNIEnv<'_>,
    _this: JObject<'_>,
) {
    guarded("nativeOnDestroy", || {
        if let Some(window) = runtime::shutdown() {
            release_window(window);
        }
    })
}

/// Forward an `APP_CMD_*` lifecycle code
#[no_mangle]
pub extern "system" fn Java_com_example_tunnel_TunnelActivity_nativeOnCommand(
    _env: JNIEnv<'_>,
    _this: JObject<'_>,
    cmd: jint,
) {
    guarded("nativeOnCommand", || {
        runtime::with_runtime(|runtime| runtime.send_command(cmd));
    })
}

/// Called from `SurfaceHolder.Callback.surfaceCreated`
#[no_mangle]
pub extern "system" fn Java_com_example_tunnel_TunnelActivity_nativeOnSurfaceCreated(
    env: JNIEnv<'_>,
    _this: JObject<'_>,
    surface: JObject<'_>,
) {
    guarded("nativeOnSurfaceCreated", || {
        let Some(window) = acquire_window(&env, &surface) else {
            tracing::error!("Surface has no native window");
            return;
        };
        match runtime::with_runtime(|runtime| runtime.window_created(window)) {
            Some(Some(stale)) => release_window(stale),
            Some(None) => {}
            None => release_window(window),
        }
    })
}

/// Called from `SurfaceHolder.Callback.surfaceDestroyed`
///
/// Returns only after the engine has destroyed its surface, since the
/// window is gone once the callback returns.
#[no_mangle]
pub extern "system" fn Java_com_example_tunnel_TunnelActivity_nativeOnSurfaceDestroyed(
    _env: JNIEnv<'_>,
    _this: JObject<'_>,
) {
    guarded("nativeOnSurfaceDestroyed", || {
        if let Some(window) = runtime::with_runtime(|runtime| runtime.window_destroyed()).flatten()
        {
            release_window(window);
        }
    })
}

/// Cook a key event
///
/// # Returns
/// `JNI_TRUE` if the game took the event
#[no_mangle]
pub extern "system" fn Java_com_example_tunnel_TunnelActivity_nativeOnKeyEvent(
    _env: JNIEnv<'_>,
    _this: JObject<'_>,
    device_id: jint,
    source: jint,
    action: jint,
    key_code: jint,
    repeat_count: jint,
) -> jboolean {
    guarded("nativeOnKeyEvent", || {
        let event = RawInputEvent::Key(RawKeyEvent {
            device_id,
            source,
            action,
            key_code,
            repeat_count,
        });
        to_jboolean(runtime::with_runtime(|runtime| runtime.cook_input(&event)).unwrap_or(false))
    })
}

/// Cook a motion event
///
/// Pointer samples arrive as three parallel arrays in pointer index order.
///
/// # Returns
/// `JNI_TRUE` if the game took the event
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub extern "system" fn Java_com_example_tunnel_TunnelActivity_nativeOnMotionEvent(
    mut env: JNIEnv<'_>,
    _this: JObject<'_>,
    device_id: jint,
    source: jint,
    action: jint,
    pointer_ids: JIntArray<'_>,
    xs: JFloatArray<'_>,
    ys: JFloatArray<'_>,
    axis_x: jfloat,
    axis_y: jfloat,
    hat_x: jfloat,
    hat_y: jfloat,
) -> jboolean {
    guarded("nativeOnMotionEvent", || {
        let pointers = match read_pointers(&mut env, &pointer_ids, &xs, &ys) {
            Ok(pointers) => pointers,
            Err(e) => {
                if env.exception_check().unwrap_or(false) {
                    let _ = env.exception_clear();
                }
                tracing::warn!("Dropping motion event with unreadable pointers: {}", e);
                return JNI_FALSE;
            }
        };

        let event = RawInputEvent::Motion(RawMotionEvent {
            device_id,
            source,
            action,
            pointers,
            axis_x,
            axis_y,
            hat_x,
            hat_y,
        });
        to_jboolean(runtime::with_runtime(|runtime| runtime.cook_input(&event)).unwrap_or(false))
    })
}

/// Sign-in state changed
#[no_mangle]
pub extern "system" fn Java_com_example_tunnel_TunnelActivity_nativeReportSignInState(
    _env: JNIEnv<'_>,
    _this: JObject<'_>,
    signed_in: jboolean,
    in_progress: jboolean,
) {
    guarded("nativeReportSignInState", || {
        reports().report_sign_in_state(flag(signed_in), flag(in_progress));
    })
}

/// Cloud save finished loading
#[no_mangle]
pub extern "system" fn Java_com_example_tunnel_TunnelActivity_nativeReportCloudLoadResult(
    _env: JNIEnv<'_>,
    _this: JObject<'_>,
    success: jboolean,
    level: jint,
) {
    guarded("nativeReportCloudLoadResult", || {
        reports().report_cloud_load_result(flag(success), level);
    })
}

/// Joystick presence changed
#[no_mangle]
pub extern "system" fn Java_com_example_tunnel_TunnelActivity_nativeReportJoystickPresent(
    _env: JNIEnv<'_>,
    _this: JObject<'_>,
    present: jboolean,
) {
    guarded("nativeReportJoystickPresent", || {
        reports().report_joystick_present(flag(present));
    })
}

// === Helpers ===

fn read_pointers(
    env: &mut JNIEnv<'_>,
    ids: &JIntArray<'_>,
    xs: &JFloatArray<'_>,
    ys: &JFloatArray<'_>,
) -> jni::errors::Result<Vec<RawPointer>> {
    let count = env.get_array_length(ids)?.max(0) as usize;
    let mut id_buf = vec![0; count];
    let mut x_buf = vec![0.0; count];
    let mut y_buf = vec![0.0; count];
    env.get_int_array_region(ids, 0, &mut id_buf)?;
    env.get_float_array_region(xs, 0, &mut x_buf)?;
    env.get_float_array_region(ys, 0, &mut y_buf)?;

    Ok(id_buf
        .into_iter()
        .zip(x_buf)
        .zip(y_buf)
        .map(|((id, x), y)| RawPointer { id, x, y })
        .collect())
}

#[cfg(target_os = "android")]
fn acquire_window(env: &JNIEnv<'_>, surface: &JObject<'_>) -> Option<NativeWindow> {
    crate::egl::window_from_surface(env, surface)
}

#[cfg(not(target_os = "android"))]
fn acquire_window(_env: &JNIEnv<'_>, _surface: &JObject<'_>) -> Option<NativeWindow> {
    None
}

#[cfg(target_os = "android")]
fn release_window(window: NativeWindow) {
    crate::egl::release_window(window);
}

#[cfg(not(target_os = "android"))]
fn release_window(_window: NativeWindow) {}

fn flag(value: jboolean) -> bool {
    value != JNI_FALSE
}

fn to_jboolean(value: bool) -> jboolean {
    if value {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}

/// Run an export body, aborting the process if it panics
fn guarded<T>(entry: &'static str, body: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(value) => value,
        Err(payload) => {
            tracing::error!("Panic in {}: {}", entry, panic_message(payload.as_ref()));
            std::process::abort();
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
