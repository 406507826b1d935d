//! Lifecycle command codes
//!
//! These values must match the `APP_CMD_*` codes the host activity forwards.
//! They are the same numbering `android_native_app_glue` uses.

/// The input queue attached to the activity changed
pub const APP_CMD_INPUT_CHANGED: i32 = 0;

/// A new native window is ready for use
pub const APP_CMD_INIT_WINDOW: i32 = 1;

/// The native window is about to be destroyed
pub const APP_CMD_TERM_WINDOW: i32 = 2;

/// The native window was resized
pub const APP_CMD_WINDOW_RESIZED: i32 = 3;

/// The window must be redrawn
pub const APP_CMD_WINDOW_REDRAW_NEEDED: i32 = 4;

/// The visible content area of the window changed
pub const APP_CMD_CONTENT_RECT_CHANGED: i32 = 5;

/// The activity window gained input focus
pub const APP_CMD_GAINED_FOCUS: i32 = 6;

/// The activity window lost input focus
pub const APP_CMD_LOST_FOCUS: i32 = 7;

/// The device configuration changed
pub const APP_CMD_CONFIG_CHANGED: i32 = 8;

/// The system is running low on memory
pub const APP_CMD_LOW_MEMORY: i32 = 9;

/// The activity was started (becomes visible)
pub const APP_CMD_START: i32 = 10;

/// The activity was resumed
pub const APP_CMD_RESUME: i32 = 11;

/// The activity should save its state
pub const APP_CMD_SAVE_STATE: i32 = 12;

/// The activity was paused
pub const APP_CMD_PAUSE: i32 = 13;

/// The activity was stopped (no longer visible)
pub const APP_CMD_STOP: i32 = 14;

/// The activity is being destroyed
pub const APP_CMD_DESTROY: i32 = 15;

/// Lifecycle command as delivered by the host
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleCommand {
    InputChanged = APP_CMD_INPUT_CHANGED,
    InitWindow = APP_CMD_INIT_WINDOW,
    TermWindow = APP_CMD_TERM_WINDOW,
    WindowResized = APP_CMD_WINDOW_RESIZED,
    WindowRedrawNeeded = APP_CMD_WINDOW_REDRAW_NEEDED,
    ContentRectChanged = APP_CMD_CONTENT_RECT_CHANGED,
    GainedFocus = APP_CMD_GAINED_FOCUS,
    LostFocus = APP_CMD_LOST_FOCUS,
    ConfigChanged = APP_CMD_CONFIG_CHANGED,
    LowMemory = APP_CMD_LOW_MEMORY,
    Start = APP_CMD_START,
    Resume = APP_CMD_RESUME,
    SaveState = APP_CMD_SAVE_STATE,
    Pause = APP_CMD_PAUSE,
    Stop = APP_CMD_STOP,
    Destroy = APP_CMD_DESTROY,
}

impl LifecycleCommand {
    /// Decode a raw command code
    ///
    /// # Returns
    /// `None` if the code is not a known lifecycle command
    pub fn from_raw(cmd: i32) -> Option<Self> {
        let decoded = match cmd {
            APP_CMD_INPUT_CHANGED => Self::InputChanged,
            APP_CMD_INIT_WINDOW => Self::InitWindow,
            APP_CMD_TERM_WINDOW => Self::TermWindow,
            APP_CMD_WINDOW_RESIZED => Self::WindowResized,
            APP_CMD_WINDOW_REDRAW_NEEDED => Self::WindowRedrawNeeded,
            APP_CMD_CONTENT_RECT_CHANGED => Self::ContentRectChanged,
            APP_CMD_GAINED_FOCUS => Self::GainedFocus,
            APP_CMD_LOST_FOCUS => Self::LostFocus,
            APP_CMD_CONFIG_CHANGED => Self::ConfigChanged,
            APP_CMD_LOW_MEMORY => Self::LowMemory,
            APP_CMD_START => Self::Start,
            APP_CMD_RESUME => Self::Resume,
            APP_CMD_SAVE_STATE => Self::SaveState,
            APP_CMD_PAUSE => Self::Pause,
            APP_CMD_STOP => Self::Stop,
            APP_CMD_DESTROY => Self::Destroy,
            _ => return None,
        };
        Some(decoded)
    }

    /// Raw command code
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// Short name for log output
    pub fn name(self) -> &'static str {
        match self {
            Self::InputChanged => "INPUT_CHANGED",
            Self::InitWindow => "INIT_WINDOW",
            Self::TermWindow => "TERM_WINDOW",
            Self::WindowResized => "WINDOW_RESIZED",
            Self::WindowRedrawNeeded => "WINDOW_REDRAW_NEEDED",
            Self::ContentRectChanged => "CONTENT_RECT_CHANGED",
            Self::GainedFocus => "GAINED_FOCUS",
            Self::LostFocus => "LOST_FOCUS",
            Self::ConfigChanged => "CONFIG_CHANGED",
            Self::LowMemory => "LOW_MEMORY",
            Self::Start => "START",
            Self::Resume => "RESUME",
            Self::SaveState => "SAVE_STATE",
            Self::Pause => "PAUSE",
            Self::Stop => "STOP",
            Self::Destroy => "DESTROY",
        }
    }
}
