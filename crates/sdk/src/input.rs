//! Raw input event definitions
//!
//! Constants mirror the platform input headers (`android/input.h` and
//! `android/keycodes.h`). The event structs are plain snapshots of what the
//! host read off its input event before handing it to native code.

// === Sources ===

/// Mask selecting the source class bits
pub const SOURCE_CLASS_MASK: i32 = 0x0000_00ff;

pub const SOURCE_CLASS_NONE: i32 = 0x0000_0000;
pub const SOURCE_CLASS_BUTTON: i32 = 0x0000_0001;
pub const SOURCE_CLASS_POINTER: i32 = 0x0000_0002;
pub const SOURCE_CLASS_NAVIGATION: i32 = 0x0000_0004;
pub const SOURCE_CLASS_POSITION: i32 = 0x0000_0008;
pub const SOURCE_CLASS_JOYSTICK: i32 = 0x0000_0010;

pub const SOURCE_UNKNOWN: i32 = 0x0000_0000;
pub const SOURCE_KEYBOARD: i32 = 0x0000_0100 | SOURCE_CLASS_BUTTON;
pub const SOURCE_DPAD: i32 = 0x0000_0200 | SOURCE_CLASS_BUTTON;
pub const SOURCE_GAMEPAD: i32 = 0x0000_0400 | SOURCE_CLASS_BUTTON;
pub const SOURCE_TOUCHSCREEN: i32 = 0x0000_1000 | SOURCE_CLASS_POINTER;
pub const SOURCE_MOUSE: i32 = 0x0000_2000 | SOURCE_CLASS_POINTER;
pub const SOURCE_STYLUS: i32 = 0x0000_4000 | SOURCE_CLASS_POINTER;
pub const SOURCE_TRACKBALL: i32 = 0x0001_0000 | SOURCE_CLASS_NAVIGATION;
pub const SOURCE_TOUCHPAD: i32 = 0x0010_0000 | SOURCE_CLASS_POSITION;
pub const SOURCE_JOYSTICK: i32 = 0x0100_0000 | SOURCE_CLASS_JOYSTICK;

// === Motion actions ===

pub const MOTION_ACTION_MASK: i32 = 0xff;
pub const MOTION_ACTION_POINTER_INDEX_MASK: i32 = 0xff00;
pub const MOTION_ACTION_POINTER_INDEX_SHIFT: i32 = 8;

pub const MOTION_ACTION_DOWN: i32 = 0;
pub const MOTION_ACTION_UP: i32 = 1;
pub const MOTION_ACTION_MOVE: i32 = 2;
pub const MOTION_ACTION_CANCEL: i32 = 3;
pub const MOTION_ACTION_OUTSIDE: i32 = 4;
pub const MOTION_ACTION_POINTER_DOWN: i32 = 5;
pub const MOTION_ACTION_POINTER_UP: i32 = 6;
pub const MOTION_ACTION_HOVER_MOVE: i32 = 7;
pub const MOTION_ACTION_SCROLL: i32 = 8;

// === Key actions ===

pub const KEY_ACTION_DOWN: i32 = 0;
pub const KEY_ACTION_UP: i32 = 1;
pub const KEY_ACTION_MULTIPLE: i32 = 2;

// === Key codes ===

pub const KEYCODE_UNKNOWN: i32 = 0;
pub const KEYCODE_BACK: i32 = 4;
pub const KEYCODE_DPAD_UP: i32 = 19;
pub const KEYCODE_DPAD_DOWN: i32 = 20;
pub const KEYCODE_DPAD_LEFT: i32 = 21;
pub const KEYCODE_DPAD_RIGHT: i32 = 22;
pub const KEYCODE_DPAD_CENTER: i32 = 23;
pub const KEYCODE_ENTER: i32 = 66;
pub const KEYCODE_MENU: i32 = 82;
pub const KEYCODE_BUTTON_A: i32 = 96;
pub const KEYCODE_BUTTON_B: i32 = 97;
pub const KEYCODE_BUTTON_START: i32 = 108;
pub const KEYCODE_BUTTON_SELECT: i32 = 109;
pub const KEYCODE_ESCAPE: i32 = 111;

/// Extract the masked action from a raw motion action
pub fn motion_action(action: i32) -> i32 {
    action & MOTION_ACTION_MASK
}

/// Extract the pointer index from a raw motion action
pub fn motion_pointer_index(action: i32) -> usize {
    ((action & MOTION_ACTION_POINTER_INDEX_MASK) >> MOTION_ACTION_POINTER_INDEX_SHIFT) as usize
}

/// Raw key event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawKeyEvent {
    /// Id of the device that produced the event
    pub device_id: i32,

    /// Input source bits (`SOURCE_*`)
    pub source: i32,

    /// Key action (`KEY_ACTION_*`)
    pub action: i32,

    /// Platform key code (`KEYCODE_*`)
    pub key_code: i32,

    /// Number of auto-repeats so far
    pub repeat_count: i32,
}

/// One pointer sample inside a motion event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointer {
    pub id: i32,
    pub x: f32,
    pub y: f32,
}

/// Raw motion event
#[derive(Debug, Clone, PartialEq)]
pub struct RawMotionEvent {
    /// Id of the device that produced the event
    pub device_id: i32,

    /// Input source bits (`SOURCE_*`)
    pub source: i32,

    /// Raw action including the pointer index bits
    pub action: i32,

    /// Pointer samples, in pointer index order
    pub pointers: Vec<RawPointer>,

    /// Joystick / trackball X axis
    pub axis_x: f32,

    /// Joystick / trackball Y axis
    pub axis_y: f32,

    /// Hat (directional pad on a joystick) X axis
    pub hat_x: f32,

    /// Hat Y axis
    pub hat_y: f32,
}

impl RawMotionEvent {
    /// Build a single-pointer motion event
    pub fn pointer(device_id: i32, source: i32, action: i32, id: i32, x: f32, y: f32) -> Self {
        Self {
            device_id,
            source,
            action,
            pointers: vec![RawPointer { id, x, y }],
            axis_x: 0.0,
            axis_y: 0.0,
            hat_x: 0.0,
            hat_y: 0.0,
        }
    }

    /// Build an axis-only motion event (joystick, trackball)
    pub fn axes(device_id: i32, source: i32, axis_x: f32, axis_y: f32) -> Self {
        Self {
            device_id,
            source,
            action: MOTION_ACTION_MOVE,
            pointers: Vec::new(),
            axis_x,
            axis_y,
            hat_x: 0.0,
            hat_y: 0.0,
        }
    }

    /// Masked action (`MOTION_ACTION_*`)
    pub fn masked_action(&self) -> i32 {
        motion_action(self.action)
    }

    /// Pointer the action applies to
    ///
    /// For `POINTER_DOWN`/`POINTER_UP` this is the pointer encoded in the
    /// action; for every other action it is the first pointer.
    pub fn action_pointer(&self) -> Option<&RawPointer> {
        let index = match self.masked_action() {
            MOTION_ACTION_POINTER_DOWN | MOTION_ACTION_POINTER_UP => {
                motion_pointer_index(self.action)
            }
            _ => 0,
        };
        self.pointers.get(index)
    }
}

/// Raw input event as handed over by the host
#[derive(Debug, Clone, PartialEq)]
pub enum RawInputEvent {
    Key(RawKeyEvent),
    Motion(RawMotionEvent),
}

impl RawInputEvent {
    /// Id of the device that produced the event
    pub fn device_id(&self) -> i32 {
        match self {
            Self::Key(key) => key.device_id,
            Self::Motion(motion) => motion.device_id,
        }
    }

    /// Input source bits
    pub fn source(&self) -> i32 {
        match self {
            Self::Key(key) => key.source,
            Self::Motion(motion) => motion.source,
        }
    }
}
