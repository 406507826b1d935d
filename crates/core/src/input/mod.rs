//! Input normalization
//!
//! Turns one raw platform input event into at most one [`CookedEvent`]:
//!
//! - joystick motion becomes [`CookedEvent::Joystick`] with axes in [-1, 1]
//! - trackball motion is scaled into the same joystick form
//! - touch, mouse and touchpad motion become pointer events carrying the
//!   device's coordinate range
//! - the back key becomes [`CookedEvent::Back`], never a generic key event
//! - directional and action keys become [`CookedEvent::KeyDown`] /
//!   [`CookedEvent::KeyUp`]
//!
//! Anything else is left for the platform's default handling.

use bitflags::bitflags;

use tunnel_platform::MotionRange;
use tunnel_sdk::input::*;
use tunnel_sdk::{RawInputEvent, RawKeyEvent, RawMotionEvent};

use crate::config::InputConfig;

bitflags! {
    /// Input source classes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SourceClass: i32 {
        const BUTTON = SOURCE_CLASS_BUTTON;
        const POINTER = SOURCE_CLASS_POINTER;
        const NAVIGATION = SOURCE_CLASS_NAVIGATION;
        const POSITION = SOURCE_CLASS_POSITION;
        const JOYSTICK = SOURCE_CLASS_JOYSTICK;
    }
}

impl SourceClass {
    /// Extract the class bits from raw source bits
    pub fn of(source: i32) -> Self {
        Self::from_bits_truncate(source & SOURCE_CLASS_MASK)
    }
}

/// Normalized key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// Enter, DPAD center, gamepad A or start
    Confirm,
    /// Escape or gamepad B
    Cancel,
}

impl Key {
    pub fn from_key_code(key_code: i32) -> Option<Self> {
        let key = match key_code {
            KEYCODE_DPAD_UP => Self::Up,
            KEYCODE_DPAD_DOWN => Self::Down,
            KEYCODE_DPAD_LEFT => Self::Left,
            KEYCODE_DPAD_RIGHT => Self::Right,
            KEYCODE_DPAD_CENTER | KEYCODE_ENTER | KEYCODE_BUTTON_A | KEYCODE_BUTTON_START => {
                Self::Confirm
            }
            KEYCODE_ESCAPE | KEYCODE_BUTTON_B => Self::Cancel,
            _ => return None,
        };
        Some(key)
    }
}

/// Pointer sample with the range of the device that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub id: i32,
    pub x: f32,
    pub y: f32,

    /// Touchscreen or mouse, as opposed to an off-screen touchpad
    pub on_screen: bool,

    /// Coordinate range reported by the device, unchanged
    pub range: MotionRange,
}

/// Normalized input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CookedEvent {
    Joystick { x: f32, y: f32 },
    PointerDown(PointerEvent),
    PointerUp(PointerEvent),
    PointerMove(PointerEvent),
    KeyDown { key: Key },
    KeyUp { key: Key },
    Back,
}

/// Lookup for a device's coordinate range
pub trait MotionRangeSource {
    /// Range for a device/source pair, [`MotionRange::ZERO`] when unknown
    fn motion_range(&self, device_id: i32, source: i32) -> MotionRange;
}

impl MotionRangeSource for MotionRange {
    fn motion_range(&self, _device_id: i32, _source: i32) -> MotionRange {
        *self
    }
}

/// Raw-to-cooked event translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputNormalizer {
    dead_zone: f32,
    trackball_scale: f32,
}

impl Default for InputNormalizer {
    fn default() -> Self {
        Self::new(&InputConfig::default())
    }
}

impl InputNormalizer {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            dead_zone: config.dead_zone.abs(),
            trackball_scale: config.trackball_scale,
        }
    }

    /// Cook an event and hand it to `handler`
    ///
    /// # Arguments
    /// * `event` - Raw platform event
    /// * `ranges` - Device coordinate range lookup for pointer events
    /// * `handler` - Receives the cooked event; its return value reports consumption
    ///
    /// # Returns
    /// `false` if the event is not recognized, else the handler's result
    pub fn cook<R, F>(&self, event: &RawInputEvent, ranges: &R, handler: F) -> bool
    where
        R: MotionRangeSource + ?Sized,
        F: FnOnce(CookedEvent) -> bool,
    {
        match self.cook_event(event, ranges) {
            Some(cooked) => handler(cooked),
            None => false,
        }
    }

    /// Cook an event without dispatching it
    pub fn cook_event<R>(&self, event: &RawInputEvent, ranges: &R) -> Option<CookedEvent>
    where
        R: MotionRangeSource + ?Sized,
    {
        match event {
            RawInputEvent::Key(key) => cook_key(key),
            RawInputEvent::Motion(motion) => self.cook_motion(motion, ranges),
        }
    }

    fn cook_motion<R>(&self, motion: &RawMotionEvent, ranges: &R) -> Option<CookedEvent>
    where
        R: MotionRangeSource + ?Sized,
    {
        let class = SourceClass::of(motion.source);

        if class.contains(SourceClass::JOYSTICK) {
            let x = if motion.hat_x != 0.0 { motion.hat_x } else { motion.axis_x };
            let y = if motion.hat_y != 0.0 { motion.hat_y } else { motion.axis_y };
            return Some(CookedEvent::Joystick {
                x: self.apply_dead_zone(x),
                y: self.apply_dead_zone(y),
            });
        }

        if class.contains(SourceClass::NAVIGATION) {
            return Some(CookedEvent::Joystick {
                x: clamp_axis(motion.axis_x * self.trackball_scale),
                y: clamp_axis(motion.axis_y * self.trackball_scale),
            });
        }

        if class.intersects(SourceClass::POINTER | SourceClass::POSITION) {
            let pointer = motion.action_pointer()?;
            let event = PointerEvent {
                id: pointer.id,
                x: pointer.x,
                y: pointer.y,
                on_screen: class.contains(SourceClass::POINTER),
                range: ranges.motion_range(motion.device_id, motion.source),
            };
            return match motion.masked_action() {
                MOTION_ACTION_DOWN | MOTION_ACTION_POINTER_DOWN => {
                    Some(CookedEvent::PointerDown(event))
                }
                MOTION_ACTION_UP | MOTION_ACTION_POINTER_UP | MOTION_ACTION_CANCEL => {
                    Some(CookedEvent::PointerUp(event))
                }
                MOTION_ACTION_MOVE => Some(CookedEvent::PointerMove(event)),
                _ => None,
            };
        }

        None
    }

    fn apply_dead_zone(&self, value: f32) -> f32 {
        if value.abs() < self.dead_zone {
            0.0
        } else {
            clamp_axis(value)
        }
    }
}

fn cook_key(key: &RawKeyEvent) -> Option<CookedEvent> {
    if key.key_code == KEYCODE_BACK {
        // Back is acted on at key-down; the key-up goes to the platform
        return (key.action == KEY_ACTION_DOWN).then_some(CookedEvent::Back);
    }

    let normalized = Key::from_key_code(key.key_code)?;
    match key.action {
        KEY_ACTION_DOWN => Some(CookedEvent::KeyDown { key: normalized }),
        KEY_ACTION_UP => Some(CookedEvent::KeyUp { key: normalized }),
        _ => None,
    }
}

fn clamp_axis(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}
