//! Buttons, focus and pointer hit testing
//!
//! UI space runs from 0 to the screen aspect ratio horizontally and from
//! 0 (bottom) to 1 (top) vertically, so layouts do not depend on pixels.

use std::collections::HashMap;

use tunnel_core::input::{CookedEvent, Key, PointerEvent};
use tunnel_core::scene::{ButtonId, SurfaceInfo};

/// Focus movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Up => Some(Self::Up),
            Key::Down => Some(Self::Down),
            Key::Left => Some(Self::Left),
            Key::Right => Some(Self::Right),
            Key::Confirm | Key::Cancel => None,
        }
    }
}

/// A clickable rectangle in UI space
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub id: ButtonId,
    pub label: &'static str,
    pub center: (f32, f32),
    pub size: (f32, f32),
    pub visible: bool,
    pub enabled: bool,
}

impl Button {
    pub fn new(id: ButtonId, label: &'static str, center: (f32, f32), size: (f32, f32)) -> Self {
        Self {
            id,
            label,
            center,
            size,
            visible: true,
            enabled: true,
        }
    }

    pub fn is_live(&self) -> bool {
        self.visible && self.enabled
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        (x - self.center.0).abs() <= self.size.0 * 0.5
            && (y - self.center.1).abs() <= self.size.1 * 0.5
    }
}

/// What a panel did with an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelInput {
    /// Not for the panel
    Ignored,
    /// Used, nothing to act on
    Consumed,
    Clicked(ButtonId),
}

/// Set of buttons with keyboard navigation and a wait screen
#[derive(Debug, Default)]
pub struct ButtonPanel {
    buttons: Vec<Button>,
    nav: HashMap<(ButtonId, Direction), ButtonId>,
    focus: Option<ButtonId>,
    default_button: Option<ButtonId>,
    pressed: Option<ButtonId>,
    wait_screen: bool,
}

impl ButtonPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a button, replacing any with the same id
    pub fn add(&mut self, button: Button) {
        match self.buttons.iter_mut().find(|b| b.id == button.id) {
            Some(existing) => *existing = button,
            None => self.buttons.push(button),
        }
    }

    pub fn button(&self, id: ButtonId) -> Option<&Button> {
        self.buttons.iter().find(|b| b.id == id)
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn set_visible(&mut self, id: ButtonId, visible: bool) {
        if let Some(button) = self.buttons.iter_mut().find(|b| b.id == id) {
            button.visible = visible;
        }
        self.repair_focus();
    }

    pub fn set_enabled(&mut self, id: ButtonId, enabled: bool) {
        if let Some(button) = self.buttons.iter_mut().find(|b| b.id == id) {
            button.enabled = enabled;
        }
        self.repair_focus();
    }

    /// Set or clear where `dir` leads from `from`
    pub fn set_nav(&mut self, from: ButtonId, dir: Direction, to: Option<ButtonId>) {
        match to {
            Some(to) => self.nav.insert((from, dir), to),
            None => self.nav.remove(&(from, dir)),
        };
    }

    /// Button focused when nothing else is
    pub fn set_default(&mut self, id: ButtonId) {
        self.default_button = Some(id);
        if self.focus.is_none() {
            self.focus = Some(id);
        }
    }

    pub fn focus(&self) -> Option<ButtonId> {
        self.focus
    }

    pub fn set_wait_screen(&mut self, wait: bool) {
        if wait {
            self.pressed = None;
        }
        self.wait_screen = wait;
    }

    pub fn is_wait_screen(&self) -> bool {
        self.wait_screen
    }

    /// Live button under a UI-space point
    pub fn hit(&self, x: f32, y: f32) -> Option<ButtonId> {
        self.buttons
            .iter()
            .find(|b| b.is_live() && b.contains(x, y))
            .map(|b| b.id)
    }

    /// Route an input event
    ///
    /// The wait screen swallows everything except Back.
    pub fn handle_input(&mut self, event: &CookedEvent, surface: SurfaceInfo) -> PanelInput {
        if self.wait_screen {
            return match event {
                CookedEvent::Back => PanelInput::Ignored,
                _ => PanelInput::Consumed,
            };
        }

        match event {
            CookedEvent::KeyDown { key: Key::Confirm } => match self.focus {
                Some(id) if self.is_live(id) => PanelInput::Clicked(id),
                _ => PanelInput::Consumed,
            },
            CookedEvent::KeyDown { key } => match Direction::from_key(*key) {
                Some(dir) => {
                    self.move_focus(dir);
                    PanelInput::Consumed
                }
                None => PanelInput::Ignored,
            },
            CookedEvent::KeyUp { key } if Direction::from_key(*key).is_some() => {
                PanelInput::Consumed
            }
            CookedEvent::PointerDown(pointer) => match to_ui(pointer, surface) {
                Some((x, y)) => {
                    self.pressed = self.hit(x, y);
                    if let Some(id) = self.pressed {
                        self.focus = Some(id);
                    }
                    PanelInput::Consumed
                }
                None => PanelInput::Ignored,
            },
            CookedEvent::PointerUp(pointer) => match to_ui(pointer, surface) {
                Some((x, y)) => match self.pressed.take() {
                    Some(id) if self.hit(x, y) == Some(id) => PanelInput::Clicked(id),
                    _ => PanelInput::Consumed,
                },
                None => PanelInput::Ignored,
            },
            CookedEvent::PointerMove(pointer) if pointer.on_screen => PanelInput::Consumed,
            _ => PanelInput::Ignored,
        }
    }

    fn is_live(&self, id: ButtonId) -> bool {
        self.button(id).is_some_and(Button::is_live)
    }

    fn move_focus(&mut self, dir: Direction) {
        let Some(from) = self.focus else {
            self.focus = self.default_button;
            return;
        };
        if let Some(&to) = self.nav.get(&(from, dir)) {
            if self.is_live(to) {
                self.focus = Some(to);
            }
        }
    }

    fn repair_focus(&mut self) {
        if let Some(id) = self.focus {
            if !self.is_live(id) {
                self.focus = self.default_button.filter(|&d| self.is_live(d));
            }
        }
    }
}

/// Map an on-screen pointer into UI space
///
/// Off-screen devices (touchpads) have no screen position.
pub fn to_ui(pointer: &PointerEvent, surface: SurfaceInfo) -> Option<(f32, f32)> {
    if !pointer.on_screen || surface.height <= 0 {
        return None;
    }
    let height = surface.height as f32;
    Some((pointer.x / height, 1.0 - pointer.y / height))
}

/// Map an off-screen pointer to a stick position in [-1, 1], up positive
///
/// Needs a device range with some extent on both axes.
pub fn to_stick(pointer: &PointerEvent) -> Option<(f32, f32)> {
    let range = pointer.range;
    if pointer.on_screen || range.width() <= 0.0 || range.height() <= 0.0 {
        return None;
    }
    let x = (pointer.x - range.min_x) / range.width() * 2.0 - 1.0;
    let y = 1.0 - (pointer.y - range.min_y) / range.height() * 2.0;
    Some((x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0)))
}
