//! Modal message and confirmation screens

use tunnel_core::input::CookedEvent;
use tunnel_core::scene::{ButtonId, Scene, SceneContext, SurfaceInfo};

use super::ui::{Button, ButtonPanel, Direction, PanelInput};
use super::{WelcomeScene, SIGN_OUT_TEXT};

/// What a dialog button does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    /// Back to the main menu
    Return,
    /// Sign out, then back to the main menu
    SignOut,
}

/// Text with one or two buttons
pub struct DialogScene {
    text: &'static str,
    buttons: Vec<(&'static str, DialogAction)>,
    panel: ButtonPanel,
    laid_out_for: Option<SurfaceInfo>,
}

impl DialogScene {
    const FIRST: ButtonId = ButtonId(1);
    const SECOND: ButtonId = ButtonId(2);

    /// Text with a single OK button
    pub fn message(text: &'static str) -> Self {
        Self::with_buttons(text, vec![("OK", DialogAction::Return)])
    }

    /// Ask before signing out
    pub fn confirm_sign_out() -> Self {
        Self::with_buttons(
            SIGN_OUT_TEXT,
            vec![("Yes", DialogAction::SignOut), ("No", DialogAction::Return)],
        )
    }

    fn with_buttons(text: &'static str, buttons: Vec<(&'static str, DialogAction)>) -> Self {
        Self {
            text,
            buttons,
            panel: ButtonPanel::new(),
            laid_out_for: None,
        }
    }

    pub fn text(&self) -> &'static str {
        self.text
    }

    pub fn actions(&self) -> Vec<DialogAction> {
        self.buttons.iter().map(|&(_, action)| action).collect()
    }

    fn layout(&mut self, surface: SurfaceInfo) {
        let center = 0.5 * surface.aspect();
        let size = (0.3, 0.15);
        match self.buttons.as_slice() {
            [(label, _)] => {
                self.panel.add(Button::new(Self::FIRST, *label, (center, 0.25), size));
            }
            [(first, _), (second, _), ..] => {
                self.panel.add(Button::new(Self::FIRST, *first, (center - 0.2, 0.25), size));
                self.panel.add(Button::new(Self::SECOND, *second, (center + 0.2, 0.25), size));
                self.panel.set_nav(Self::FIRST, Direction::Right, Some(Self::SECOND));
                self.panel.set_nav(Self::SECOND, Direction::Left, Some(Self::FIRST));
            }
            [] => {}
        }
        self.panel.set_default(Self::FIRST);
        self.laid_out_for = Some(surface);
    }

    fn action_for(&self, id: ButtonId) -> Option<DialogAction> {
        let index = match id {
            Self::FIRST => 0,
            Self::SECOND => 1,
            _ => return None,
        };
        self.buttons.get(index).map(|&(_, action)| action)
    }

    fn perform(&self, ctx: &mut SceneContext<'_>, action: DialogAction) {
        if action == DialogAction::SignOut {
            ctx.services().start_sign_out();
        }
        ctx.request_scene(Box::new(WelcomeScene::new()));
    }
}

impl Scene for DialogScene {
    fn name(&self) -> &'static str {
        "dialog"
    }

    fn on_install(&mut self, ctx: &mut SceneContext<'_>) {
        self.layout(ctx.surface());
    }

    fn on_frame(&mut self, ctx: &mut SceneContext<'_>) {
        if self.laid_out_for != Some(ctx.surface()) {
            self.layout(ctx.surface());
        }
    }

    fn on_input(&mut self, ctx: &mut SceneContext<'_>, event: &CookedEvent) -> bool {
        if matches!(event, CookedEvent::Back) {
            self.perform(ctx, DialogAction::Return);
            return true;
        }
        match self.panel.handle_input(event, ctx.surface()) {
            PanelInput::Ignored => false,
            PanelInput::Consumed => true,
            PanelInput::Clicked(id) => {
                self.on_button_clicked(ctx, id);
                true
            }
        }
    }

    fn on_button_clicked(&mut self, ctx: &mut SceneContext<'_>, id: ButtonId) {
        if let Some(action) = self.action_for(id) {
            self.perform(ctx, action);
        }
    }
}
