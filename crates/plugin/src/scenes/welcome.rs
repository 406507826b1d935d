//! Main menu

use tracing::debug;

use tunnel_core::input::CookedEvent;
use tunnel_core::scene::{ButtonId, Scene, SceneContext, SurfaceInfo};
use tunnel_platform::CloudData;

use super::ui::{Button, ButtonPanel, Direction, PanelInput};
use super::{
    DialogScene, PlayScene, ABOUT_TEXT, ACH_READ_STORY, LEADERBOARD_ID, STORY_TEXT,
    WHY_SIGN_IN_TEXT,
};

/// Title screen with play, sign-in and the game services buttons
pub struct WelcomeScene {
    panel: ButtonPanel,
    laid_out_for: Option<SurfaceInfo>,
}

impl WelcomeScene {
    pub const PLAY: ButtonId = ButtonId(1);
    pub const SIGN_IN: ButtonId = ButtonId(2);
    pub const SIGN_OUT: ButtonId = ButtonId(3);
    pub const WHY_SIGN_IN: ButtonId = ButtonId(4);
    pub const ACHIEVEMENTS: ButtonId = ButtonId(5);
    pub const LEADERBOARD: ButtonId = ButtonId(6);
    pub const STORY: ButtonId = ButtonId(7);
    pub const ABOUT: ButtonId = ButtonId(8);

    pub fn new() -> Self {
        Self {
            panel: ButtonPanel::new(),
            laid_out_for: None,
        }
    }

    pub fn panel(&self) -> &ButtonPanel {
        &self.panel
    }

    fn layout(&mut self, surface: SurfaceInfo) {
        let center = 0.5 * surface.aspect();
        let side_width = (center - 0.4).max(0.1);
        let side_size = (side_width, 0.2);
        let left_x = 0.1 + 0.5 * side_width;
        let right_x = center + 0.3 + 0.5 * side_width;

        let panel = &mut self.panel;
        panel.add(Button::new(Self::PLAY, "Play", (center, 0.5), (0.4, 0.4)));
        panel.add(Button::new(Self::ACHIEVEMENTS, "Achievements", (left_x, 0.6), side_size));
        panel.add(Button::new(Self::LEADERBOARD, "Leaderboard", (left_x, 0.4), side_size));
        panel.add(Button::new(Self::STORY, "Story", (right_x, 0.6), side_size));
        panel.add(Button::new(Self::ABOUT, "About", (right_x, 0.4), side_size));
        panel.add(Button::new(Self::SIGN_IN, "Sign in", (0.35, 0.1), (0.4, 0.15)));
        panel.add(Button::new(Self::SIGN_OUT, "Sign out", (0.2, 0.1), (0.3, 0.13)));
        panel.add(Button::new(Self::WHY_SIGN_IN, "Why sign in?", (0.8, 0.1), (0.3, 0.2)));
        panel.set_default(Self::PLAY);

        use Direction::*;
        panel.set_nav(Self::PLAY, Right, Some(Self::STORY));
        panel.set_nav(Self::ACHIEVEMENTS, Down, Some(Self::LEADERBOARD));
        panel.set_nav(Self::ACHIEVEMENTS, Right, Some(Self::PLAY));
        panel.set_nav(Self::LEADERBOARD, Down, Some(Self::SIGN_OUT));
        panel.set_nav(Self::LEADERBOARD, Up, Some(Self::ACHIEVEMENTS));
        panel.set_nav(Self::LEADERBOARD, Right, Some(Self::PLAY));
        panel.set_nav(Self::STORY, Left, Some(Self::PLAY));
        panel.set_nav(Self::STORY, Down, Some(Self::ABOUT));
        panel.set_nav(Self::ABOUT, Left, Some(Self::PLAY));
        panel.set_nav(Self::ABOUT, Up, Some(Self::STORY));
        panel.set_nav(Self::SIGN_IN, Up, Some(Self::PLAY));
        panel.set_nav(Self::SIGN_IN, Right, Some(Self::WHY_SIGN_IN));
        panel.set_nav(Self::WHY_SIGN_IN, Left, Some(Self::SIGN_IN));
        panel.set_nav(Self::WHY_SIGN_IN, Up, Some(Self::PLAY));
        panel.set_nav(Self::SIGN_OUT, Up, Some(Self::PLAY));
        panel.set_nav(Self::SIGN_OUT, Right, Some(Self::PLAY));

        self.laid_out_for = Some(surface);
    }

    fn update_states(&mut self, ctx: &SceneContext<'_>) {
        let services = ctx.services();
        let signed_in = services.is_signed_in();

        let panel = &mut self.panel;
        panel.set_visible(Self::SIGN_IN, !signed_in);
        panel.set_visible(Self::WHY_SIGN_IN, !signed_in);
        panel.set_visible(Self::SIGN_OUT, signed_in);
        panel.set_enabled(Self::ACHIEVEMENTS, signed_in);
        panel.set_enabled(Self::LEADERBOARD, signed_in);

        let account = if signed_in {
            Self::SIGN_OUT
        } else {
            Self::SIGN_IN
        };
        let side = signed_in.then_some(Self::ACHIEVEMENTS);
        panel.set_nav(Self::PLAY, Direction::Left, side);
        panel.set_nav(Self::PLAY, Direction::Down, Some(account));
        panel.set_nav(Self::ABOUT, Direction::Down, Some(account));

        let waiting = services.is_in_progress()
            || (signed_in && services.cloud_data() == CloudData::Waiting);
        panel.set_wait_screen(waiting);
    }

    fn click(&mut self, ctx: &mut SceneContext<'_>, id: ButtonId) {
        debug!("Welcome button {} clicked", id.0);
        let signed_in = ctx.services().is_signed_in();
        match id {
            Self::PLAY => ctx.request_scene(Box::new(PlayScene::new())),
            Self::SIGN_IN => ctx.services().start_sign_in(),
            Self::SIGN_OUT => ctx.request_scene(Box::new(DialogScene::confirm_sign_out())),
            Self::ACHIEVEMENTS if signed_in => ctx.services().show_achievements(),
            Self::LEADERBOARD if signed_in => ctx.services().show_leaderboard(LEADERBOARD_ID),
            Self::STORY => {
                if signed_in {
                    ctx.services().unlock_achievement(ACH_READ_STORY);
                }
                ctx.request_scene(Box::new(DialogScene::message(STORY_TEXT)));
            }
            Self::ABOUT => ctx.request_scene(Box::new(DialogScene::message(ABOUT_TEXT))),
            Self::WHY_SIGN_IN => {
                ctx.request_scene(Box::new(DialogScene::message(WHY_SIGN_IN_TEXT)))
            }
            _ => {}
        }
    }
}

impl Default for WelcomeScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for WelcomeScene {
    fn name(&self) -> &'static str {
        "welcome"
    }

    fn on_install(&mut self, ctx: &mut SceneContext<'_>) {
        self.layout(ctx.surface());
        self.update_states(ctx);
    }

    fn on_frame(&mut self, ctx: &mut SceneContext<'_>) {
        if self.laid_out_for != Some(ctx.surface()) {
            self.layout(ctx.surface());
        }
        self.update_states(ctx);
    }

    fn on_input(&mut self, ctx: &mut SceneContext<'_>, event: &CookedEvent) -> bool {
        // Back leaves the game from here
        if matches!(event, CookedEvent::Back) {
            return false;
        }
        match self.panel.handle_input(event, ctx.surface()) {
            PanelInput::Ignored => false,
            PanelInput::Consumed => true,
            PanelInput::Clicked(id) => {
                self.click(ctx, id);
                true
            }
        }
    }

    fn on_button_clicked(&mut self, ctx: &mut SceneContext<'_>, id: ButtonId) {
        if self.panel.button(id).is_some_and(Button::is_live) {
            self.click(ctx, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{scene_manager, StubBridge};
    use std::sync::Arc;
    use tunnel_core::input::Key;
    use tunnel_core::{SceneManager, ServiceDispatcher};
    use tunnel_platform::ServiceRequest;

    fn installed() -> (SceneManager, ServiceDispatcher, Arc<StubBridge>) {
        let (mut mgr, dispatcher, bridge) = scene_manager(StubBridge::default());
        mgr.request_scene(Box::new(WelcomeScene::new()));
        mgr.do_frame();
        (mgr, dispatcher, bridge)
    }

    fn press(mgr: &mut SceneManager, key: Key) -> bool {
        mgr.dispatch_input(&CookedEvent::KeyDown { key })
    }

    #[test]
    fn test_play_starts_game() {
        let (mut mgr, _dispatcher, _bridge) = installed();
        assert!(press(&mut mgr, Key::Confirm));
        mgr.do_frame();
        assert_eq!(mgr.current_name(), Some("play"));
    }

    #[test]
    fn test_back_is_not_consumed() {
        let (mut mgr, _dispatcher, _bridge) = installed();
        assert!(!mgr.dispatch_input(&CookedEvent::Back));
    }

    #[test]
    fn test_sign_in_from_keyboard() {
        let (mut mgr, dispatcher, bridge) = installed();
        // Play -> Sign in
        press(&mut mgr, Key::Down);
        press(&mut mgr, Key::Confirm);
        assert!(mgr.services().is_in_progress());

        dispatcher.pump();
        assert_eq!(bridge.posted(), vec![ServiceRequest::StartSignIn]);

        // The wait screen swallows input until the host reports back
        mgr.do_frame();
        assert!(press(&mut mgr, Key::Confirm));
        mgr.do_frame();
        assert_eq!(mgr.current_name(), Some("welcome"));
    }

    #[test]
    fn test_signed_out_services_buttons_do_nothing() {
        let (mut mgr, dispatcher, bridge) = installed();
        mgr.click_button(WelcomeScene::ACHIEVEMENTS);
        mgr.click_button(WelcomeScene::LEADERBOARD);
        mgr.click_button(WelcomeScene::SIGN_OUT);
        assert_eq!(dispatcher.pump(), 0);
        assert!(bridge.posted().is_empty());
        assert!(!mgr.has_pending());
    }

    #[test]
    fn test_signed_in_buttons() {
        let (mut mgr, dispatcher, bridge) = installed();
        mgr.services().reports().report_sign_in_state(true, false);
        mgr.services().reports().report_cloud_load_result(false, 0);
        mgr.do_frame();

        mgr.click_button(WelcomeScene::ACHIEVEMENTS);
        mgr.click_button(WelcomeScene::LEADERBOARD);
        mgr.click_button(WelcomeScene::SIGN_IN);
        dispatcher.pump();
        assert_eq!(
            bridge.posted(),
            vec![
                ServiceRequest::ShowAchievements,
                ServiceRequest::ShowLeaderboard {
                    id: LEADERBOARD_ID.into()
                },
            ]
        );

        mgr.click_button(WelcomeScene::SIGN_OUT);
        mgr.do_frame();
        assert_eq!(mgr.current_name(), Some("dialog"));
    }

    #[test]
    fn test_cloud_wait_screen_when_signed_in() {
        let (mut mgr, _dispatcher, _bridge) = installed();
        mgr.services().reports().report_sign_in_state(true, false);
        mgr.do_frame();

        // Cloud load still pending
        assert!(press(&mut mgr, Key::Confirm));
        mgr.do_frame();
        assert_eq!(mgr.current_name(), Some("welcome"));

        mgr.services().reports().report_cloud_load_result(true, 3);
        mgr.do_frame();
        press(&mut mgr, Key::Confirm);
        mgr.do_frame();
        assert_eq!(mgr.current_name(), Some("play"));
    }

    #[test]
    fn test_story_dialog() {
        let (mut mgr, _dispatcher, _bridge) = installed();
        press(&mut mgr, Key::Right);
        press(&mut mgr, Key::Confirm);
        mgr.do_frame();
        assert_eq!(mgr.current_name(), Some("dialog"));
    }

    #[test]
    fn test_layout_follows_aspect() {
        let mut scene = WelcomeScene::new();
        scene.layout(SurfaceInfo {
            width: 2000,
            height: 1000,
        });
        let play = scene.panel().button(WelcomeScene::PLAY).unwrap();
        assert_eq!(play.center, (1.0, 0.5));

        let story = scene.panel().button(WelcomeScene::STORY).unwrap();
        assert!((story.size.0 - 0.6).abs() < 1e-6);
        assert!((story.center.0 - 1.6).abs() < 1e-6);
        assert_eq!(scene.panel().focus(), Some(WelcomeScene::PLAY));
    }
}
