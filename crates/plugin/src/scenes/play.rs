//! The run itself
//!
//! Score grows by one every unpaused frame. Each [`POINTS_PER_LEVEL`]
//! points is a level: progress is saved and the matching achievement
//! unlocked.

use tracing::{info, warn};

use tunnel_core::input::{CookedEvent, Key};
use tunnel_core::scene::{Scene, SceneContext};

use super::ui::to_stick;
use super::{WelcomeScene, ACH_INC_PLAY, LEADERBOARD_ID, LEVEL_ACHIEVEMENTS};

pub const POINTS_PER_LEVEL: u32 = 1000;

#[derive(Debug, Default)]
pub struct PlayScene {
    level: u32,
    score: u32,
    paused: bool,
    steer: (f32, f32),
}

impl PlayScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Last joystick or touchpad position
    pub fn steer(&self) -> (f32, f32) {
        self.steer
    }

    fn save(&self, ctx: &SceneContext<'_>) {
        if let Err(e) = ctx.services().save_progress(self.level) {
            warn!("Failed to save progress locally: {}", e);
            ctx.services().save_state(i32::try_from(self.level).unwrap_or(i32::MAX));
        }
    }

    fn level_up(&mut self, ctx: &SceneContext<'_>) {
        self.level += 1;
        info!("Reached level {}", self.level);
        self.save(ctx);

        let services = ctx.services();
        if let Some((_, id)) = LEVEL_ACHIEVEMENTS.iter().find(|(at, _)| *at == self.level) {
            services.unlock_achievement(id);
        }
        services.show_encouragement_toasts(i32::try_from(self.score).unwrap_or(i32::MAX));
    }

    fn leave(&mut self, ctx: &mut SceneContext<'_>) {
        ctx.services().submit_score(LEADERBOARD_ID, i64::from(self.score));
        self.save(ctx);
        ctx.request_scene(Box::new(WelcomeScene::new()));
    }
}

impl Scene for PlayScene {
    fn name(&self) -> &'static str {
        "play"
    }

    fn on_install(&mut self, ctx: &mut SceneContext<'_>) {
        self.level = ctx.services().effective_level().unwrap_or(0);
        self.score = self.level.saturating_mul(POINTS_PER_LEVEL);
        info!("Starting run at level {}", self.level);

        let services = ctx.services();
        services.increment_achievement(ACH_INC_PLAY, 1);
        services.reset_encouragement_toasts(0);
    }

    fn on_frame(&mut self, ctx: &mut SceneContext<'_>) {
        if self.paused {
            return;
        }
        self.score = self.score.saturating_add(1);
        if self.score % POINTS_PER_LEVEL == 0 {
            self.level_up(ctx);
        }
    }

    fn on_input(&mut self, ctx: &mut SceneContext<'_>, event: &CookedEvent) -> bool {
        match event {
            CookedEvent::Back => {
                self.leave(ctx);
                true
            }
            CookedEvent::KeyDown { key: Key::Confirm } | CookedEvent::PointerDown(_)
                if self.paused =>
            {
                self.paused = false;
                true
            }
            CookedEvent::Joystick { x, y } => {
                self.steer = (*x, *y);
                true
            }
            CookedEvent::PointerDown(pointer) | CookedEvent::PointerMove(pointer) => {
                match to_stick(pointer) {
                    Some(steer) => {
                        self.steer = steer;
                        true
                    }
                    None => false,
                }
            }
            CookedEvent::PointerUp(pointer) if to_stick(pointer).is_some() => {
                self.steer = (0.0, 0.0);
                true
            }
            CookedEvent::KeyDown { key } | CookedEvent::KeyUp { key } => {
                !matches!(key, Key::Cancel)
            }
            _ => false,
        }
    }

    fn on_pause(&mut self, ctx: &mut SceneContext<'_>) {
        self.paused = true;
        self.save(ctx);
    }

    fn on_save_state(&mut self, ctx: &mut SceneContext<'_>) {
        self.save(ctx);
    }
}
