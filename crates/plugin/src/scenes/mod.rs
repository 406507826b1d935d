//! The game's screens
//!
//! Scenes here keep logical state only: which buttons exist, which are
//! live, where focus is, how far the player got. Drawing belongs to the
//! renderer.

mod dialog;
mod play;
pub mod ui;
mod welcome;

pub use dialog::{DialogAction, DialogScene};
pub use play::{PlayScene, POINTS_PER_LEVEL};
pub use welcome::WelcomeScene;

/// Leaderboard runs are submitted to
pub const LEADERBOARD_ID: &str = "leaderboard_distance";

/// Incremented once per started run
pub const ACH_INC_PLAY: &str = "achievement_frequent_flyer";

/// Unlocked by reading the story
pub const ACH_READ_STORY: &str = "achievement_read_story";

/// Level each "reach level" achievement is unlocked at
pub const LEVEL_ACHIEVEMENTS: [(u32, &str); 5] = [
    (2, "achievement_reach_level_2"),
    (5, "achievement_reach_level_5"),
    (10, "achievement_reach_level_10"),
    (15, "achievement_reach_level_15"),
    (20, "achievement_reach_level_20"),
];

pub(crate) const STORY_TEXT: &str =
    "The tunnel has no end. Nobody knows who built it, only that it keeps going.";
pub(crate) const ABOUT_TEXT: &str = "Tunnel, a native game sample.";
pub(crate) const WHY_SIGN_IN_TEXT: &str =
    "Sign in to unlock achievements, post scores and keep your progress in the cloud.";
pub(crate) const SIGN_OUT_TEXT: &str =
    "Sign out? Achievements and leaderboards will be unavailable.";
