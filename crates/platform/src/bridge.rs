//! Outbound calls to host services

use std::path::PathBuf;

use tunnel_sdk::entrypoints::{self, Entrypoint};

use crate::error::BridgeError;

/// Valid coordinate range reported for an input device
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionRange {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl MotionRange {
    /// Range used when a device reports none
    pub const ZERO: Self = Self {
        min_x: 0.0,
        max_x: 0.0,
        min_y: 0.0,
        max_y: 0.0,
    };

    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Whether the device reported no usable range
    pub fn is_zero(&self) -> bool {
        self.max_x <= self.min_x && self.max_y <= self.min_y
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// Fire-and-forget request to a host service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceRequest {
    StartSignIn,
    StartSignOut,
    ShowAchievements,
    ShowLeaderboards,
    ShowLeaderboard { id: String },
    UnlockAchievement { id: String },
    IncrementAchievement { id: String, steps: i32 },
    SubmitScore { board: String, score: i64 },
    ShowEncouragementToasts { score: i32 },
    ResetEncouragementToasts { score: i32 },
    SaveState { level: i32 },
}

impl ServiceRequest {
    /// Host method that executes this request
    pub fn entrypoint(&self) -> Entrypoint {
        match self {
            Self::StartSignIn => entrypoints::START_SIGN_IN,
            Self::StartSignOut => entrypoints::START_SIGN_OUT,
            Self::ShowAchievements => entrypoints::SHOW_ACHIEVEMENTS,
            Self::ShowLeaderboards => entrypoints::SHOW_LEADERBOARDS,
            Self::ShowLeaderboard { .. } => entrypoints::SHOW_LEADERBOARD,
            Self::UnlockAchievement { .. } => entrypoints::UNLOCK_ACHIEVEMENT,
            Self::IncrementAchievement { .. } => entrypoints::INCREMENT_ACHIEVEMENT,
            Self::SubmitScore { .. } => entrypoints::SUBMIT_SCORE,
            Self::ShowEncouragementToasts { .. } => entrypoints::SHOW_ENCOURAGEMENT_TOASTS,
            Self::ResetEncouragementToasts { .. } => entrypoints::RESET_ENCOURAGEMENT_TOASTS,
            Self::SaveState { .. } => entrypoints::SAVE_STATE,
        }
    }

    /// Short name for log output
    pub fn name(&self) -> &'static str {
        self.entrypoint().name
    }
}

/// Outbound call surface to the host platform
///
/// Implementations are called from the request dispatcher thread and from
/// the engine thread for synchronous queries, so they must be `Send + Sync`.
pub trait PlatformBridge: Send + Sync {
    /// Execute a fire-and-forget request
    ///
    /// The host is expected to hand the work to its own UI thread and
    /// return promptly.
    fn post(&self, request: &ServiceRequest) -> Result<(), BridgeError>;

    /// Platform API level
    fn api_level(&self) -> Result<i32, BridgeError>;

    /// Writable save directory
    fn files_dir(&self) -> Result<PathBuf, BridgeError>;

    /// Coordinate range of an input device
    ///
    /// # Arguments
    /// * `device_id` - Device that produced the event
    /// * `source` - Input source bits of the event
    ///
    /// # Returns
    /// [`MotionRange::ZERO`] when the device reports no range
    fn device_motion_range(&self, device_id: i32, source: i32)
        -> Result<MotionRange, BridgeError>;
}
