//! Java entrypoints called from native code
//!
//! Method names and JNI signatures must match exactly what the host activity
//! declares. Every entry is resolved once when the plugin starts; a missing
//! one is an integration error.

/// Fully qualified host activity class, in JNI slash form
pub const ACTIVITY_CLASS: &str = "com/example/tunnel/TunnelActivity";

/// A Java method on the host activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entrypoint {
    /// Java method name
    pub name: &'static str,

    /// JNI type signature
    pub signature: &'static str,
}

impl Entrypoint {
    const fn new(name: &'static str, signature: &'static str) -> Self {
        Self { name, signature }
    }
}

// === Play services (fire-and-forget, run on the UI thread) ===

pub const START_SIGN_IN: Entrypoint = Entrypoint::new("postStartSignIn", "()V");
pub const START_SIGN_OUT: Entrypoint = Entrypoint::new("postStartSignOut", "()V");
pub const SHOW_ACHIEVEMENTS: Entrypoint = Entrypoint::new("postShowAchievements", "()V");
pub const SHOW_LEADERBOARDS: Entrypoint = Entrypoint::new("postShowLeaderboards", "()V");
pub const SHOW_LEADERBOARD: Entrypoint =
    Entrypoint::new("postShowLeaderboard", "(Ljava/lang/String;)V");
pub const UNLOCK_ACHIEVEMENT: Entrypoint =
    Entrypoint::new("postUnlockAchievement", "(Ljava/lang/String;)V");
pub const INCREMENT_ACHIEVEMENT: Entrypoint =
    Entrypoint::new("postIncrementAchievement", "(Ljava/lang/String;I)V");
pub const SUBMIT_SCORE: Entrypoint = Entrypoint::new("postSubmitScore", "(Ljava/lang/String;J)V");
pub const SHOW_ENCOURAGEMENT_TOASTS: Entrypoint =
    Entrypoint::new("postShowEncouragementToasts", "(I)V");
pub const RESET_ENCOURAGEMENT_TOASTS: Entrypoint =
    Entrypoint::new("postResetEncouragementToasts", "(I)V");
pub const SAVE_STATE: Entrypoint = Entrypoint::new("postSaveState", "(I)V");

// === Synchronous queries ===

pub const GET_SAVE_PATH: Entrypoint = Entrypoint::new("getSavePath", "()Ljava/lang/String;");
pub const GET_API_LEVEL: Entrypoint = Entrypoint::new("getApiLevel", "()I");
pub const GET_MOTION_RANGE_MIN_X: Entrypoint = Entrypoint::new("getDeviceMotionRangeMinX", "(II)F");
pub const GET_MOTION_RANGE_MAX_X: Entrypoint = Entrypoint::new("getDeviceMotionRangeMaxX", "(II)F");
pub const GET_MOTION_RANGE_MIN_Y: Entrypoint = Entrypoint::new("getDeviceMotionRangeMinY", "(II)F");
pub const GET_MOTION_RANGE_MAX_Y: Entrypoint = Entrypoint::new("getDeviceMotionRangeMaxY", "(II)F");

/// Every entrypoint, for up-front resolution
pub const ENTRYPOINTS: &[Entrypoint] = &[
    START_SIGN_IN,
    START_SIGN_OUT,
    SHOW_ACHIEVEMENTS,
    SHOW_LEADERBOARDS,
    SHOW_LEADERBOARD,
    UNLOCK_ACHIEVEMENT,
    INCREMENT_ACHIEVEMENT,
    SUBMIT_SCORE,
    SHOW_ENCOURAGEMENT_TOASTS,
    RESET_ENCOURAGEMENT_TOASTS,
    SAVE_STATE,
    GET_SAVE_PATH,
    GET_API_LEVEL,
    GET_MOTION_RANGE_MIN_X,
    GET_MOTION_RANGE_MAX_X,
    GET_MOTION_RANGE_MIN_Y,
    GET_MOTION_RANGE_MAX_Y,
];
