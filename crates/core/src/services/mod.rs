//! Platform service facade
//!
//! [`PlatformServices`] presents the host's game services as plain calls:
//!
//! - Fire-and-forget operations (sign-in, achievements, leaderboards, toasts,
//!   cloud save) queue a [`ServiceRequest`] and return immediately.
//! - State queries (sign-in status, cloud load result, joystick presence)
//!   read atomic cells that asynchronous host reports write.
//! - Boundary queries (files directory, API level, device motion range) call
//!   the host synchronously and cache the answer.
//!
//! The facade is cheap to clone; clones share the queue, the report board
//! and the caches.

mod requests;
pub mod savegame;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use tunnel_platform::{
    CloudData, MotionRange, PlatformBridge, ReportBoard, ServiceRequest, SignInStatus,
};

use crate::input::MotionRangeSource;

pub use requests::{request_channel, RequestQueue, ServiceDispatcher};
pub use savegame::SaveError;

pub(crate) use requests::settle;

/// Answers from the host that never change once known
#[derive(Debug, Default)]
struct BoundaryCache {
    files_dir: OnceLock<std::path::PathBuf>,
    api_level: OnceLock<i32>,
    motion_ranges: Mutex<HashMap<(i32, i32), MotionRange>>,
}

/// Game-facing facade over the host's services
#[derive(Clone)]
pub struct PlatformServices {
    bridge: Arc<dyn PlatformBridge>,
    reports: Arc<ReportBoard>,
    requests: RequestQueue,
    cache: Arc<BoundaryCache>,
}

impl PlatformServices {
    /// Create a facade
    ///
    /// # Arguments
    /// * `bridge` - Synchronous host queries
    /// * `reports` - Cells the host's asynchronous reports write into
    /// * `requests` - Queue drained by a [`ServiceDispatcher`]
    pub fn new(
        bridge: Arc<dyn PlatformBridge>,
        reports: Arc<ReportBoard>,
        requests: RequestQueue,
    ) -> Self {
        Self {
            bridge,
            reports,
            requests,
            cache: Arc::new(BoundaryCache::default()),
        }
    }

    /// Create a facade together with the dispatcher that executes its requests
    pub fn connect(
        bridge: Arc<dyn PlatformBridge>,
        reports: Arc<ReportBoard>,
        queue_capacity: usize,
    ) -> (Self, ServiceDispatcher) {
        let (queue, dispatcher) = request_channel(queue_capacity, Arc::clone(&bridge));
        (Self::new(bridge, reports, queue), dispatcher)
    }

    pub fn reports(&self) -> &Arc<ReportBoard> {
        &self.reports
    }

    // === Fire-and-forget ===

    /// Begin interactive sign-in
    ///
    /// Status reads `InProgress` from this call until the host reports back.
    pub fn start_sign_in(&self) {
        let previous = self.reports.sign_in_status();
        self.reports.set_sign_in_status(SignInStatus::InProgress);
        if !self.requests.submit(ServiceRequest::StartSignIn) {
            self.reports.revert_sign_in_status(SignInStatus::InProgress, previous);
        }
    }

    /// Sign out
    ///
    /// Status reads `Failed` from this call on.
    pub fn start_sign_out(&self) {
        self.reports.set_sign_in_status(SignInStatus::Failed);
        self.requests.submit(ServiceRequest::StartSignOut);
    }

    pub fn show_achievements(&self) {
        self.requests.submit(ServiceRequest::ShowAchievements);
    }

    pub fn show_leaderboards(&self) {
        self.requests.submit(ServiceRequest::ShowLeaderboards);
    }

    pub fn show_leaderboard(&self, id: &str) {
        self.requests
            .submit(ServiceRequest::ShowLeaderboard { id: id.to_owned() });
    }

    pub fn unlock_achievement(&self, id: &str) {
        self.requests
            .submit(ServiceRequest::UnlockAchievement { id: id.to_owned() });
    }

    pub fn increment_achievement(&self, id: &str, steps: i32) {
        self.requests.submit(ServiceRequest::IncrementAchievement {
            id: id.to_owned(),
            steps,
        });
    }

    pub fn submit_score(&self, board: &str, score: i64) {
        self.requests.submit(ServiceRequest::SubmitScore {
            board: board.to_owned(),
            score,
        });
    }

    /// Show the toasts earned by reaching `score`
    pub fn show_encouragement_toasts(&self, score: i32) {
        self.requests
            .submit(ServiceRequest::ShowEncouragementToasts { score });
    }

    /// Forget toasts above `score` so they can be shown again
    pub fn reset_encouragement_toasts(&self, score: i32) {
        self.requests
            .submit(ServiceRequest::ResetEncouragementToasts { score });
    }

    /// Push a level to the cloud save
    pub fn save_state(&self, level: i32) {
        self.requests.submit(ServiceRequest::SaveState { level });
    }

    // === Report reads ===

    pub fn sign_in_status(&self) -> SignInStatus {
        self.reports.sign_in_status()
    }

    pub fn is_signed_in(&self) -> bool {
        self.reports.is_signed_in()
    }

    pub fn is_in_progress(&self) -> bool {
        self.reports.is_in_progress()
    }

    pub fn cloud_data(&self) -> CloudData {
        self.reports.cloud_data()
    }

    pub fn is_joystick_present(&self) -> bool {
        self.reports.is_joystick_present()
    }

    // === Boundary queries ===

    /// Writable save directory
    ///
    /// Queried once; every later call is a cache read. A failed query is
    /// not cached and is retried on the next call.
    pub fn files_dir(&self) -> Option<&Path> {
        if let Some(dir) = self.cache.files_dir.get() {
            return Some(dir.as_path());
        }

        let dir = settle("files dir", self.bridge.files_dir())?;
        tracing::debug!("Files dir resolved: {:?}", dir);
        Some(self.cache.files_dir.get_or_init(|| dir).as_path())
    }

    /// Platform API level, 0 if it cannot be queried
    pub fn api_level(&self) -> i32 {
        if let Some(level) = self.cache.api_level.get() {
            return *level;
        }

        match settle("api level", self.bridge.api_level()) {
            Some(level) => *self.cache.api_level.get_or_init(|| level),
            None => 0,
        }
    }

    /// Coordinate range of an input device
    ///
    /// Cached per device and source. A failed query yields the zero range.
    pub fn device_motion_range(&self, device_id: i32, source: i32) -> MotionRange {
        let key = (device_id, source);
        if let Some(range) = self.cache.motion_ranges.lock().get(&key) {
            return *range;
        }

        match settle(
            "device motion range",
            self.bridge.device_motion_range(device_id, source),
        ) {
            Some(range) => {
                tracing::debug!(device_id, source, ?range, "Motion range resolved");
                self.cache.motion_ranges.lock().insert(key, range);
                range
            }
            None => MotionRange::ZERO,
        }
    }

    // === Progress ===

    /// Save a level locally and push it to the cloud
    pub fn save_progress(&self, level: u32) -> Result<(), SaveError> {
        let dir = self.files_dir().ok_or(SaveError::NoSaveDirectory)?;
        savegame::write_progress(dir, level)?;
        self.save_state(level.min(i32::MAX as u32) as i32);
        Ok(())
    }

    /// Level saved locally, if any
    pub fn local_progress(&self) -> Option<u32> {
        let dir = self.files_dir()?;
        match savegame::read_progress(dir) {
            Ok(level) => level,
            Err(e) => {
                tracing::warn!("Ignoring local progress: {}", e);
                None
            }
        }
    }

    /// Level to resume from, reconciling local and cloud progress
    pub fn effective_level(&self) -> Option<u32> {
        let local = self.local_progress();
        match self.cloud_data() {
            CloudData::Level(cloud) => {
                let local = local.unwrap_or(0).min(i32::MAX as u32) as i32;
                let cloud = cloud.min(i32::MAX as u32) as i32;
                Some(savegame::resolve_conflict(local, cloud))
            }
            CloudData::Waiting | CloudData::Failed => local,
        }
    }
}

impl MotionRangeSource for PlatformServices {
    fn motion_range(&self, device_id: i32, source: i32) -> MotionRange {
        self.device_motion_range(device_id, source)
    }
}

impl std::fmt::Debug for PlatformServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformServices")
            .field("sign_in", &self.sign_in_status())
            .field("cloud", &self.cloud_data())
            .field("queued", &self.requests.len())
            .finish()
    }
}
