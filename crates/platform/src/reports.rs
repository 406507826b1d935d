//! Asynchronous report cells
//!
//! Each fact the host reports lives in its own single-word atomic. Writers
//! publish the whole value in one store (or one compare-exchange), so readers
//! on any thread see either the previous value or the new one.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};

/// Sign-in state as last reported or requested
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignInStatus {
    Failed = 0,
    InProgress = 1,
    Succeeded = 2,
}

impl SignInStatus {
    /// Fold a host report into a status
    ///
    /// `in_progress` takes precedence over `signed_in`.
    pub fn from_report(signed_in: bool, in_progress: bool) -> Self {
        if in_progress {
            Self::InProgress
        } else if signed_in {
            Self::Succeeded
        } else {
            Self::Failed
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::InProgress,
            2 => Self::Succeeded,
            _ => Self::Failed,
        }
    }
}

/// Lock-free sign-in status cell
#[derive(Debug)]
pub struct SignInCell(AtomicU8);

impl SignInCell {
    pub const fn new() -> Self {
        Self(AtomicU8::new(SignInStatus::Failed as u8))
    }

    pub fn get(&self) -> SignInStatus {
        SignInStatus::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, status: SignInStatus) {
        self.0.store(status as u8, Ordering::Release);
    }

    /// Store `new` only if the cell still holds `expected`
    ///
    /// # Returns
    /// `true` if the swap happened
    pub fn compare_set(&self, expected: SignInStatus, new: SignInStatus) -> bool {
        self.0
            .compare_exchange(expected as u8, new as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for SignInCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of the cloud save load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloudData {
    /// No report received yet
    Waiting,
    /// The load finished and failed
    Failed,
    /// The load finished with this saved level
    Level(u32),
}

const CLOUD_WAITING: u64 = 0;
const CLOUD_FAILED: u64 = 1;
const CLOUD_LOADED: u64 = 2;

/// One-shot latch for the cloud load result
///
/// State lives in the high half of the word and the level in the low half.
/// Only the first report is kept; later reports are ignored.
#[derive(Debug)]
pub struct CloudLoadLatch(AtomicU64);

impl CloudLoadLatch {
    pub const fn new() -> Self {
        Self(AtomicU64::new(CLOUD_WAITING))
    }

    /// Publish a load result
    ///
    /// Negative levels are clamped to zero.
    ///
    /// # Returns
    /// `true` if this report latched, `false` if a result was already present
    pub fn report(&self, success: bool, level: i32) -> bool {
        let packed = if success {
            (CLOUD_LOADED << 32) | u64::from(level.max(0) as u32)
        } else {
            CLOUD_FAILED << 32
        };
        self.0
            .compare_exchange(CLOUD_WAITING, packed, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn get(&self) -> CloudData {
        let packed = self.0.load(Ordering::Acquire);
        match packed >> 32 {
            CLOUD_WAITING => CloudData::Waiting,
            CLOUD_LOADED => CloudData::Level(packed as u32),
            _ => CloudData::Failed,
        }
    }
}

impl Default for CloudLoadLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Every fact the host reports asynchronously
#[derive(Debug, Default)]
pub struct ReportBoard {
    sign_in: SignInCell,
    cloud: CloudLoadLatch,
    joystick: AtomicBool,
}

impl ReportBoard {
    pub const fn new() -> Self {
        Self {
            sign_in: SignInCell::new(),
            cloud: CloudLoadLatch::new(),
            joystick: AtomicBool::new(false),
        }
    }

    // === Report entrypoints ===

    /// Host reports the sign-in state
    pub fn report_sign_in_state(&self, signed_in: bool, in_progress: bool) {
        let status = SignInStatus::from_report(signed_in, in_progress);
        tracing::debug!(signed_in, in_progress, ?status, "Sign-in report");
        self.sign_in.set(status);
    }

    /// Host reports the cloud load result
    pub fn report_cloud_load_result(&self, success: bool, level: i32) {
        if self.cloud.report(success, level) {
            tracing::debug!(success, level, "Cloud load result");
        } else {
            tracing::debug!(success, level, "Cloud load result ignored, already latched");
        }
    }

    /// Host reports whether a joystick is connected
    pub fn report_joystick_present(&self, present: bool) {
        tracing::debug!(present, "Joystick report");
        self.joystick.store(present, Ordering::Release);
    }

    // === Local writes ===

    /// Overwrite the sign-in status ahead of a request
    pub fn set_sign_in_status(&self, status: SignInStatus) {
        self.sign_in.set(status);
    }

    /// Undo a local status write unless a host report replaced it meanwhile
    ///
    /// # Returns
    /// `true` if `previous` was restored
    pub fn revert_sign_in_status(&self, written: SignInStatus, previous: SignInStatus) -> bool {
        self.sign_in.compare_set(written, previous)
    }

    // === Reads ===

    pub fn sign_in_status(&self) -> SignInStatus {
        self.sign_in.get()
    }

    pub fn is_signed_in(&self) -> bool {
        self.sign_in_status() == SignInStatus::Succeeded
    }

    pub fn is_in_progress(&self) -> bool {
        self.sign_in_status() == SignInStatus::InProgress
    }

    pub fn cloud_data(&self) -> CloudData {
        self.cloud.get()
    }

    pub fn is_joystick_present(&self) -> bool {
        self.joystick.load(Ordering::Acquire)
    }
}
