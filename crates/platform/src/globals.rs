//! Process-wide report storage
//!
//! Host callbacks arrive as free functions with no context pointer, so the
//! board they write to has to be reachable without one. Everything else
//! receives the board by injection.

use std::sync::{Arc, OnceLock};

use crate::reports::ReportBoard;

static REPORTS: OnceLock<Arc<ReportBoard>> = OnceLock::new();

/// Get the process-wide report board
///
/// Created on first use. Reports may arrive before the engine starts, so
/// this never fails.
pub fn reports() -> &'static Arc<ReportBoard> {
    REPORTS.get_or_init(|| Arc::new(ReportBoard::new()))
}
