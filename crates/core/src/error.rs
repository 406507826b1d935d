//! Engine errors

use thiserror::Error;

use crate::lifecycle::GraphicsError;

/// Errors that end the game loop
#[derive(Debug, Error)]
pub enum EngineError {
    /// The display cannot be opened or offers no matching configuration
    #[error("No usable display: {0}")]
    NoUsableDisplay(#[source] GraphicsError),
}

impl EngineError {
    /// The graphics failure behind this error
    pub fn graphics_error(&self) -> &GraphicsError {
        match self {
            Self::NoUsableDisplay(e) => e,
        }
    }
}
