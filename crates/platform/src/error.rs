//! Error types for the platform boundary

/// Error type for calls across the platform boundary
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A host method the native side depends on could not be resolved
    #[error("Entrypoint not found: {name}{signature}")]
    MissingEntrypoint {
        name: &'static str,
        signature: &'static str,
    },

    /// The host method exists but the call itself failed
    #[error("Call to {name} failed: {reason}")]
    CallFailed { name: &'static str, reason: String },

    /// The calling thread could not be attached to the host runtime
    #[error("Thread not attached to the host runtime: {0}")]
    NotAttached(String),
}

impl BridgeError {
    /// Whether this error indicates a broken build rather than a runtime condition
    pub fn is_integration_error(&self) -> bool {
        matches!(self, Self::MissingEntrypoint { .. })
    }
}
