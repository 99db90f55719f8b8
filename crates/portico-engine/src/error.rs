use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    // ============================================================
    // Session Errors
    // ============================================================
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Backend not ready")]
    NotReady,

    #[error("Operation not supported: {0}")]
    NotSupported(String),

    // ============================================================
    // Page Errors
    // ============================================================
    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Script error: {0}")]
    Script(String),

    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    // ============================================================
    // Plumbing
    // ============================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl BackendError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, BackendError::Timeout { .. })
    }
}

/// Failure taxonomy of a login run.
///
/// Only `StepFailed` ever leaves `WorkflowRunner::run`; the other variants are
/// produced inside a step or the verifier, logged there and turned into a
/// `false` step result or a failed `WorkflowResult`.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Failed to establish browser session: {0}")]
    Connection(#[source] BackendError),

    #[error("Failed to load target page: {0}")]
    Navigation(#[source] BackendError),

    #[error("No visible element found with any selector: {}", .candidates.join(", "))]
    LocatorNotFound { candidates: Vec<String> },

    #[error("Failed at step: {step}")]
    StepFailed { step: String },

    #[error("Unable to verify login success")]
    VerificationAmbiguous,

    #[error("Error during cleanup: {0}")]
    Cleanup(#[source] BackendError),
}
