use serde::Serialize;

/// Which verification tier decided the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// An error indicator was present. Wins over any success signal.
    ErrorIndicator { selector: String },
    SuccessIndicator { selector: String },
    /// No indicator matched but the page left the login URL.
    LocationChanged { from: String, to: String },
    /// Nothing matched and the URL did not change.
    Ambiguous,
    /// The backend failed while verifying.
    VerificationError,
}

/// Terminal outcome of one login run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub verdict: Verdict,
}

impl WorkflowResult {
    pub fn success(verdict: Verdict) -> Self {
        Self {
            success: true,
            error: None,
            verdict,
        }
    }

    pub fn failure(error: impl Into<String>, verdict: Verdict) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            verdict,
        }
    }

    /// Outcome tag used for the final snapshot.
    pub fn snapshot_tag(&self) -> &'static str {
        if self.success {
            "login-success"
        } else {
            "login-failed"
        }
    }
}
