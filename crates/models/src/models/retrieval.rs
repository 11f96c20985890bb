use serde::{Deserialize, Serialize};

/// Result of retrieving one stock asset into local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RetrievalOutcome {
    Success {
        local_url: String,
        mode: RetrievalMode,
    },
    Failure {
        kind: FailureKind,
        message: String,
    },
}

impl RetrievalOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RetrievalOutcome::Success { .. })
    }

    /// URL the caller should reference, if the retrieval succeeded.
    pub fn local_url(&self) -> Option<&str> {
        match self {
            RetrievalOutcome::Success { local_url, .. } => Some(local_url),
            RetrievalOutcome::Failure { .. } => None,
        }
    }
}

/// `Remote` means the backend was unreachable and the caller keeps the
/// provider URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    Local,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    Connection,
    Http { status: u16 },
    /// The backend answered but reported an error for the request.
    Rejected,
    MalformedResponse,
    Request,
}
