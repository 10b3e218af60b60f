//! Send outcomes.

use umeng_core::{ApiResponse, PushError};
use umeng_crypto::SignedRequest;

/// Category of a failed send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Input rejected before any network call.
    Validation,
    /// Bulk upload failed; the push was not sent.
    Upload,
    /// Request could not be signed.
    Signature,
    /// Network or HTTP failure.
    Transport,
    /// The API answered `FAIL`.
    Rejected,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Upload => write!(f, "upload"),
            Self::Signature => write!(f, "signature"),
            Self::Transport => write!(f, "transport"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// A failed send, with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushFailure {
    pub kind: FailureKind,
    pub message: String,
    /// API error code, for rejected sends.
    pub error_code: Option<String>,
}

impl PushFailure {
    pub fn new(kind: FailureKind, message: impl std::fmt::Display) -> Self {
        Self {
            kind,
            message: message.to_string(),
            error_code: None,
        }
    }

    /// Failure for a `FAIL` reply.
    pub fn rejected(response: &ApiResponse) -> Self {
        let error_code = response.error_code();
        let message = match (&error_code, response.error_msg()) {
            (Some(code), Some(msg)) => format!("API error {code}: {msg}"),
            (Some(code), None) => format!("API error {code}"),
            (None, Some(msg)) => format!("API error: {msg}"),
            (None, None) => "API rejected the request".to_string(),
        };

        Self {
            kind: FailureKind::Rejected,
            message,
            error_code,
        }
    }
}

impl From<PushError> for PushFailure {
    fn from(error: PushError) -> Self {
        let kind = match &error {
            PushError::Validation(_) => FailureKind::Validation,
            PushError::Upload(_) => FailureKind::Upload,
            PushError::Signature(_) => FailureKind::Signature,
            PushError::Transport(_) => FailureKind::Transport,
        };
        Self::new(kind, error)
    }
}

impl std::fmt::Display for PushFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failure: {}", self.kind, self.message)
    }
}

/// Result of a dispatcher send. Sends never panic or return `Err`.
#[derive(Debug, Clone)]
pub enum PushOutcome {
    /// Accepted by the API.
    Sent(ApiResponse),
    /// Signed but not transmitted (dry run).
    Prepared(SignedRequest),
    /// Not accepted.
    Failed(PushFailure),
}

impl PushOutcome {
    /// Create a failed outcome.
    pub fn failure(error: impl Into<PushFailure>) -> Self {
        Self::Failed(error.into())
    }

    /// Check if the send was accepted or prepared.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            Self::Sent(response) => Some(response),
            _ => None,
        }
    }

    pub fn prepared(&self) -> Option<&SignedRequest> {
        match self {
            Self::Prepared(request) => Some(request),
            _ => None,
        }
    }

    pub fn failed(&self) -> Option<&PushFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}
