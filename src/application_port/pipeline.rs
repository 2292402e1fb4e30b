use crate::domain_model::ApiResponse;
use crate::domain_port::TransportError;
use reqwest::StatusCode;
use reqwest::header::InvalidHeaderValue;

/// Outcome of a failed refresh, shared by every waiter of that refresh.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshError {
    /// The session cannot be recovered; the user must log in again.
    #[error("session expired: {reason}")]
    Fatal { reason: String },
    #[error("refresh rejected with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("refresh transport error: {0}")]
    Transport(String),
    #[error("malformed refresh response: {0}")]
    MalformedResponse(String),
    #[error("refresh was interrupted before it settled")]
    Interrupted,
}

impl RefreshError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, RefreshError::Fatal { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("request failed with status {}", .0.status)]
    Status(ApiResponse),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Refresh(#[from] RefreshError),
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("access token is not a valid header value")]
    InvalidToken(#[from] InvalidHeaderValue),
}

impl PipelineError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            PipelineError::Status(response) => Some(response.status),
            PipelineError::Refresh(RefreshError::Rejected { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Message carried by the failed response body, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            PipelineError::Status(response) => response.error_message(),
            PipelineError::Refresh(RefreshError::Rejected { message, .. }) => message.clone(),
            _ => None,
        }
    }

    pub fn is_fatal_auth(&self) -> bool {
        matches!(self, PipelineError::Refresh(e) if e.is_fatal())
    }
}
