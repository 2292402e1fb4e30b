use crate::domain_model::*;

/// Failures where no HTTP response was received at all.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request as-is. Error statuses come back as `Ok` responses.
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}
