//! Client error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid payload: {0}")]
    Payload(#[from] jfmon_core::CoreError),

    #[error("Mock failure: {0}")]
    Mock(String),
}

impl ClientError {
    /// Failure reached the server and got a response.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            ClientError::Status { .. } | ClientError::Decode(_) | ClientError::Payload(_)
        )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
