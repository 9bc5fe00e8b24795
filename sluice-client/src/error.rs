use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the control-plane client.
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// The request could not be sent or the response body could not be read.
    #[error("control-plane request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The control plane answered with a non-success status.
    ///
    /// The body is carried verbatim so callers can surface the remote
    /// validation message.
    #[error("control-plane returned status {status}: {body}")]
    Api { status: StatusCode, body: String },

    /// The requested resource does not exist.
    #[error("resource not found at `{path}`")]
    NotFound { path: String },

    /// The response body could not be decoded into the expected shape.
    #[error("failed to deserialize control-plane response: {0}")]
    Deserialize(#[source] serde_json::Error),
}

impl ApiClientError {
    /// Whether this error is the distinguishable not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiClientError::NotFound { .. })
    }
}
