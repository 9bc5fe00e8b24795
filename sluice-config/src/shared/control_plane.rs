use serde::Deserialize;
use thiserror::Error;

use crate::SerializableSecretString;

/// Default timeout for control-plane requests, in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Control-plane configuration validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The control-plane endpoint is missing or empty.
    #[error("`base_url` must be set to the control-plane endpoint")]
    MissingBaseUrl,
    /// The API key is missing or empty.
    #[error("`api_key` must be set to a non-empty control-plane API key")]
    MissingApiKey,
    /// The request timeout cannot be zero.
    #[error("`request_timeout_secs` cannot be zero")]
    RequestTimeoutZero,
}

/// Connection settings for the remote control plane.
///
/// Threaded explicitly into the API client; nothing in this workspace reads
/// ambient process-wide state.
#[derive(Debug, Clone, Deserialize)]
pub struct ControlPlaneConfig {
    /// Base URL of the control-plane API, without a trailing slash.
    pub base_url: String,
    /// Bearer token used to authenticate every request.
    pub api_key: SerializableSecretString,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl ControlPlaneConfig {
    /// Checks that the configuration is complete enough to build a client.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.trim().is_empty() {
            return Err(ValidationError::MissingBaseUrl);
        }

        if self.api_key.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingApiKey);
        }

        if self.request_timeout_secs == 0 {
            return Err(ValidationError::RequestTimeoutZero);
        }

        Ok(())
    }
}
