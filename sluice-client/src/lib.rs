//! Typed client for the sluice control-plane API.

mod base;
mod error;
mod http;
pub mod types;
pub mod utils;

pub use base::ControlPlaneApi;
pub use error::ApiClientError;
pub use http::HttpControlPlaneClient;
