//! Error types for the portal layer.

use thiserror::Error;

/// Failures while configuring or starting the portal. Request-time API
/// failures never surface here; views render them as pages.
#[derive(Error, Debug)]
pub enum PortalError {
    /// A configuration value is present but unusable.
    #[error("Invalid configuration for {key}: {message}")]
    InvalidConfig { key: String, message: String },
    /// The API client could not be built.
    #[error("API client error: {0}")]
    Api(#[from] shopline_api::Error),
}
