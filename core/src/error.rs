//! Error types for the BLB client.
//!
//! # Design
//! Errors are surfaced to the caller exactly once, without retry. Non-2xx
//! responses land in `Service` when the body carries the provider's JSON error
//! envelope and in `Http` otherwise, so the raw status and body are always
//! available for debugging.

use thiserror::Error;

/// Errors returned by `BlbClient` and `LoadBalancerClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required arguments struct was not supplied. Carries the operation name.
    #[error("{0} need args")]
    MissingArguments(&'static str),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The configured endpoint does not form a valid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The transport failed before a response was received.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server returned a non-2xx status with an unrecognized body.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The server returned a non-2xx status with a provider error envelope.
    #[error("HTTP {status}: [{code}] {message} (request id {request_id})")]
    Service {
        status: u16,
        code: String,
        message: String,
        request_id: String,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status of the response that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } | ApiError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
