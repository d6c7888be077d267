//! Error types for the bandit client.
//!
//! Uses `thiserror` so callers can match on the failure class: input
//! validation, an expected absence, a missing remote resource, a structured
//! error reported by the service, or a local decode/transport failure.

use serde::Deserialize;
use thiserror::Error;

/// Result type for bandit client operations.
pub type Result<T> = std::result::Result<T, BanditError>;

/// Structured error body returned by the remote service on a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Error)]
#[error("[Code {code}] {message}")]
pub struct ServiceError {
    pub message: String,
    pub code: i64,
}

/// Bandit client errors.
#[derive(Debug, Error)]
pub enum BanditError {
    /// A suggestion was requested without a user id
    #[error("empty user id")]
    EmptyUserId,

    /// A reward was posted without a token
    #[error("empty reward token")]
    EmptyRewardToken,

    /// The inbound request carries no pending reward; nothing to reward
    #[error("no reward cookie found")]
    NoRewardCookie,

    /// The remote service has no resource at the requested URL
    #[error("resource {url} not found")]
    ResourceNotFound { url: String },

    /// The remote service rejected the call with a `{message, code}` body
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Response body could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Network-layer failure (connection refused, timeout, body read)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Configured base URL could not be turned into a request URL
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The identifier generator could not produce a user id
    #[error("failed to generate user id: {0}")]
    IdGeneration(String),

    /// A cookie could not be encoded as a `Set-Cookie` header value
    #[error("invalid cookie value for {name}")]
    InvalidCookie { name: String },

    /// Missing or malformed configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl BanditError {
    /// Whether the remote service reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BanditError::ResourceNotFound { .. })
    }

    /// The structured service error, if the remote side reported one.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            BanditError::Service(e) => Some(e),
            _ => None,
        }
    }

    /// Input validation and expected-absence errors; no network call was made.
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            BanditError::EmptyUserId | BanditError::EmptyRewardToken | BanditError::NoRewardCookie
        )
    }
}
