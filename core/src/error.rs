//! Error types for the loyalty API client.
//!
//! # Design
//! `ApiError` classifies what went wrong during a single round trip.
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status". All other non-2xx responses land in `HttpError` with the raw
//! status code and body for debugging.
//!
//! `OperationError` is what the async service hands back: a human-readable
//! message naming the failed operation plus the `ApiError` that caused it.

use thiserror::Error;

/// What went wrong during a round trip.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response (DNS, refused connection,
    /// broken body stream).
    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The background task running the round trip panicked.
    #[error("request task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A failed data-access operation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct OperationError {
    message: String,
    #[source]
    cause: ApiError,
}

impl OperationError {
    /// Wrap `cause`, prefixing its description with `context`
    /// (e.g. "failed to load clients").
    pub fn new(context: &str, cause: ApiError) -> Self {
        Self {
            message: format!("{context}: {cause}"),
            cause,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> &ApiError {
        &self.cause
    }

    pub fn into_cause(self) -> ApiError {
        self.cause
    }
}

/// Outcome of every `LoyaltyService` operation.
pub type ApiResult<T> = Result<T, OperationError>;
