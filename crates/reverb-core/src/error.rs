//! Workspace-wide error type.
//!
//! One enum covers every crate so `?` composes across the pipeline without
//! adapter layers. Variants are grouped by what the caller can do about
//! them: retry (transport), fix the request (validation), or give up
//! (internal).

use thiserror::Error;

/// Shorthand result carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Query or connection failure surfaced by sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Missing resource with no more specific variant.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Review lookup by UUID missed.
    #[error("Review not found: {0}")]
    ReviewNotFound(uuid::Uuid),

    /// Admin lookup by username missed.
    #[error("Admin not found: {0}")]
    AdminNotFound(String),

    /// Provider call ran but produced an unusable outcome.
    #[error("Inference error: {0}")]
    Inference(String),

    /// Provider call skipped; no credential configured.
    #[error("Inference unavailable: {0}")]
    InferenceUnavailable(String),

    /// Requested reporting window holds no reviews.
    #[error("No data: {0}")]
    NoData(String),

    /// JSON encode or decode failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Bad or missing configuration, usually caught at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller-supplied data rejected before any write.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transport-level HTTP failure.
    #[error("Request error: {0}")]
    Request(String),

    /// Broken invariant with no better home.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Credential or token rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Request(err.to_string())
    }
}
