//! Error types for the Inner Voice gateway

use thiserror::Error;

/// Result type alias for Inner Voice operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Inner Voice gateway and client
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Generation API error (bad status, error body, empty output)
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Gateway unreachable or returned an unreadable response
    #[error("transport error: {0}")]
    Transport(String),

    /// Speech recognition error
    #[error("recognition error: {0}")]
    Recognition(String),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
