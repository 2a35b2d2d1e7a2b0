//! Host error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Free-form handler failure; the reason reaches the caller verbatim.
    #[error("{0}")]
    Handler(String),
}
