//! Error types for message decoding.

use thiserror::Error;

/// Errors that can occur when decoding an inbound frame.
///
/// None of these are fatal to a session: the offending frame is dropped.
#[derive(Debug, Error)]
pub enum MessageError {
    /// The frame is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The frame is valid JSON but not an object.
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// The object is neither a control message nor a valid record.
    #[error("invalid health record: {0}")]
    InvalidRecord(String),
}
