use thiserror::Error;

/// Failure taxonomy for the client core.
///
/// A role mismatch at navigation time is handled by the route guard as a
/// redirect, never surfaced as an error; [`Error::Unauthorized`] covers
/// the server rejecting a request outright. Empty results (empty
/// timelines, absent payloads, missing overlays) are not errors at all;
/// they have defined rendering fallbacks in the views.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not authorized for this operation")]
    Unauthorized,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed remote payload: {0}")]
    Payload(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Credential store error: {0}")]
    Store(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
