//! Unified error types for findlogin.
//!
//! Every failure in the search pipeline falls into one of two families:
//! transport (reaching the credential site) or parse (turning the response
//! into a document).

use serde::{Deserialize, Serialize};

/// Coarse classification of an [`Error`], surfaced to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Transport,
    Parse,
}

/// Unified error types for the findlogin pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request URL could not be built from the base URL and domain.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Network, DNS or connection failure.
    #[error("TRANSPORT_ERROR: {0}")]
    Transport(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Non-success HTTP status.
    #[error("HTTP_ERROR: status {status}")]
    HttpStatus { status: u16 },

    /// Response body could not be turned into a queryable document.
    #[error("PARSE_ERROR: {0}")]
    Parse(String),
}

impl Error {
    /// Classify this error for the user-visible failure indicator.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUrl(_)
            | Error::Transport(_)
            | Error::FetchTimeout(_)
            | Error::FetchTooLarge(_)
            | Error::HttpStatus { .. } => ErrorKind::Transport,
            Error::Parse(_) => ErrorKind::Parse,
        }
    }
}
