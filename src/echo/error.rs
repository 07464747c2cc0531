//! Faults raised while producing an echo response
//!
//! None of these reach the hosting layer: the handler boundary converts every
//! variant into a 500 JSON document whose `details` is the `Display` text.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EchoError {
    /// Request URL could not be parsed as an absolute URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Headers or query parameters could not be enumerated
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
