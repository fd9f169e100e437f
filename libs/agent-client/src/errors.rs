//! Client error types

use thiserror::Error;

/// An unexpected HTTP status from the agent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unexpected status '{status}'{}", body_suffix(.body))]
pub struct RequestError {
    pub status: u16,
    pub body: String,
}

fn body_suffix(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(": {}", body)
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid CA certificate: {0}")]
    Certificate(String),
}

impl ClientError {
    /// Status code of an unexpected response, if that is what this is
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Request(e) => Some(e.status),
            _ => None,
        }
    }
}
