// Error types for the Cakewalk client.
// Handles HTTP status failures, transport and decode errors, and configuration errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CakewalkError {
    #[error("Cakewalk API error: {status} {status_text}")]
    Api { status: u16, status_text: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Network failure reported by a transport that is not backed by reqwest.
    #[error("Network error: {0}")]
    Network(String),

    #[error("JSON parsing error for {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Missing {0} environment variable")]
    MissingEnv(&'static str),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl CakewalkError {
    /// HTTP status of a failed API response, if this error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            CakewalkError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True only for an API response with status 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type Result<T> = std::result::Result<T, CakewalkError>;
