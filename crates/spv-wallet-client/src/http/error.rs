/*
[INPUT]:  Error sources (auth, HTTP, API, serialization, config)
[OUTPUT]: Structured error types with context
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::auth::AuthError;

/// Main error type for the SPV Wallet client
#[derive(Error, Debug)]
pub enum SpvWalletError {
    /// Key material was rejected, or auth headers could not be produced
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (status {status}, code {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Query parameters could not be built
    #[error("Query build error: {0}")]
    QueryBuild(String),
}

/// Error body returned by the wallet service
#[derive(Debug, Deserialize)]
pub(crate) struct ResponseError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl SpvWalletError {
    /// Check if error indicates an authentication failure
    pub fn is_auth_error(&self) -> bool {
        match self {
            SpvWalletError::Auth(_) => true,
            SpvWalletError::Api { status, .. } => *status == StatusCode::UNAUTHORIZED.as_u16(),
            _ => false,
        }
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            SpvWalletError::Api { status, .. } => Some(*status),
            SpvWalletError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Build an API error from a status code and raw response body
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        match serde_json::from_slice::<ResponseError>(body) {
            Ok(err) => SpvWalletError::Api {
                status: status.as_u16(),
                code: err.code,
                message: err.message,
            },
            Err(e) => SpvWalletError::InvalidResponse(format!(
                "status {status} with undecodable error body: {e}"
            )),
        }
    }
}

/// Result type alias for SPV Wallet operations
pub type Result<T> = std::result::Result<T, SpvWalletError>;
