/*
[INPUT]:  Failures from key parsing, derivation, signing and header assembly
[OUTPUT]: AuthError with the failing sub-step and auth mode attached
[POS]:    Auth layer - error taxonomy for request authentication
[UPDATE]: When adding a new failure source to the auth pipeline
*/

use thiserror::Error;

use super::headers::AuthMode;

/// Errors produced while turning key material into auth headers
#[derive(Error, Debug)]
pub enum AuthError {
    /// A user-supplied key string could not be decoded
    #[error("Invalid key format: {0}")]
    KeyFormat(String),

    /// Child key derivation is impossible (public-only parent, malformed nonce)
    #[error("Child key derivation failed: {0}")]
    Derivation(String),

    /// The signing primitive failed
    #[error("Message signing failed: {0}")]
    Signing(String),

    /// The OS random source could not produce a nonce
    #[error("Random source failure: {0}")]
    Randomness(String),

    /// A computed value is not a legal HTTP header value
    #[error("Invalid value for header {name}: {message}")]
    Header { name: &'static str, message: String },

    /// A payload building sub-step failed
    #[error("{step} failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: Box<AuthError>,
    },

    /// Appending auth headers for the configured mode failed
    #[error("Append auth headers ({mode}) failed: {source}")]
    Append {
        mode: AuthMode,
        #[source]
        source: Box<AuthError>,
    },
}

impl AuthError {
    pub(crate) fn step(step: &'static str) -> impl FnOnce(AuthError) -> AuthError {
        move |source| AuthError::Step {
            step,
            source: Box::new(source),
        }
    }

    /// The originating error, with every `Step`/`Append` wrapper removed
    pub fn root_cause(&self) -> &AuthError {
        match self {
            AuthError::Step { source, .. } | AuthError::Append { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }

    /// Whether the failure came from key material the caller supplied
    pub fn is_key_format(&self) -> bool {
        matches!(self.root_cause(), AuthError::KeyFormat(_))
    }
}
