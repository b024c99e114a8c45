/*
[INPUT]:  Configured credential and the outgoing request body
[OUTPUT]: x-auth-* request headers for the selected auth mode
[POS]:    Auth layer - mode dispatch consumed by the HTTP transport
[UPDATE]: When header names or mode precedence change
*/

use std::fmt;

use bitcoin::bip32::{Xpriv, Xpub};
use bitcoin::secp256k1::SecretKey;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::keys::{ExtendedKey, parse_private_key};
use super::payload::{AuthIdentity, AuthPayload, AuthPayloadBuilder};
use super::AuthError;
use crate::config::Credential;

/// Extended public key identity (xpriv-signed and xpub-only modes)
pub const AUTH_HEADER: &str = "x-auth-xpub";
/// Access-key public identity
pub const AUTH_ACCESS_KEY: &str = "x-auth-key";
pub const AUTH_HEADER_HASH: &str = "x-auth-hash";
pub const AUTH_HEADER_NONCE: &str = "x-auth-nonce";
/// Milliseconds since epoch, decimal
pub const AUTH_HEADER_TIME: &str = "x-auth-time";
/// Base64 Bitcoin Signed Message signature
pub const AUTH_SIGNATURE: &str = "x-auth-signature";

/// Authentication mode a client was configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    NoAuth,
    PublicKeyOnly,
    SignedWithDerivedKey,
    SignedWithAccessKey,
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthMode::NoAuth => "no-auth",
            AuthMode::PublicKeyOnly => "xpub-only",
            AuthMode::SignedWithDerivedKey => "xpriv-signed",
            AuthMode::SignedWithAccessKey => "access-key-signed",
        };
        f.write_str(name)
    }
}

/// Auth header appender, one variant per mode.
///
/// Chosen once when the client is built and never mutated afterwards, so a
/// shared reference can serve concurrent requests; every call to
/// [`AuthHeaders::append`] keeps its nonce, hash and signature local.
#[derive(Clone, Default)]
pub enum AuthHeaders {
    #[default]
    NoAuth,
    PublicKeyOnly(Xpub),
    AccessKeySigned(SecretKey),
    ExtendedKeySigned(Xpriv),
}

impl AuthHeaders {
    /// Parse a credential into the matching appender
    pub fn from_credential(credential: Option<&Credential>) -> Result<Self, AuthError> {
        let Some(credential) = credential else {
            return Ok(AuthHeaders::NoAuth);
        };

        match credential {
            Credential::AccessKey(key) => parse_private_key(key).map(AuthHeaders::AccessKeySigned),
            Credential::XPriv(xpriv) => {
                let key = ExtendedKey::from_xpriv(xpriv)?;
                Ok(AuthHeaders::ExtendedKeySigned(*key.xpriv()?))
            }
            Credential::XPub(xpub) => Ok(AuthHeaders::PublicKeyOnly(
                ExtendedKey::from_xpub(xpub)?.xpub(),
            )),
        }
    }

    pub fn mode(&self) -> AuthMode {
        match self {
            AuthHeaders::NoAuth => AuthMode::NoAuth,
            AuthHeaders::PublicKeyOnly(_) => AuthMode::PublicKeyOnly,
            AuthHeaders::AccessKeySigned(_) => AuthMode::SignedWithAccessKey,
            AuthHeaders::ExtendedKeySigned(_) => AuthMode::SignedWithDerivedKey,
        }
    }

    /// Write the auth headers for `body` into `headers`.
    ///
    /// On error `headers` is left untouched and the request must not be sent.
    pub fn append(&self, headers: &mut HeaderMap, body: &[u8]) -> Result<(), AuthError> {
        let values = self.header_values(body).map_err(|source| AuthError::Append {
            mode: self.mode(),
            source: Box::new(source),
        })?;

        for (name, value) in values {
            headers.insert(name, value);
        }
        Ok(())
    }

    fn header_values(&self, body: &[u8]) -> Result<Vec<(HeaderName, HeaderValue)>, AuthError> {
        match self {
            AuthHeaders::NoAuth => Ok(Vec::new()),
            AuthHeaders::PublicKeyOnly(xpub) => {
                Ok(vec![header(AUTH_HEADER, &xpub.to_string())?])
            }
            AuthHeaders::AccessKeySigned(key) => {
                let payload = AuthPayloadBuilder::new(body)
                    .build_for_access_key(key)
                    .map_err(AuthError::step("build access key payload"))?;
                payload_headers(&payload)
            }
            AuthHeaders::ExtendedKeySigned(xpriv) => {
                let payload = AuthPayloadBuilder::new(body)
                    .build_for_xpriv(xpriv)
                    .map_err(AuthError::step("build xpriv payload"))?;
                payload_headers(&payload)
            }
        }
    }
}

impl fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthHeaders({})", self.mode())
    }
}

fn payload_headers(payload: &AuthPayload) -> Result<Vec<(HeaderName, HeaderValue)>, AuthError> {
    let identity = match &payload.identity {
        AuthIdentity::XPub(xpub) => header(AUTH_HEADER, xpub)?,
        AuthIdentity::AccessKey(key) => header(AUTH_ACCESS_KEY, key)?,
    };

    Ok(vec![
        identity,
        header(AUTH_HEADER_HASH, &payload.auth_hash)?,
        header(AUTH_HEADER_NONCE, &payload.auth_nonce)?,
        header(AUTH_HEADER_TIME, &payload.auth_time.to_string())?,
        header(AUTH_SIGNATURE, &payload.signature)?,
    ])
}

fn header(name: &'static str, value: &str) -> Result<(HeaderName, HeaderValue), AuthError> {
    let value = HeaderValue::from_str(value).map_err(|e| AuthError::Header {
        name,
        message: e.to_string(),
    })?;
    Ok((HeaderName::from_static(name), value))
}
