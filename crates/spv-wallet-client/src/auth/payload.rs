/*
[INPUT]:  Signing key material and the outgoing request body
[OUTPUT]: AuthPayload (identity, body hash, nonce, timestamp, signature)
[POS]:    Auth layer - canonical message construction and signing
[UPDATE]: When the server changes the signed message layout
*/

use bitcoin::bip32::Xpriv;
use bitcoin::secp256k1::SecretKey;
use chrono::Utc;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use super::derive::derive_child_key;
use super::keys::{ExtendedKey, compressed_public_key_hex};
use super::signer::MessageSigner;
use super::AuthError;

/// Random bytes per nonce
pub const NONCE_LEN: usize = 32;

/// Public identity a payload is signed under
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthIdentity {
    /// Master extended public key (xpriv-signed mode)
    XPub(String),
    /// Hex compressed public key of the access key
    AccessKey(String),
}

/// Header values for one signed request.
///
/// Built fresh for every request and dropped once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPayload {
    pub identity: AuthIdentity,
    pub auth_hash: String,
    pub auth_nonce: String,
    pub auth_time: i64,
    pub signature: String,
}

/// Fresh 32-byte nonce from the OS random source, hex encoded
pub fn generate_nonce() -> Result<String, AuthError> {
    let mut bytes = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AuthError::Randomness(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// Lowercase hex SHA-256 of the body; the empty body still hashes
pub fn hash_body(body: &[u8]) -> String {
    hex::encode(Sha256::digest(body))
}

/// Message signed in access-key mode
pub fn access_key_message(public_key_hex: &str, hash: &str, nonce: &str, time: i64) -> String {
    format!("{public_key_hex}{hash}{nonce}{time}")
}

/// Message signed in xpriv mode; `xpub` is the master's, never the child's
pub fn xpub_message(xpub: &str, hash: &str, nonce: &str, time: i64) -> String {
    format!("{xpub}{hash}{nonce}{time}")
}

/// Assembles an [`AuthPayload`] for a single request body.
///
/// Nonce and timestamp are generated at build time; only unit tests may pin
/// them to reproduce known vectors.
#[derive(Debug, Clone, Default)]
pub struct AuthPayloadBuilder<'a> {
    body: &'a [u8],
    nonce: Option<String>,
    timestamp_millis: Option<i64>,
}

impl<'a> AuthPayloadBuilder<'a> {
    pub fn new(body: &'a [u8]) -> Self {
        Self {
            body,
            nonce: None,
            timestamp_millis: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    #[cfg(test)]
    pub(crate) fn with_timestamp_millis(mut self, timestamp_millis: i64) -> Self {
        self.timestamp_millis = Some(timestamp_millis);
        self
    }

    fn nonce(&self) -> Result<String, AuthError> {
        match &self.nonce {
            Some(nonce) => Ok(nonce.clone()),
            None => generate_nonce().map_err(AuthError::step("generate nonce")),
        }
    }

    fn timestamp_millis(&self) -> i64 {
        self.timestamp_millis
            .unwrap_or_else(|| Utc::now().timestamp_millis())
    }

    /// Sign with a standalone access key
    pub fn build_for_access_key(&self, access_key: &SecretKey) -> Result<AuthPayload, AuthError> {
        let nonce = self.nonce()?;
        let hash = hash_body(self.body);
        let time = self.timestamp_millis();
        let public_key_hex = compressed_public_key_hex(access_key);

        let message = access_key_message(&public_key_hex, &hash, &nonce, time);
        let signature = MessageSigner::new(*access_key)
            .sign_base64(&message)
            .map_err(AuthError::step("sign message"))?;

        Ok(AuthPayload {
            identity: AuthIdentity::AccessKey(public_key_hex),
            auth_hash: hash,
            auth_nonce: nonce,
            auth_time: time,
            signature,
        })
    }

    /// Sign with the child of `master` addressed by the nonce.
    ///
    /// Fails with a derivation error when `master` is public-only.
    pub fn build_for_extended_key(&self, master: &ExtendedKey) -> Result<AuthPayload, AuthError> {
        let xpriv = master.xpriv().map_err(AuthError::step("derive child key"))?;
        self.build_for_xpriv(xpriv)
    }

    pub fn build_for_xpriv(&self, master: &Xpriv) -> Result<AuthPayload, AuthError> {
        let master = ExtendedKey::Private(*master);
        let xpub = master.serialize_xpub();
        let nonce = self.nonce()?;
        let child = derive_child_key(&master, &nonce).map_err(AuthError::step("derive child key"))?;

        let hash = hash_body(self.body);
        let time = self.timestamp_millis();
        let message = xpub_message(&xpub, &hash, &nonce, time);
        let signature = MessageSigner::new(child.private_key)
            .sign_base64(&message)
            .map_err(AuthError::step("sign message"))?;

        Ok(AuthPayload {
            identity: AuthIdentity::XPub(xpub),
            auth_hash: hash,
            auth_nonce: nonce,
            auth_time: time,
            signature,
        })
    }
}
