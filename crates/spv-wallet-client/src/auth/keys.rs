/*
[INPUT]:  User-supplied key strings (xprv, xpub, WIF, raw hex)
[OUTPUT]: Typed secp256k1 / BIP32 key objects
[POS]:    Auth layer - key material parsing
[UPDATE]: When supporting a new key encoding
*/

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use bitcoin::bip32::{Xpriv, Xpub};
use bitcoin::secp256k1::{All, PublicKey, Secp256k1, SecretKey};

use super::AuthError;

static SECP: LazyLock<Secp256k1<All>> = LazyLock::new(Secp256k1::new);

/// Process-wide secp256k1 context; read-only after first use
pub(crate) fn secp() -> &'static Secp256k1<All> {
    &SECP
}

/// BIP32 extended key that may or may not carry private material
#[derive(Clone, PartialEq, Eq)]
pub enum ExtendedKey {
    Private(Xpriv),
    Public(Xpub),
}

impl ExtendedKey {
    /// Parse a serialized extended private key (`xprv...` / `tprv...`)
    pub fn from_xpriv(s: &str) -> Result<Self, AuthError> {
        Xpriv::from_str(s.trim())
            .map(ExtendedKey::Private)
            .map_err(|e| AuthError::KeyFormat(format!("extended private key: {e}")))
    }

    /// Parse a serialized extended public key (`xpub...` / `tpub...`)
    pub fn from_xpub(s: &str) -> Result<Self, AuthError> {
        Xpub::from_str(s.trim())
            .map(ExtendedKey::Public)
            .map_err(|e| AuthError::KeyFormat(format!("extended public key: {e}")))
    }

    pub fn is_private(&self) -> bool {
        matches!(self, ExtendedKey::Private(_))
    }

    /// Private half of the key.
    ///
    /// A key loaded from an xpub has none; this is a derivation error rather
    /// than a silent fallback to public derivation.
    pub fn xpriv(&self) -> Result<&Xpriv, AuthError> {
        match self {
            ExtendedKey::Private(xpriv) => Ok(xpriv),
            ExtendedKey::Public(_) => Err(AuthError::Derivation(
                "extended key has no private key material".to_string(),
            )),
        }
    }

    pub fn xpub(&self) -> Xpub {
        match self {
            ExtendedKey::Private(xpriv) => Xpub::from_priv(secp(), xpriv),
            ExtendedKey::Public(xpub) => *xpub,
        }
    }

    /// Base58check serialization of the public half
    pub fn serialize_xpub(&self) -> String {
        self.xpub().to_string()
    }
}

// Keeps private material out of logs and panic messages.
impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtendedKey::Private(_) => write!(f, "ExtendedKey::Private({})", self.serialize_xpub()),
            ExtendedKey::Public(xpub) => write!(f, "ExtendedKey::Public({xpub})"),
        }
    }
}

impl FromStr for ExtendedKey {
    type Err = AuthError;

    /// Accepts either serialization; private keys are tried first
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_xpriv(s).or_else(|priv_err| {
            Self::from_xpub(s).map_err(|pub_err| {
                AuthError::KeyFormat(format!("{priv_err}; {pub_err}"))
            })
        })
    }
}

/// Decode a private key given as WIF or as 32-byte hex.
///
/// WIF is attempted first. When both decodings fail, both reasons are
/// reported so the caller can tell which encoding went wrong.
pub fn parse_private_key(s: &str) -> Result<SecretKey, AuthError> {
    let s = s.trim();
    let wif_err = match bitcoin::PrivateKey::from_wif(s) {
        Ok(key) => return Ok(key.inner),
        Err(e) => e.to_string(),
    };

    let hex_err = match hex::decode(s) {
        Ok(bytes) => match SecretKey::from_slice(&bytes) {
            Ok(key) => return Ok(key),
            Err(e) => format!("{e} ({} bytes)", bytes.len()),
        },
        Err(e) => e.to_string(),
    };

    Err(AuthError::KeyFormat(format!(
        "not a WIF key: {wif_err}; not a hex key: {hex_err}"
    )))
}

/// Hex of the 33-byte compressed SEC1 public key
pub fn compressed_public_key_hex(key: &SecretKey) -> String {
    hex::encode(PublicKey::from_secret_key(secp(), key).serialize())
}
