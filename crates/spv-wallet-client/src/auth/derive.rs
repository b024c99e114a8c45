/*
[INPUT]:  Master extended key and a hex nonce
[OUTPUT]: One-time child key addressed by the nonce
[POS]:    Auth layer - BIP32 child derivation for per-request signing keys
[UPDATE]: Only together with the server's nonce-to-path routine
*/

use bitcoin::bip32::{ChildNumber, DerivationPath, Xpriv, Xpub};

use super::keys::{ExtendedKey, secp};
use super::AuthError;

/// Hex digits consumed per path element
const CHUNK_LEN: usize = 8;

/// Chunk values at or above this are shifted down by it
const INDEX_OFFSET: u32 = 2_147_483_647;

/// Map a hex nonce to the BIP32 path the server recomputes.
///
/// The nonce is cut into 8-digit chunks (the last may be shorter); each chunk
/// is read as a base-16 `u32`, reduced by `2^31 - 1` when it reaches that
/// value, and used as a raw child index. A chunk of `ffffffff` therefore
/// yields index `2^31`, which BIP32 treats as hardened.
pub fn child_numbers_from_hex(nonce: &str) -> Result<Vec<ChildNumber>, AuthError> {
    if nonce.is_empty() {
        return Err(AuthError::Derivation("nonce is empty".to_string()));
    }
    if let Some(bad) = nonce.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(AuthError::Derivation(format!(
            "nonce contains non-hex character {bad:?}"
        )));
    }

    nonce
        .as_bytes()
        .chunks(CHUNK_LEN)
        .map(|chunk| {
            // ASCII hex digits, so the chunk is valid UTF-8
            let digits = std::str::from_utf8(chunk)
                .map_err(|e| AuthError::Derivation(e.to_string()))?;
            let mut index = u32::from_str_radix(digits, 16)
                .map_err(|e| AuthError::Derivation(format!("nonce chunk {digits}: {e}")))?;
            if index >= INDEX_OFFSET {
                index -= INDEX_OFFSET;
            }
            Ok(ChildNumber::from(index))
        })
        .collect()
}

/// Derivation path for a nonce
pub fn path_from_nonce(nonce: &str) -> Result<DerivationPath, AuthError> {
    child_numbers_from_hex(nonce).map(DerivationPath::from)
}

/// Derive the one-time signing key for `nonce` from a private master key.
///
/// Fails when `master` was loaded from an xpub.
pub fn derive_child_key(master: &ExtendedKey, nonce: &str) -> Result<Xpriv, AuthError> {
    let xpriv = master.xpriv()?;
    derive_child_xpriv(xpriv, nonce)
}

pub fn derive_child_xpriv(master: &Xpriv, nonce: &str) -> Result<Xpriv, AuthError> {
    let path = path_from_nonce(nonce)?;
    master
        .derive_priv(secp(), &path)
        .map_err(|e| AuthError::Derivation(e.to_string()))
}

/// Public-side derivation, as performed by the verifying server.
///
/// Fails if the nonce maps to a hardened index.
pub fn derive_child_public_key(master: &Xpub, nonce: &str) -> Result<Xpub, AuthError> {
    let path = path_from_nonce(nonce)?;
    master
        .derive_pub(secp(), &path)
        .map_err(|e| AuthError::Derivation(e.to_string()))
}
