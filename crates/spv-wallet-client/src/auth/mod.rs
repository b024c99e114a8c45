/*
[INPUT]:  Key material (xpriv, xpub, access key) and request bodies
[OUTPUT]: Signed x-auth-* headers, typed keys and auth errors
[POS]:    Auth layer - client-side request authentication for the wallet API
[UPDATE]: When auth modes, key encodings or signed message layout change
*/

pub mod derive;
pub mod error;
pub mod headers;
pub mod keys;
pub mod payload;
pub mod signer;

pub use derive::{child_numbers_from_hex, derive_child_key, derive_child_public_key};
pub use error::AuthError;
pub use headers::{
    AUTH_ACCESS_KEY, AUTH_HEADER, AUTH_HEADER_HASH, AUTH_HEADER_NONCE, AUTH_HEADER_TIME,
    AUTH_SIGNATURE, AuthHeaders, AuthMode,
};
pub use keys::{ExtendedKey, compressed_public_key_hex, parse_private_key};
pub use payload::{AuthIdentity, AuthPayload, AuthPayloadBuilder, generate_nonce, hash_body};
pub use signer::{MessageSigner, verify_message};
