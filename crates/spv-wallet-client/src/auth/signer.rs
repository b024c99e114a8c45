/*
[INPUT]:  Message text and a secp256k1 private key
[OUTPUT]: Bitcoin Signed Message signatures (65-byte compact, recoverable)
[POS]:    Auth layer - cryptographic signing for request authentication
[UPDATE]: When changing signing algorithm or signature encoding
*/

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use bitcoin::hashes::Hash as _;
use bitcoin::secp256k1::{Message, PublicKey, SecretKey};
use bitcoin::sign_message::{MessageSignature, signed_msg_hash};

use super::keys::secp;
use super::AuthError;

/// Length of a serialized compact recoverable signature
pub const SIGNATURE_LEN: usize = 65;

/// Signs messages with the "Bitcoin Signed Message" convention
pub struct MessageSigner {
    secret_key: SecretKey,
}

impl MessageSigner {
    pub fn new(secret_key: SecretKey) -> Self {
        Self { secret_key }
    }

    /// Sign a message and return the 65-byte compact signature.
    ///
    /// The digest is double SHA-256 over the magic prefix, the varint
    /// message length and the message. The recovered key is checked
    /// against ours before the signature is handed out.
    pub fn sign(&self, message: &str) -> Result<[u8; SIGNATURE_LEN], AuthError> {
        let digest = signed_msg_hash(message);
        let msg = Message::from_digest(digest.to_byte_array());
        let recoverable = secp().sign_ecdsa_recoverable(&msg, &self.secret_key);
        let signature = MessageSignature::new(recoverable, true);

        let recovered = signature
            .recover_pubkey(secp(), digest)
            .map_err(|e| AuthError::Signing(e.to_string()))?;
        if recovered.inner != self.public_key() {
            return Err(AuthError::Signing(
                "signature does not recover to the signing key".to_string(),
            ));
        }

        Ok(signature.serialize())
    }

    /// Sign and base64-encode (standard alphabet, padded)
    pub fn sign_base64(&self, message: &str) -> Result<String, AuthError> {
        self.sign(message).map(|sig| BASE64.encode(sig))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_secret_key(secp(), &self.secret_key)
    }

    pub fn verify(&self, message: &str, signature_base64: &str) -> bool {
        verify_message(&self.public_key(), message, signature_base64)
    }
}

impl std::fmt::Debug for MessageSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageSigner")
            .field("public_key", &self.public_key())
            .finish()
    }
}

/// Check a base64 Bitcoin Signed Message signature against a public key
pub fn verify_message(public_key: &PublicKey, message: &str, signature_base64: &str) -> bool {
    let Ok(bytes) = BASE64.decode(signature_base64) else {
        return false;
    };
    let Ok(signature) = MessageSignature::from_slice(&bytes) else {
        return false;
    };

    signature
        .recover_pubkey(secp(), signed_msg_hash(message))
        .map(|recovered| recovered.inner == *public_key)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::keys::parse_private_key;

    fn signer(hex_key: &str) -> MessageSigner {
        MessageSigner::new(parse_private_key(hex_key).unwrap())
    }

    #[test]
    fn test_sign_and_verify() {
        let signer = signer(&"11".repeat(32));
        let signature = signer.sign_base64("test message").unwrap();
        assert!(signer.verify("test message", &signature));
    }

    #[test]
    fn test_signature_layout() {
        let signer = signer(&"22".repeat(32));
        let signature = signer.sign("hello").unwrap();
        assert_eq!(signature.len(), SIGNATURE_LEN);
        // compressed-key header bytes are 31..=34
        assert!((31..=34).contains(&signature[0]));

        let encoded = signer.sign_base64("hello").unwrap();
        assert_eq!(BASE64.decode(&encoded).unwrap().len(), SIGNATURE_LEN);
    }

    #[test]
    fn test_verification_fails_for_other_key() {
        let alice = signer(&"11".repeat(32));
        let bob = signer(&"22".repeat(32));
        let signature = alice.sign_base64("payload").unwrap();

        assert!(!verify_message(&bob.public_key(), "payload", &signature));
        assert!(verify_message(&alice.public_key(), "payload", &signature));
    }

    #[test]
    fn test_verification_fails_for_altered_message() {
        let signer = signer(&"33".repeat(32));
        let signature = signer.sign_base64("amount=1").unwrap();
        assert!(!signer.verify("amount=2", &signature));
    }

    #[test]
    fn test_garbage_signature_does_not_verify() {
        let signer = signer(&"44".repeat(32));
        assert!(!signer.verify("msg", "not base64!"));
        assert!(!signer.verify("msg", &BASE64.encode([0u8; 10])));
    }

    #[test]
    fn test_empty_message_is_signable() {
        let signer = signer(&"55".repeat(32));
        let signature = signer.sign_base64("").unwrap();
        assert!(signer.verify("", &signature));
    }
}
