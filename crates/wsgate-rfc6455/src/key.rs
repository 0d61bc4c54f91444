//! Client key generation and accept-key derivation

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::RngCore;
use sha1::{Digest, Sha1};
use wsgate::HandshakeError;

/// GUID appended to the client key before hashing (RFC 6455 §4.2.2).
const GUID: &str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// Nonce length before encoding (RFC 6455 §4.1).
const NONCE_LEN: usize = 16;

/// Generate a fresh `Sec-WebSocket-Key`: 16 random bytes, base64-encoded.
///
/// Entropy failure is fatal and propagated; keys are never reused.
pub(crate) fn generate() -> Result<String, HandshakeError> {
    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng()
        .try_fill_bytes(&mut nonce)
        .map_err(|e| HandshakeError::key_generation(e.to_string()))?;
    Ok(STANDARD.encode(nonce))
}

/// True if `key` is base64 for exactly 16 bytes.
pub(crate) fn is_well_formed(key: &str) -> bool {
    STANDARD
        .decode(key)
        .map(|nonce| nonce.len() == NONCE_LEN)
        .unwrap_or(false)
}

/// Derive the `Sec-WebSocket-Accept` value for a client key.
pub(crate) fn accept(key: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(key.as_bytes());
    hasher.update(GUID.as_bytes());
    STANDARD.encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_matches_rfc_6455_vector() {
        // Example from RFC 6455 §1.3
        let derived = accept("dGhlIHNhbXBsZSBub25jZQ==");
        assert_eq!(derived, "s3pPLMBiTxaQ9kYGzzhZRbK+xOo=");
    }

    #[test]
    fn generated_keys_are_well_formed() {
        let key = generate().unwrap();
        assert_eq!(key.len(), 24);
        assert!(is_well_formed(&key));
    }

    #[test]
    fn generated_keys_are_fresh() {
        assert_ne!(generate().unwrap(), generate().unwrap());
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("not base64!!"));
        // Valid base64, wrong decoded length.
        assert!(!is_well_formed("c2hvcnQ="));
    }
}
