// src/domain/pkce.rs
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};

/// The only supported challenge method. Anything else is rejected at
/// exchange time; authorization stores the declared method verbatim.
pub const METHOD_S256: &str = "S256";

/// RFC 7636 S256: base64url-encode (no padding) the SHA-256 of the verifier.
pub fn compute_challenge(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

/// Recompute the challenge from the presented verifier and compare against
/// the stored challenge byte for byte.
pub fn verifier_matches(challenge: &str, verifier: &str) -> bool {
    compute_challenge(verifier) == challenge
}
