//! Random token generation and lookup hashing.
//!
//! The raw token travels only to the end user. Storage sees the hex SHA-256
//! of it and nothing else.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

/// Number of random bytes behind each token.
const TOKEN_BYTES: usize = 32;

/// A freshly generated token and its storage key.
#[derive(Clone)]
pub struct ActivationToken {
    /// URL-safe token handed to the user.
    pub raw: String,
    /// Hex SHA-256 of `raw`.
    pub lookup_hash: String,
}

impl fmt::Debug for ActivationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivationToken")
            .field("raw", &"<redacted>")
            .field("lookup_hash", &self.lookup_hash)
            .finish()
    }
}

/// Generates and hashes activation tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenCodec;

impl TokenCodec {
    /// Generate a new token from the thread-local CSPRNG (seeded from the OS).
    pub fn generate() -> ActivationToken {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::fill(&mut bytes[..]);
        let raw = URL_SAFE_NO_PAD.encode(bytes);
        let lookup_hash = Self::hash_for_lookup(&raw);
        ActivationToken { raw, lookup_hash }
    }

    /// Deterministic storage key for a raw token.
    pub fn hash_for_lookup(raw: &str) -> String {
        hex::encode(Sha256::digest(raw.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let token = TokenCodec::generate();
        assert_eq!(TokenCodec::hash_for_lookup(&token.raw), token.lookup_hash);
        assert_eq!(token.lookup_hash.len(), 64);
        assert_ne!(token.lookup_hash, token.raw);
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            TokenCodec::hash_for_lookup("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_tokens_are_url_safe_and_distinct() {
        let mut seen = HashSet::new();
        for _ in 0..256 {
            let token = TokenCodec::generate();
            assert_eq!(token.raw.len(), 43);
            assert!(
                token
                    .raw
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            );
            assert!(seen.insert(token.lookup_hash));
        }
    }

    #[test]
    fn test_debug_hides_raw() {
        let token = TokenCodec::generate();
        assert!(!format!("{token:?}").contains(&token.raw));
    }
}
