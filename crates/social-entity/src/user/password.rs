//! Opaque stored password hash.

use std::fmt;

/// An encoded password hash (PHC string format).
///
/// The raw password never lives in this type; it only exists as a `&str`
/// argument to the hasher. The value is skipped by serde on the owning
/// entity and redacted from `Debug` output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already-encoded hash loaded from storage or produced by the hasher.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// The encoded hash string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether no hash is present (e.g. a principal loaded from the cache).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let hash = PasswordHash::from_encoded("$argon2id$v=19$m=19456,t=2,p=1$abc$def");
        assert_eq!(format!("{hash:?}"), "PasswordHash(<redacted>)");
        assert!(!hash.is_empty());
    }
}
