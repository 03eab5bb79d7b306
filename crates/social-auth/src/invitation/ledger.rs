//! Invitation ledger: hashed-token to principal to expiry.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use social_core::result::AppResult;
use social_database::UserStore;
use social_entity::{NewUser, User};

use crate::token::TokenCodec;

/// Creates principals together with their invitation and consumes
/// invitations on activation. Raw tokens are hashed before they reach the store.
#[derive(Clone)]
pub struct InvitationLedger {
    users: Arc<dyn UserStore>,
}

impl std::fmt::Debug for InvitationLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvitationLedger").finish_non_exhaustive()
    }
}

impl InvitationLedger {
    /// Creates a ledger over the given user store.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Insert an inactive principal and an invitation expiring after `ttl`,
    /// both or neither.
    pub async fn create_with_invitation(
        &self,
        draft: &NewUser,
        raw_token: &str,
        ttl: Duration,
    ) -> AppResult<User> {
        let lookup_hash = TokenCodec::hash_for_lookup(raw_token);
        let user = self
            .users
            .create_with_invitation(draft, &lookup_hash, ttl)
            .await?;
        info!(user_id = user.id, ttl_secs = ttl.as_secs(), "Invitation created");
        Ok(user)
    }

    /// Consume the invitation behind `raw_token` and activate its principal.
    ///
    /// Unknown, expired, and already-consumed tokens all fail with `NotFound`.
    pub async fn activate(&self, raw_token: &str) -> AppResult<()> {
        let lookup_hash = TokenCodec::hash_for_lookup(raw_token);
        self.users.activate(&lookup_hash).await
    }

    /// Remove a principal and its invitation after a failed registration side effect.
    pub async fn revoke(&self, user_id: i64) -> AppResult<()> {
        self.users.delete(user_id).await.inspect_err(|e| {
            warn!(user_id, error = %e, "Failed to revoke registration");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use social_core::error::{ConflictReason, ErrorKind};
    use social_database::MemoryStore;
    use social_entity::PasswordHash;

    const TTL: Duration = Duration::from_secs(300);

    fn draft(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: PasswordHash::from_encoded("hash"),
            role: "user".to_string(),
        }
    }

    fn ledger() -> (MemoryStore, InvitationLedger) {
        let store = MemoryStore::new();
        let ledger = InvitationLedger::new(store.storage().users);
        (store, ledger)
    }

    #[tokio::test]
    async fn test_raw_token_is_never_stored() {
        let (store, ledger) = ledger();
        let token = TokenCodec::generate();
        ledger
            .create_with_invitation(&draft("alice", "alice@x.com"), &token.raw, TTL)
            .await
            .unwrap();

        let keys = store.invitation_keys().await;
        assert_eq!(keys, vec![token.lookup_hash.clone()]);
        assert!(!keys.contains(&token.raw));
    }

    #[tokio::test]
    async fn test_activation_is_single_use() {
        let (_, ledger) = ledger();
        let token = TokenCodec::generate();
        ledger
            .create_with_invitation(&draft("alice", "alice@x.com"), &token.raw, TTL)
            .await
            .unwrap();

        ledger.activate(&token.raw).await.unwrap();
        let err = ledger.activate(&token.raw).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_expired_and_unknown_tokens_look_alike() {
        let (_, ledger) = ledger();
        let token = TokenCodec::generate();
        ledger
            .create_with_invitation(&draft("alice", "alice@x.com"), &token.raw, Duration::ZERO)
            .await
            .unwrap();

        let expired = ledger.activate(&token.raw).await.unwrap_err();
        let unknown = ledger.activate("never-issued").await.unwrap_err();
        assert_eq!(expired.kind, ErrorKind::NotFound);
        assert_eq!(unknown.kind, ErrorKind::NotFound);
        assert_eq!(expired.message, unknown.message);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_named() {
        let (_, ledger) = ledger();
        ledger
            .create_with_invitation(&draft("alice", "alice@x.com"), "t1", TTL)
            .await
            .unwrap();
        let err = ledger
            .create_with_invitation(&draft("alice", "other@x.com"), "t2", TTL)
            .await
            .unwrap_err();
        assert!(err.is_conflict(ConflictReason::DuplicateUsername));
    }

    #[tokio::test]
    async fn test_revoke_makes_token_unusable() {
        let (_, ledger) = ledger();
        let user = ledger
            .create_with_invitation(&draft("alice", "alice@x.com"), "t1", TTL)
            .await
            .unwrap();
        ledger.revoke(user.id).await.unwrap();
        assert_eq!(
            ledger.activate("t1").await.unwrap_err().kind,
            ErrorKind::NotFound
        );
    }
}
