use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

use super::identity::IdentityResolver;
use crate::models::token::Token;
use crate::models::user::User;
use crate::store::{CredentialStore, StoreResult};

/// Exchanges a verified `(username, access key)` pair for a freshly minted
/// token. Not idempotent: every successful call creates a new, independent
/// token; earlier tokens for the same user stay valid until their own
/// expiry.
#[derive(Clone)]
pub struct TokenIssuer {
    store: Arc<dyn CredentialStore>,
    identity: IdentityResolver,
}

impl TokenIssuer {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let identity = IdentityResolver::new(store.clone());
        Self { store, identity }
    }

    /// Mints and persists a token bound to the resolved user and the
    /// request's origin URL.
    ///
    /// Returns `Ok(None)` when the key resolves to no user, and also when
    /// the key is valid but belongs to someone other than the claimed
    /// username. The two cases are logged differently but look identical to
    /// the caller, so a rejection leaks nothing about why.
    pub async fn issue(
        &self,
        username: &str,
        access_key: &str,
        origin_url: &str,
    ) -> StoreResult<Option<(Token, User)>> {
        let user = match self.identity.resolve_by_access_key(access_key).await? {
            Some(user) => user,
            None => {
                tracing::warn!("no user found for provided access key");
                return Ok(None);
            }
        };

        if user.name != username {
            tracing::warn!(
                claimed = %username,
                "provided access key is valid, but not for the claimed user"
            );
            return Ok(None);
        }

        let token = Token {
            hash: token_hash(username, access_key),
            user_id: user.id,
            created_at: chrono::Utc::now(),
            server_management_url: origin_url.to_string(),
            storage_url: String::new(),
            cdn_management_url: String::new(),
        };
        let token = self.store.create_token(token).await?;
        Ok(Some((token, user)))
    }
}

/// One-way digest seeded by the credentials and a nanosecond clock reading.
/// The clock component keeps concurrent issuances for the same user from
/// colliding without any global sequence.
fn token_hash(username: &str, access_key: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(access_key.as_bytes());
    hasher.update(nanos.to_be_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{user, MemoryStore};

    fn issuer_with(store: Arc<MemoryStore>) -> TokenIssuer {
        TokenIssuer::new(store)
    }

    #[tokio::test]
    async fn issue_binds_token_to_resolved_user() {
        let store = Arc::new(MemoryStore::new());
        let alice = user("alice", "K", false);
        store.add_user(alice.clone());

        let issuer = issuer_with(store.clone());
        let (token, resolved) = issuer
            .issue("alice", "K", "http://gw/v1.0")
            .await
            .unwrap()
            .expect("issuance should succeed");

        assert_eq!(resolved.id, alice.id);
        assert_eq!(token.user_id, alice.id);
        assert_eq!(token.server_management_url, "http://gw/v1.0");
        assert!(token.storage_url.is_empty());
        assert!(token.cdn_management_url.is_empty());

        let stored = store.get_token(&token.hash).await.unwrap().unwrap();
        assert_eq!(stored.user_id, alice.id);
    }

    #[tokio::test]
    async fn unknown_key_yields_no_token() {
        let store = Arc::new(MemoryStore::new());
        let issuer = issuer_with(store);
        assert!(issuer
            .issue("alice", "nope", "http://gw/v1.0")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn valid_key_for_wrong_username_yields_no_token() {
        let store = Arc::new(MemoryStore::new());
        store.add_user(user("alice", "K", false));

        let issuer = issuer_with(store);
        // K is a real key, just not bob's.
        assert!(issuer
            .issue("bob", "K", "http://gw/v1.0")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn concurrent_issuance_produces_distinct_hashes() {
        let store = Arc::new(MemoryStore::new());
        store.add_user(user("alice", "K", false));
        let issuer = issuer_with(store);

        let (a, b) = tokio::join!(
            issuer.issue("alice", "K", "http://gw/v1.0"),
            issuer.issue("alice", "K", "http://gw/v1.0"),
        );
        let (ta, _) = a.unwrap().unwrap();
        let (tb, _) = b.unwrap().unwrap();
        assert_ne!(ta.hash, tb.hash);
    }
}
