use std::sync::Arc;

use chrono::Duration;

use super::identity::IdentityResolver;
use crate::models::user::User;
use crate::store::{CredentialStore, StoreResult};

/// Tokens older than this are treated as expired and purged on next use.
pub const TOKEN_RETENTION_DAYS: i64 = 2;

/// Resolves a presented token hash back to its owning user, enforcing the
/// retention window. Expiry is eager: an expired token is deleted the first
/// time it is seen after expiry, not by a background sweep.
#[derive(Clone)]
pub struct TokenValidator {
    store: Arc<dyn CredentialStore>,
    identity: IdentityResolver,
}

impl TokenValidator {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let identity = IdentityResolver::new(store.clone());
        Self { store, identity }
    }

    /// `Ok(None)` covers unknown and expired tokens alike; callers treat
    /// both as unauthorized without distinguishing them outwardly.
    ///
    /// Pure read except on the expiry path, where the stale record is
    /// destroyed. Safe to race: a concurrent deletion of an already-absent
    /// token is a no-op.
    pub async fn validate(&self, token_hash: &str) -> StoreResult<Option<User>> {
        let token = match self.store.get_token(token_hash).await? {
            Some(token) => token,
            None => return Ok(None),
        };

        let age = chrono::Utc::now() - token.created_at;
        if age >= Duration::days(TOKEN_RETENTION_DAYS) {
            self.store.delete_token(&token.hash).await?;
            tracing::debug!(user_id = %token.user_id, "purged expired token");
            return Ok(None);
        }

        self.identity.resolve_by_id(token.user_id).await
    }
}
