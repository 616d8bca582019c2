use std::sync::Arc;

use uuid::Uuid;

use crate::models::project::Project;
use crate::models::user::User;
use crate::store::{CredentialStore, StoreResult};

/// Read-only identity lookups over the injected store. Resolves who a
/// credential or token belongs to and what standing they have; no side
/// effects on any path.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn CredentialStore>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// `None` means "user unknown" — a domain outcome the caller must
    /// handle, not an internal error.
    pub async fn resolve_by_access_key(&self, key: &str) -> StoreResult<Option<User>> {
        self.store.get_user_by_access_key(key).await
    }

    /// The caller normally already holds a valid reference; `None` covers
    /// the identity record vanishing out from under an outstanding token.
    pub async fn resolve_by_id(&self, user_id: Uuid) -> StoreResult<Option<User>> {
        self.store.get_user(user_id).await
    }

    pub async fn is_admin(&self, user: &User) -> StoreResult<bool> {
        self.store.is_admin(user).await
    }

    pub async fn is_member(&self, user: &User, project: &Project) -> StoreResult<bool> {
        self.store.is_member(user, project).await
    }
}
