use std::sync::Arc;

use super::identity::IdentityResolver;
use crate::models::project::Project;
use crate::models::user::User;
use crate::store::{CredentialStore, StoreResult};

/// Pass/deny decision for a resolved user against a selected account.
///
/// Deliberately coarse: admin status or membership in the selected account
/// is sufficient; there is no per-action scoping.
#[derive(Clone)]
pub struct AuthorizationGate {
    identity: IdentityResolver,
}

impl AuthorizationGate {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            identity: IdentityResolver::new(store),
        }
    }

    pub async fn authorize(&self, user: &User, account: &Project) -> StoreResult<bool> {
        if self.identity.is_admin(user).await? {
            return Ok(true);
        }
        self.identity.is_member(user, account).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{project, user, MemoryStore};

    #[tokio::test]
    async fn admin_is_authorized_without_membership() {
        let store = Arc::new(MemoryStore::new());
        let root = user("root", "RK", true);
        store.add_user(root.clone());
        let p = project("p1", []);
        store.add_project(p.clone());

        let gate = AuthorizationGate::new(store);
        assert!(gate.authorize(&root, &p).await.unwrap());
    }

    #[tokio::test]
    async fn member_is_authorized() {
        let store = Arc::new(MemoryStore::new());
        let alice = user("alice", "K", false);
        store.add_user(alice.clone());
        let p = project("p1", [alice.id]);
        store.add_project(p.clone());

        let gate = AuthorizationGate::new(store);
        assert!(gate.authorize(&alice, &p).await.unwrap());
    }

    #[tokio::test]
    async fn non_member_non_admin_is_denied() {
        let store = Arc::new(MemoryStore::new());
        let alice = user("alice", "K", false);
        store.add_user(alice.clone());
        let p = project("p1", []);
        store.add_project(p.clone());

        let gate = AuthorizationGate::new(store);
        assert!(!gate.authorize(&alice, &p).await.unwrap());
    }
}
