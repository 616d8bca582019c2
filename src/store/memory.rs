//! In-memory credential store.
//!
//! Stands in for the externally owned identity/token storage. Identity data
//! (users, projects) is read-only once seeded; tokens are created and
//! destroyed by the gateway at runtime. Seedable from a JSON fixture so the
//! binary can run against a known data set.

use std::collections::HashSet;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use uuid::Uuid;

use super::{CredentialStore, StoreResult};
use crate::models::project::Project;
use crate::models::token::Token;
use crate::models::user::User;

/// JSON seed fixture: the identity data an external store would hold.
#[derive(Debug, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Default)]
pub struct MemoryStore {
    tokens: DashMap<String, Token>,
    users: DashMap<Uuid, User>,
    // Vec, not a map: accessible-project order must be stable store order.
    projects: RwLock<Vec<Project>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: Seed) -> Self {
        let store = Self::new();
        for user in seed.users {
            store.add_user(user);
        }
        for project in seed.projects {
            store.add_project(project);
        }
        store
    }

    pub fn from_seed_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let seed: Seed = serde_json::from_str(&raw)?;
        Ok(Self::from_seed(seed))
    }

    pub fn add_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn add_project(&self, project: Project) {
        self.projects
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(project);
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn read_projects(&self) -> Vec<Project> {
        self.projects
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn get_token(&self, hash: &str) -> StoreResult<Option<Token>> {
        Ok(self.tokens.get(hash).map(|t| t.clone()))
    }

    async fn create_token(&self, token: Token) -> StoreResult<Token> {
        self.tokens.insert(token.hash.clone(), token.clone());
        Ok(token)
    }

    async fn delete_token(&self, hash: &str) -> StoreResult<()> {
        self.tokens.remove(hash);
        Ok(())
    }

    async fn get_user_by_access_key(&self, key: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.access_key == key)
            .map(|u| u.clone()))
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn get_accessible_projects(&self, user: &User) -> StoreResult<Vec<Project>> {
        Ok(self
            .read_projects()
            .into_iter()
            .filter(|p| p.members.contains(&user.id))
            .collect())
    }

    async fn is_admin(&self, user: &User) -> StoreResult<bool> {
        Ok(self
            .users
            .get(&user.id)
            .map(|u| u.is_admin)
            .unwrap_or(false))
    }

    async fn is_member(&self, user: &User, project: &Project) -> StoreResult<bool> {
        Ok(self
            .read_projects()
            .iter()
            .find(|p| p.id == project.id)
            .map(|p| p.members.contains(&user.id))
            .unwrap_or(false))
    }
}

pub fn project(name: &str, members: impl IntoIterator<Item = Uuid>) -> Project {
    Project {
        id: Uuid::new_v4(),
        name: name.to_string(),
        members: members.into_iter().collect::<HashSet<_>>(),
    }
}

pub fn user(name: &str, access_key: &str, is_admin: bool) -> User {
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        access_key: access_key.to_string(),
        is_admin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delete_token_is_idempotent() {
        let store = MemoryStore::new();
        let owner = user("alice", "key", false);
        let token = Token {
            hash: "abc".into(),
            user_id: owner.id,
            created_at: chrono::Utc::now(),
            server_management_url: String::new(),
            storage_url: String::new(),
            cdn_management_url: String::new(),
        };
        store.create_token(token).await.unwrap();

        store.delete_token("abc").await.unwrap();
        assert!(store.get_token("abc").await.unwrap().is_none());
        // Second deletion of an absent token is a no-op.
        store.delete_token("abc").await.unwrap();
    }

    #[tokio::test]
    async fn accessible_projects_preserve_store_order() {
        let store = MemoryStore::new();
        let alice = user("alice", "key", false);
        store.add_user(alice.clone());
        store.add_project(project("first", [alice.id]));
        store.add_project(project("second", [alice.id]));
        store.add_project(project("other", []));

        let projects = store.get_accessible_projects(&alice).await.unwrap();
        let names: Vec<_> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn seed_fixture_parses() {
        let raw = r#"{
            "users": [
                {"id": "4be0c4cd-dc5f-4db8-ac09-4f8615c9bec3",
                 "name": "alice", "access_key": "K", "is_admin": false}
            ],
            "projects": [
                {"id": "c1a46ff6-14b3-44ab-b3cc-7d73c7205d86",
                 "name": "p1",
                 "members": ["4be0c4cd-dc5f-4db8-ac09-4f8615c9bec3"]}
            ]
        }"#;
        let seed: Seed = serde_json::from_str(raw).unwrap();
        let store = MemoryStore::from_seed(seed);
        assert!(!store.is_empty());
    }
}
