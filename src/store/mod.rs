pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::project::Project;
use crate::models::token::Token;
use crate::models::user::User;

/// Failures of the backing store itself (connectivity, timeouts). "Not
/// found" is a domain outcome, expressed as `Ok(None)`, never as an error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Narrow data-access boundary over persisted tokens and identity records.
///
/// The gateway owns no durable state. Each method is a single atomic
/// operation against external storage; implementations must be safe to call
/// concurrently and must not require the caller to hold any lock across the
/// await.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get_token(&self, hash: &str) -> StoreResult<Option<Token>>;

    /// Persists a freshly minted token. Hashes are caller-generated and
    /// assumed unique.
    async fn create_token(&self, token: Token) -> StoreResult<Token>;

    /// Idempotent: deleting an absent token is a no-op, not an error.
    async fn delete_token(&self, hash: &str) -> StoreResult<()>;

    async fn get_user_by_access_key(&self, key: &str) -> StoreResult<Option<User>>;

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Projects the user is a member of, in stable store order. Callers rely
    /// on the ordering being deterministic across calls.
    async fn get_accessible_projects(&self, user: &User) -> StoreResult<Vec<Project>>;

    async fn is_admin(&self, user: &User) -> StoreResult<bool>;

    async fn is_member(&self, user: &User, project: &Project) -> StoreResult<bool>;
}
