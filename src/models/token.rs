use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A minted bearer token. The hash is the token's identity: globally unique
/// and immutable once created.
///
/// Storage and CDN URLs are carried for wire compatibility; this gateway
/// issues them as empty placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub hash: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub server_management_url: String,
    pub storage_url: String,
    pub cdn_management_url: String,
}
