use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A principal owned by the external identity store. The gateway only ever
/// reads users; it never creates or mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Long-lived secret credential, exchanged once for a token.
    #[serde(skip_serializing)]
    pub access_key: String,
    #[serde(default)]
    pub is_admin: bool,
}
