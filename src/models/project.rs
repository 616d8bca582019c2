use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authorization scope. Membership is a set; an admin user is implicitly
/// authorized for every project regardless of membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub members: HashSet<Uuid>,
}
