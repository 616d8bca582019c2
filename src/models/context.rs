use serde::Serialize;

use super::project::Project;
use super::user::User;

/// Identity attached to a request once it clears the gateway. Built fresh
/// per request and threaded to the downstream application through request
/// extensions; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub user: User,
    pub account: Project,
}
