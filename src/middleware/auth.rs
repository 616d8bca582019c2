//! Gateway middleware: the single entry point for every inbound request.
//!
//! Requests without a token go down the issuance path: the reply carries the
//! new token and endpoint URLs as headers, and nothing is forwarded.
//! Requests with a token are validated, authorized against the caller's
//! first accessible account, and forwarded with a `RequestContext` attached.
//! Every denial looks the same on the wire; the reason lives in operator
//! logs only.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::Response;

use crate::app::AppState;
use crate::errors::AuthError;
use crate::models::context::RequestContext;
use crate::models::token::Token;
use crate::store::StoreResult;

pub const AUTH_TOKEN: &str = "x-auth-token";
pub const AUTH_USER: &str = "x-auth-user";
pub const AUTH_KEY: &str = "x-auth-key";
pub const SERVER_MANAGEMENT_URL: &str = "x-server-management-url";
pub const STORAGE_URL: &str = "x-storage-url";
pub const CDN_MANAGEMENT_URL: &str = "x-cdn-management-url";

pub async fn auth_gateway(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token_hash = match header_str(request.headers(), AUTH_TOKEN) {
        Some(hash) => hash.to_string(),
        None => return issue_token(&state, request.headers(), request.uri()).await,
    };

    let budget = state.config.store_timeout();
    let user = match with_timeout(budget, state.validator.validate(&token_hash)).await? {
        Some(user) => user,
        None => {
            // Operator log only; the hash never reaches the response body.
            tracing::warn!(token = %token_hash, "no user could be resolved for token");
            return Err(AuthError::Unauthorized);
        }
    };

    let accounts = with_timeout(budget, state.store.get_accessible_projects(&user)).await?;
    // First accessible account in store order. Arbitrary but deterministic;
    // a real multi-account selection mechanism is still pending.
    let account = match accounts.into_iter().next() {
        Some(account) => account,
        None => {
            tracing::warn!(user = %user.name, "user has no accessible projects");
            return Err(AuthError::Unauthorized);
        }
    };

    if !with_timeout(budget, state.gate.authorize(&user, &account)).await? {
        tracing::warn!(
            user = %user.name,
            account = %account.name,
            "user must be an admin or a member of the account"
        );
        return Err(AuthError::Unauthorized);
    }

    request.extensions_mut().insert(RequestContext { user, account });
    Ok(next.run(request).await)
}

/// Credential exchange. Only honored against a version root — issuing
/// against arbitrary sub-resources is refused outright, and that refusal is
/// the one denial that explains itself.
async fn issue_token(
    state: &AppState,
    headers: &HeaderMap,
    uri: &Uri,
) -> Result<Response, AuthError> {
    let path = uri.path();
    if !is_version_root(path) {
        tracing::warn!(%path, "credential issuance attempted outside a version root");
        return Err(AuthError::MalformedIssuancePath);
    }

    let (username, key) = match (
        header_str(headers, AUTH_USER),
        header_str(headers, AUTH_KEY),
    ) {
        (Some(username), Some(key)) => (username, key),
        _ => {
            tracing::warn!("issuance request is missing a username or access key header");
            return Err(AuthError::Unauthorized);
        }
    };

    let origin = origin_url(headers, uri);
    let issued = with_timeout(
        state.config.store_timeout(),
        state.issuer.issue(username, key, &origin),
    )
    .await?;

    match issued {
        Some((token, user)) => {
            tracing::debug!(user = %user.name, "successfully authenticated");
            issuance_response(&token)
        }
        None => Err(AuthError::Unauthorized),
    }
}

/// The issuance reply *is* the response: no content, token and endpoint
/// URLs as headers.
fn issuance_response(token: &Token) -> Result<Response, AuthError> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(header::CONTENT_TYPE, "text/plain")
        .header(AUTH_TOKEN, token.hash.as_str())
        .header(SERVER_MANAGEMENT_URL, token.server_management_url.as_str())
        .header(STORAGE_URL, token.storage_url.as_str())
        .header(CDN_MANAGEMENT_URL, token.cdn_management_url.as_str())
        .body(Body::empty())
        .map_err(|e| AuthError::Internal(e.into()))
}

/// Bounds every store-backed call; a hung store yields 503, never a request
/// left hanging.
async fn with_timeout<T, F>(budget: Duration, fut: F) -> Result<T, AuthError>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(AuthError::Store(e)),
        Err(_) => Err(AuthError::StoreTimeout),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// The URL this request was made against, recorded on the token as the
/// service-management endpoint. TLS terminates upstream of the gateway, so
/// the scheme is fixed.
fn origin_url(headers: &HeaderMap, uri: &Uri) -> String {
    let host = header_str(headers, "host").unwrap_or("localhost");
    format!("http://{}{}", host, uri.path())
}

/// Exactly one `v`-prefixed dotted-numeric segment, e.g. `/v1.0` or
/// `/v1.1/`.
fn is_version_root(path: &str) -> bool {
    let segment = path.trim_matches('/');
    if segment.is_empty() || segment.contains('/') {
        return false;
    }
    match segment.strip_prefix('v') {
        Some(rest) => {
            rest.chars().any(|c| c.is_ascii_digit())
                && rest.chars().all(|c| c.is_ascii_digit() || c == '.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::is_version_root;

    #[test]
    fn version_roots_are_accepted() {
        assert!(is_version_root("/v1.0"));
        assert!(is_version_root("/v1.1"));
        assert!(is_version_root("/v2"));
        assert!(is_version_root("/v1.0/"));
    }

    #[test]
    fn sub_resources_and_junk_are_rejected() {
        assert!(!is_version_root("/"));
        assert!(!is_version_root(""));
        assert!(!is_version_root("/v1.0/servers"));
        assert!(!is_version_root("/servers"));
        assert!(!is_version_root("/version"));
        assert!(!is_version_root("/v"));
        // A `v` followed by dots alone is not a version.
        assert!(!is_version_root("/v."));
        assert!(!is_version_root("/v..."));
    }
}
