use std::sync::Arc;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{any, get};
use axum::{Extension, Json, Router};
use tower_http::trace::TraceLayer;

use crate::auth::gate::AuthorizationGate;
use crate::auth::issuer::TokenIssuer;
use crate::auth::validator::TokenValidator;
use crate::config::Config;
use crate::middleware::auth::auth_gateway;
use crate::models::context::RequestContext;
use crate::store::CredentialStore;

/// Shared application state passed to the gateway middleware.
///
/// The store is constructor-injected; nothing in the gateway reaches for an
/// ambient driver.
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub issuer: TokenIssuer,
    pub validator: TokenValidator,
    pub gate: AuthorizationGate,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn CredentialStore>, config: Config) -> Self {
        Self {
            issuer: TokenIssuer::new(store.clone()),
            validator: TokenValidator::new(store.clone()),
            gate: AuthorizationGate::new(store.clone()),
            store,
            config,
        }
    }
}

/// Builds the full router: a health probe outside the auth layer, and
/// everything else behind the gateway middleware, falling through to the
/// protected application.
pub fn gateway_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .fallback(any(downstream_handler))
        .layer(middleware::from_fn_with_state(state, auth_gateway));

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

/// Placeholder protected application: echoes the identity context the
/// gateway attached. A real deployment swaps this fallback for the actual
/// downstream service.
async fn downstream_handler(Extension(ctx): Extension<RequestContext>) -> Json<RequestContext> {
    Json(ctx)
}

/// Injects a unique x-request-id into every response so clients can
/// correlate errors with gateway logs.
async fn request_id_middleware(req: Request, next: Next) -> Response {
    let req_id = uuid::Uuid::new_v4().to_string();
    let mut resp = next.run(req).await;
    if let Ok(val) = HeaderValue::from_str(&req_id) {
        resp.headers_mut().insert("x-request-id", val);
    }
    resp
}
