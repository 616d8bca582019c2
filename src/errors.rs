use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Gateway-level failure taxonomy.
///
/// Every denial path collapses to the same opaque `Unauthorized` signal on
/// the wire; the reason a particular request was rejected lives in operator
/// logs only. Store-level failures are surfaced distinctly as 503, never
/// folded into 401.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unauthorized")]
    Unauthorized,

    /// The one denial that explains itself: a credential-issuance attempt
    /// made against anything other than a version root.
    #[error("authentication requests must be made against a version root (e.g. /v1.0 or /v1.1)")]
    MalformedIssuancePath,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("credential store call timed out")]
    StoreTimeout,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_type, code, msg) = match &self {
            AuthError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "unauthorized",
                "unauthorized".to_string(),
            ),
            AuthError::MalformedIssuancePath => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "malformed_issuance_path",
                self.to_string(),
            ),
            AuthError::Store(e) => {
                tracing::error!("credential store error: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "availability_error",
                    "store_unavailable",
                    "service unavailable".to_string(),
                )
            }
            AuthError::StoreTimeout => {
                tracing::error!("credential store call timed out");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "availability_error",
                    "store_timeout",
                    "service unavailable".to_string(),
                )
            }
            AuthError::Internal(e) => {
                tracing::error!("internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal_server_error",
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": msg,
                "type": error_type,
                "code": code,
            }
        }));

        (status, body).into_response()
    }
}
