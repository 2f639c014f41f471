use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::api::response::ApiError;
use crate::auth::{AdminUser, AuthError};
use crate::AppState;

/// A verified admin behind the request's `Authorization: Bearer` token.
///
/// Rejects with 401 when the token is missing or invalid and 403 when the
/// user is not on the configured admin allowlist.
pub struct AdminSession(pub AdminUser);

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, ApiError> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

        let user = state.auth.verify(token).await.map_err(|e| match e {
            AuthError::Backend(msg) => {
                tracing::error!(error = %msg, "Token verification failed");
                ApiError::unavailable("Authentication service unavailable")
            }
            other => ApiError::unauthorized(other.to_string()),
        })?;

        if !state.config.auth.allows(user.email.as_deref()) {
            tracing::warn!(user_id = %user.id, "Signed-in user is not an admin");
            return Err(ApiError::forbidden("Not an admin account"));
        }

        Ok(AdminSession(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
