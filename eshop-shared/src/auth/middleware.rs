/// Token authentication and tenant context
///
/// [`authenticate_bearer`] turns an `Authorization` header into a
/// [`TenantContext`]: it checks the `Bearer` scheme, verifies the token with
/// the supplied secret and copies the claims into the context. The HTTP layer
/// runs it once per protected request and stores the context in the request
/// extensions; handlers receive it by declaring a `TenantContext` argument.
///
/// Every failure collapses into a 401 with one fixed message. The precise
/// reason is only logged.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use eshop_shared::auth::middleware::TenantContext;
///
/// async fn whoami(ctx: TenantContext) -> String {
///     format!("{} in shop {}", ctx.user_id, ctx.shop_id)
/// }
///
/// let app: Router = Router::new().route("/me", get(whoami));
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::jwt::{validate_token, Claims, JwtError};
use crate::models::Role;

/// Message returned for every authentication failure
pub const UNAUTHENTICATED_MESSAGE: &str = "Invalid or missing credentials";

/// Identity of the caller for the duration of one request
///
/// `shop_id` is the only source of tenant scoping; it is never read from
/// request paths or bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    pub user_id: Uuid,

    pub shop_id: Uuid,

    pub role: Role,

    pub email: String,
}

impl From<Claims> for TenantContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            shop_id: claims.shop_id,
            role: claims.role,
            email: claims.email,
        }
    }
}

/// Authentication failure
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("Invalid authorization format: {0}")]
    InvalidFormat(String),

    /// Token failed verification
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!(reason = %self, "Authentication rejected");

        let body = Json(json!({
            "error": "unauthenticated",
            "message": UNAUTHENTICATED_MESSAGE,
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Extracts the token from a `Bearer` authorization header value
///
/// The scheme is matched case-insensitively.
pub fn parse_bearer(header: &str) -> Result<&str, AuthError> {
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidFormat(format!("Unsupported scheme {}", scheme)));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Empty bearer token".to_string()));
    }

    Ok(token)
}

/// Authenticates an `Authorization` header value against `secret`
pub fn authenticate_bearer(header: Option<&str>, secret: &str) -> Result<TenantContext, AuthError> {
    let header = header.ok_or(AuthError::MissingCredentials)?;
    let token = parse_bearer(header)?;
    let claims = validate_token(token, secret)?;

    Ok(TenantContext::from(claims))
}

#[async_trait]
impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)
    }
}
