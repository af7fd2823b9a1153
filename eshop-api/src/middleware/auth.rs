/// Authentication and role gate middleware
///
/// [`require_tenant`] runs in front of every `/api` route. It validates the
/// bearer token with the configured secret and stores the resulting
/// [`TenantContext`] in the request extensions, where handlers pick it up as
/// an extractor. [`role_gate`] is layered per route area with the area's
/// [`AccessPolicy`] as its state.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware::from_fn_with_state, routing::get, Router};
/// use eshop_api::middleware::auth::role_gate;
/// use eshop_shared::auth::authorization::AccessPolicy;
///
/// # async fn dashboard() {}
/// let routes: Router = Router::new()
///     .route("/dashboard", get(dashboard))
///     .route_layer(from_fn_with_state(AccessPolicy::DASHBOARD, role_gate));
/// ```

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use eshop_shared::auth::{
    authorization::AccessPolicy,
    middleware::{authenticate_bearer, TenantContext},
};

use crate::{app::AppState, error::ApiError};

/// Authenticates the request and injects its [`TenantContext`]
pub async fn require_tenant(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let ctx = authenticate_bearer(header, state.jwt_secret())?;

    tracing::debug!(user_id = %ctx.user_id, shop_id = %ctx.shop_id, role = %ctx.role, "Request authenticated");
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

/// Rejects callers whose role is outside the area's policy
pub async fn role_gate(
    State(policy): State<AccessPolicy>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx = req
        .extensions()
        .get::<TenantContext>()
        .ok_or_else(|| ApiError::Unauthorized("No tenant context on request".to_string()))?;

    policy.authorize(ctx)?;

    Ok(next.run(req).await)
}
