/// Staff account endpoints (SuperAdmin)

use super::MessageResponse;
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use eshop_shared::{
    auth::middleware::TenantContext,
    models::{CreateUserRequest, UserView},
    services::{accounts, parse_id},
};
use serde::{Deserialize, Serialize};

/// User listing
#[derive(Debug, Serialize, Deserialize)]
pub struct UserList {
    pub users: Vec<UserView>,
    pub total: usize,
}

/// `GET /api/users`
pub async fn list_users(State(state): State<AppState>, ctx: TenantContext) -> ApiResult<Json<UserList>> {
    let users = accounts::list_staff(&*state.store, &ctx).await?;

    Ok(Json(UserList {
        total: users.len(),
        users,
    }))
}

/// `POST /api/users`; the new user joins the caller's shop
pub async fn create_user(
    State(state): State<AppState>,
    ctx: TenantContext,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserView>)> {
    let Json(req) = payload?;

    let user = accounts::create_staff(&*state.store, &state.hasher, &ctx, req).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// `DELETE /api/users/:id`
pub async fn delete_user(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let user_id = parse_id(&id, "user")?;

    accounts::delete_staff(&*state.store, &ctx, user_id).await?;

    Ok(Json(MessageResponse::new("User deleted successfully")))
}
