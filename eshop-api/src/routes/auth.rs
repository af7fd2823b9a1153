/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Create a shop with its SuperAdmin, or join a shop
/// - `POST /auth/login` - Exchange credentials for a bearer token

use crate::{app::AppState, error::ApiResult};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use eshop_shared::{
    models::{LoginRequest, RegisterRequest, UserView},
    services::accounts::{self, LoginOutcome},
};
use serde::{Deserialize, Serialize};

/// Register response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,

    pub user: UserView,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "name": "Ama Mensah",
///   "email": "ama@example.com",
///   "password": "secret1",
///   "role": "SuperAdmin",
///   "shop_name": "Electro Shop",
///   "whatsapp_number": "+228 90 00 00 00"
/// }
/// ```
///
/// Sending `shop_id` instead of `shop_name`/`whatsapp_number` adds the user
/// to that existing shop.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or a new shop without a SuperAdmin
/// - `404 Not Found`: `shop_id` does not exist
/// - `409 Conflict`: Email already registered
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(req) = payload?;

    let user = accounts::register(&*state.store, &state.hasher, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user: UserView::from(&user),
        }),
    ))
}

/// Login with email and password
///
/// # Response
///
/// ```json
/// {
///   "token": "eyJ...",
///   "user": { "id": "uuid", "name": "...", "email": "...", "role": "SuperAdmin", "shop_id": "uuid" }
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password (same response)
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginOutcome>> {
    let Json(req) = payload?;

    let outcome = accounts::login(&*state.store, &state.hasher, &state.tokens, req).await?;

    Ok(Json(outcome))
}
