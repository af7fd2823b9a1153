/// Shop settings endpoints (SuperAdmin)
///
/// The shop is always the caller's own, taken from the token.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use eshop_shared::{
    auth::middleware::TenantContext,
    models::{Shop, ShopChanges},
    services::shops,
};
use serde::{Deserialize, Serialize};

/// WhatsApp number update request
#[derive(Debug, Serialize, Deserialize)]
pub struct WhatsappRequest {
    #[serde(default)]
    pub whatsapp_number: String,
}

/// `GET /api/shops`
pub async fn get_shop(State(state): State<AppState>, ctx: TenantContext) -> ApiResult<Json<Shop>> {
    Ok(Json(shops::get_shop(&*state.store, &ctx).await?))
}

/// `PUT /api/shops` with any of `name`, `whatsapp_number`, `active`
pub async fn update_shop(
    State(state): State<AppState>,
    ctx: TenantContext,
    payload: Result<Json<ShopChanges>, JsonRejection>,
) -> ApiResult<Json<Shop>> {
    let Json(changes) = payload?;

    Ok(Json(shops::update_shop(&*state.store, &ctx, changes).await?))
}

/// `PUT /api/shops/whatsapp`
pub async fn update_whatsapp(
    State(state): State<AppState>,
    ctx: TenantContext,
    payload: Result<Json<WhatsappRequest>, JsonRejection>,
) -> ApiResult<Json<Shop>> {
    let Json(req) = payload?;

    Ok(Json(
        shops::update_whatsapp(&*state.store, &ctx, req.whatsapp_number).await?,
    ))
}
