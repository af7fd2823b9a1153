/// Inventory endpoints (SuperAdmin and Admin)
///
/// Product bodies are projected for the caller's role: `purchase_price` is
/// present for a SuperAdmin and absent for an Admin.
///
/// # Endpoints
///
/// - `GET    /api/products?category=&search=`
/// - `POST   /api/products`
/// - `GET    /api/products/:id`
/// - `PUT    /api/products/:id` (partial)
/// - `DELETE /api/products/:id` (soft delete)

use super::MessageResponse;
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use eshop_shared::{
    auth::middleware::TenantContext,
    models::{ProductChanges, ProductDraft, ProductView},
    services::{
        inventory::{self, ProductQuery},
        parse_id,
    },
};
use serde::{Deserialize, Serialize};

/// Product listing
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductList {
    pub products: Vec<ProductView>,
    pub total: usize,
}

pub async fn list_products(
    State(state): State<AppState>,
    ctx: TenantContext,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> ApiResult<Json<ProductList>> {
    let Query(query) = query?;

    let products = inventory::list_products(&*state.store, &ctx, &query).await?;

    Ok(Json(ProductList {
        total: products.len(),
        products,
    }))
}

pub async fn get_product(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> ApiResult<Json<ProductView>> {
    let id = parse_id(&id, "product")?;

    Ok(Json(inventory::get_product(&*state.store, &ctx, id).await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    ctx: TenantContext,
    payload: Result<Json<ProductDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ProductView>)> {
    let Json(draft) = payload?;

    let product = inventory::create_product(&*state.store, &ctx, draft).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<String>,
    payload: Result<Json<ProductChanges>, JsonRejection>,
) -> ApiResult<Json<ProductView>> {
    let id = parse_id(&id, "product")?;
    let Json(changes) = payload?;

    Ok(Json(
        inventory::update_product(&*state.store, &ctx, id, changes).await?,
    ))
}

pub async fn delete_product(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id, "product")?;

    inventory::delete_product(&*state.store, &ctx, id).await?;

    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
