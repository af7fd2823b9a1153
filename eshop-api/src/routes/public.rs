/// Public storefront endpoints (no authentication)
///
/// Only active shops are visible; an inactive shop answers exactly like an
/// unknown one. Purchase prices never appear.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use eshop_shared::services::{
    parse_id,
    storefront::{self, Catalog, CatalogQuery, ProductContact},
};

/// `GET /public/:shop_id/products?category=&in_stock_only=true`
pub async fn list_products(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
    query: Result<Query<CatalogQuery>, QueryRejection>,
) -> ApiResult<Json<Catalog>> {
    let shop_id = parse_id(&shop_id, "shop")?;
    let Query(query) = query?;

    Ok(Json(storefront::catalog(&*state.store, shop_id, &query).await?))
}

/// `GET /public/:shop_id/products/:product_id/whatsapp`
pub async fn product_whatsapp(
    State(state): State<AppState>,
    Path((shop_id, product_id)): Path<(String, String)>,
) -> ApiResult<Json<ProductContact>> {
    let shop_id = parse_id(&shop_id, "shop")?;
    let product_id = parse_id(&product_id, "product")?;

    Ok(Json(
        storefront::product_contact(&*state.store, shop_id, product_id).await?,
    ))
}
