/// Inventory ledger: product catalog of the caller's shop
///
/// Every result passes through [`ProductView::for_role`], so Admins never
/// receive purchase prices. Deletion is soft and hides the product from every
/// later read.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::auth::authorization::AccessPolicy;
use crate::auth::middleware::TenantContext;
use crate::error::{DomainError, DomainResult};
use crate::models::{NewProduct, ProductChanges, ProductDraft, ProductFilter, ProductView};
use crate::store::ProductStore;

/// Back-office listing query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Substring of the category
    pub category: Option<String>,

    /// Case-insensitive substring of the name
    pub search: Option<String>,
}

impl ProductQuery {
    pub fn to_filter(&self) -> ProductFilter {
        ProductFilter {
            category_contains: non_blank(&self.category),
            name_search: non_blank(&self.search),
            ..Default::default()
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub async fn list_products<S>(
    store: &S,
    ctx: &TenantContext,
    query: &ProductQuery,
) -> DomainResult<Vec<ProductView>>
where
    S: ProductStore + ?Sized,
{
    AccessPolicy::INVENTORY.authorize(ctx)?;

    let products = store.list_products(ctx.shop_id, &query.to_filter()).await?;
    Ok(products
        .into_iter()
        .map(|p| ProductView::for_role(p, ctx.role))
        .collect())
}

pub async fn get_product<S>(store: &S, ctx: &TenantContext, id: Uuid) -> DomainResult<ProductView>
where
    S: ProductStore + ?Sized,
{
    AccessPolicy::INVENTORY.authorize(ctx)?;

    let product = store
        .find_product(ctx.shop_id, id)
        .await?
        .ok_or(DomainError::NotFound("Product"))?;
    Ok(ProductView::for_role(product, ctx.role))
}

pub async fn create_product<S>(
    store: &S,
    ctx: &TenantContext,
    draft: ProductDraft,
) -> DomainResult<ProductView>
where
    S: ProductStore + ?Sized,
{
    AccessPolicy::INVENTORY.authorize(ctx)?;
    draft.validate()?;
    draft.check_prices().map_err(DomainError::Validation)?;

    let product = NewProduct {
        shop_id: ctx.shop_id,
        draft,
    }
    .into_product();
    let product = store.insert_product(product).await?;

    info!(product_id = %product.id, shop_id = %ctx.shop_id, stock = product.stock, "Product created");
    Ok(ProductView::for_role(product, ctx.role))
}

/// Applies exactly the supplied fields
pub async fn update_product<S>(
    store: &S,
    ctx: &TenantContext,
    id: Uuid,
    changes: ProductChanges,
) -> DomainResult<ProductView>
where
    S: ProductStore + ?Sized,
{
    AccessPolicy::INVENTORY.authorize(ctx)?;
    changes.validate()?;
    changes.check_prices().map_err(DomainError::Validation)?;

    let product = store
        .update_product(ctx.shop_id, id, &changes)
        .await?
        .ok_or(DomainError::NotFound("Product"))?;

    info!(product_id = %id, shop_id = %ctx.shop_id, "Product updated");
    Ok(ProductView::for_role(product, ctx.role))
}

pub async fn delete_product<S>(store: &S, ctx: &TenantContext, id: Uuid) -> DomainResult<()>
where
    S: ProductStore + ?Sized,
{
    AccessPolicy::INVENTORY.authorize(ctx)?;

    if !store.soft_delete_product(ctx.shop_id, id).await? {
        return Err(DomainError::NotFound("Product"));
    }

    info!(product_id = %id, shop_id = %ctx.shop_id, "Product deleted");
    Ok(())
}
