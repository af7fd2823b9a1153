/// Public storefront projector
///
/// Read-only, unauthenticated view of an active shop's catalog. Purchase
/// prices never appear here; each product carries a stock-status band and a
/// WhatsApp link that opens a chat with the shop about that product.
/// Inactive and unknown shops are both reported as not found.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::{Product, ProductFilter, Shop, StockStatus};
use crate::store::{ProductStore, ShopStore};

const WHATSAPP_BASE_URL: &str = "https://wa.me/";

/// Storefront listing query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Exact category
    pub category: Option<String>,

    /// Only products with stock > 0 when `true`
    #[serde(default)]
    pub in_stock_only: Option<String>,
}

impl CatalogQuery {
    pub fn to_filter(&self) -> ProductFilter {
        ProductFilter {
            category_equals: self
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            in_stock_only: self.in_stock_only.as_deref() == Some("true"),
            ..Default::default()
        }
    }
}

/// Shop identity shown on the storefront
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopSummary {
    pub id: Uuid,
    pub name: String,
}

/// Product as shown to the public
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicProduct {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub selling_price: Decimal,
    pub stock: i32,
    pub stock_status: StockStatus,
    pub image_url: String,
    pub whatsapp_link: String,
}

/// Storefront page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub shop: ShopSummary,
    pub products: Vec<PublicProduct>,
    pub total: usize,
}

/// Contact link for a single product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductContact {
    pub product_id: Uuid,
    pub product_name: String,
    pub whatsapp_link: String,
    pub shop_name: String,
}

/// Builds a `wa.me` link carrying a prefilled inquiry about `product_name`
///
/// Non-digit characters are stripped from the number, as `wa.me` expects
/// the bare international number.
pub fn whatsapp_link(number: &str, product_name: &str) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    let message = format!("Hello, I would like more information about {}", product_name);
    let encoded: String = url::form_urlencoded::byte_serialize(message.as_bytes()).collect();

    format!("{}{}?text={}", WHATSAPP_BASE_URL, digits, encoded)
}

fn project(shop: &Shop, product: Product) -> PublicProduct {
    PublicProduct {
        whatsapp_link: whatsapp_link(&shop.whatsapp_number, &product.name),
        stock_status: product.stock_status(),
        id: product.id,
        name: product.name,
        description: product.description,
        category: product.category,
        selling_price: product.selling_price,
        stock: product.stock,
        image_url: product.image_url,
    }
}

async fn active_shop<S>(store: &S, shop_id: Uuid) -> DomainResult<Shop>
where
    S: ShopStore + ?Sized,
{
    store
        .find_shop(shop_id)
        .await?
        .filter(|shop| shop.active)
        .ok_or(DomainError::NotFound("Shop"))
}

/// Public catalog of an active shop
pub async fn catalog<S>(store: &S, shop_id: Uuid, query: &CatalogQuery) -> DomainResult<Catalog>
where
    S: ShopStore + ProductStore + ?Sized,
{
    let shop = active_shop(store, shop_id).await?;
    let products: Vec<PublicProduct> = store
        .list_products(shop.id, &query.to_filter())
        .await?
        .into_iter()
        .map(|p| project(&shop, p))
        .collect();

    Ok(Catalog {
        total: products.len(),
        shop: ShopSummary {
            id: shop.id,
            name: shop.name,
        },
        products,
    })
}

/// WhatsApp contact link for one product of an active shop
pub async fn product_contact<S>(store: &S, shop_id: Uuid, product_id: Uuid) -> DomainResult<ProductContact>
where
    S: ShopStore + ProductStore + ?Sized,
{
    let shop = active_shop(store, shop_id).await?;
    let product = store
        .find_product(shop.id, product_id)
        .await?
        .ok_or(DomainError::NotFound("Product"))?;

    Ok(ProductContact {
        product_id: product.id,
        whatsapp_link: whatsapp_link(&shop.whatsapp_number, &product.name),
        product_name: product.name,
        shop_name: shop.name,
    })
}
