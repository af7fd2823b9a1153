/// Product model
///
/// Products are soft-deleted: `deleted_at` is set instead of removing the row,
/// and every read path (listing, lookup, stock locking, storefront, reports)
/// skips rows where it is set. Stock never goes below zero.
///
/// Purchase prices are confidential to SuperAdmins. Handlers never serialize a
/// `Product` directly; they go through [`ProductView::for_role`], which drops
/// the purchase price for every other role.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{check_money, Role};

/// Stock level below which a product counts as "limited" (and low stock on the dashboard)
pub const LOW_STOCK_THRESHOLD: i32 = 5;

/// Product model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,

    pub name: String,

    pub description: String,

    pub category: String,

    /// Cost price, visible to SuperAdmins only
    pub purchase_price: Decimal,

    pub selling_price: Decimal,

    /// Units on hand, always >= 0
    pub stock: i32,

    pub image_url: String,

    pub shop_id: Uuid,

    pub created_at: DateTime<Utc>,

    /// Soft-deletion marker
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn stock_status(&self) -> StockStatus {
        StockStatus::from_stock(self.stock)
    }
}

/// Availability band shown on the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "Out of stock")]
    OutOfStock,

    #[serde(rename = "Limited stock")]
    LimitedStock,

    #[serde(rename = "In stock")]
    InStock,
}

impl StockStatus {
    pub fn from_stock(stock: i32) -> Self {
        if stock <= 0 {
            StockStatus::OutOfStock
        } else if stock < LOW_STOCK_THRESHOLD {
            StockStatus::LimitedStock
        } else {
            StockStatus::InStock
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of stock",
            StockStatus::LimitedStock => "Limited stock",
            StockStatus::InStock => "In stock",
        }
    }
}

/// Product creation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductDraft {
    #[validate(length(min = 1, max = 255, message = "Product name must be 1 to 255 characters"))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[validate(length(max = 100, message = "Category cannot exceed 100 characters"))]
    #[serde(default)]
    pub category: String,

    pub purchase_price: Decimal,

    pub selling_price: Decimal,

    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    #[serde(default)]
    pub stock: i32,

    #[serde(default)]
    pub image_url: String,
}

impl ProductDraft {
    /// Checks the constraints `validator` cannot express on decimals
    pub fn check_prices(&self) -> Result<(), String> {
        check_money("purchase_price", self.purchase_price)?;
        check_money("selling_price", self.selling_price)
    }
}

/// Fully-formed product ready to be stored
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub shop_id: Uuid,
    pub draft: ProductDraft,
}

impl NewProduct {
    pub fn into_product(self) -> Product {
        let draft = self.draft;
        Product {
            id: Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            category: draft.category,
            purchase_price: draft.purchase_price,
            selling_price: draft.selling_price,
            stock: draft.stock,
            image_url: draft.image_url,
            shop_id: self.shop_id,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }
}

/// Partial product update
///
/// Every field is optional. A supplied value is applied as-is, including
/// empty strings and zero stock; an absent (or `null`) field is untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProductChanges {
    #[validate(length(min = 1, max = 255, message = "Product name must be 1 to 255 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(length(max = 100, message = "Category cannot exceed 100 characters"))]
    pub category: Option<String>,

    pub purchase_price: Option<Decimal>,

    pub selling_price: Option<Decimal>,

    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i32>,

    pub image_url: Option<String>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.purchase_price.is_none()
            && self.selling_price.is_none()
            && self.stock.is_none()
            && self.image_url.is_none()
    }

    pub fn check_prices(&self) -> Result<(), String> {
        if let Some(price) = self.purchase_price {
            check_money("purchase_price", price)?;
        }
        if let Some(price) = self.selling_price {
            check_money("selling_price", price)?;
        }
        Ok(())
    }

    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
        if let Some(price) = self.purchase_price {
            product.purchase_price = price;
        }
        if let Some(price) = self.selling_price {
            product.selling_price = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(url) = &self.image_url {
            product.image_url = url.clone();
        }
    }
}

/// Listing filter
///
/// `category_contains` is the back-office substring filter and
/// `category_equals` the storefront exact filter; `name_search` matches
/// names case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category_contains: Option<String>,
    pub category_equals: Option<String>,
    pub name_search: Option<String>,
    pub in_stock_only: bool,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(fragment) = &self.category_contains {
            if !product.category.contains(fragment.as_str()) {
                return false;
            }
        }
        if let Some(category) = &self.category_equals {
            if &product.category != category {
                return false;
            }
        }
        if let Some(search) = &self.name_search {
            if !product.name.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        !(self.in_stock_only && product.stock <= 0)
    }
}

/// Back-office product representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub purchase_price: Option<Decimal>,

    pub selling_price: Decimal,
    pub stock: i32,
    pub image_url: String,
    pub shop_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl ProductView {
    /// Projects a product for the given role
    pub fn for_role(product: Product, role: Role) -> Self {
        let purchase_price = role.sees_cost_prices().then_some(product.purchase_price);
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            category: product.category,
            purchase_price,
            selling_price: product.selling_price,
            stock: product.stock,
            image_url: product.image_url,
            shop_id: product.shop_id,
            created_at: product.created_at,
        }
    }
}
