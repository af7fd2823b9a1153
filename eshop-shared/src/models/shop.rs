/// Shop (tenant) model
///
/// A shop is the isolation boundary: every user, product and transaction
/// carries the id of the shop that owns it. An inactive shop keeps working for
/// its staff but disappears from the public storefront.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Shop model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Shop {
    /// Unique identifier
    pub id: Uuid,

    /// Display name shown on the storefront
    pub name: String,

    /// Whether the public storefront is visible
    pub active: bool,

    /// Contact number used to build WhatsApp inquiry links
    pub whatsapp_number: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Input for creating a shop
#[derive(Debug, Clone)]
pub struct NewShop {
    pub name: String,
    pub whatsapp_number: String,
}

impl NewShop {
    /// Builds the stored record. New shops start active.
    pub fn into_shop(self) -> Shop {
        Shop {
            id: Uuid::new_v4(),
            name: self.name,
            active: true,
            whatsapp_number: self.whatsapp_number,
            created_at: Utc::now(),
        }
    }
}

/// Partial update of shop settings
///
/// Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ShopChanges {
    #[validate(length(min = 1, max = 255, message = "Shop name must be 1 to 255 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 32, message = "WhatsApp number must be 1 to 32 characters"))]
    pub whatsapp_number: Option<String>,

    pub active: Option<bool>,
}

impl ShopChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.whatsapp_number.is_none() && self.active.is_none()
    }

    /// Applies the supplied fields to `shop`
    pub fn apply(&self, shop: &mut Shop) {
        if let Some(name) = &self.name {
            shop.name = name.clone();
        }
        if let Some(number) = &self.whatsapp_number {
            shop.whatsapp_number = number.clone();
        }
        if let Some(active) = self.active {
            shop.active = active;
        }
    }
}
