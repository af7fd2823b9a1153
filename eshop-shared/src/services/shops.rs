/// Shop settings for the caller's own shop

use tracing::info;
use validator::Validate;

use crate::auth::authorization::AccessPolicy;
use crate::auth::middleware::TenantContext;
use crate::error::{DomainError, DomainResult};
use crate::models::{Shop, ShopChanges};
use crate::store::ShopStore;

pub async fn get_shop<S>(store: &S, ctx: &TenantContext) -> DomainResult<Shop>
where
    S: ShopStore + ?Sized,
{
    AccessPolicy::SHOP_SETTINGS.authorize(ctx)?;

    store
        .find_shop(ctx.shop_id)
        .await?
        .ok_or(DomainError::NotFound("Shop"))
}

/// Applies a partial update (name, contact number, storefront visibility)
pub async fn update_shop<S>(store: &S, ctx: &TenantContext, changes: ShopChanges) -> DomainResult<Shop>
where
    S: ShopStore + ?Sized,
{
    AccessPolicy::SHOP_SETTINGS.authorize(ctx)?;
    changes.validate()?;

    let changes = ShopChanges {
        name: changes.name.map(|n| n.trim().to_string()),
        whatsapp_number: changes.whatsapp_number.map(|n| n.trim().to_string()),
        active: changes.active,
    };
    if changes.name.as_deref() == Some("") || changes.whatsapp_number.as_deref() == Some("") {
        return Err(DomainError::validation("Shop name and WhatsApp number cannot be blank"));
    }

    let shop = store
        .update_shop(ctx.shop_id, &changes)
        .await?
        .ok_or(DomainError::NotFound("Shop"))?;

    info!(shop_id = %shop.id, active = shop.active, updated_by = %ctx.user_id, "Shop updated");
    Ok(shop)
}

pub async fn update_whatsapp<S>(store: &S, ctx: &TenantContext, number: String) -> DomainResult<Shop>
where
    S: ShopStore + ?Sized,
{
    if number.trim().is_empty() {
        return Err(DomainError::validation("WhatsApp number is required"));
    }

    update_shop(
        store,
        ctx,
        ShopChanges {
            whatsapp_number: Some(number),
            ..Default::default()
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{admin_of, context, owner};
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_get_and_update_own_shop() {
        let store = MemoryStore::new();
        let owner = owner(&store, "owner@example.com").await;
        let ctx = context(&owner);

        let shop = get_shop(&store, &ctx).await.unwrap();
        assert_eq!(shop.id, owner.shop_id);

        let shop = update_whatsapp(&store, &ctx, " 22899999999 ".to_string()).await.unwrap();
        assert_eq!(shop.whatsapp_number, "22899999999");

        let shop = update_shop(
            &store,
            &ctx,
            ShopChanges {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(!shop.active);
        assert_eq!(shop.whatsapp_number, "22899999999");
    }

    #[tokio::test]
    async fn test_blank_whatsapp_rejected() {
        let store = MemoryStore::new();
        let owner = owner(&store, "owner@example.com").await;

        let err = update_whatsapp(&store, &context(&owner), "  ".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = update_whatsapp(&store, &context(&owner), "9".repeat(33))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidFields(_)));
    }

    #[tokio::test]
    async fn test_admin_cannot_touch_settings() {
        let store = MemoryStore::new();
        let owner = owner(&store, "owner@example.com").await;
        let admin = admin_of(&store, &owner, "admin@example.com").await;

        let err = get_shop(&store, &context(&admin)).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }
}
