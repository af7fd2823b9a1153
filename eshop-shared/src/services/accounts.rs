/// Credential verifier and staff accounts
///
/// Registration either creates a shop together with its SuperAdmin, or adds a
/// user to an existing shop. Login answers every failure with the same
/// `Unauthenticated` error, and an unknown email still costs one password
/// verification.
///
/// Argon2 runs on the blocking thread pool so hashing does not stall the
/// async workers.

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::parse_id;
use crate::auth::authorization::AccessPolicy;
use crate::auth::jwt::TokenSettings;
use crate::auth::middleware::TenantContext;
use crate::auth::password::{CredentialHasher, PasswordError};
use crate::error::{DomainError, DomainResult};
use crate::models::user::normalize_email;
use crate::models::{
    CreateUserRequest, LoginRequest, NewShop, NewUser, RegisterRequest, Role, User, UserView,
};
use crate::store::{ShopStore, StoreError, UserStore};

const EMAIL_TAKEN: &str = "Email already registered";

/// Successful login
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LoginOutcome {
    pub token: String,
    pub user: UserView,
}

/// Registers a user, creating a shop when no `shop_id` is given
pub async fn register<S>(
    store: &S,
    hasher: &CredentialHasher,
    request: RegisterRequest,
) -> DomainResult<User>
where
    S: ShopStore + UserStore + ?Sized,
{
    request.validate()?;
    let email = normalize_email(&request.email);

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(DomainError::Conflict(EMAIL_TAKEN.to_string()));
    }

    match request.shop_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        Some(raw_shop_id) => {
            let shop_id = parse_id(raw_shop_id, "shop")?;
            let shop = store
                .find_shop(shop_id)
                .await?
                .ok_or(DomainError::NotFound("Shop"))?;

            let password_hash = hash_password(hasher, request.password).await?;
            let user = NewUser {
                name: request.name,
                email,
                password_hash,
                role: request.role,
                shop_id: shop.id,
            }
            .into_user();

            let user = store.insert_user(user).await.map_err(email_conflict)?;
            info!(user_id = %user.id, shop_id = %shop.id, role = %user.role, "User joined shop");
            Ok(user)
        }
        None => {
            let shop_name = required(request.shop_name, "Shop name is required to create a new shop")?;
            let whatsapp_number = required(
                request.whatsapp_number,
                "WhatsApp number is required to create a new shop",
            )?;
            if request.role != Role::SuperAdmin {
                return Err(DomainError::validation("Only a SuperAdmin can create a new shop"));
            }

            let password_hash = hash_password(hasher, request.password).await?;
            let shop = NewShop {
                name: shop_name,
                whatsapp_number,
            }
            .into_shop();
            let owner = NewUser {
                name: request.name,
                email,
                password_hash,
                role: Role::SuperAdmin,
                shop_id: shop.id,
            }
            .into_user();

            let (shop, owner) = store
                .create_shop_with_owner(shop, owner)
                .await
                .map_err(email_conflict)?;
            info!(user_id = %owner.id, shop_id = %shop.id, "Shop registered");
            Ok(owner)
        }
    }
}

/// Verifies credentials and issues a token
pub async fn login<S>(
    store: &S,
    hasher: &CredentialHasher,
    tokens: &TokenSettings,
    request: LoginRequest,
) -> DomainResult<LoginOutcome>
where
    S: UserStore + ?Sized,
{
    if request.validate().is_err() {
        return Err(DomainError::Unauthenticated);
    }
    let email = normalize_email(&request.email);

    let Some(user) = store.find_user_by_email(&email).await? else {
        let hasher = hasher.clone();
        let password = request.password;
        tokio::task::spawn_blocking(move || hasher.verify_dummy(&password))
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        info!("Login rejected");
        return Err(DomainError::Unauthenticated);
    };

    let verified = {
        let hasher = hasher.clone();
        let password = request.password;
        let stored = user.password_hash.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?
    };

    match verified {
        Ok(true) => {}
        Ok(false) => {
            info!("Login rejected");
            return Err(DomainError::Unauthenticated);
        }
        Err(e) => {
            warn!(user_id = %user.id, error = %e, "Stored password hash is unusable");
            return Err(DomainError::Internal(e.to_string()));
        }
    }

    let token = tokens
        .issue_for(&user)
        .map_err(|e| DomainError::Internal(e.to_string()))?;

    info!(user_id = %user.id, shop_id = %user.shop_id, "User logged in");
    Ok(LoginOutcome {
        token,
        user: UserView::from(&user),
    })
}

/// Lists the users of the caller's shop
pub async fn list_staff<S>(store: &S, ctx: &TenantContext) -> DomainResult<Vec<UserView>>
where
    S: UserStore + ?Sized,
{
    AccessPolicy::STAFF.authorize(ctx)?;

    let users = store.list_users(ctx.shop_id).await?;
    Ok(users.iter().map(UserView::from).collect())
}

/// Creates a user in the caller's shop
pub async fn create_staff<S>(
    store: &S,
    hasher: &CredentialHasher,
    ctx: &TenantContext,
    request: CreateUserRequest,
) -> DomainResult<UserView>
where
    S: UserStore + ?Sized,
{
    AccessPolicy::STAFF.authorize(ctx)?;
    request.validate()?;

    let email = normalize_email(&request.email);
    if store.find_user_by_email(&email).await?.is_some() {
        return Err(DomainError::Conflict(EMAIL_TAKEN.to_string()));
    }

    let password_hash = hash_password(hasher, request.password).await?;
    let user = NewUser {
        name: request.name,
        email,
        password_hash,
        role: request.role,
        shop_id: ctx.shop_id,
    }
    .into_user();

    let user = store.insert_user(user).await.map_err(email_conflict)?;
    info!(user_id = %user.id, shop_id = %ctx.shop_id, created_by = %ctx.user_id, "Staff user created");
    Ok(UserView::from(&user))
}

/// Deletes a user of the caller's shop; callers cannot delete themselves
pub async fn delete_staff<S>(store: &S, ctx: &TenantContext, user_id: Uuid) -> DomainResult<()>
where
    S: UserStore + ?Sized,
{
    AccessPolicy::STAFF.authorize(ctx)?;

    if user_id == ctx.user_id {
        return Err(DomainError::validation("You cannot delete your own account"));
    }

    if !store.delete_user(ctx.shop_id, user_id).await? {
        return Err(DomainError::NotFound("User"));
    }

    info!(user_id = %user_id, shop_id = %ctx.shop_id, deleted_by = %ctx.user_id, "Staff user deleted");
    Ok(())
}

async fn hash_password(hasher: &CredentialHasher, password: String) -> DomainResult<String> {
    let hasher = hasher.clone();
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?
        .map_err(|e: PasswordError| DomainError::Internal(e.to_string()))
}

fn required(value: Option<String>, message: &str) -> DomainResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DomainError::validation(message))
}

fn email_conflict(err: StoreError) -> DomainError {
    match err {
        StoreError::UniqueViolation(_) => DomainError::Conflict(EMAIL_TAKEN.to_string()),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::validate_token;
    use crate::services::testing::{admin_of, context, hasher, owner, owner_request, tokens};
    use crate::store::{MemoryStore, ShopStore};

    #[tokio::test]
    async fn test_register_creates_active_shop_and_superadmin() {
        let store = MemoryStore::new();
        let user = owner(&store, "Owner@Example.com").await;

        assert_eq!(user.role, Role::SuperAdmin);
        assert_eq!(user.email, "owner@example.com");
        assert_ne!(user.password_hash, "owner-pass");

        let shop = store.find_shop(user.shop_id).await.unwrap().unwrap();
        assert!(shop.active);
        assert_eq!(shop.name, "Electro Shop");
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        owner(&store, "owner@example.com").await;

        let err = register(&store, &hasher(), owner_request("OWNER@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(msg) if msg == EMAIL_TAKEN));
    }

    #[tokio::test]
    async fn test_register_new_shop_requires_superadmin() {
        let store = MemoryStore::new();
        let mut request = owner_request("admin@example.com");
        request.role = Role::Admin;

        let err = register(&store, &hasher(), request).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_register_new_shop_requires_name_and_number() {
        let store = MemoryStore::new();
        let mut request = owner_request("owner@example.com");
        request.whatsapp_number = Some("   ".to_string());

        let err = register(&store, &hasher(), request).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_register_join_existing_shop() {
        let store = MemoryStore::new();
        let owner = owner(&store, "owner@example.com").await;
        let admin = admin_of(&store, &owner, "admin@example.com").await;

        assert_eq!(admin.shop_id, owner.shop_id);
        assert_eq!(admin.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_register_join_unknown_or_malformed_shop() {
        let store = MemoryStore::new();
        let mut request = owner_request("late@example.com");
        request.shop_id = Some(Uuid::new_v4().to_string());
        let err = register(&store, &hasher(), request.clone()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound("Shop")));

        request.shop_id = Some("not-a-uuid".to_string());
        let err = register(&store, &hasher(), request).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_fields() {
        let store = MemoryStore::new();
        let mut request = owner_request("bad-email");
        request.password = "123".to_string();

        let err = register(&store, &hasher(), request).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidFields(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_values_longer_than_columns() {
        let store = MemoryStore::new();

        let mut request = owner_request("owner@example.com");
        request.whatsapp_number = Some("+228 90 00 00 00 00 00 00 00 00 00 00".to_string());
        let err = register(&store, &hasher(), request).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidFields(_)));

        let mut request = owner_request("owner@example.com");
        request.shop_name = Some("S".repeat(256));
        let err = register(&store, &hasher(), request).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidFields(_)));

        assert!(store.find_user_by_email("owner@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_issues_token_with_claims() {
        let store = MemoryStore::new();
        let owner = owner(&store, "owner@example.com").await;
        let tokens = tokens();

        let outcome = login(
            &store,
            &hasher(),
            &tokens,
            LoginRequest {
                email: "OWNER@example.com".to_string(),
                password: "owner-pass".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(outcome.user.id, owner.id);
        let claims = validate_token(&outcome.token, &tokens.secret).unwrap();
        assert_eq!(claims.user_id, owner.id);
        assert_eq!(claims.shop_id, owner.shop_id);
        assert_eq!(claims.role, Role::SuperAdmin);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let store = MemoryStore::new();
        owner(&store, "owner@example.com").await;

        let wrong_password = login(
            &store,
            &hasher(),
            &tokens(),
            LoginRequest {
                email: "owner@example.com".to_string(),
                password: "nope-nope".to_string(),
            },
        )
        .await
        .unwrap_err();

        let unknown_email = login(
            &store,
            &hasher(),
            &tokens(),
            LoginRequest {
                email: "ghost@example.com".to_string(),
                password: "owner-pass".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(wrong_password, DomainError::Unauthenticated));
        assert!(matches!(unknown_email, DomainError::Unauthenticated));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_staff_management_is_shop_scoped() {
        let store = MemoryStore::new();
        let owner_a = owner(&store, "a@example.com").await;
        let owner_b = owner(&store, "b@example.com").await;
        let ctx_a = context(&owner_a);

        let created = create_staff(
            &store,
            &hasher(),
            &ctx_a,
            CreateUserRequest {
                name: "Clerk".to_string(),
                email: "clerk@example.com".to_string(),
                password: "clerk-pass".to_string(),
                role: Role::Admin,
            },
        )
        .await
        .unwrap();
        assert_eq!(created.shop_id, owner_a.shop_id);

        let staff = list_staff(&store, &ctx_a).await.unwrap();
        assert_eq!(staff.len(), 2);

        let err = delete_staff(&store, &ctx_a, owner_b.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound("User")));

        let err = delete_staff(&store, &ctx_a, owner_a.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        delete_staff(&store, &ctx_a, created.id).await.unwrap();
        assert_eq!(list_staff(&store, &ctx_a).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_admin_cannot_manage_staff() {
        let store = MemoryStore::new();
        let owner = owner(&store, "owner@example.com").await;
        let admin = admin_of(&store, &owner, "admin@example.com").await;

        let err = list_staff(&store, &context(&admin)).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }
}
