/// Tenant isolation, role gates and inventory over HTTP

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_products_are_scoped_to_the_callers_shop() {
    let ctx = TestContext::new();
    let alpha = ctx.register_shop("alpha@example.com", "Alpha").await;
    let beta = ctx.register_shop("beta@example.com", "Beta").await;

    let product_id = ctx.create_product(&alpha, "Laptop", "Computers", 4).await;

    let listing = ctx.get("/api/products", Some(&beta.token)).await;
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(listing.body["total"], 0);

    let uri = format!("/api/products/{}", product_id);
    for response in [
        ctx.get(&uri, Some(&beta.token)).await,
        ctx.put(&uri, Some(&beta.token), json!({ "stock": 100 })).await,
        ctx.delete(&uri, Some(&beta.token)).await,
    ] {
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body["error"], "not_found");
    }

    assert_eq!(ctx.stock_of(&alpha, product_id).await, 4);
}

#[tokio::test]
async fn test_admin_never_sees_purchase_price() {
    let ctx = TestContext::new();
    let owner = ctx.register_shop("owner@example.com", "Electro").await;
    let admin = ctx.add_admin(&owner, "admin@example.com").await;
    let product_id = ctx.create_product(&owner, "Laptop", "Computers", 4).await;

    let as_owner = ctx.get(&format!("/api/products/{}", product_id), Some(&owner.token)).await;
    assert_eq!(as_owner.body["purchase_price"].as_f64(), Some(40.0));

    let single = ctx.get(&format!("/api/products/{}", product_id), Some(&admin.token)).await;
    assert_eq!(single.status, StatusCode::OK);
    assert!(single.body.get("purchase_price").is_none());
    assert_eq!(single.body["selling_price"].as_f64(), Some(60.0));

    let listing = ctx.get("/api/products", Some(&admin.token)).await;
    assert!(listing.body["products"][0].get("purchase_price").is_none());

    let created = ctx
        .post(
            "/api/products",
            Some(&admin.token),
            json!({ "name": "Mouse", "purchase_price": 5, "selling_price": 9, "stock": 10 }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert!(created.body.get("purchase_price").is_none());
}

#[tokio::test]
async fn test_admin_is_kept_out_of_owner_areas() {
    let ctx = TestContext::new();
    let owner = ctx.register_shop("owner@example.com", "Electro").await;
    let admin = ctx.add_admin(&owner, "admin@example.com").await;

    let attempts = vec![
        ctx.get("/api/shops", Some(&admin.token)).await,
        ctx.put("/api/shops/whatsapp", Some(&admin.token), json!({ "whatsapp_number": "9" })).await,
        ctx.get("/api/users", Some(&admin.token)).await,
        ctx.post(
            "/api/users",
            Some(&admin.token),
            json!({ "name": "Sneaky", "email": "sneaky@example.com", "password": "secret-pass", "role": "SuperAdmin" }),
        )
        .await,
        ctx.get("/api/reports/dashboard", Some(&admin.token)).await,
    ];
    for response in attempts {
        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(response.body["error"], "forbidden");
    }

    assert_eq!(ctx.get("/api/products", Some(&admin.token)).await.status, StatusCode::OK);
    assert_eq!(ctx.get("/api/transactions", Some(&admin.token)).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_product_crud_and_soft_delete() {
    let ctx = TestContext::new();
    let owner = ctx.register_shop("owner@example.com", "Electro").await;
    let product_id = ctx.create_product(&owner, "Laptop", "Computers", 4).await;
    let uri = format!("/api/products/{}", product_id);

    let updated = ctx
        .put(&uri, Some(&owner.token), json!({ "stock": 0, "description": "" }))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["stock"], 0);
    assert_eq!(updated.body["description"], "");
    assert_eq!(updated.body["name"], "Laptop");

    let bad_price = ctx.put(&uri, Some(&owner.token), json!({ "selling_price": 0 })).await;
    assert_eq!(bad_price.status, StatusCode::BAD_REQUEST);

    let deleted = ctx.delete(&uri, Some(&owner.token)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert!(deleted.body["message"].is_string());

    assert_eq!(ctx.get(&uri, Some(&owner.token)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(ctx.delete(&uri, Some(&owner.token)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(ctx.get("/api/products", Some(&owner.token)).await.body["total"], 0);
}

#[tokio::test]
async fn test_product_validation_and_ids() {
    let ctx = TestContext::new();
    let owner = ctx.register_shop("owner@example.com", "Electro").await;

    let response = ctx
        .post(
            "/api/products",
            Some(&owner.token),
            json!({ "name": "Free", "purchase_price": 0, "selling_price": 10, "stock": 1 }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx
        .post(
            "/api/products",
            Some(&owner.token),
            json!({ "name": "Phantom", "purchase_price": 1, "selling_price": 2, "stock": -1 }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"][0]["field"], "stock");

    let response = ctx
        .post(
            "/api/products",
            Some(&owner.token),
            json!({ "name": "Cable", "category": "c".repeat(150), "purchase_price": 1, "selling_price": 2, "stock": 1 }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"][0]["field"], "category");

    let response = ctx
        .post(
            "/api/products",
            Some(&owner.token),
            json!({ "name": "Cable", "purchase_price": 1.005, "selling_price": 2, "stock": 1 }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "validation_error");
    assert_eq!(ctx.get("/api/products", Some(&owner.token)).await.body["total"], 0);

    let response = ctx.get("/api/products/not-a-uuid", Some(&owner.token)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Invalid product ID");
}

#[tokio::test]
async fn test_product_listing_filters() {
    let ctx = TestContext::new();
    let owner = ctx.register_shop("owner@example.com", "Electro").await;
    ctx.create_product(&owner, "Gaming Laptop", "Computers", 3).await;
    ctx.create_product(&owner, "USB Cable", "Computer Accessories", 30).await;
    ctx.create_product(&owner, "Blender", "Kitchen", 2).await;

    let by_category = ctx.get("/api/products?category=Computer", Some(&owner.token)).await;
    assert_eq!(by_category.body["total"], 2);

    let by_name = ctx.get("/api/products?search=laptop", Some(&owner.token)).await;
    assert_eq!(by_name.body["total"], 1);
    assert_eq!(by_name.body["products"][0]["name"], "Gaming Laptop");
}

#[tokio::test]
async fn test_shop_settings() {
    let ctx = TestContext::new();
    let owner = ctx.register_shop("owner@example.com", "Electro").await;

    let shop = ctx.get("/api/shops", Some(&owner.token)).await;
    assert_eq!(shop.status, StatusCode::OK);
    assert_eq!(shop.body["id"], owner.shop_id.to_string());
    assert_eq!(shop.body["active"], true);

    let updated = ctx
        .put("/api/shops/whatsapp", Some(&owner.token), json!({ "whatsapp_number": "+228 91 11 11 11" }))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["whatsapp_number"], "+228 91 11 11 11");

    let blank = ctx
        .put("/api/shops/whatsapp", Some(&owner.token), json!({ "whatsapp_number": "  " }))
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let renamed = ctx
        .put("/api/shops", Some(&owner.token), json!({ "name": "Electro Plus", "active": false }))
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["name"], "Electro Plus");
    assert_eq!(renamed.body["active"], false);
    assert_eq!(renamed.body["whatsapp_number"], "+228 91 11 11 11");
}

#[tokio::test]
async fn test_staff_management() {
    let ctx = TestContext::new();
    let owner = ctx.register_shop("owner@example.com", "Electro").await;
    let other = ctx.register_shop("other@example.com", "Other").await;
    let admin = ctx.add_admin(&owner, "admin@example.com").await;

    let listing = ctx.get("/api/users", Some(&owner.token)).await;
    assert_eq!(listing.body["total"], 2);
    assert!(listing.body["users"]
        .as_array()
        .unwrap()
        .iter()
        .all(|u| u.get("password_hash").is_none()));

    let duplicate = ctx
        .post(
            "/api/users",
            Some(&owner.token),
            json!({ "name": "Again", "email": "admin@example.com", "password": "secret-pass", "role": "Admin" }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let self_delete = ctx.delete(&format!("/api/users/{}", owner.user_id), Some(&owner.token)).await;
    assert_eq!(self_delete.status, StatusCode::BAD_REQUEST);

    let cross_tenant = ctx.delete(&format!("/api/users/{}", admin.user_id), Some(&other.token)).await;
    assert_eq!(cross_tenant.status, StatusCode::NOT_FOUND);

    let unknown = ctx.delete(&format!("/api/users/{}", Uuid::new_v4()), Some(&owner.token)).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let removed = ctx.delete(&format!("/api/users/{}", admin.user_id), Some(&owner.token)).await;
    assert_eq!(removed.status, StatusCode::OK);
    assert_eq!(ctx.get("/api/users", Some(&owner.token)).await.body["total"], 1);
}
