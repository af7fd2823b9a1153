/// Anonymous storefront over HTTP

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_catalog_hides_cost_and_labels_stock() {
    let ctx = TestContext::new();
    let owner = ctx.register_shop("owner@example.com", "Electro").await;
    ctx.create_product(&owner, "Sold Out Phone", "Phones", 0).await;
    ctx.create_product(&owner, "Rare Phone", "Phones", 3).await;
    ctx.create_product(&owner, "Common Cable", "Cables", 50).await;

    let response = ctx.get(&format!("/public/{}/products", owner.shop_id), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["shop"]["name"], "Electro");
    assert_eq!(response.body["total"], 3);

    let products = response.body["products"].as_array().unwrap();
    for product in products {
        assert!(product.get("purchase_price").is_none());
        assert!(product["whatsapp_link"]
            .as_str()
            .unwrap()
            .starts_with("https://wa.me/22890000000?text="));
    }

    let label = |name: &str| {
        products
            .iter()
            .find(|p| p["name"] == name)
            .map(|p| p["stock_status"].clone())
            .unwrap()
    };
    assert_eq!(label("Sold Out Phone"), "Out of stock");
    assert_eq!(label("Rare Phone"), "Limited stock");
    assert_eq!(label("Common Cable"), "In stock");
}

#[tokio::test]
async fn test_catalog_filters() {
    let ctx = TestContext::new();
    let owner = ctx.register_shop("owner@example.com", "Electro").await;
    ctx.create_product(&owner, "Sold Out Phone", "Phones", 0).await;
    ctx.create_product(&owner, "Rare Phone", "Phones", 3).await;
    ctx.create_product(&owner, "Common Cable", "Cables", 50).await;

    let phones = ctx
        .get(&format!("/public/{}/products?category=Phones", owner.shop_id), None)
        .await;
    assert_eq!(phones.body["total"], 2);

    let partial = ctx
        .get(&format!("/public/{}/products?category=Phone", owner.shop_id), None)
        .await;
    assert_eq!(partial.body["total"], 0);

    let available = ctx
        .get(
            &format!("/public/{}/products?category=Phones&in_stock_only=true", owner.shop_id),
            None,
        )
        .await;
    assert_eq!(available.body["total"], 1);
    assert_eq!(available.body["products"][0]["name"], "Rare Phone");
}

#[tokio::test]
async fn test_inactive_shop_looks_like_unknown_shop() {
    let ctx = TestContext::new();
    let owner = ctx.register_shop("owner@example.com", "Electro").await;
    let product_id = ctx.create_product(&owner, "Phone", "Phones", 3).await;

    let deactivated = ctx
        .put("/api/shops", Some(&owner.token), json!({ "active": false }))
        .await;
    assert_eq!(deactivated.status, StatusCode::OK);

    let inactive = ctx.get(&format!("/public/{}/products", owner.shop_id), None).await;
    let unknown = ctx.get(&format!("/public/{}/products", Uuid::new_v4()), None).await;
    assert_eq!(inactive.status, StatusCode::NOT_FOUND);
    assert_eq!(inactive.body, unknown.body);

    let contact = ctx
        .get(
            &format!("/public/{}/products/{}/whatsapp", owner.shop_id, product_id),
            None,
        )
        .await;
    assert_eq!(contact.status, StatusCode::NOT_FOUND);

    ctx.put("/api/shops", Some(&owner.token), json!({ "active": true }))
        .await;
    let reactivated = ctx.get(&format!("/public/{}/products", owner.shop_id), None).await;
    assert_eq!(reactivated.status, StatusCode::OK);
}

#[tokio::test]
async fn test_whatsapp_contact_link() {
    let ctx = TestContext::new();
    let alpha = ctx.register_shop("alpha@example.com", "Alpha").await;
    let beta = ctx.register_shop("beta@example.com", "Beta").await;
    let product_id = ctx.create_product(&alpha, "Phone & Case", "Phones", 3).await;

    let response = ctx
        .get(
            &format!("/public/{}/products/{}/whatsapp", alpha.shop_id, product_id),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["product_id"], product_id.to_string());
    assert_eq!(response.body["product_name"], "Phone & Case");
    assert_eq!(response.body["shop_name"], "Alpha");
    assert_eq!(
        response.body["whatsapp_link"],
        "https://wa.me/22890000000?text=Hello%2C+I+would+like+more+information+about+Phone+%26+Case"
    );

    let wrong_shop = ctx
        .get(
            &format!("/public/{}/products/{}/whatsapp", beta.shop_id, product_id),
            None,
        )
        .await;
    assert_eq!(wrong_shop.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_shop_id() {
    let ctx = TestContext::new();

    let response = ctx.get("/public/not-a-shop/products", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Invalid shop ID");
}
