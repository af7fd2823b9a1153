//! Common test utilities for integration tests
//!
//! Every test builds the real router over an in-memory store, so no database
//! or network service is needed. Requests go through `tower::Service::call`
//! exactly as the server would dispatch them.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use eshop_api::app::{build_router, AppState};
use eshop_api::config::Config;
use eshop_shared::store::MemoryStore;
use serde_json::{json, Value};
use tower::Service as _;
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const PASSWORD: &str = "secret-pass";

/// Test context containing the router and its backing store
pub struct TestContext {
    pub app: Router,
    pub store: MemoryStore,
    pub config: Config,
}

/// Decoded response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Logged-in user
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub shop_id: Uuid,
    pub email: String,
}

impl TestContext {
    pub fn new() -> Self {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "postgresql://localhost/unused"),
            ("JWT_SECRET", TEST_SECRET),
            ("PASSWORD_MEMORY_KIB", "4096"),
            ("PASSWORD_ITERATIONS", "1"),
            ("PASSWORD_PARALLELISM", "1"),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();

        let store = MemoryStore::new();
        let state = AppState::new(Arc::new(store.clone()), config.clone()).unwrap();

        TestContext {
            app: build_router(state),
            store,
            config,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        send(self.app.clone(), method, uri, token, body).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Registers a SuperAdmin together with a new shop and logs in
    pub async fn register_shop(&self, email: &str, shop_name: &str) -> Session {
        let response = self
            .post(
                "/auth/register",
                None,
                json!({
                    "name": "Shop Owner",
                    "email": email,
                    "password": PASSWORD,
                    "role": "SuperAdmin",
                    "shop_name": shop_name,
                    "whatsapp_number": "+228 90 00 00 00"
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

        self.login(email, PASSWORD).await
    }

    /// Creates an Admin in the owner's shop and logs in as them
    pub async fn add_admin(&self, owner: &Session, email: &str) -> Session {
        let response = self
            .post(
                "/api/users",
                Some(&owner.token),
                json!({
                    "name": "Shop Admin",
                    "email": email,
                    "password": PASSWORD,
                    "role": "Admin"
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

        self.login(email, PASSWORD).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Session {
        let response = self
            .post("/auth/login", None, json!({ "email": email, "password": password }))
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

        let user = &response.body["user"];
        Session {
            token: response.body["token"].as_str().unwrap().to_string(),
            user_id: user["id"].as_str().unwrap().parse().unwrap(),
            shop_id: user["shop_id"].as_str().unwrap().parse().unwrap(),
            email: user["email"].as_str().unwrap().to_string(),
        }
    }

    /// Creates a product and returns its id
    pub async fn create_product(&self, session: &Session, name: &str, category: &str, stock: i32) -> Uuid {
        let response = self
            .post(
                "/api/products",
                Some(&session.token),
                json!({
                    "name": name,
                    "description": format!("{} description", name),
                    "category": category,
                    "purchase_price": 40,
                    "selling_price": 60,
                    "stock": stock
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

        response.body["id"].as_str().unwrap().parse().unwrap()
    }

    pub async fn stock_of(&self, session: &Session, product_id: Uuid) -> i64 {
        let response = self
            .get(&format!("/api/products/{}", product_id), Some(&session.token))
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["stock"].as_i64().unwrap()
    }
}

/// Sends one request through the router and decodes the JSON body
pub async fn send(
    mut app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.call(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    TestResponse { status, body }
}
