/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use eshop_api::{app::{build_router, AppState}, config::Config};
/// use eshop_shared::{db::pool::create_pool, store::PgStore};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.pool_config()).await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config)?;
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::auth::{require_tenant, role_gate},
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use eshop_shared::{
    auth::{authorization::AccessPolicy, jwt::TokenSettings, password::CredentialHasher},
    store::Store,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor; every field is
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,

    /// Password hasher configured with the deployment's work factor
    pub hasher: CredentialHasher,

    /// Token issuing settings
    pub tokens: TokenSettings,
}

impl AppState {
    /// Creates new application state
    ///
    /// # Errors
    ///
    /// Fails when the configured password work factor is rejected by Argon2.
    pub fn new(store: Arc<dyn Store>, config: Config) -> anyhow::Result<Self> {
        let hasher = CredentialHasher::new(config.hashing_params())?;
        let tokens = config.token_settings();

        Ok(Self {
            store,
            config: Arc::new(config),
            hasher,
            tokens,
        })
    }

    /// Gets the secret used to verify bearer tokens
    pub fn jwt_secret(&self) -> &str {
        &self.tokens.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health
/// ├── /auth/
/// │   ├── POST /register
/// │   └── POST /login
/// ├── /public/:shop_id/
/// │   ├── GET /products
/// │   └── GET /products/:product_id/whatsapp
/// └── /api/                          # bearer token required
///     ├── /shops          SuperAdmin  GET, PUT, PUT /whatsapp
///     ├── /users          SuperAdmin  GET, POST, DELETE /:id
///     ├── /reports        SuperAdmin  GET /dashboard
///     ├── /products       both roles  GET, POST, GET/PUT/DELETE /:id
///     └── /transactions   both roles  GET, POST
/// ```
///
/// # Middleware Stack
///
/// Outermost first: CORS, request tracing, response compression, then for
/// `/api` the token authentication layer followed by the area's role gate.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let public_routes = Router::new()
        .route("/:shop_id/products", get(routes::public::list_products))
        .route(
            "/:shop_id/products/:product_id/whatsapp",
            get(routes::public::product_whatsapp),
        );

    let shop_routes = Router::new()
        .route("/", get(routes::shops::get_shop).put(routes::shops::update_shop))
        .route("/whatsapp", put(routes::shops::update_whatsapp))
        .route_layer(from_fn_with_state(AccessPolicy::SHOP_SETTINGS, role_gate));

    let user_routes = Router::new()
        .route("/", get(routes::users::list_users).post(routes::users::create_user))
        .route("/:id", axum::routing::delete(routes::users::delete_user))
        .route_layer(from_fn_with_state(AccessPolicy::STAFF, role_gate));

    let report_routes = Router::new()
        .route("/dashboard", get(routes::reports::dashboard))
        .route_layer(from_fn_with_state(AccessPolicy::DASHBOARD, role_gate));

    let product_routes = Router::new()
        .route(
            "/",
            get(routes::products::list_products).post(routes::products::create_product),
        )
        .route(
            "/:id",
            get(routes::products::get_product)
                .put(routes::products::update_product)
                .delete(routes::products::delete_product),
        )
        .route_layer(from_fn_with_state(AccessPolicy::INVENTORY, role_gate));

    let transaction_routes = Router::new()
        .route(
            "/",
            get(routes::transactions::list_transactions)
                .post(routes::transactions::create_transaction),
        )
        .route_layer(from_fn_with_state(AccessPolicy::TRANSACTIONS, role_gate));

    let api_routes = Router::new()
        .nest("/shops", shop_routes)
        .nest("/users", user_routes)
        .nest("/reports", report_routes)
        .nest("/products", product_routes)
        .nest("/transactions", transaction_routes)
        .route_layer(from_fn_with_state(state.clone(), require_tenant));

    let cors = if state.config.allows_any_origin() {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/public", public_routes)
        .nest("/api", api_routes)
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
