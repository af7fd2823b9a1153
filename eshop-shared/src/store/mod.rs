/// Persistence seams
///
/// Domain services talk to storage only through the traits in this module, so
/// the same logic runs against PostgreSQL ([`postgres::PgStore`]) and the
/// in-process [`memory::MemoryStore`] used by tests and demos.
///
/// Every query that touches tenant data takes the caller's `shop_id` and
/// filters on it; a record of another shop is indistinguishable from a
/// missing one. Product reads skip soft-deleted rows.
///
/// # Units of work
///
/// Ledger writes go through a [`UnitOfWork`] obtained from
/// [`TransactionStore::begin`]. A unit stages its writes and applies them all
/// on [`UnitOfWork::commit`]; dropping it without committing discards them.
/// `lock_product` holds the product exclusively until the unit ends, so two
/// sales of the same product are serialized.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    DashboardSummary, Product, ProductChanges, ProductFilter, Shop, ShopChanges, Transaction,
    TransactionFilter, User,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// The store cannot serve requests
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return StoreError::UniqueViolation(constraint);
            }
        }
        StoreError::Database(err)
    }
}

/// Shops
#[async_trait]
pub trait ShopStore: Send + Sync {
    async fn find_shop(&self, id: Uuid) -> StoreResult<Option<Shop>>;

    /// Applies the supplied fields; `None` when the shop does not exist
    async fn update_shop(&self, id: Uuid, changes: &ShopChanges) -> StoreResult<Option<Shop>>;

    /// Creates a shop and its first user atomically
    async fn create_shop_with_owner(&self, shop: Shop, owner: User) -> StoreResult<(Shop, User)>;
}

/// User accounts (the credential store)
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::UniqueViolation`] when the email is taken
    async fn insert_user(&self, user: User) -> StoreResult<User>;

    /// Global lookup by normalized email, used by login and registration
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn list_users(&self, shop_id: Uuid) -> StoreResult<Vec<User>>;

    /// Returns whether a user of `shop_id` was deleted
    async fn delete_user(&self, shop_id: Uuid, user_id: Uuid) -> StoreResult<bool>;
}

/// Product catalog
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Live products of a shop, oldest first
    async fn list_products(&self, shop_id: Uuid, filter: &ProductFilter) -> StoreResult<Vec<Product>>;

    async fn find_product(&self, shop_id: Uuid, id: Uuid) -> StoreResult<Option<Product>>;

    async fn insert_product(&self, product: Product) -> StoreResult<Product>;

    async fn update_product(
        &self,
        shop_id: Uuid,
        id: Uuid,
        changes: &ProductChanges,
    ) -> StoreResult<Option<Product>>;

    /// Marks a live product deleted; returns whether one was found
    async fn soft_delete_product(&self, shop_id: Uuid, id: Uuid) -> StoreResult<bool>;
}

/// Ledger
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Starts an atomic unit for ledger writes
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>>;

    /// Transactions of a shop, newest first
    async fn list_transactions(
        &self,
        shop_id: Uuid,
        filter: &TransactionFilter,
    ) -> StoreResult<Vec<Transaction>>;

    async fn dashboard(&self, shop_id: Uuid) -> StoreResult<DashboardSummary>;
}

/// Atomic group of ledger writes
#[async_trait]
pub trait UnitOfWork: Send {
    /// Loads a live product of `shop_id` and locks it until the unit ends
    async fn lock_product(&mut self, shop_id: Uuid, product_id: Uuid) -> StoreResult<Option<Product>>;

    /// Removes `quantity` units if that many are on hand
    ///
    /// Returns the remaining stock, or `None` (and changes nothing) when
    /// the decrement would go below zero.
    async fn decrement_stock(
        &mut self,
        shop_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> StoreResult<Option<i32>>;

    async fn insert_transaction(&mut self, transaction: Transaction) -> StoreResult<Transaction>;

    /// Applies every staged write
    async fn commit(self: Box<Self>) -> StoreResult<()>;
}

/// Complete storage backend
#[async_trait]
pub trait Store: ShopStore + UserStore + ProductStore + TransactionStore {
    async fn health_check(&self) -> StoreResult<()>;

    /// Short backend name for logs and the health endpoint
    fn backend(&self) -> &'static str;
}
