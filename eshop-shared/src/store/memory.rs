/// In-process store
///
/// Keeps every record behind a single `tokio::sync::Mutex`. A
/// [`UnitOfWork`] owns the lock guard for its whole lifetime, which makes
/// units fully serialized: the in-memory equivalent of locking the product
/// row. Writes are staged inside the unit and copied into the shared state on
/// commit only.
///
/// Used by the test suites and handy for running the API without a database.
///
/// # Example
///
/// ```
/// use eshop_shared::store::{MemoryStore, ShopStore};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// assert!(store.find_shop(Uuid::new_v4()).await?.is_none());
/// # Ok(())
/// # }
/// ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{
    ProductStore, ShopStore, Store, StoreError, StoreResult, TransactionStore, UnitOfWork,
    UserStore,
};
use crate::models::product::LOW_STOCK_THRESHOLD;
use crate::models::{
    DashboardSummary, LowStockProduct, Product, ProductChanges, ProductFilter, Shop, ShopChanges,
    Transaction, TransactionFilter, TransactionKind, User,
};

#[derive(Debug, Default)]
struct MemoryState {
    shops: HashMap<Uuid, Shop>,
    users: HashMap<Uuid, User>,
    products: HashMap<Uuid, Product>,
    /// Append order doubles as creation order
    transactions: Vec<Transaction>,
}

impl MemoryState {
    fn email_taken(&self, email: &str) -> bool {
        self.users.values().any(|u| u.email == email)
    }

    fn live_product(&self, shop_id: Uuid, id: Uuid) -> Option<&Product> {
        self.products
            .get(&id)
            .filter(|p| p.shop_id == shop_id && !p.is_deleted())
    }
}

/// Store backed by process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a shop directly, bypassing registration
    pub async fn seed_shop(&self, shop: Shop) -> Shop {
        let mut state = self.state.lock().await;
        state.shops.insert(shop.id, shop.clone());
        shop
    }
}

#[async_trait]
impl ShopStore for MemoryStore {
    async fn find_shop(&self, id: Uuid) -> StoreResult<Option<Shop>> {
        let state = self.state.lock().await;
        Ok(state.shops.get(&id).cloned())
    }

    async fn update_shop(&self, id: Uuid, changes: &ShopChanges) -> StoreResult<Option<Shop>> {
        let mut state = self.state.lock().await;
        Ok(state.shops.get_mut(&id).map(|shop| {
            changes.apply(shop);
            shop.clone()
        }))
    }

    async fn create_shop_with_owner(&self, shop: Shop, owner: User) -> StoreResult<(Shop, User)> {
        let mut state = self.state.lock().await;
        if state.email_taken(&owner.email) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }

        state.shops.insert(shop.id, shop.clone());
        state.users.insert(owner.id, owner.clone());
        Ok((shop, owner))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let mut state = self.state.lock().await;
        if state.email_taken(&user.email) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }
        if !state.shops.contains_key(&user.shop_id) {
            return Err(StoreError::Unavailable(format!("shop {} does not exist", user.shop_id)));
        }

        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self, shop_id: Uuid) -> StoreResult<Vec<User>> {
        let state = self.state.lock().await;
        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|u| u.shop_id == shop_id)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn delete_user(&self, shop_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let owned = state
            .users
            .get(&user_id)
            .is_some_and(|u| u.shop_id == shop_id);
        if owned {
            state.users.remove(&user_id);
        }
        Ok(owned)
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_products(&self, shop_id: Uuid, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        let state = self.state.lock().await;
        let mut products: Vec<Product> = state
            .products
            .values()
            .filter(|p| p.shop_id == shop_id && !p.is_deleted() && filter.matches(p))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(products)
    }

    async fn find_product(&self, shop_id: Uuid, id: Uuid) -> StoreResult<Option<Product>> {
        let state = self.state.lock().await;
        Ok(state.live_product(shop_id, id).cloned())
    }

    async fn insert_product(&self, product: Product) -> StoreResult<Product> {
        let mut state = self.state.lock().await;
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        shop_id: Uuid,
        id: Uuid,
        changes: &ProductChanges,
    ) -> StoreResult<Option<Product>> {
        let mut state = self.state.lock().await;
        let product = state
            .products
            .get_mut(&id)
            .filter(|p| p.shop_id == shop_id && !p.is_deleted());

        Ok(product.map(|p| {
            changes.apply(p);
            p.clone()
        }))
    }

    async fn soft_delete_product(&self, shop_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        match state
            .products
            .get_mut(&id)
            .filter(|p| p.shop_id == shop_id && !p.is_deleted())
        {
            Some(product) => {
                product.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let guard = self.state.clone().lock_owned().await;
        Ok(Box::new(MemoryUnit {
            state: guard,
            stock: HashMap::new(),
            inserts: Vec::new(),
        }))
    }

    async fn list_transactions(
        &self,
        shop_id: Uuid,
        filter: &TransactionFilter,
    ) -> StoreResult<Vec<Transaction>> {
        let state = self.state.lock().await;
        Ok(state
            .transactions
            .iter()
            .rev()
            .filter(|t| t.shop_id == shop_id && filter.matches(t))
            .cloned()
            .collect())
    }

    async fn dashboard(&self, shop_id: Uuid) -> StoreResult<DashboardSummary> {
        let state = self.state.lock().await;

        let mut total_sales = Decimal::ZERO;
        let mut total_expenses = Decimal::ZERO;
        let mut total_transactions = 0i64;
        for transaction in state.transactions.iter().filter(|t| t.shop_id == shop_id) {
            total_transactions += 1;
            match transaction.kind {
                TransactionKind::Sale => total_sales += transaction.amount,
                kind if kind.is_outflow() => total_expenses += transaction.amount,
                _ => {}
            }
        }

        let live: Vec<&Product> = state
            .products
            .values()
            .filter(|p| p.shop_id == shop_id && !p.is_deleted())
            .collect();

        let mut low_stock: Vec<LowStockProduct> = live
            .iter()
            .filter(|p| p.stock < LOW_STOCK_THRESHOLD)
            .map(|p| LowStockProduct {
                id: p.id,
                name: p.name.clone(),
                stock: p.stock,
                category: p.category.clone(),
            })
            .collect();
        low_stock.sort_by(|a, b| a.stock.cmp(&b.stock).then_with(|| a.name.cmp(&b.name)));

        Ok(DashboardSummary::new(
            total_sales,
            total_expenses,
            low_stock,
            live.len() as i64,
            total_transactions,
        ))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Unit of work holding the store lock
struct MemoryUnit {
    state: OwnedMutexGuard<MemoryState>,
    /// Staged stock levels by product id
    stock: HashMap<Uuid, i32>,
    inserts: Vec<Transaction>,
}

impl MemoryUnit {
    fn current_stock(&self, product: &Product) -> i32 {
        self.stock.get(&product.id).copied().unwrap_or(product.stock)
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnit {
    async fn lock_product(&mut self, shop_id: Uuid, product_id: Uuid) -> StoreResult<Option<Product>> {
        Ok(self.state.live_product(shop_id, product_id).cloned().map(|mut p| {
            p.stock = self.current_stock(&p);
            p
        }))
    }

    async fn decrement_stock(
        &mut self,
        shop_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> StoreResult<Option<i32>> {
        let current = match self.state.live_product(shop_id, product_id) {
            Some(product) => self.current_stock(product),
            None => return Ok(None),
        };

        if current < quantity {
            return Ok(None);
        }

        let remaining = current - quantity;
        self.stock.insert(product_id, remaining);
        Ok(Some(remaining))
    }

    async fn insert_transaction(&mut self, transaction: Transaction) -> StoreResult<Transaction> {
        self.inserts.push(transaction.clone());
        Ok(transaction)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryUnit {
            mut state,
            stock,
            inserts,
        } = *self;

        for (product_id, remaining) in stock {
            if let Some(product) = state.products.get_mut(&product_id) {
                product.stock = remaining;
            }
        }
        state.transactions.extend(inserts);
        Ok(())
    }
}
