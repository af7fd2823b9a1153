/// PostgreSQL store
///
/// Plain `sqlx::query_as` calls with positional binds. Optional filters are
/// expressed in SQL (`$n::text IS NULL OR ...`) so each listing is a single
/// static statement; product updates build their `SET` list dynamically.
///
/// The schema backs up the invariants enforced here: `stock >= 0`, unique
/// emails, a composite `(product_id, shop_id)` foreign key on transactions
/// and an append-only trigger on the ledger.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::{
    ProductStore, ShopStore, Store, StoreResult, TransactionStore, UnitOfWork, UserStore,
};
use crate::models::product::LOW_STOCK_THRESHOLD;
use crate::models::{
    DashboardSummary, LowStockProduct, Product, ProductChanges, ProductFilter, Shop, ShopChanges,
    Transaction, TransactionFilter, User,
};

const SHOP_COLUMNS: &str = "id, name, active, whatsapp_number, created_at";
const USER_COLUMNS: &str = "id, name, email, password_hash, role, shop_id, created_at";
const PRODUCT_COLUMNS: &str = "id, name, description, category, purchase_price, selling_price, \
                               stock, image_url, shop_id, created_at, deleted_at";
const TRANSACTION_COLUMNS: &str =
    "id, kind, product_id, quantity, amount, comment, shop_id, created_at";

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ShopStore for PgStore {
    async fn find_shop(&self, id: Uuid) -> StoreResult<Option<Shop>> {
        let shop = sqlx::query_as::<_, Shop>(&format!(
            "SELECT {} FROM shops WHERE id = $1",
            SHOP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shop)
    }

    async fn update_shop(&self, id: Uuid, changes: &ShopChanges) -> StoreResult<Option<Shop>> {
        if changes.is_empty() {
            return self.find_shop(id).await;
        }

        let mut query = String::from("UPDATE shops SET ");
        let mut assignments = Vec::new();
        let mut bind_count = 1;

        if changes.name.is_some() {
            bind_count += 1;
            assignments.push(format!("name = ${}", bind_count));
        }
        if changes.whatsapp_number.is_some() {
            bind_count += 1;
            assignments.push(format!("whatsapp_number = ${}", bind_count));
        }
        if changes.active.is_some() {
            bind_count += 1;
            assignments.push(format!("active = ${}", bind_count));
        }

        query.push_str(&assignments.join(", "));
        query.push_str(&format!(" WHERE id = $1 RETURNING {}", SHOP_COLUMNS));

        let mut q = sqlx::query_as::<_, Shop>(&query).bind(id);
        if let Some(name) = &changes.name {
            q = q.bind(name);
        }
        if let Some(number) = &changes.whatsapp_number {
            q = q.bind(number);
        }
        if let Some(active) = changes.active {
            q = q.bind(active);
        }

        Ok(q.fetch_optional(&self.pool).await?)
    }

    async fn create_shop_with_owner(&self, shop: Shop, owner: User) -> StoreResult<(Shop, User)> {
        let mut tx = self.pool.begin().await?;

        let shop = sqlx::query_as::<_, Shop>(&format!(
            r#"
            INSERT INTO shops (id, name, active, whatsapp_number, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            SHOP_COLUMNS
        ))
        .bind(shop.id)
        .bind(&shop.name)
        .bind(shop.active)
        .bind(&shop.whatsapp_number)
        .bind(shop.created_at)
        .fetch_one(&mut *tx)
        .await?;

        let owner = insert_user_row(&mut *tx, &owner).await?;

        tx.commit().await?;
        Ok((shop, owner))
    }
}

async fn insert_user_row(
    conn: &mut sqlx::PgConnection,
    user: &User,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, name, email, password_hash, role, shop_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .bind(user.shop_id)
    .bind(user.created_at)
    .fetch_one(conn)
    .await
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let mut conn = self.pool.acquire().await?;
        Ok(insert_user_row(&mut *conn, &user).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_users(&self, shop_id: Uuid) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE shop_id = $1 ORDER BY created_at, id",
            USER_COLUMNS
        ))
        .bind(shop_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn delete_user(&self, shop_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND shop_id = $2")
            .bind(user_id)
            .bind(shop_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn list_products(&self, shop_id: Uuid, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {}
            FROM products
            WHERE shop_id = $1
              AND deleted_at IS NULL
              AND ($2::text IS NULL OR strpos(category, $2) > 0)
              AND ($3::text IS NULL OR category = $3)
              AND ($4::text IS NULL OR strpos(lower(name), lower($4)) > 0)
              AND (NOT $5 OR stock > 0)
            ORDER BY created_at, id
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(shop_id)
        .bind(filter.category_contains.as_deref())
        .bind(filter.category_equals.as_deref())
        .bind(filter.name_search.as_deref())
        .bind(filter.in_stock_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn find_product(&self, shop_id: Uuid, id: Uuid) -> StoreResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = $1 AND shop_id = $2 AND deleted_at IS NULL",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .bind(shop_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn insert_product(&self, product: Product) -> StoreResult<Product> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (id, name, description, category, purchase_price,
                                  selling_price, stock, image_url, shop_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.purchase_price)
        .bind(product.selling_price)
        .bind(product.stock)
        .bind(&product.image_url)
        .bind(product.shop_id)
        .bind(product.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    async fn update_product(
        &self,
        shop_id: Uuid,
        id: Uuid,
        changes: &ProductChanges,
    ) -> StoreResult<Option<Product>> {
        if changes.is_empty() {
            return self.find_product(shop_id, id).await;
        }

        let mut assignments = Vec::new();
        let mut bind_count = 2;

        let mut push = |column: &str, present: bool| {
            if present {
                bind_count += 1;
                assignments.push(format!("{} = ${}", column, bind_count));
            }
        };
        push("name", changes.name.is_some());
        push("description", changes.description.is_some());
        push("category", changes.category.is_some());
        push("purchase_price", changes.purchase_price.is_some());
        push("selling_price", changes.selling_price.is_some());
        push("stock", changes.stock.is_some());
        push("image_url", changes.image_url.is_some());

        let query = format!(
            "UPDATE products SET {} WHERE id = $1 AND shop_id = $2 AND deleted_at IS NULL RETURNING {}",
            assignments.join(", "),
            PRODUCT_COLUMNS
        );

        let mut q = sqlx::query_as::<_, Product>(&query).bind(id).bind(shop_id);
        if let Some(name) = &changes.name {
            q = q.bind(name);
        }
        if let Some(description) = &changes.description {
            q = q.bind(description);
        }
        if let Some(category) = &changes.category {
            q = q.bind(category);
        }
        if let Some(price) = changes.purchase_price {
            q = q.bind(price);
        }
        if let Some(price) = changes.selling_price {
            q = q.bind(price);
        }
        if let Some(stock) = changes.stock {
            q = q.bind(stock);
        }
        if let Some(url) = &changes.image_url {
            q = q.bind(url);
        }

        Ok(q.fetch_optional(&self.pool).await?)
    }

    async fn soft_delete_product(&self, shop_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET deleted_at = NOW()
            WHERE id = $1 AND shop_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(shop_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TransactionStore for PgStore {
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnit { tx }))
    }

    async fn list_transactions(
        &self,
        shop_id: Uuid,
        filter: &TransactionFilter,
    ) -> StoreResult<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            SELECT {}
            FROM transactions
            WHERE shop_id = $1
              AND ($2::text IS NULL OR kind = $2)
              AND ($3::timestamptz IS NULL OR created_at >= $3)
              AND ($4::timestamptz IS NULL OR created_at <= $4)
            ORDER BY created_at DESC, id DESC
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(shop_id)
        .bind(filter.kind.map(|k| k.as_str()))
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    async fn dashboard(&self, shop_id: Uuid) -> StoreResult<DashboardSummary> {
        let (total_sales, total_expenses, total_transactions) =
            sqlx::query_as::<_, (Decimal, Decimal, i64)>(
                r#"
                SELECT
                    COALESCE(SUM(amount) FILTER (WHERE kind = 'Sale'), 0),
                    COALESCE(SUM(amount) FILTER (WHERE kind IN ('Expense', 'Withdrawal')), 0),
                    COUNT(*)
                FROM transactions
                WHERE shop_id = $1
                "#,
            )
            .bind(shop_id)
            .fetch_one(&self.pool)
            .await?;

        let total_products = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE shop_id = $1 AND deleted_at IS NULL",
        )
        .bind(shop_id)
        .fetch_one(&self.pool)
        .await?;

        let low_stock = sqlx::query_as::<_, LowStockProduct>(
            r#"
            SELECT id, name, stock, category
            FROM products
            WHERE shop_id = $1 AND deleted_at IS NULL AND stock < $2
            ORDER BY stock, name
            "#,
        )
        .bind(shop_id)
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardSummary::new(
            total_sales,
            total_expenses,
            low_stock,
            total_products,
            total_transactions,
        ))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        crate::db::pool::health_check(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// Unit of work wrapping a database transaction
///
/// `sqlx::Transaction` rolls back when dropped uncommitted.
struct PgUnit {
    tx: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnit {
    async fn lock_product(&mut self, shop_id: Uuid, product_id: Uuid) -> StoreResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {}
            FROM products
            WHERE id = $1 AND shop_id = $2 AND deleted_at IS NULL
            FOR UPDATE
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(product_id)
        .bind(shop_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(product)
    }

    async fn decrement_stock(
        &mut self,
        shop_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> StoreResult<Option<i32>> {
        let remaining = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE products
            SET stock = stock - $3
            WHERE id = $1 AND shop_id = $2 AND deleted_at IS NULL AND stock >= $3
            RETURNING stock
            "#,
        )
        .bind(product_id)
        .bind(shop_id)
        .bind(quantity)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(remaining)
    }

    async fn insert_transaction(&mut self, transaction: Transaction) -> StoreResult<Transaction> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            INSERT INTO transactions (id, kind, product_id, quantity, amount, comment, shop_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(transaction.id)
        .bind(transaction.kind.as_str())
        .bind(transaction.product_id)
        .bind(transaction.quantity)
        .bind(transaction.amount)
        .bind(&transaction.comment)
        .bind(transaction.shop_id)
        .bind(transaction.created_at)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(transaction)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
