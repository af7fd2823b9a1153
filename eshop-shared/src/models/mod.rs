/// Domain models for the shop backend
///
/// Each model maps to one table in the PostgreSQL schema and doubles as the
/// in-memory record kept by the memory store. Input shapes (`New*`, `*Changes`,
/// request bodies) live next to the record they produce.
///
/// # Models
///
/// - `Shop`: a tenant; owns every other record
/// - `User`: an authenticated principal bound to exactly one shop
/// - `Product`: a catalog entry with stock, soft-deletable
/// - `Transaction`: an append-only ledger entry (Sale, Expense, Withdrawal)
/// - `DashboardSummary`: aggregated ledger figures for one shop

use rust_decimal::Decimal;

pub mod product;
pub mod report;
pub mod shop;
pub mod transaction;
pub mod user;

pub use product::{
    NewProduct, Product, ProductChanges, ProductDraft, ProductFilter, ProductView, StockStatus,
};
pub use report::{DashboardSummary, LowStockProduct};
pub use shop::{NewShop, Shop, ShopChanges};
pub use transaction::{NewTransaction, Transaction, TransactionDraft, TransactionFilter, TransactionKind};
pub use user::{CreateUserRequest, LoginRequest, NewUser, RegisterRequest, Role, User, UserView};

/// Exclusive upper bound of a `NUMERIC(12, 2)` column
const MONEY_CEILING: i64 = 10_000_000_000;

/// Checks a price or amount against the stored money format
///
/// Money must be positive, carry at most two decimal places and stay below
/// ten billion. Trailing zeros do not count as decimal places.
pub fn check_money(field: &str, value: Decimal) -> Result<(), String> {
    if value <= Decimal::ZERO {
        return Err(format!("{} must be greater than 0", field));
    }
    if value.normalize().scale() > 2 {
        return Err(format!("{} cannot have more than 2 decimal places", field));
    }
    if value >= Decimal::from(MONEY_CEILING) {
        return Err(format!("{} must be less than {}", field, MONEY_CEILING));
    }
    Ok(())
}

/// Error returned when a stored or submitted enum value is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
