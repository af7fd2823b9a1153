/// Dashboard aggregates

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product whose stock is under the low-stock threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LowStockProduct {
    pub id: Uuid,
    pub name: String,
    pub stock: i32,
    pub category: String,
}

/// Financial summary of one shop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Sum of Sale amounts
    pub total_sales: Decimal,

    /// Sum of Expense and Withdrawal amounts
    pub total_expenses: Decimal,

    pub net_profit: Decimal,

    pub low_stock_products: Vec<LowStockProduct>,

    /// Live (not soft-deleted) products
    pub total_products: i64,

    pub total_transactions: i64,
}

impl DashboardSummary {
    pub fn new(
        total_sales: Decimal,
        total_expenses: Decimal,
        low_stock_products: Vec<LowStockProduct>,
        total_products: i64,
        total_transactions: i64,
    ) -> Self {
        Self {
            total_sales,
            total_expenses,
            net_profit: total_sales - total_expenses,
            low_stock_products,
            total_products,
            total_transactions,
        }
    }
}
