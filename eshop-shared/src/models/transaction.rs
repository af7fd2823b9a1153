/// Ledger transactions
///
/// Transactions are append-only: they are created by the transaction engine
/// and never updated or deleted afterwards. A Sale always references a product
/// of the same shop and decrements its stock in the same atomic unit.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::UnknownVariant;

/// Kind of ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money in, stock out
    Sale,

    /// Money out for shop costs
    Expense,

    /// Money taken out of the shop by its owner
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Sale => "Sale",
            TransactionKind::Expense => "Expense",
            TransactionKind::Withdrawal => "Withdrawal",
        }
    }

    /// Whether the amount counts as an outflow on the dashboard
    pub fn is_outflow(&self) -> bool {
        matches!(self, TransactionKind::Expense | TransactionKind::Withdrawal)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sale" => Ok(TransactionKind::Sale),
            "Expense" => Ok(TransactionKind::Expense),
            "Withdrawal" => Ok(TransactionKind::Withdrawal),
            other => Err(UnknownVariant {
                kind: "transaction type",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for TransactionKind {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Transaction model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: Uuid,

    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub kind: TransactionKind,

    pub product_id: Option<Uuid>,

    pub quantity: i32,

    pub amount: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    pub shop_id: Uuid,

    pub created_at: DateTime<Utc>,
}

/// Transaction creation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TransactionDraft {
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    #[serde(default)]
    pub product_id: Option<Uuid>,

    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    #[serde(default)]
    pub quantity: i32,

    pub amount: Decimal,

    #[serde(default)]
    pub comment: Option<String>,
}

/// Ledger entry ready to be appended
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub shop_id: Uuid,
    pub kind: TransactionKind,
    pub product_id: Option<Uuid>,
    pub quantity: i32,
    pub amount: Decimal,
    pub comment: Option<String>,
}

impl NewTransaction {
    pub fn into_transaction(self) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            kind: self.kind,
            product_id: self.product_id,
            quantity: self.quantity,
            amount: self.amount,
            comment: self.comment,
            shop_id: self.shop_id,
            created_at: Utc::now(),
        }
    }
}

/// Listing filter; bounds are inclusive
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    /// Builds a filter from raw query values
    ///
    /// Dates use the `YYYY-MM-DD` format and are read as UTC calendar days:
    /// `date_from` starts at midnight, `date_to` covers the whole day.
    pub fn from_query(
        kind: Option<&str>,
        date_from: Option<&str>,
        date_to: Option<&str>,
    ) -> Result<Self, String> {
        let kind = match non_empty(kind) {
            Some(raw) => Some(raw.parse::<TransactionKind>().map_err(|e| e.to_string())?),
            None => None,
        };

        let from = match non_empty(date_from) {
            Some(raw) => Some(day_bound(raw, "date_from", NaiveTime::MIN)?),
            None => None,
        };

        let end_of_day = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
            .ok_or_else(|| "invalid end-of-day time".to_string())?;
        let to = match non_empty(date_to) {
            Some(raw) => Some(day_bound(raw, "date_to", end_of_day)?),
            None => None,
        };

        Ok(Self { kind, from, to })
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        if let Some(kind) = self.kind {
            if transaction.kind != kind {
                return false;
            }
        }
        if let Some(from) = self.from {
            if transaction.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if transaction.created_at > to {
                return false;
            }
        }
        true
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn day_bound(raw: &str, field: &str, time: NaiveTime) -> Result<DateTime<Utc>, String> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("{} must use the YYYY-MM-DD format", field))?;
    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}
