/// Transaction engine
///
/// Records ledger entries for the caller's shop. A Sale runs as one unit of
/// work:
///
/// ```text
/// lock product ──► check stock ──► decrement ──► append entry ──► commit
///      │               │               │              │
///      └── NotFound    └── Insufficient└──────────────┴── any error: rollback
/// ```
///
/// The unit is dropped on every early return, which discards its staged
/// writes, so a failed sale leaves neither a stock change nor a ledger entry.
/// Expenses and withdrawals never touch stock, but a product they mention
/// must still belong to the caller's shop.

use tracing::{debug, info};
use validator::Validate;

use crate::auth::authorization::AccessPolicy;
use crate::auth::middleware::TenantContext;
use crate::error::{DomainError, DomainResult};
use crate::models::{
    check_money, NewTransaction, Transaction, TransactionDraft, TransactionFilter, TransactionKind,
};
use crate::store::TransactionStore;

/// Checks that `quantity` units can be taken from `available`
///
/// Returns the stock left after the sale.
pub fn check_stock(available: i32, quantity: i32) -> DomainResult<i32> {
    if quantity > available {
        return Err(DomainError::InsufficientStock {
            requested: quantity,
            available,
        });
    }
    Ok(available - quantity)
}

/// Records a transaction, atomically adjusting stock for sales
pub async fn record_transaction<S>(
    store: &S,
    ctx: &TenantContext,
    draft: TransactionDraft,
) -> DomainResult<Transaction>
where
    S: TransactionStore + ?Sized,
{
    AccessPolicy::TRANSACTIONS.authorize(ctx)?;
    draft.validate()?;

    check_money("amount", draft.amount).map_err(DomainError::Validation)?;
    if draft.kind == TransactionKind::Sale {
        if draft.product_id.is_none() {
            return Err(DomainError::validation("A sale requires a product_id"));
        }
        if draft.quantity <= 0 {
            return Err(DomainError::validation("A sale requires a quantity greater than 0"));
        }
    }

    let mut unit = store.begin().await?;

    if let Some(product_id) = draft.product_id {
        let product = unit
            .lock_product(ctx.shop_id, product_id)
            .await?
            .ok_or(DomainError::NotFound("Product"))?;

        if draft.kind == TransactionKind::Sale {
            let expected = check_stock(product.stock, draft.quantity)?;
            let remaining = unit
                .decrement_stock(ctx.shop_id, product_id, draft.quantity)
                .await?
                .ok_or(DomainError::InsufficientStock {
                    requested: draft.quantity,
                    available: product.stock,
                })?;
            debug!(product_id = %product_id, expected, remaining, "Stock decremented");
        }
    }

    let entry = NewTransaction {
        shop_id: ctx.shop_id,
        kind: draft.kind,
        product_id: draft.product_id,
        quantity: draft.quantity,
        amount: draft.amount,
        comment: draft.comment.filter(|c| !c.trim().is_empty()),
    }
    .into_transaction();

    let transaction = unit.insert_transaction(entry).await?;
    unit.commit().await?;

    info!(
        transaction_id = %transaction.id,
        shop_id = %ctx.shop_id,
        kind = %transaction.kind,
        quantity = transaction.quantity,
        "Transaction recorded"
    );
    Ok(transaction)
}

/// Lists the caller's transactions, newest first
pub async fn list_transactions<S>(
    store: &S,
    ctx: &TenantContext,
    filter: &TransactionFilter,
) -> DomainResult<Vec<Transaction>>
where
    S: TransactionStore + ?Sized,
{
    AccessPolicy::TRANSACTIONS.authorize(ctx)?;

    Ok(store.list_transactions(ctx.shop_id, filter).await?)
}
