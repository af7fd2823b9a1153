/// Transaction endpoints (SuperAdmin and Admin)
///
/// # Endpoints
///
/// - `GET  /api/transactions?type=&date_from=&date_to=` - newest first
/// - `POST /api/transactions` - record a Sale, Expense or Withdrawal
///
/// A Sale decrements the product's stock in the same database transaction
/// that records it; a sale larger than the stock fails with
/// `insufficient_stock` and changes nothing.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use eshop_shared::{
    auth::middleware::TenantContext,
    models::{Transaction, TransactionDraft, TransactionFilter},
    services::ledger,
};
use serde::{Deserialize, Serialize};

/// Listing query
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TransactionQuery {
    /// `Sale`, `Expense` or `Withdrawal`
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// `YYYY-MM-DD`, inclusive
    pub date_from: Option<String>,

    /// `YYYY-MM-DD`, inclusive
    pub date_to: Option<String>,
}

/// Transaction listing
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionList {
    pub transactions: Vec<Transaction>,
    pub total: usize,
}

pub async fn list_transactions(
    State(state): State<AppState>,
    ctx: TenantContext,
    query: Result<Query<TransactionQuery>, QueryRejection>,
) -> ApiResult<Json<TransactionList>> {
    let Query(query) = query?;

    let filter = TransactionFilter::from_query(
        query.kind.as_deref(),
        query.date_from.as_deref(),
        query.date_to.as_deref(),
    )
    .map_err(ApiError::BadRequest)?;

    let transactions = ledger::list_transactions(&*state.store, &ctx, &filter).await?;

    Ok(Json(TransactionList {
        total: transactions.len(),
        transactions,
    }))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    ctx: TenantContext,
    payload: Result<Json<TransactionDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let Json(draft) = payload?;

    let transaction = ledger::record_transaction(&*state.store, &ctx, draft).await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
