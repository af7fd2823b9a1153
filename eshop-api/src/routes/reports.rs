/// Reporting endpoints (SuperAdmin)

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use eshop_shared::{auth::middleware::TenantContext, models::DashboardSummary, services::reports};

/// `GET /api/reports/dashboard`
pub async fn dashboard(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> ApiResult<Json<DashboardSummary>> {
    Ok(Json(reports::dashboard(&*state.store, &ctx).await?))
}
