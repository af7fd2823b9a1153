/// Dashboard figures for the caller's shop

use crate::auth::authorization::AccessPolicy;
use crate::auth::middleware::TenantContext;
use crate::error::DomainResult;
use crate::models::DashboardSummary;
use crate::store::TransactionStore;

pub async fn dashboard<S>(store: &S, ctx: &TenantContext) -> DomainResult<DashboardSummary>
where
    S: TransactionStore + ?Sized,
{
    AccessPolicy::DASHBOARD.authorize(ctx)?;

    Ok(store.dashboard(ctx.shop_id).await?)
}
