/// Domain services
///
/// Each operation takes the store it needs (as a trait bound, so any
/// [`Store`](crate::store::Store) works) and, for authenticated operations,
/// the caller's [`TenantContext`](crate::auth::middleware::TenantContext).
/// Tenant scoping comes from the context alone.
///
/// - [`accounts`]: registration, login and staff management
/// - [`shops`]: the caller's shop settings
/// - [`inventory`]: product catalog with role-based projection
/// - [`ledger`]: transaction engine, including atomic sales
/// - [`storefront`]: unauthenticated public catalog
/// - [`reports`]: dashboard figures

use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

pub mod accounts;
pub mod inventory;
pub mod ledger;
pub mod reports;
pub mod shops;
pub mod storefront;

/// Parses an identifier taken from a URL path or request field
pub fn parse_id(raw: &str, what: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| DomainError::validation(format!("Invalid {} ID", what)))
}
