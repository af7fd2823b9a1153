/// Role-based access policy
///
/// Each protected route area has a fixed set of roles allowed to use it. The
/// check is plain set membership on the role carried by the
/// [`TenantContext`]; there is no hierarchy and no database lookup.
///
/// | Area           | SuperAdmin | Admin |
/// |----------------|:----------:|:-----:|
/// | Shop settings  | yes        | no    |
/// | Staff accounts | yes        | no    |
/// | Dashboard      | yes        | no    |
/// | Inventory      | yes        | yes   |
/// | Transactions   | yes        | yes   |

use super::middleware::TenantContext;
use crate::models::Role;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    #[error("Role {role} is not allowed to access {area}")]
    RoleNotAllowed { role: Role, area: &'static str },
}

/// Set of roles allowed into one route area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    area: &'static str,
    allowed: &'static [Role],
}

impl AccessPolicy {
    pub const SHOP_SETTINGS: Self = Self::new("shop settings", &[Role::SuperAdmin]);
    pub const STAFF: Self = Self::new("staff accounts", &[Role::SuperAdmin]);
    pub const DASHBOARD: Self = Self::new("the dashboard", &[Role::SuperAdmin]);
    pub const INVENTORY: Self = Self::new("inventory", &[Role::SuperAdmin, Role::Admin]);
    pub const TRANSACTIONS: Self = Self::new("transactions", &[Role::SuperAdmin, Role::Admin]);

    pub const fn new(area: &'static str, allowed: &'static [Role]) -> Self {
        Self { area, allowed }
    }

    pub fn area(&self) -> &'static str {
        self.area
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }

    /// Checks the caller's role against the allowed set
    pub fn authorize(&self, ctx: &TenantContext) -> Result<(), AuthzError> {
        if self.allows(ctx.role) {
            return Ok(());
        }

        tracing::warn!(
            user_id = %ctx.user_id,
            shop_id = %ctx.shop_id,
            role = %ctx.role,
            area = self.area,
            "Access denied"
        );

        Err(AuthzError::RoleNotAllowed {
            role: ctx.role,
            area: self.area,
        })
    }
}
