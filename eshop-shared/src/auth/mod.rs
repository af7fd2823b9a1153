/// Authentication and authorization
///
/// - [`jwt`]: signed bearer tokens carrying user, shop, role and email
/// - [`password`]: Argon2id hashing with a configurable work factor
/// - [`middleware`]: bearer extraction and the [`TenantContext`](middleware::TenantContext)
///   attached to every authenticated request
/// - [`authorization`]: role-based access policy per route area

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
