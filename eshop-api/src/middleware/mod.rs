/// Middleware modules for the API server
///
/// - `auth`: bearer-token authentication and per-area role gates

pub mod auth;
