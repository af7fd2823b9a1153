//! # eshop shared library
//!
//! Domain types, authentication, storage and business rules for the
//! multi-tenant shop backend. The HTTP server in `eshop-api` is a thin layer
//! over the services exposed here.
//!
//! ## Module Organization
//!
//! - `models`: shops, users, products, transactions and their inputs
//! - `auth`: tokens, password hashing, tenant context and access policy
//! - `store`: storage traits with PostgreSQL and in-memory implementations
//! - `services`: the domain operations
//! - `db`: connection pool and migrations
//! - `error`: the domain error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use error::{DomainError, DomainResult};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
