/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `shops`: Settings of the caller's shop
/// - `users`: Staff accounts of the caller's shop
/// - `products`: Inventory
/// - `transactions`: Sales, expenses and withdrawals
/// - `reports`: Dashboard
/// - `public`: Anonymous storefront

pub mod auth;
pub mod health;
pub mod products;
pub mod public;
pub mod reports;
pub mod shops;
pub mod transactions;
pub mod users;

use serde::{Deserialize, Serialize};

/// Body returned by delete endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
