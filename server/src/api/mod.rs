//! API route modules
//!
//! One module per resource, each exposing a `router()` nested under the
//! `/api/v1` prefix:
//!
//! - [`health`] - liveness check
//! - [`categories`] - category management
//! - [`products`] - product catalog, search and pagination
//! - [`users`] - registration, login, user management
//! - [`orders`] - order workflow, checkout, sales aggregates
//! - [`upload`] - serving uploaded images
//!
//! Authorization is declared per handler through the [`crate::auth`]
//! extractors; there is no ambient auth middleware.

pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod upload;
pub mod users;

use serde::Serialize;

/// Success envelope for destructive operations
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
