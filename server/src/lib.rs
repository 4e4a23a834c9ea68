//! Eshop Server - e-commerce REST backend
//!
//! # Architecture
//!
//! - **Database** (`db`): embedded SurrealDB storage, repositories per collection
//! - **Auth** (`auth`): JWT + Argon2, per-handler authorization extractors
//! - **HTTP API** (`api`): RESTful resource routers under /api/v1
//! - **Payments** (`payments`): hosted checkout sessions via the gateway's REST API
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/          # config, state, server bootstrap
//! ├── auth/          # JWT service, extractors
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # models and repositories
//! ├── payments/      # payment gateway client
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod payments;
pub mod utils;

// Re-export common types
pub use crate::auth::{AdminUser, CurrentUser, JwtService};
pub use crate::core::{Config, Server, ServerState};
pub use crate::utils::{AppError, AppResult};

// Re-export logger functions
pub use crate::utils::logger::{init_logger, init_logger_with_file};

/// Load .env and initialize logging. Call once at startup.
pub fn setup_environment() {
    dotenv::dotenv().ok();
    init_logger();
}
