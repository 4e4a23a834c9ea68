//! Authentication
//!
//! JWT service plus the per-handler authorization extractors.

pub mod extractor;
pub mod jwt;

pub use extractor::AdminUser;
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
