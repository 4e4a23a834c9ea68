use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::payments::CheckoutConfig;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Working directory (database, uploads, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | JWT_SECRET | (dev only default) | HS256 signing secret |
/// | JWT_EXPIRATION_MINUTES | 1440 | Token lifetime |
/// | STRIPE_SECRET_KEY | (empty) | Payment gateway secret key |
/// | STRIPE_API_BASE | https://api.stripe.com | Gateway base URL |
/// | CHECKOUT_SUCCESS_URL | http://localhost:4200/success | Redirect on paid |
/// | CHECKOUT_CANCEL_URL | http://localhost:4200/error | Redirect on cancel |
/// | CHECKOUT_CURRENCY | usd | ISO currency code |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database, uploads and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Payment gateway configuration
    pub checkout: CheckoutConfig,
    /// development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            checkout: CheckoutConfig::from_env(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Directory holding the embedded database files
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Directory holding uploaded images, served under /public/uploads
    pub fn uploads_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("public").join("uploads")
    }

    /// Create the work-dir layout if missing
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.uploads_dir())?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
