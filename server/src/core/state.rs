use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::payments::CheckoutClient;

/// Server state — shared references to every service
///
/// Cloning is cheap (Arc / handle clones); one instance is shared across
/// all request handlers. No per-request mutable state lives here — all
/// state is in the database.
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | Immutable configuration |
/// | db | Embedded SurrealDB handle |
/// | jwt_service | Token issue/validate |
/// | checkout | Payment gateway client |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub checkout: Arc<CheckoutClient>,
}

impl ServerState {
    /// Initialize the server state: work-dir layout, database, services.
    ///
    /// # Panics
    ///
    /// Panics when the work directory cannot be created or the database
    /// fails to open — the process cannot run without either.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("eshop.db");
        let db_service = DbService::new(&db_path)
            .await
            .expect("Failed to initialize database");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let checkout = Arc::new(CheckoutClient::new(config.checkout.clone()));

        Self {
            config: config.clone(),
            db: db_service.db,
            jwt_service,
            checkout,
        }
    }

    /// Build a state around an already-open database (tests)
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let checkout = Arc::new(CheckoutClient::new(config.checkout.clone()));
        Self {
            config,
            db,
            jwt_service,
            checkout,
        }
    }

    /// Uploads directory under the configured work dir
    pub fn uploads_dir(&self) -> std::path::PathBuf {
        self.config.uploads_dir()
    }
}
