//! Repository Module
//!
//! CRUD operations over the SurrealDB collections. Handlers never talk to
//! the database directly; each collection gets a repository that owns its
//! queries and translates storage errors into [`RepoError`].

pub mod category;
pub mod order;
pub mod product;
pub mod user;

pub use category::CategoryRepository;
pub use order::OrderRepository;
pub use product::{ProductPage, ProductQuery, ProductRepository, ProductSort};
pub use user::UserRepository;

use crate::utils::AppError;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:id" throughout the stack
// =============================================================================
//
// API clients may send either the full "table:id" form or the bare key.
// parse_record_id() accepts both and always yields a RecordId in the given
// table; a "table:id" input naming a different table is rejected.

/// Parse a client-supplied id into a record id of `table`
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    match id.split_once(':') {
        Some((tb, key)) if tb == table => Ok(RecordId::from_table_key(table, key)),
        Some((tb, _)) => Err(RepoError::Validation(format!(
            "Invalid id '{id}': expected table '{table}', got '{tb}'"
        ))),
        None => {
            if id.is_empty() {
                return Err(RepoError::Validation(format!("Empty {table} id")));
            }
            Ok(RecordId::from_table_key(table, id))
        }
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Count all records in a collection. Empty collection counts as zero —
    /// a valid result, never an error.
    pub async fn count(&self, table: &str) -> RepoResult<i64> {
        let mut result = self
            .db
            .query(format!("SELECT count() AS count FROM {table} GROUP ALL"))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_bare_key_and_prefixed_form() {
        let a = parse_record_id("product", "abc123").unwrap();
        let b = parse_record_id("product", "product:abc123").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.table(), "product");
    }

    #[test]
    fn parse_rejects_wrong_table_and_empty() {
        assert!(parse_record_id("product", "category:abc").is_err());
        assert!(parse_record_id("product", "").is_err());
    }
}
