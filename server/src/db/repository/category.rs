//! Category Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all categories ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category ORDER BY name")
            .await?
            .take(0)?;
        Ok(categories)
    }

    /// Find category by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        let record_id = parse_record_id(TABLE, id)?;
        let category: Option<Category> = self.base.db().select(record_id).await?;
        Ok(category)
    }

    /// Create a new category
    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        let category = Category {
            id: None,
            name: data.name,
            icon: data.icon.unwrap_or_default(),
            color: data.color.unwrap_or_default(),
        };

        let created: Option<Category> = self.base.db().create(TABLE).content(category).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    /// Merge the supplied fields into an existing category
    pub async fn update(&self, id: &str, data: CategoryUpdate) -> RepoResult<Category> {
        let record_id = parse_record_id(TABLE, id)?;

        #[derive(Serialize)]
        struct CategoryMerge {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            icon: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            color: Option<String>,
        }

        let updated: Option<Category> = self
            .base
            .db()
            .update(record_id)
            .merge(CategoryMerge {
                name: data.name,
                icon: data.icon,
                color: data.color,
            })
            .await?;

        updated.ok_or_else(|| RepoError::NotFound(format!("Category {}", id)))
    }

    /// Hard delete a category.
    ///
    /// Products referencing it are left with an orphaned link — deletion
    /// in use is not guarded.
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let record_id = parse_record_id(TABLE, id)?;
        let deleted: Option<Category> = self.base.db().delete(record_id).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Category {}", id)));
        }
        Ok(())
    }
}
