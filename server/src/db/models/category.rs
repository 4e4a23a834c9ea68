//! Category Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type CategoryId = RecordId;

/// Category record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CategoryId>,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

impl Category {
    pub fn new(name: String) -> Self {
        Self {
            id: None,
            name,
            icon: String::new(),
            color: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// API view with the record id flattened to a `"category:id"` string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryView {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
}

impl From<Category> for CategoryView {
    fn from(c: Category) -> Self {
        Self {
            id: c.id.map(|id| id.to_string()).unwrap_or_default(),
            name: c.name,
            icon: c.icon,
            color: c.color,
        }
    }
}
