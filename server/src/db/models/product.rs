//! Product Model

use super::category::{Category, CategoryView};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type ProductId = RecordId;

/// Product record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rich_description: String,
    /// Public URL path of the main image, e.g. `/public/uploads/xxx.jpg`
    #[serde(default)]
    pub image: String,
    /// Gallery image URL paths
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub brand: String,
    pub price: f64,
    /// Record link to category (validated against the category table at write time)
    pub category: RecordId,
    #[serde(default)]
    pub count_in_stock: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: i64,
    #[serde(default)]
    pub is_featured: bool,
    /// RFC 3339 creation timestamp
    pub date_created: String,
}

/// Create payload. `name`, `price`, `category` and `count_in_stock` are
/// required; everything else defaults. The image arrives as a separate
/// multipart field and is filled in by the handler.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub rich_description: Option<String>,
    pub brand: Option<String>,
    pub price: f64,
    /// Category id, `"category:xxx"` or bare key
    pub category: String,
    pub count_in_stock: i64,
    pub rating: Option<f64>,
    pub num_reviews: Option<i64>,
    pub is_featured: Option<bool>,
}

/// Update payload. All fields optional; only supplied fields are merged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub rich_description: Option<String>,
    /// New main image URL path (set by the handler after a multipart upload)
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub count_in_stock: Option<i64>,
    pub rating: Option<f64>,
    pub num_reviews: Option<i64>,
    pub is_featured: Option<bool>,
}

/// Read view with the category record link resolved (`FETCH category`).
///
/// `category` is `None` when the link points at a deleted category —
/// category deletion is not guarded, orphaned references are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductWithCategory {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rich_description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub brand: String,
    pub price: f64,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub count_in_stock: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: i64,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub date_created: String,
}

/// API view, camelCase to match the public JSON contract
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rich_description: String,
    pub image: String,
    pub images: Vec<String>,
    pub brand: String,
    pub price: f64,
    pub category: Option<CategoryView>,
    pub count_in_stock: i64,
    pub rating: f64,
    pub num_reviews: i64,
    pub is_featured: bool,
    pub date_created: String,
}

impl From<ProductWithCategory> for ProductView {
    fn from(p: ProductWithCategory) -> Self {
        Self {
            id: p.id.map(|id| id.to_string()).unwrap_or_default(),
            name: p.name,
            description: p.description,
            rich_description: p.rich_description,
            image: p.image,
            images: p.images,
            brand: p.brand,
            price: p.price,
            category: p.category.map(CategoryView::from),
            count_in_stock: p.count_in_stock,
            rating: p.rating,
            num_reviews: p.num_reviews,
            is_featured: p.is_featured,
            date_created: p.date_created,
        }
    }
}
