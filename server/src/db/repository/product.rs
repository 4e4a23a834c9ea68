//! Product Repository
//!
//! Owns the product listing query builder: optional category filter,
//! case-insensitive name search, sorting and pagination, always returning
//! the page together with the total count matching the filter.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Category, Product, ProductCreate, ProductUpdate, ProductWithCategory};
use chrono::Utc;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "product";
const CATEGORY_TABLE: &str = "category";

/// Sort keys accepted by the listing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSort {
    NameAsc,
    PriceAsc,
    PriceDesc,
    RatingDesc,
}

impl ProductSort {
    /// Parse the public query-string value; unknown values mean unsorted
    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "name" => Some(Self::NameAsc),
            "priceAsc" => Some(Self::PriceAsc),
            "priceDesc" => Some(Self::PriceDesc),
            "rating" => Some(Self::RatingDesc),
            _ => None,
        }
    }

    fn order_clause(self) -> &'static str {
        match self {
            Self::NameAsc => " ORDER BY name ASC",
            Self::PriceAsc => " ORDER BY price ASC",
            Self::PriceDesc => " ORDER BY price DESC",
            Self::RatingDesc => " ORDER BY rating DESC",
        }
    }
}

/// Listing parameters. Category filter takes precedence over the text
/// search when both are supplied.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Category ids ("category:x" or bare keys)
    pub categories: Option<Vec<String>>,
    /// Case-insensitive substring match against name
    pub search_text: Option<String>,
    pub sort: Option<ProductSort>,
    /// (1-based page number, page size); None lists everything
    pub page: Option<(u32, u32)>,
}

/// One page of products plus the total count matching the filter
/// (unbounded by pagination)
#[derive(Debug)]
pub struct ProductPage {
    pub count: i64,
    pub products: Vec<ProductWithCategory>,
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Require that the referenced category exists. Application-level check
    /// only; the storage layer does not enforce the link.
    async fn require_category(&self, id: &str) -> RepoResult<RecordId> {
        let record_id = parse_record_id(CATEGORY_TABLE, id)?;
        let category: Option<Category> = self.base.db().select(record_id.clone()).await?;
        if category.is_none() {
            return Err(RepoError::Validation(format!("Invalid category: {}", id)));
        }
        Ok(record_id)
    }

    /// Paginated / filtered / sorted listing with the total filter count.
    ///
    /// skip = page_size × (page − 1); skipping past the end yields an empty
    /// page, never an error.
    pub async fn search(&self, query: ProductQuery) -> RepoResult<ProductPage> {
        let mut where_clause = String::new();
        let mut category_ids: Vec<RecordId> = Vec::new();
        let mut search_text: Option<String> = None;

        if let Some(categories) = &query.categories
            && !categories.is_empty()
        {
            for id in categories {
                category_ids.push(parse_record_id(CATEGORY_TABLE, id)?);
            }
            where_clause.push_str(" WHERE category IN $categories");
        } else if let Some(text) = &query.search_text
            && !text.is_empty()
        {
            search_text = Some(text.clone());
            where_clause
                .push_str(" WHERE string::contains(string::lowercase(name), string::lowercase($search))");
        }

        // Total count matching the filter, unbounded by pagination
        let count_sql = format!("SELECT count() AS count FROM product{where_clause} GROUP ALL");
        let mut count_query = self.base.db().query(&count_sql);
        if !category_ids.is_empty() {
            count_query = count_query.bind(("categories", category_ids.clone()));
        }
        if let Some(text) = &search_text {
            count_query = count_query.bind(("search", text.clone()));
        }
        let count: Option<i64> = count_query.await?.take((0, "count"))?;
        let count = count.unwrap_or(0);

        let mut page_sql = format!("SELECT * FROM product{where_clause}");
        if let Some(sort) = query.sort {
            page_sql.push_str(sort.order_clause());
        }
        if let Some((page, page_size)) = query.page {
            let page = page.max(1);
            let start = (page_size as u64) * (page as u64 - 1);
            page_sql.push_str(&format!(" LIMIT {page_size} START {start}"));
        }
        page_sql.push_str(" FETCH category");

        let mut page_query = self.base.db().query(&page_sql);
        if !category_ids.is_empty() {
            page_query = page_query.bind(("categories", category_ids));
        }
        if let Some(text) = search_text {
            page_query = page_query.bind(("search", text));
        }
        let products: Vec<ProductWithCategory> = page_query.await?.take(0)?;

        Ok(ProductPage { count, products })
    }

    /// Unfiltered, unpaginated listing with categories resolved (admin view)
    pub async fn find_all(&self) -> RepoResult<Vec<ProductWithCategory>> {
        let products: Vec<ProductWithCategory> = self
            .base
            .db()
            .query("SELECT * FROM product FETCH category")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id with its category resolved
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ProductWithCategory>> {
        let record_id = parse_record_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE id = $id FETCH category")
            .bind(("id", record_id))
            .await?;
        let products: Vec<ProductWithCategory> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Find the raw product record (category as a record link)
    pub async fn find_raw(&self, id: &str) -> RepoResult<Option<Product>> {
        let record_id = parse_record_id(TABLE, id)?;
        let product: Option<Product> = self.base.db().select(record_id).await?;
        Ok(product)
    }

    /// Featured products, newest first, limited to `count`
    pub async fn find_featured(&self, count: u32) -> RepoResult<Vec<ProductWithCategory>> {
        let products: Vec<ProductWithCategory> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM product WHERE is_featured = true LIMIT {count} FETCH category"
            ))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Create a new product. The category must exist; the image URL path
    /// comes from the upload step.
    pub async fn create(&self, data: ProductCreate, image: String) -> RepoResult<Product> {
        let category = self.require_category(&data.category).await?;

        let product = Product {
            id: None,
            name: data.name,
            description: data.description.unwrap_or_default(),
            rich_description: data.rich_description.unwrap_or_default(),
            image,
            images: Vec::new(),
            brand: data.brand.unwrap_or_default(),
            price: data.price,
            category,
            count_in_stock: data.count_in_stock,
            rating: data.rating.unwrap_or(0.0),
            num_reviews: data.num_reviews.unwrap_or(0),
            is_featured: data.is_featured.unwrap_or(false),
            date_created: Utc::now().to_rfc3339(),
        };

        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product. Only supplied fields are written; a supplied
    /// category is validated first.
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let record_id = parse_record_id(TABLE, id)?;

        let category = match &data.category {
            Some(cat) => Some(self.require_category(cat).await?),
            None => None,
        };

        // Build dynamic SET clauses with typed bindings
        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() { set_parts.push("name = $name"); }
        if data.description.is_some() { set_parts.push("description = $description"); }
        if data.rich_description.is_some() { set_parts.push("rich_description = $rich_description"); }
        if data.image.is_some() { set_parts.push("image = $image"); }
        if data.images.is_some() { set_parts.push("images = $images"); }
        if data.brand.is_some() { set_parts.push("brand = $brand"); }
        if data.price.is_some() { set_parts.push("price = $price"); }
        if category.is_some() { set_parts.push("category = $category"); }
        if data.count_in_stock.is_some() { set_parts.push("count_in_stock = $count_in_stock"); }
        if data.rating.is_some() { set_parts.push("rating = $rating"); }
        if data.num_reviews.is_some() { set_parts.push("num_reviews = $num_reviews"); }
        if data.is_featured.is_some() { set_parts.push("is_featured = $is_featured"); }

        if set_parts.is_empty() {
            return self
                .find_raw(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Product {}", id)));
        }

        let query_str = format!("UPDATE $id SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self.base.db().query(query_str).bind(("id", record_id));
        if let Some(v) = data.name { query = query.bind(("name", v)); }
        if let Some(v) = data.description { query = query.bind(("description", v)); }
        if let Some(v) = data.rich_description { query = query.bind(("rich_description", v)); }
        if let Some(v) = data.image { query = query.bind(("image", v)); }
        if let Some(v) = data.images { query = query.bind(("images", v)); }
        if let Some(v) = data.brand { query = query.bind(("brand", v)); }
        if let Some(v) = data.price { query = query.bind(("price", v)); }
        if let Some(v) = category { query = query.bind(("category", v)); }
        if let Some(v) = data.count_in_stock { query = query.bind(("count_in_stock", v)); }
        if let Some(v) = data.rating { query = query.bind(("rating", v)); }
        if let Some(v) = data.num_reviews { query = query.bind(("num_reviews", v)); }
        if let Some(v) = data.is_featured { query = query.bind(("is_featured", v)); }

        let mut result = query.await?;
        let products: Vec<Product> = result.take(0)?;

        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {}", id)))
    }

    /// Replace the gallery image URL list
    pub async fn update_gallery(&self, id: &str, images: Vec<String>) -> RepoResult<Product> {
        let record_id = parse_record_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET images = $images RETURN AFTER")
            .bind(("id", record_id))
            .bind(("images", images))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {}", id)))
    }

    /// Hard delete a product
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let record_id = parse_record_id(TABLE, id)?;
        let deleted: Option<Product> = self.base.db().delete(record_id).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Product {}", id)));
        }
        Ok(())
    }

    /// Total product count
    pub async fn count(&self) -> RepoResult<i64> {
        self.base.count(TABLE).await
    }
}
