//! Product API Handlers
//!
//! The listing endpoint is the query-builder surface: category filter,
//! name search, sort and a two-element `pageIndex` pair (page number, page
//! size). Create/update are multipart because the main image travels with
//! the fields.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Serialize;

use crate::api::MessageResponse;
use crate::api::upload::save_image;
use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::models::{ProductCreate, ProductUpdate, ProductView};
use crate::db::repository::{ProductQuery, ProductRepository, ProductSort};
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, validate_non_negative, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Gallery upload limit
const MAX_GALLERY_IMAGES: usize = 10;

// =============================================================================
// Listing
// =============================================================================

/// Paginated listing response: the page plus the total count matching the
/// filter, so the caller can compute total pages
#[derive(Debug, Serialize)]
pub struct ProductPageResponse {
    pub count: i64,
    pub products: Vec<ProductView>,
}

/// Parse the raw query pairs into a [`ProductQuery`].
///
/// `pageIndex` appears twice: first the 1-based page number, then the page
/// size. A missing or incomplete pair means an unpaginated listing.
fn parse_list_query(pairs: &[(String, String)]) -> Result<ProductQuery, AppError> {
    let mut query = ProductQuery::default();
    let mut page_index: Vec<u32> = Vec::new();

    for (key, value) in pairs {
        match key.as_str() {
            "categories" => {
                let ids: Vec<String> = value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if !ids.is_empty() {
                    query.categories = Some(ids);
                }
            }
            "searchText" => {
                if !value.is_empty() {
                    query.search_text = Some(value.clone());
                }
            }
            "sort" => {
                query.sort = ProductSort::from_query(value);
            }
            "pageIndex" => {
                let n: u32 = value.parse().map_err(|_| {
                    AppError::validation(format!("Invalid pageIndex value: {value}"))
                })?;
                page_index.push(n);
            }
            _ => {}
        }
    }

    if page_index.len() >= 2 {
        let page = page_index[0].max(1);
        let page_size = page_index[1];
        if page_size == 0 {
            return Err(AppError::validation("pageIndex page size must be positive"));
        }
        query.page = Some((page, page_size));
    }

    Ok(query)
}

/// GET /api/v1/products - filtered/sorted/paginated listing, public
pub async fn list(
    State(state): State<ServerState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<ProductPageResponse>> {
    let query = parse_list_query(&pairs)?;

    let repo = ProductRepository::new(state.db.clone());
    let page = repo.search(query).await?;

    Ok(Json(ProductPageResponse {
        count: page.count,
        products: page.products.into_iter().map(ProductView::from).collect(),
    }))
}

/// GET /api/v1/products/productsAdmin - unpaginated listing, admin
pub async fn list_admin(
    State(state): State<ServerState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<ProductView>>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.find_all().await?;
    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

/// GET /api/v1/products/{id} - single product with category, public
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductView>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", id)))?;
    Ok(Json(product.into()))
}

/// GET /api/v1/products/get/featured/{count} - featured products, public
pub async fn featured(
    State(state): State<ServerState>,
    Path(count): Path<u32>,
) -> AppResult<Json<Vec<ProductView>>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.find_featured(count).await?;
    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

/// Count response, `{ "productCount": n }`
#[derive(Debug, Serialize)]
pub struct ProductCountResponse {
    #[serde(rename = "productCount")]
    pub product_count: i64,
}

/// GET /api/v1/products/get/count - total product count, public.
///
/// Zero is a valid count, not an error.
pub async fn count(State(state): State<ServerState>) -> AppResult<Json<ProductCountResponse>> {
    let repo = ProductRepository::new(state.db.clone());
    let product_count = repo.count().await?;
    Ok(Json(ProductCountResponse { product_count }))
}

// =============================================================================
// Multipart create / update
// =============================================================================

/// Drain a multipart stream into text fields plus image files.
///
/// `image_field` names the file field to accept; at most `max_images`
/// files are read.
async fn read_multipart(
    multipart: &mut Multipart,
    image_field: &str,
    max_images: usize,
) -> AppResult<(HashMap<String, String>, Vec<(String, Vec<u8>)>)> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut images: Vec<(String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == image_field {
            if images.len() >= max_images {
                return Err(AppError::validation(format!(
                    "At most {max_images} '{image_field}' files are allowed"
                )));
            }
            let filename = field
                .file_name()
                .map(|s| s.to_string())
                .ok_or_else(|| AppError::validation("Image field has no filename"))?;
            let data = field.bytes().await?.to_vec();
            images.push((filename, data));
        } else {
            let value = field.text().await?;
            fields.insert(name, value);
        }
    }

    Ok((fields, images))
}

fn parse_f64(fields: &HashMap<String, String>, key: &str) -> AppResult<Option<f64>> {
    match fields.get(key) {
        Some(v) if !v.is_empty() => v
            .parse::<f64>()
            .map(Some)
            .map_err(|_| AppError::validation(format!("Invalid number for {key}: {v}"))),
        _ => Ok(None),
    }
}

fn parse_i64(fields: &HashMap<String, String>, key: &str) -> AppResult<Option<i64>> {
    match fields.get(key) {
        Some(v) if !v.is_empty() => v
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::validation(format!("Invalid integer for {key}: {v}"))),
        _ => Ok(None),
    }
}

fn parse_bool(fields: &HashMap<String, String>, key: &str) -> AppResult<Option<bool>> {
    match fields.get(key) {
        Some(v) if !v.is_empty() => v
            .parse::<bool>()
            .map(Some)
            .map_err(|_| AppError::validation(format!("Invalid boolean for {key}: {v}"))),
        _ => Ok(None),
    }
}

fn require_field(fields: &HashMap<String, String>, key: &str) -> AppResult<String> {
    fields
        .get(key)
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or_else(|| AppError::validation(format!("Missing required field: {key}")))
}

/// POST /api/v1/products - create product, admin, multipart with a single
/// required `image` field
pub async fn create(
    State(state): State<ServerState>,
    _admin: AdminUser,
    mut multipart: Multipart,
) -> AppResult<Json<ProductView>> {
    let (fields, mut images) = read_multipart(&mut multipart, "image", 1).await?;

    let (filename, data) = images
        .pop()
        .ok_or_else(|| AppError::validation("No image file in the request!"))?;

    let payload = ProductCreate {
        name: require_field(&fields, "name")?,
        description: fields.get("description").cloned(),
        rich_description: fields.get("richDescription").cloned(),
        brand: fields.get("brand").cloned(),
        price: parse_f64(&fields, "price")?
            .ok_or_else(|| AppError::validation("Missing required field: price"))?,
        category: require_field(&fields, "category")?,
        count_in_stock: parse_i64(&fields, "countInStock")?
            .ok_or_else(|| AppError::validation("Missing required field: countInStock"))?,
        rating: parse_f64(&fields, "rating")?,
        num_reviews: parse_i64(&fields, "numReviews")?,
        is_featured: parse_bool(&fields, "isFeatured")?,
    };

    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.rich_description, "richDescription", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.brand, "brand", MAX_NAME_LEN)?;
    validate_non_negative(payload.price, "price")?;
    if payload.count_in_stock < 0 {
        return Err(AppError::validation("countInStock must be non-negative"));
    }

    let image_url = save_image(&state, &filename, data).await?;

    let repo = ProductRepository::new(state.db.clone());
    let created = repo.create(payload, image_url).await?;

    let id = created
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();
    tracing::info!(product_id = %id, "Product created");

    // Re-read with the category resolved for the response
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::internal("Created product could not be read back"))?;
    Ok(Json(product.into()))
}

/// PUT /api/v1/products/{id} - update product, admin, multipart with an
/// optional `image` field (existing image is kept when absent)
pub async fn update(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<ProductView>> {
    let (fields, mut images) = read_multipart(&mut multipart, "image", 1).await?;

    let image = match images.pop() {
        Some((filename, data)) => Some(save_image(&state, &filename, data).await?),
        None => None,
    };

    let payload = ProductUpdate {
        name: fields.get("name").cloned(),
        description: fields.get("description").cloned(),
        rich_description: fields.get("richDescription").cloned(),
        image,
        images: None,
        brand: fields.get("brand").cloned(),
        price: parse_f64(&fields, "price")?,
        category: fields.get("category").cloned(),
        count_in_stock: parse_i64(&fields, "countInStock")?,
        rating: parse_f64(&fields, "rating")?,
        num_reviews: parse_i64(&fields, "numReviews")?,
        is_featured: parse_bool(&fields, "isFeatured")?,
    };

    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.rich_description, "richDescription", MAX_DESCRIPTION_LEN)?;
    if let Some(price) = payload.price {
        validate_non_negative(price, "price")?;
    }

    let repo = ProductRepository::new(state.db.clone());
    let updated = repo.update(&id, payload).await?;

    let id = updated
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::internal("Updated product could not be read back"))?;
    Ok(Json(product.into()))
}

/// PUT /api/v1/products/gallery-images/{id} - replace the gallery, admin,
/// multipart with up to 10 `images` fields
pub async fn update_gallery(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<ProductView>> {
    let (_fields, images) = read_multipart(&mut multipart, "images", MAX_GALLERY_IMAGES).await?;

    if images.is_empty() {
        return Err(AppError::validation("No 'images' files in the request!"));
    }

    let mut image_urls = Vec::with_capacity(images.len());
    for (filename, data) in images {
        image_urls.push(save_image(&state, &filename, data).await?);
    }

    let repo = ProductRepository::new(state.db.clone());
    let updated = repo.update_gallery(&id, image_urls).await?;

    let id = updated
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::internal("Updated product could not be read back"))?;
    Ok(Json(product.into()))
}

/// DELETE /api/v1/products/{id} - delete product, admin
pub async fn delete(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let repo = ProductRepository::new(state.db.clone());
    repo.delete(&id).await?;

    tracing::info!(product_id = %id, "Product deleted");
    Ok(Json(MessageResponse::ok("the product was deleted!")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn list_query_parses_page_index_pair() {
        let q = parse_list_query(&pairs(&[("pageIndex", "2"), ("pageIndex", "10")])).unwrap();
        assert_eq!(q.page, Some((2, 10)));
    }

    #[test]
    fn list_query_without_pagination_lists_everything() {
        let q = parse_list_query(&pairs(&[("sort", "priceAsc")])).unwrap();
        assert_eq!(q.page, None);
        assert_eq!(q.sort, Some(ProductSort::PriceAsc));
    }

    #[test]
    fn list_query_page_zero_is_clamped_to_one() {
        let q = parse_list_query(&pairs(&[("pageIndex", "0"), ("pageIndex", "5")])).unwrap();
        assert_eq!(q.page, Some((1, 5)));
    }

    #[test]
    fn list_query_rejects_zero_page_size() {
        assert!(parse_list_query(&pairs(&[("pageIndex", "1"), ("pageIndex", "0")])).is_err());
    }

    #[test]
    fn list_query_splits_categories() {
        let q = parse_list_query(&pairs(&[("categories", "category:a,category:b")])).unwrap();
        assert_eq!(
            q.categories,
            Some(vec!["category:a".to_string(), "category:b".to_string()])
        );
    }

    #[test]
    fn list_query_ignores_unknown_sort() {
        let q = parse_list_query(&pairs(&[("sort", "bogus")])).unwrap();
        assert_eq!(q.sort, None);
    }
}
