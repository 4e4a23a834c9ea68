//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::MessageResponse;
use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::models::{CategoryCreate, CategoryUpdate, CategoryView};
use crate::db::repository::CategoryRepository;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult};

/// GET /api/v1/categories - all categories, public
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<CategoryView>>> {
    let repo = CategoryRepository::new(state.db.clone());
    let categories = repo.find_all().await?;
    Ok(Json(categories.into_iter().map(CategoryView::from).collect()))
}

/// GET /api/v1/categories/{id} - single category, public
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CategoryView>> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {}", id)))?;
    Ok(Json(category.into()))
}

/// POST /api/v1/categories - create category, admin
pub async fn create(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<CategoryView>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.icon, "icon", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.color, "color", MAX_SHORT_TEXT_LEN)?;

    let repo = CategoryRepository::new(state.db.clone());
    let category = repo.create(payload).await?;

    tracing::info!(name = %category.name, "Category created");
    Ok(Json(category.into()))
}

/// PUT /api/v1/categories/{id} - update category, admin
pub async fn update(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<CategoryView>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.icon, "icon", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.color, "color", MAX_SHORT_TEXT_LEN)?;

    let repo = CategoryRepository::new(state.db.clone());
    let category = repo.update(&id, payload).await?;
    Ok(Json(category.into()))
}

/// DELETE /api/v1/categories/{id} - delete category, admin.
///
/// Products still referencing the category keep an orphaned link.
pub async fn delete(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let repo = CategoryRepository::new(state.db.clone());
    repo.delete(&id).await?;

    tracing::info!(category_id = %id, "Category deleted");
    Ok(Json(MessageResponse::ok("the category was deleted!")))
}
