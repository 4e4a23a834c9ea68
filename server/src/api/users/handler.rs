//! User API Handlers
//!
//! Registration and login are public; everything else requires a token.
//! Login failures use one unified message so accounts cannot be
//! enumerated.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::api::MessageResponse;
use crate::auth::{AdminUser, CurrentUser};
use crate::core::ServerState;
use crate::db::models::{UserCreate, UserUpdate, UserView};
use crate::db::repository::UserRepository;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// GET /api/v1/users - all users, admin
pub async fn list(
    State(state): State<ServerState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<UserView>>> {
    let repo = UserRepository::new(state.db.clone());
    let users = repo.find_all().await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

/// GET /api/v1/users/{id} - single user, authenticated
pub async fn get_by_id(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<UserView>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", id)))?;
    Ok(Json(user.into()))
}

/// POST /api/v1/users/register - create a user, public.
///
/// The raw password is hashed in the repository and never persisted.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<UserView>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;
    if !payload.email.contains('@') {
        return Err(AppError::validation("Invalid email address"));
    }

    let repo = UserRepository::new(state.db.clone());
    let user = repo.create(payload).await?;

    tracing::info!(email = %user.email, "User registered");
    Ok(Json(user.into()))
}

/// PUT /api/v1/users/{id} - update a user, self or admin.
///
/// A supplied password is re-hashed; absent means keep the old hash.
/// Only an admin may change the admin flag.
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserView>> {
    let repo = UserRepository::new(state.db.clone());

    let target = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", id)))?;
    let target_id = target
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();

    if current.id != target_id && !current.is_admin {
        return Err(AppError::forbidden("You may only update your own account"));
    }
    if payload.is_admin.is_some() && !current.is_admin {
        return Err(AppError::forbidden("Only admins may change the admin flag"));
    }

    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(password) = &payload.password {
        validate_required_text(password, "password", MAX_PASSWORD_LEN)?;
    }
    if let Some(email) = &payload.email
        && !email.contains('@')
    {
        return Err(AppError::validation("Invalid email address"));
    }

    let user = repo.update(&id, payload).await?;
    Ok(Json(user.into()))
}

// =============================================================================
// Login
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `{ "user": email, "token": jwt }`
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: String,
    pub token: String,
}

/// POST /api/v1/users/login - authenticate, public.
///
/// Success returns the email and a signed JWT whose claims carry the user
/// id and admin flag. Wrong password or unknown email both return 400
/// without a token.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = UserRepository::new(state.db.clone());

    let user = repo
        .find_by_email(&req.email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let password_valid = user
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

    if !password_valid {
        tracing::warn!(email = %req.email, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    let user_id = user.id.as_ref().map(|id| id.to_string()).unwrap_or_default();
    let token = state
        .jwt_service
        .generate_token(&user_id, user.is_admin)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = %user_id, "User logged in");

    Ok(Json(LoginResponse {
        user: user.email,
        token,
    }))
}

/// Count response, `{ "userCount": n }`
#[derive(Debug, Serialize)]
pub struct UserCountResponse {
    #[serde(rename = "userCount")]
    pub user_count: i64,
}

/// GET /api/v1/users/get/count - total user count, admin
pub async fn count(
    State(state): State<ServerState>,
    _admin: AdminUser,
) -> AppResult<Json<UserCountResponse>> {
    let repo = UserRepository::new(state.db.clone());
    let user_count = repo.count().await?;
    Ok(Json(UserCountResponse { user_count }))
}

/// DELETE /api/v1/users/{id} - delete user, admin
pub async fn delete(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let repo = UserRepository::new(state.db.clone());
    repo.delete(&id).await?;

    tracing::info!(user_id = %id, "User deleted");
    Ok(Json(MessageResponse::ok("the user was deleted!")))
}
