//! Uploaded image serving
//!
//! Images are written by the product handlers (multipart fields) into
//! `{work_dir}/public/uploads/` and served back from the same fixed path
//! prefix the stored product URLs use.

pub mod handler;

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use http::header;

use crate::core::ServerState;

pub use handler::save_image;

enum ServeFileResponse {
    Ok(&'static str, Bytes),
    NotFound,
    BadRequest(&'static str),
}

impl IntoResponse for ServeFileResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            ServeFileResponse::Ok(content_type, content) => (
                http::StatusCode::OK,
                [(header::CONTENT_TYPE, content_type)],
                content,
            )
                .into_response(),
            ServeFileResponse::NotFound => {
                (http::StatusCode::NOT_FOUND, "File not found").into_response()
            }
            ServeFileResponse::BadRequest(msg) => {
                (http::StatusCode::BAD_REQUEST, msg).into_response()
            }
        }
    }
}

/// GET /public/uploads/{filename} - serve an uploaded image, public
async fn serve_uploaded_file(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> ServeFileResponse {
    // Path traversal guard
    if filename.is_empty()
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
    {
        return ServeFileResponse::BadRequest("Invalid filename");
    }

    let file_path = state.uploads_dir().join(&filename);

    match tokio::fs::read(&file_path).await {
        Ok(content) => {
            let content_type = mime_guess::from_path(&filename)
                .first_raw()
                .unwrap_or("application/octet-stream");
            ServeFileResponse::Ok(content_type, content.into())
        }
        Err(e) => {
            tracing::debug!(filename = %filename, error = %e, "Uploaded file not found");
            ServeFileResponse::NotFound
        }
    }
}

pub fn router() -> Router<ServerState> {
    Router::new().route("/public/uploads/{filename}", get(serve_uploaded_file))
}
