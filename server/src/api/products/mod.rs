//! Product API module

mod handler;

use axum::{Router, routing::get, routing::put};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/products", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Unpaginated admin table view
        .route("/productsAdmin", get(handler::list_admin))
        // Static segments before /{id} to avoid shadowing
        .route("/get/featured/{count}", get(handler::featured))
        .route("/get/count", get(handler::count))
        .route("/gallery-images/{id}", put(handler::update_gallery))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
