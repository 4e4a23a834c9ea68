//! Order API module

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/create-checkout-session", post(handler::create_checkout_session))
        // Static segments before /{id} to avoid shadowing
        .route("/get/totalsales", get(handler::total_sales))
        .route("/get/count", get(handler::count))
        .route("/get/userOrders/{user_id}", get(handler::user_orders))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
