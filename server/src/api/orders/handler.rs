//! Order API Handlers
//!
//! Order creation delegates to the repository's fan-out/fan-in workflow;
//! checkout sessions go to the payment gateway and never touch the order
//! table.

use axum::{
    Json,
    extract::{Path, State},
};
use futures::future::try_join_all;
use serde::Serialize;

use crate::api::MessageResponse;
use crate::auth::{AdminUser, CurrentUser};
use crate::core::ServerState;
use crate::db::models::{
    CartItem, OrderCreate, OrderDetailView, OrderSummaryView, OrderUpdate,
};
use crate::db::repository::{OrderRepository, ProductRepository, parse_record_id};
use crate::utils::validation::{MAX_ADDRESS_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// GET /api/v1/orders - all orders, newest first, admin
pub async fn list(
    State(state): State<ServerState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<OrderSummaryView>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_all().await?;
    Ok(Json(orders.into_iter().map(OrderSummaryView::from).collect()))
}

/// GET /api/v1/orders/{id} - order with items resolved, authenticated
pub async fn get_by_id(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetailView>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    Ok(Json(order.into()))
}

/// GET /api/v1/orders/get/userOrders/{user_id} - a user's order history,
/// newest first, authenticated
pub async fn user_orders(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<OrderDetailView>>> {
    // Non-admins may only read their own history. Normalize the path param
    // so a bare key and the full "user:xxx" form compare equal.
    let target = parse_record_id("user", &user_id)?;
    if !current.is_admin && current.id != target.to_string() {
        return Err(AppError::forbidden("You may only view your own orders"));
    }

    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_by_user(&user_id).await?;
    Ok(Json(orders.into_iter().map(OrderDetailView::from).collect()))
}

/// POST /api/v1/orders - create an order, authenticated.
///
/// Order items are persisted first; if the final order write fails they
/// are intentionally left behind (no compensating transaction).
pub async fn create(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderSummaryView>> {
    validate_required_text(&payload.shipping_address1, "shippingAddress1", MAX_ADDRESS_LEN)?;

    let repo = OrderRepository::new(state.db.clone());
    let order = repo.create(payload).await?;

    let id = order.id.as_ref().map(|id| id.to_string()).unwrap_or_default();
    tracing::info!(order_id = %id, total_price = order.total_price, "Order created");

    Ok(Json(order.into()))
}

/// PUT /api/v1/orders/{id} - update the order status, admin
pub async fn update(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<OrderSummaryView>> {
    validate_required_text(&payload.status, "status", MAX_SHORT_TEXT_LEN)?;

    let repo = OrderRepository::new(state.db.clone());
    let order = repo.update_status(&id, payload.status).await?;
    Ok(Json(order.into()))
}

/// DELETE /api/v1/orders/{id} - delete the order and all its items, admin.
///
/// The cascade is explicit: any failed item delete fails the whole
/// operation.
pub async fn delete(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let repo = OrderRepository::new(state.db.clone());
    repo.delete(&id).await?;

    tracing::info!(order_id = %id, "Order deleted");
    Ok(Json(MessageResponse::ok("the order was deleted!")))
}

// =============================================================================
// Aggregates
// =============================================================================

/// `{ "totalSales": x }`
#[derive(Debug, Serialize)]
pub struct TotalSalesResponse {
    #[serde(rename = "totalSales")]
    pub total_sales: f64,
}

/// GET /api/v1/orders/get/totalsales - sum of all order totals, admin.
///
/// No orders means 0, not an error.
pub async fn total_sales(
    State(state): State<ServerState>,
    _admin: AdminUser,
) -> AppResult<Json<TotalSalesResponse>> {
    let repo = OrderRepository::new(state.db.clone());
    let total_sales = repo.total_sales().await?;
    Ok(Json(TotalSalesResponse { total_sales }))
}

/// `{ "orderCount": n }`
#[derive(Debug, Serialize)]
pub struct OrderCountResponse {
    #[serde(rename = "orderCount")]
    pub order_count: i64,
}

/// GET /api/v1/orders/get/count - total order count, admin
pub async fn count(
    State(state): State<ServerState>,
    _admin: AdminUser,
) -> AppResult<Json<OrderCountResponse>> {
    let repo = OrderRepository::new(state.db.clone());
    let order_count = repo.count().await?;
    Ok(Json(OrderCountResponse { order_count }))
}

// =============================================================================
// Checkout
// =============================================================================

/// `{ "id": session_id }`
#[derive(Debug, Serialize)]
pub struct CheckoutSessionResponse {
    pub id: String,
}

/// POST /api/v1/orders/create-checkout-session - request a hosted checkout
/// session for a cart, authenticated.
///
/// Looks up each product's current price, converts to minor currency
/// units, and returns the gateway's opaque session id. No order record is
/// created by this flow.
pub async fn create_checkout_session(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Json(cart): Json<Vec<CartItem>>,
) -> AppResult<Json<CheckoutSessionResponse>> {
    if cart.is_empty() {
        return Err(AppError::validation(
            "Checkout session cannot be created - check the order items",
        ));
    }

    let repo = ProductRepository::new(state.db.clone());

    // Fan-out the price lookups; first failure aborts
    let line_items = try_join_all(cart.iter().map(|item| {
        let repo = repo.clone();
        async move {
            if item.quantity <= 0 {
                return Err(AppError::validation(format!(
                    "Invalid quantity {} for product {}",
                    item.quantity, item.product
                )));
            }
            let product = repo
                .find_raw(&item.product)
                .await?
                .ok_or_else(|| {
                    AppError::validation(format!("Invalid product: {}", item.product))
                })?;
            Ok(crate::payments::CheckoutLineItem::from_price(
                product.name,
                product.price,
                item.quantity,
            ))
        }
    }))
    .await?;

    let session = state.checkout.create_session(&line_items).await?;

    tracing::info!(session_id = %session.id, items = line_items.len(), "Checkout session created");
    Ok(Json(CheckoutSessionResponse { id: session.id }))
}
