//! Order and OrderItem Models
//!
//! An order owns its order_item records: items are created as part of
//! order creation and deleted as part of order deletion, never shared.

use super::product::{ProductView, ProductWithCategory};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type OrderId = RecordId;
pub type OrderItemId = RecordId;

/// Order item record — one product+quantity line within an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderItemId>,
    pub quantity: i64,
    /// Record link to product
    pub product: RecordId,
}

/// Order record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderId>,
    /// Record links to the owned order_item records
    pub order_items: Vec<RecordId>,
    pub shipping_address1: String,
    #[serde(default)]
    pub shipping_address2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: String,
    pub status: String,
    /// Sum of product.price × quantity over the items, cached at creation
    /// time; never recomputed when product prices change later.
    pub total_price: f64,
    /// Record link to the ordering user
    pub user: RecordId,
    /// RFC 3339 creation timestamp
    pub date_of_order: String,
}

// =============================================================================
// API Request Types
// =============================================================================

/// One product+quantity pair, as supplied by the client for order creation
/// and for checkout sessions
#[derive(Debug, Clone, Deserialize)]
pub struct CartItem {
    /// Product id, `"product:xxx"` or bare key
    pub product: String,
    pub quantity: i64,
}

/// Create order payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub order_items: Vec<CartItem>,
    pub shipping_address1: String,
    pub shipping_address2: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    /// User id, `"user:xxx"` or bare key
    pub user: String,
}

/// Update payload — status is the only mutable field after creation
#[derive(Debug, Clone, Deserialize)]
pub struct OrderUpdate {
    pub status: String,
}

// =============================================================================
// Read views
// =============================================================================

/// List view: the owning user's record link plus their name
/// (`SELECT *, user.name AS user_name`)
#[derive(Debug, Clone, Deserialize)]
pub struct OrderSummary {
    #[serde(default)]
    pub id: Option<OrderId>,
    #[serde(default)]
    pub order_items: Vec<RecordId>,
    pub shipping_address1: String,
    #[serde(default)]
    pub shipping_address2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: String,
    pub status: String,
    pub total_price: f64,
    pub user: RecordId,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub date_of_order: String,
}

/// Order item with the product link resolved down to its category
/// (`FETCH order_items, order_items.product, order_items.product.category`)
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemDetail {
    #[serde(default)]
    pub id: Option<OrderItemId>,
    pub quantity: i64,
    #[serde(default)]
    pub product: Option<ProductWithCategory>,
}

/// Detail view: items fully resolved
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetail {
    #[serde(default)]
    pub id: Option<OrderId>,
    #[serde(default)]
    pub order_items: Vec<OrderItemDetail>,
    pub shipping_address1: String,
    #[serde(default)]
    pub shipping_address2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: String,
    pub status: String,
    pub total_price: f64,
    pub user: RecordId,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub date_of_order: String,
}

// =============================================================================
// API Response Types
// =============================================================================

/// List item, camelCase to match the public JSON contract
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryView {
    pub id: String,
    pub order_items: Vec<String>,
    pub shipping_address1: String,
    pub shipping_address2: String,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    pub status: String,
    pub total_price: f64,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub date_of_order: String,
}

impl From<Order> for OrderSummaryView {
    fn from(o: Order) -> Self {
        Self {
            id: o.id.map(|id| id.to_string()).unwrap_or_default(),
            order_items: o.order_items.iter().map(|id| id.to_string()).collect(),
            shipping_address1: o.shipping_address1,
            shipping_address2: o.shipping_address2,
            city: o.city,
            zip: o.zip,
            country: o.country,
            phone: o.phone,
            status: o.status,
            total_price: o.total_price,
            user: o.user.to_string(),
            user_name: None,
            date_of_order: o.date_of_order,
        }
    }
}

impl From<OrderSummary> for OrderSummaryView {
    fn from(o: OrderSummary) -> Self {
        Self {
            id: o.id.map(|id| id.to_string()).unwrap_or_default(),
            order_items: o.order_items.iter().map(|id| id.to_string()).collect(),
            shipping_address1: o.shipping_address1,
            shipping_address2: o.shipping_address2,
            city: o.city,
            zip: o.zip,
            country: o.country,
            phone: o.phone,
            status: o.status,
            total_price: o.total_price,
            user: o.user.to_string(),
            user_name: o.user_name,
            date_of_order: o.date_of_order,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemView {
    pub id: String,
    pub quantity: i64,
    pub product: Option<ProductView>,
}

impl From<OrderItemDetail> for OrderItemView {
    fn from(i: OrderItemDetail) -> Self {
        Self {
            id: i.id.map(|id| id.to_string()).unwrap_or_default(),
            quantity: i.quantity,
            product: i.product.map(ProductView::from),
        }
    }
}

/// Detail view, items and products resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailView {
    pub id: String,
    pub order_items: Vec<OrderItemView>,
    pub shipping_address1: String,
    pub shipping_address2: String,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    pub status: String,
    pub total_price: f64,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub date_of_order: String,
}

impl From<OrderDetail> for OrderDetailView {
    fn from(o: OrderDetail) -> Self {
        Self {
            id: o.id.map(|id| id.to_string()).unwrap_or_default(),
            order_items: o.order_items.into_iter().map(OrderItemView::from).collect(),
            shipping_address1: o.shipping_address1,
            shipping_address2: o.shipping_address2,
            city: o.city,
            zip: o.zip,
            country: o.country,
            phone: o.phone,
            status: o.status,
            total_price: o.total_price,
            user: o.user.to_string(),
            user_name: o.user_name,
            date_of_order: o.date_of_order,
        }
    }
}
