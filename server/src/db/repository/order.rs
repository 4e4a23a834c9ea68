//! Order Repository
//!
//! Owns the order-creation workflow: fan out the order_item writes, fan out
//! the price lookups, fan in, sum, persist the order. Order items already
//! written are NOT rolled back when a later step fails — there is no
//! compensating transaction; the partial writes are accepted behavior.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Order, OrderCreate, OrderDetail, OrderItem, OrderSummary};
use chrono::Utc;
use futures::future::try_join_all;
use serde::Deserialize;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "order";
const ITEM_TABLE: &str = "order_item";
const PRODUCT_TABLE: &str = "product";
const USER_TABLE: &str = "user";

const DEFAULT_STATUS: &str = "Pending";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create an order from a list of product+quantity pairs.
    ///
    /// 1. Create one order_item per pair, concurrently; first failure aborts.
    /// 2. Fetch each item's product price, concurrently; first failure aborts.
    /// 3. total_price = Σ(price × quantity), evaluated now and cached.
    /// 4. Persist the order referencing the created items.
    pub async fn create(&self, data: OrderCreate) -> RepoResult<Order> {
        if data.order_items.is_empty() {
            return Err(RepoError::Validation(
                "Order must contain at least one item".to_string(),
            ));
        }

        let user = parse_record_id(USER_TABLE, &data.user)?;

        let mut pairs: Vec<(RecordId, i64)> = Vec::with_capacity(data.order_items.len());
        for item in &data.order_items {
            if item.quantity <= 0 {
                return Err(RepoError::Validation(format!(
                    "Invalid quantity {} for product {}",
                    item.quantity, item.product
                )));
            }
            pairs.push((parse_record_id(PRODUCT_TABLE, &item.product)?, item.quantity));
        }

        // Fan-out: independent order_item writes
        let created_items: Vec<OrderItem> = try_join_all(pairs.into_iter().map(
            |(product, quantity)| {
                let db = self.base.db().clone();
                async move {
                    let item = OrderItem {
                        id: None,
                        quantity,
                        product,
                    };
                    let created: Option<OrderItem> =
                        db.create(ITEM_TABLE).content(item).await?;
                    created.ok_or_else(|| {
                        RepoError::Database("Failed to create order item".to_string())
                    })
                }
            },
        ))
        .await?;

        let item_ids: Vec<RecordId> = created_items
            .iter()
            .map(|item| {
                item.id
                    .clone()
                    .ok_or_else(|| RepoError::Database("Order item created without id".to_string()))
            })
            .collect::<RepoResult<Vec<_>>>()?;

        // Fan-out: price lookups through the created items
        #[derive(Deserialize)]
        struct LineRow {
            quantity: i64,
            unit_price: Option<f64>,
        }

        let line_totals: Vec<f64> = try_join_all(item_ids.iter().cloned().map(|item_id| {
            let db = self.base.db().clone();
            async move {
                let mut result = db
                    .query("SELECT quantity, product.price AS unit_price FROM $item")
                    .bind(("item", item_id.clone()))
                    .await?;
                let row: Option<LineRow> = result.take(0)?;
                let row = row.ok_or_else(|| {
                    RepoError::Database(format!("Order item {item_id} vanished"))
                })?;
                let unit_price = row.unit_price.ok_or_else(|| {
                    RepoError::Validation(format!("Invalid product on order item {item_id}"))
                })?;
                Ok::<f64, RepoError>(unit_price * row.quantity as f64)
            }
        }))
        .await?;

        let total_price: f64 = line_totals.iter().sum();

        let order = Order {
            id: None,
            order_items: item_ids,
            shipping_address1: data.shipping_address1,
            shipping_address2: data.shipping_address2.unwrap_or_default(),
            city: data.city.unwrap_or_default(),
            zip: data.zip.unwrap_or_default(),
            country: data.country.unwrap_or_default(),
            phone: data.phone.unwrap_or_default(),
            status: data.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            total_price,
            user,
            date_of_order: Utc::now().to_rfc3339(),
        };

        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// All orders, newest first, with the owning user's name resolved
    pub async fn find_all(&self) -> RepoResult<Vec<OrderSummary>> {
        let orders: Vec<OrderSummary> = self
            .base
            .db()
            .query("SELECT *, user.name AS user_name FROM order ORDER BY date_of_order DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Order by id with items, products and categories resolved
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<OrderDetail>> {
        let record_id = parse_record_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query(
                "SELECT *, user.name AS user_name FROM order WHERE id = $id \
                 FETCH order_items, order_items.product, order_items.product.category",
            )
            .bind(("id", record_id))
            .await?;
        let orders: Vec<OrderDetail> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// A user's order history, newest first, items resolved
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<OrderDetail>> {
        let user = parse_record_id(USER_TABLE, user_id)?;
        let mut result = self
            .base
            .db()
            .query(
                "SELECT *, user.name AS user_name FROM order WHERE user = $user \
                 ORDER BY date_of_order DESC \
                 FETCH order_items, order_items.product, order_items.product.category",
            )
            .bind(("user", user))
            .await?;
        let orders: Vec<OrderDetail> = result.take(0)?;
        Ok(orders)
    }

    /// Look up the raw order record
    pub async fn find_raw(&self, id: &str) -> RepoResult<Option<Order>> {
        let record_id = parse_record_id(TABLE, id)?;
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    /// Update the order status
    pub async fn update_status(&self, id: &str, status: String) -> RepoResult<Order> {
        let record_id = parse_record_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET status = $status RETURN AFTER")
            .bind(("id", record_id))
            .bind(("status", status))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {}", id)))
    }

    /// Delete an order and every order_item it owns.
    ///
    /// Explicit multi-step cascade with a combined result: a failed
    /// sub-delete fails the whole operation and leaves the order in place.
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let order = self
            .find_raw(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {}", id)))?;

        let mut failed: Vec<String> = Vec::new();
        for item_id in &order.order_items {
            let deleted: Result<Option<OrderItem>, surrealdb::Error> =
                self.base.db().delete(item_id.clone()).await;
            match deleted {
                Ok(_) => {}
                Err(e) => failed.push(format!("{item_id}: {e}")),
            }
        }
        if !failed.is_empty() {
            return Err(RepoError::Database(format!(
                "Failed to delete order items: {}",
                failed.join(", ")
            )));
        }

        let record_id = parse_record_id(TABLE, id)?;
        let deleted: Option<Order> = self.base.db().delete(record_id).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Order {}", id)));
        }
        Ok(())
    }

    /// Look up a single order item (used by tests and cascade checks)
    pub async fn find_item(&self, id: &RecordId) -> RepoResult<Option<OrderItem>> {
        let item: Option<OrderItem> = self.base.db().select(id.clone()).await?;
        Ok(item)
    }

    /// Sum of total_price over all orders. An empty collection sums to
    /// zero — a valid result, never an error.
    pub async fn total_sales(&self) -> RepoResult<f64> {
        let mut result = self
            .base
            .db()
            .query("SELECT math::sum(total_price) AS total_sales FROM order GROUP ALL")
            .await?;
        let total: Option<f64> = result.take((0, "total_sales"))?;
        Ok(total.unwrap_or(0.0))
    }

    /// Total order count
    pub async fn count(&self) -> RepoResult<i64> {
        self.base.count(TABLE).await
    }
}
