//! Database models
//!
//! One module per collection. Each model comes in up to three shapes:
//! - the record as stored (`Category`, `Product`, `User`, `Order`, `OrderItem`),
//!   with record links as native [`surrealdb::RecordId`]s
//! - create/update payloads (`*Create`, `*Update`) with an explicit field
//!   schema per operation
//! - read views (`ProductWithCategory`, `OrderDetail`, ...) for queries that
//!   resolve record links with `FETCH`

pub mod category;
pub mod order;
pub mod product;
pub mod user;

pub use category::{Category, CategoryCreate, CategoryUpdate, CategoryView};
pub use order::{
    CartItem, Order, OrderCreate, OrderDetail, OrderDetailView, OrderItem, OrderItemView,
    OrderSummary, OrderSummaryView, OrderUpdate,
};
pub use product::{
    Product, ProductCreate, ProductUpdate, ProductView, ProductWithCategory,
};
pub use user::{User, UserCreate, UserUpdate, UserView};
