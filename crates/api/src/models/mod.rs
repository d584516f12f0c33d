//! Domain models for the marketplace.
//!
//! These types represent validated domain objects separate from database
//! row types. Response shapes live next to the route handlers.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartItemDetail, CartProduct, cart_total};
pub use order::{Order, OrderProduct, OrderWithProducts};
pub use product::{
    NewProduct, Product, ProductSummary, ProductUpdate, ProductWithSeller, SellerSummary,
};
pub use user::User;
