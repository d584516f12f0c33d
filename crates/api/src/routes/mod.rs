//! HTTP route handlers for the marketplace API.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST   /token                 - Login, returns a bearer token
//! POST   /users                 - Register an account
//!
//! # Account (requires auth)
//! GET    /user                  - Current account
//! DELETE /user                  - Close the account
//!
//! # Products
//! GET    /products              - Public listing (?page, ?limit, ?search)
//! GET    /products/{id}         - Product detail (requires auth)
//! POST   /products              - Create a listing (sellers)
//! PUT    /products/{id}         - Update own listing (sellers)
//! DELETE /products/{id}         - Delete own listing (sellers)
//! POST   /products/upload       - Bulk import from CSV (sellers)
//!
//! # Cart (requires auth)
//! GET    /cart                  - Active cart with items and total
//! POST   /cart                  - Add a product ({"productId": n})
//! POST   /cart/checkout         - Turn the cart into an order
//! DELETE /cart/{productId}      - Remove a product
//!
//! # Favorites (requires auth)
//! GET    /favorites             - Favorited products
//! POST   /favorites/{productId} - Favorite a product (idempotent)
//! DELETE /favorites/{productId} - Remove a favorite
//!
//! # Orders (requires auth)
//! GET    /orders                - Purchase history
//! GET    /orders/{id}           - One order with its products
//!
//! # Dashboard (sellers)
//! GET    /dashboard             - Sales aggregates
//! ```

pub mod cart;
pub mod dashboard;
pub mod favorites;
pub mod orders;
pub mod products;
pub mod token;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/upload", post(products::upload))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::add))
        .route("/checkout", post(cart::checkout))
        .route("/{product_id}", delete(cart::remove))
}

/// Create the favorites routes router.
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::index))
        .route(
            "/{product_id}",
            post(favorites::create).delete(favorites::destroy),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/token", post(token::create))
        .route("/users", post(users::register))
        .route("/user", get(users::me).delete(users::close_account))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/favorites", favorite_routes())
        .nest("/orders", order_routes())
        .route("/dashboard", get(dashboard::show))
}
