//! Business logic, kept out of the route handlers.
//!
//! - [`auth`] - registration, login, password hashing, JWT issuance
//! - [`cart`] - cart reads and the add/remove rules
//! - [`checkout`] - the checkout transaction
//! - [`import`] - CSV product import parsing

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod import;

pub use auth::AuthService;
pub use cart::CartService;
pub use checkout::CheckoutService;
