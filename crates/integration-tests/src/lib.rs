//! Integration tests for the Bazaar API.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p bazaar-cli -- migrate
//!
//! # Start the API
//! cargo run -p bazaar-api
//!
//! # Run integration tests
//! cargo test -p bazaar-integration-tests -- --ignored
//! ```
//!
//! Tests register fresh accounts with random emails, so they can run
//! repeatedly against the same database.

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("BAZAAR_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A registered account with its bearer token.
pub struct TestAccount {
    pub email: String,
    pub token: String,
}

/// Register a fresh account with a random email and log it in.
///
/// # Panics
///
/// Panics if registration or login fails; these tests assume a running
/// server with migrations applied.
pub async fn register_and_login(client: &Client, role: &str) -> TestAccount {
    let base_url = base_url();
    let email = format!("{role}-{}@bazaar.test", Uuid::new_v4());
    let password = "integration-test-pw";

    let resp = client
        .post(format!("{base_url}/users"))
        .json(&json!({
            "name": format!("Test {role}"),
            "email": email,
            "password": password,
            "role": role,
        }))
        .send()
        .await
        .expect("Failed to register account");
    assert_eq!(resp.status(), 201, "registration should succeed");

    let resp = client
        .post(format!("{base_url}/token"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to login");
    assert_eq!(resp.status(), 200, "login should succeed");

    let body: Value = resp.json().await.expect("Failed to parse login response");
    let token = body["token"]
        .as_str()
        .expect("login response should contain a token")
        .to_string();

    TestAccount { email, token }
}

/// Create a product listing as the given seller, returning its ID.
///
/// # Panics
///
/// Panics if the create request fails.
pub async fn create_product(client: &Client, seller: &TestAccount, name: &str, price: &str) -> i64 {
    let resp = client
        .post(format!("{}/products", base_url()))
        .bearer_auth(&seller.token)
        .json(&json!({ "name": name, "price": price, "description": "test item" }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), 201, "product create should succeed");

    let body: Value = resp.json().await.expect("Failed to parse product");
    body["id"].as_i64().expect("product should have an id")
}
