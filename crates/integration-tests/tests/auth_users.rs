//! Integration tests for registration, login, and account closing.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p bazaar-api)
//!
//! Run with: cargo test -p bazaar-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use bazaar_integration_tests::{base_url, register_and_login};

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_register_login_and_me() {
    let client = Client::new();
    let account = register_and_login(&client, "customer").await;

    let resp = client
        .get(format!("{}/user", base_url()))
        .bearer_auth(&account.token)
        .send()
        .await
        .expect("Failed to get profile");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse profile");
    assert_eq!(body["email"], account.email.as_str());
    assert_eq!(body["role"], "customer");
}

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_duplicate_email_is_precondition_failed() {
    let client = Client::new();
    let account = register_and_login(&client, "customer").await;

    let resp = client
        .post(format!("{}/users", base_url()))
        .json(&json!({
            "name": "Duplicate",
            "email": account.email,
            "password": "another-password",
            "role": "customer",
        }))
        .send()
        .await
        .expect("Failed to send duplicate registration");
    assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_register_rejects_bad_role_and_short_password() {
    let client = Client::new();
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/users"))
        .json(&json!({
            "name": "Bad Role",
            "email": "bad-role@bazaar.test",
            "password": "long enough",
            "role": "admin",
        }))
        .send()
        .await
        .expect("Failed to send registration");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .post(format!("{base_url}/users"))
        .json(&json!({
            "name": "Short Password",
            "email": "short-pw@bazaar.test",
            "password": "short",
            "role": "customer",
        }))
        .send()
        .await
        .expect("Failed to send registration");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_login_with_wrong_password_is_unauthorized() {
    let client = Client::new();
    let account = register_and_login(&client, "customer").await;

    let resp = client
        .post(format!("{}/token", base_url()))
        .json(&json!({ "email": account.email, "password": "wrong-password" }))
        .send()
        .await
        .expect("Failed to send login");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_protected_routes_reject_missing_token() {
    let client = Client::new();
    let base_url = base_url();

    for path in ["/user", "/cart", "/orders", "/favorites", "/dashboard"] {
        let resp = client
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "path {path}");
    }
}

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_deleted_customer_token_stops_working() {
    let client = Client::new();
    let account = register_and_login(&client, "customer").await;
    let base_url = base_url();

    let resp = client
        .delete(format!("{base_url}/user"))
        .bearer_auth(&account.token)
        .send()
        .await
        .expect("Failed to delete account");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // The token authenticated a now-deleted account
    let resp = client
        .get(format!("{base_url}/user"))
        .bearer_auth(&account.token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // And the credentials no longer log in
    let resp = client
        .post(format!("{base_url}/token"))
        .json(&json!({ "email": account.email, "password": "integration-test-pw" }))
        .send()
        .await
        .expect("Failed to send login");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
