//! Integration tests for the cart and checkout flow.
//!
//! Run with: cargo test -p bazaar-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use bazaar_integration_tests::{TestAccount, base_url, create_product, register_and_login};

async fn add_to_cart(client: &Client, buyer: &TestAccount, product_id: i64) -> reqwest::Response {
    client
        .post(format!("{}/cart", base_url()))
        .bearer_auth(&buyer.token)
        .json(&json!({ "productId": product_id }))
        .send()
        .await
        .expect("Failed to add to cart")
}

async fn checkout(client: &Client, buyer: &TestAccount) -> reqwest::Response {
    client
        .post(format!("{}/cart/checkout", base_url()))
        .bearer_auth(&buyer.token)
        .send()
        .await
        .expect("Failed to checkout")
}

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_empty_cart_shape() {
    let client = Client::new();
    let buyer = register_and_login(&client, "customer").await;

    let resp = client
        .get(format!("{}/cart", base_url()))
        .bearer_auth(&buyer.token)
        .send()
        .await
        .expect("Failed to get cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse cart");
    assert!(body["id"].is_null());
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["total"], "0.00");
}

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_add_show_and_remove() {
    let client = Client::new();
    let seller = register_and_login(&client, "seller").await;
    let buyer = register_and_login(&client, "customer").await;
    let lamp = create_product(&client, &seller, "Cart lamp", "19.90").await;
    let rug = create_product(&client, &seller, "Cart rug", "5.10").await;
    let base_url = base_url();

    assert_eq!(add_to_cart(&client, &buyer, lamp).await.status(), 201);
    assert_eq!(add_to_cart(&client, &buyer, rug).await.status(), 201);

    let resp = client
        .get(format!("{base_url}/cart"))
        .bearer_auth(&buyer.token)
        .send()
        .await
        .expect("Failed to get cart");
    let body: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["total"], "25.00");

    let resp = client
        .delete(format!("{base_url}/cart/{rug}"))
        .bearer_auth(&buyer.token)
        .send()
        .await
        .expect("Failed to remove from cart");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Removing again is a 404
    let resp = client
        .delete(format!("{base_url}/cart/{rug}"))
        .bearer_auth(&buyer.token)
        .send()
        .await
        .expect("Failed to send remove");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_cart_rejects_own_sold_and_duplicate_products() {
    let client = Client::new();
    let seller = register_and_login(&client, "seller").await;
    let buyer = register_and_login(&client, "customer").await;
    let item = create_product(&client, &seller, "Single chair", "40.00").await;

    // Sellers cannot buy their own listings
    assert_eq!(
        add_to_cart(&client, &seller, item).await.status(),
        StatusCode::BAD_REQUEST
    );

    // First add works, second is a duplicate
    assert_eq!(add_to_cart(&client, &buyer, item).await.status(), 201);
    assert_eq!(
        add_to_cart(&client, &buyer, item).await.status(),
        StatusCode::BAD_REQUEST
    );

    // Unknown product is a 404
    assert_eq!(
        add_to_cart(&client, &buyer, 999_999_999).await.status(),
        StatusCode::NOT_FOUND
    );

    // Missing productId is a 400
    let resp = client
        .post(format!("{}/cart", base_url()))
        .bearer_auth(&buyer.token)
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send add");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_checkout_places_order_and_marks_sold() {
    let client = Client::new();
    let seller = register_and_login(&client, "seller").await;
    let buyer = register_and_login(&client, "customer").await;
    let item = create_product(&client, &seller, "Checkout desk", "120.50").await;
    let base_url = base_url();

    assert_eq!(add_to_cart(&client, &buyer, item).await.status(), 201);

    let resp = checkout(&client, &buyer).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse checkout");
    assert_eq!(body["total"], "120.50");
    let order_id = body["order_id"].as_i64().expect("order_id");

    // The cart is empty again
    let resp = client
        .get(format!("{base_url}/cart"))
        .bearer_auth(&buyer.token)
        .send()
        .await
        .expect("Failed to get cart");
    let body: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(body["items"], json!([]));

    // The order shows up in history with the purchased product
    let resp = client
        .get(format!("{base_url}/orders/{order_id}"))
        .bearer_auth(&buyer.token)
        .send()
        .await
        .expect("Failed to get order");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse order");
    assert_eq!(body["total_amount"], "120.50");
    assert_eq!(body["products"][0]["name"], "Checkout desk");

    // The product is gone from the public catalog
    let resp = client
        .get(format!("{base_url}/products?search=Checkout desk"))
        .send()
        .await
        .expect("Failed to list products");
    let body: Value = resp.json().await.expect("Failed to parse listing");
    assert_eq!(body["total"], 0);

    // A second buyer can no longer add it
    let other = register_and_login(&client, "customer").await;
    assert_eq!(
        add_to_cart(&client, &other, item).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_checkout_conflict_removes_stale_items_only() {
    let client = Client::new();
    let seller = register_and_login(&client, "seller").await;
    let fast = register_and_login(&client, "customer").await;
    let slow = register_and_login(&client, "customer").await;
    let contested = create_product(&client, &seller, "Contested lamp", "10.00").await;
    let safe = create_product(&client, &seller, "Safe stool", "20.00").await;
    let base_url = base_url();

    // Both buyers cart the contested item; slow also carts a safe one
    assert_eq!(add_to_cart(&client, &fast, contested).await.status(), 201);
    assert_eq!(add_to_cart(&client, &slow, contested).await.status(), 201);
    assert_eq!(add_to_cart(&client, &slow, safe).await.status(), 201);

    // Fast buyer wins the race
    assert_eq!(checkout(&client, &fast).await.status(), StatusCode::OK);

    // Slow buyer gets a conflict naming the removed item
    let resp = checkout(&client, &slow).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.expect("Failed to parse conflict");
    assert_eq!(body["removed_items"], json!(["Contested lamp"]));

    // The safe item survived; a retry succeeds
    let resp = client
        .get(format!("{base_url}/cart"))
        .bearer_auth(&slow.token)
        .send()
        .await
        .expect("Failed to get cart");
    let cart: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(1));

    let resp = checkout(&client, &slow).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse checkout");
    assert_eq!(body["total"], "20.00");
}

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_order_history_survives_customer_deletion() {
    let client = Client::new();
    let seller = register_and_login(&client, "seller").await;
    let buyer = register_and_login(&client, "customer").await;
    let item = create_product(&client, &seller, "Estate clock", "75.00").await;
    let base_url = base_url();

    assert_eq!(add_to_cart(&client, &buyer, item).await.status(), 201);
    assert_eq!(checkout(&client, &buyer).await.status(), StatusCode::OK);

    // The buyer closes their account
    let resp = client
        .delete(format!("{base_url}/user"))
        .bearer_auth(&buyer.token)
        .send()
        .await
        .expect("Failed to delete account");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // The sale is still on the seller's books
    let resp = client
        .get(format!("{base_url}/dashboard"))
        .bearer_auth(&seller.token)
        .send()
        .await
        .expect("Failed to get dashboard");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse dashboard");
    assert_eq!(body["total_sold"], 1);
    assert_eq!(body["total_revenue"], "75.00");
    assert_eq!(body["best_selling_product"], "Estate clock");
}

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_checkout_of_empty_cart_is_bad_request() {
    let client = Client::new();
    let buyer = register_and_login(&client, "customer").await;

    assert_eq!(
        checkout(&client, &buyer).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_favorites_roundtrip() {
    let client = Client::new();
    let seller = register_and_login(&client, "seller").await;
    let buyer = register_and_login(&client, "customer").await;
    let item = create_product(&client, &seller, "Favorite mirror", "60.00").await;
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/favorites/{item}"))
        .bearer_auth(&buyer.token)
        .send()
        .await
        .expect("Failed to favorite");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Favoriting twice is a no-op
    let resp = client
        .post(format!("{base_url}/favorites/{item}"))
        .bearer_auth(&buyer.token)
        .send()
        .await
        .expect("Failed to favorite");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .get(format!("{base_url}/favorites"))
        .bearer_auth(&buyer.token)
        .send()
        .await
        .expect("Failed to list favorites");
    let body: Value = resp.json().await.expect("Failed to parse favorites");
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["name"], "Favorite mirror");
    assert_eq!(body[0]["sold"], false);

    let resp = client
        .delete(format!("{base_url}/favorites/{item}"))
        .bearer_auth(&buyer.token)
        .send()
        .await
        .expect("Failed to remove favorite");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Removing again still succeeds while the product exists
    let resp = client
        .delete(format!("{base_url}/favorites/{item}"))
        .bearer_auth(&buyer.token)
        .send()
        .await
        .expect("Failed to send remove");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // An unknown product cannot be favorited
    let resp = client
        .post(format!("{base_url}/favorites/999999999"))
        .bearer_auth(&buyer.token)
        .send()
        .await
        .expect("Failed to send favorite");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
