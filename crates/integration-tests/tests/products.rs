//! Integration tests for the product catalog, seller CRUD, CSV import,
//! and the dashboard.
//!
//! Run with: cargo test -p bazaar-integration-tests -- --ignored

use reqwest::{Client, StatusCode, multipart};
use serde_json::{Value, json};

use bazaar_integration_tests::{base_url, create_product, register_and_login};

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_public_listing_and_search() {
    let client = Client::new();
    let seller = register_and_login(&client, "seller").await;
    let marker = format!("Sidetable-{}", uuid::Uuid::new_v4());
    create_product(&client, &seller, &marker, "55.00").await;

    let base_url = base_url();

    // Listing is public, no token needed
    let resp = client
        .get(format!("{base_url}/products?search={marker}"))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse listing");
    assert_eq!(body["total"], 1);
    assert_eq!(body["current_page"], 1);
    assert_eq!(body["data"][0]["name"], marker.as_str());
    assert_eq!(body["data"][0]["seller"]["email"], seller.email.as_str());

    // A trailing slash routes the same as the bare path
    let resp = client
        .get(format!("{base_url}/products/?search={marker}"))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);

    // An absurdly large page number is an empty page, not an error
    let resp = client
        .get(format!(
            "{base_url}/products?search={marker}&page=9223372036854775807"
        ))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse listing");
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_only_sellers_can_list_products() {
    let client = Client::new();
    let customer = register_and_login(&client, "customer").await;

    let resp = client
        .post(format!("{}/products", base_url()))
        .bearer_auth(&customer.token)
        .json(&json!({ "name": "Nope", "price": "10.00" }))
        .send()
        .await
        .expect("Failed to send create");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_update_and_delete_require_ownership() {
    let client = Client::new();
    let owner = register_and_login(&client, "seller").await;
    let intruder = register_and_login(&client, "seller").await;
    let product_id = create_product(&client, &owner, "Guarded chair", "30.00").await;
    let base_url = base_url();

    let resp = client
        .put(format!("{base_url}/products/{product_id}"))
        .bearer_auth(&intruder.token)
        .json(&json!({ "price": "1.00" }))
        .send()
        .await
        .expect("Failed to send update");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .delete(format!("{base_url}/products/{product_id}"))
        .bearer_auth(&intruder.token)
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // The owner can do both
    let resp = client
        .put(format!("{base_url}/products/{product_id}"))
        .bearer_auth(&owner.token)
        .json(&json!({ "price": "25.00" }))
        .send()
        .await
        .expect("Failed to send update");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(body["price"], "25.00");

    let resp = client
        .delete(format!("{base_url}/products/{product_id}"))
        .bearer_auth(&owner.token)
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_csv_upload_imports_products() {
    let client = Client::new();
    let seller = register_and_login(&client, "seller").await;
    let base_url = base_url();

    let csv = "name;description;price;url\n\
               Teapot;Cast iron;R$ 49,90;\n\
               Stool;Three legs;15.00;\n";
    let form = multipart::Form::new().part(
        "file",
        multipart::Part::bytes(csv.as_bytes().to_vec()).file_name("products.csv"),
    );

    let resp = client
        .post(format!("{base_url}/products/upload"))
        .bearer_auth(&seller.token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to upload CSV");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["msg"], "2 products imported");
}

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_csv_upload_with_no_valid_rows_is_bad_request() {
    let client = Client::new();
    let seller = register_and_login(&client, "seller").await;

    // Comma-separated instead of semicolons
    let csv = "name,price\nTeapot,49.90\n";
    let form = multipart::Form::new().part(
        "file",
        multipart::Part::bytes(csv.as_bytes().to_vec()).file_name("products.csv"),
    );

    let resp = client
        .post(format!("{}/products/upload", base_url()))
        .bearer_auth(&seller.token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to upload CSV");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a running bazaar-api server"]
async fn test_dashboard_is_seller_only() {
    let client = Client::new();
    let seller = register_and_login(&client, "seller").await;
    let customer = register_and_login(&client, "customer").await;
    create_product(&client, &seller, "Dashboard prop", "12.00").await;
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/dashboard"))
        .bearer_auth(&customer.token)
        .send()
        .await
        .expect("Failed to get dashboard");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .get(format!("{base_url}/dashboard"))
        .bearer_auth(&seller.token)
        .send()
        .await
        .expect("Failed to get dashboard");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse dashboard");
    assert_eq!(body["total_products"], 1);
    assert_eq!(body["total_sold"], 0);
    assert_eq!(body["best_selling_product"], "none");
}
