//! API tests against a running server
//!
//! Expects the server on localhost:8080 with seed data: book 1 in stock and
//! member 1 with no active loan of it.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_list_books() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["books"].is_array());
    assert!(body["data"]["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_unknown_book() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/999999", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return() {
    let client = Client::new();
    let loan = json!({ "member_id": 1, "book_id": 1 });

    let response = client
        .post(format!("{}/borrow", BASE_URL))
        .json(&loan)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["loan_id"].is_number());
    assert_eq!(body["data"]["book_id"], 1);

    // Second borrow of the same book is a conflict
    let response = client
        .post(format!("{}/borrow", BASE_URL))
        .json(&loan)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    let response = client
        .post(format!("{}/return", BASE_URL))
        .json(&loan)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let response = client
        .post(format!("{}/return", BASE_URL))
        .json(&loan)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "ALREADY_RETURNED");
}

#[tokio::test]
#[ignore]
async fn test_member_loan_history() {
    let client = Client::new();

    let response = client
        .get(format!("{}/members/1/loans", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["loans"].is_array());
    assert_eq!(body["data"]["member_id"], 1);
}
