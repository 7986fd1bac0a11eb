//! Admin page and set-stock endpoint over real HTTP.

#![allow(clippy::unwrap_used)]

use dropzone_integration_tests::{TEST_ADMIN_KEY, TestServer};
use serde_json::json;

#[tokio::test]
async fn test_set_stock_wrong_key_is_unauthorized() {
    let server = TestServer::spawn(4).await;

    let (status, body) = server
        .post_json("/api/admin/set-stock", &json!({ "key": "guess", "stock": 99 }))
        .await;
    assert_eq!(status, 401);
    assert_eq!(body["ok"], false);
    assert_eq!(body["kind"], "Unauthorized");
    assert_eq!(server.stock().await, 4);
}

#[tokio::test]
async fn test_set_stock_clamps_negative() {
    let server = TestServer::spawn(4).await;

    let (status, body) = server
        .post_json("/api/admin/set-stock", &json!({ "key": TEST_ADMIN_KEY, "stock": -5 }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "ok": true, "stock": 0 }));
    assert_eq!(server.stock().await, 0);
}

#[tokio::test]
async fn test_set_stock_truncates_fraction() {
    let server = TestServer::spawn(1).await;

    let (_, body) = server
        .post_json("/api/admin/set-stock", &json!({ "key": TEST_ADMIN_KEY, "stock": "7.9" }))
        .await;
    assert_eq!(body["stock"], 7);
}

#[tokio::test]
async fn test_admin_page_requires_key() {
    let server = TestServer::spawn(1).await;

    let denied = server.client.get(server.url("/admin?key=nope")).send().await.unwrap();
    assert_eq!(denied.status(), 401);

    let allowed = server
        .client
        .get(server.url(&format!("/admin?key={TEST_ADMIN_KEY}")))
        .send()
        .await
        .unwrap();
    assert_eq!(allowed.status(), 200);
    assert!(allowed.text().await.unwrap().contains("Set stock"));
}
