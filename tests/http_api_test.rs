//! HTTP surface checks: admin auth, validation errors, public serving,
//! legacy ads, and system endpoints.

#![allow(clippy::panic, clippy::indexing_slicing)]

mod common;

use axum::body::Body;
use axum::http::Request;

use common::{harness, json_request, order_body, send, signature, webhook_request};

#[tokio::test]
async fn admin_routes_need_the_token() {
    let h = harness();
    let (status, body) = send(
        &h.router,
        json_request("GET", "/api/v1/admin/bookings", "", false),
    )
    .await;
    assert_eq!(status, 401);
    assert_eq!(body["error"]["code"], 1102);

    let Ok(wrong) = Request::builder()
        .uri("/api/v1/admin/bookings")
        .header("authorization", "Bearer nope")
        .body(Body::empty())
    else {
        panic!("request build failed");
    };
    let (status, _) = send(&h.router, wrong).await;
    assert_eq!(status, 401);

    let (status, _) = send(
        &h.router,
        json_request("GET", "/api/v1/admin/bookings", "", true),
    )
    .await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn checkout_validation_errors() {
    let h = harness();

    let (status, body) = send(
        &h.router,
        json_request(
            "POST",
            "/api/v1/checkout",
            r#"{"from":"2025-03-05","to":"2025-03-01","image_url":"https://i.example/a.png","link_url":"https://l.example","ad_type":"top"}"#,
            false,
        ),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], 1001);

    let (status, _) = send(
        &h.router,
        json_request(
            "POST",
            "/api/v1/checkout",
            r#"{"dates":["2025-03-01"],"image_url":"","link_url":"https://l.example","ad_type":"top"}"#,
            false,
        ),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = send(
        &h.router,
        json_request(
            "POST",
            "/api/v1/checkout",
            r#"{"from":"2025-01-01","to":"2025-03-01","image_url":"https://i.example/a.png","link_url":"https://l.example","ad_type":"top"}"#,
            false,
        ),
    )
    .await;
    assert_eq!(status, 400);
    assert!(h.provider.checkouts.lock().await.is_empty());
}

#[tokio::test]
async fn checkout_on_taken_date_conflicts() {
    let h = harness();
    let order = order_body("1", "top", "2025-03-03");
    let (status, _) = send(&h.router, webhook_request(&order, &signature(&order))).await;
    assert_eq!(status, 200);

    let (status, body) = send(
        &h.router,
        json_request(
            "POST",
            "/api/v1/checkout",
            r#"{"from":"2025-03-02","to":"2025-03-04","image_url":"https://i.example/a.png","link_url":"https://l.example","ad_type":"top"}"#,
            false,
        ),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"]["details"], "2025-03-03");
}

#[tokio::test]
async fn slots_and_creative_serving() {
    let h = harness();

    let (status, _) = send(
        &h.router,
        json_request(
            "POST",
            "/api/v1/admin/legacy-ads",
            r#"{"title":"House","position":"top","image_url":"https://cdn.example/house.png","link_url":"https://deals.example","priority":5}"#,
            true,
        ),
    )
    .await;
    assert_eq!(status, 201);

    let order = order_body("2", "top", "2025-09-09");
    let (_, created) = send(&h.router, webhook_request(&order, &signature(&order))).await;
    let id = created["created"][0].as_str().unwrap_or_default().to_string();

    let (status, slots) = send(
        &h.router,
        json_request("GET", "/api/v1/slots/top?from=2025-09-01&to=2025-09-30", "", false),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(slots["taken"], serde_json::json!(["2025-09-09"]));

    // Paid but not yet approved: the house ad is served.
    let (status, creative) = send(
        &h.router,
        json_request("GET", "/api/v1/ads/top?date=2025-09-09", "", false),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(creative["source"], "legacy");

    let (status, _) = send(
        &h.router,
        json_request("POST", &format!("/api/v1/admin/bookings/{id}/approve"), "", true),
    )
    .await;
    assert_eq!(status, 200);

    let (_, creative) = send(
        &h.router,
        json_request("GET", "/api/v1/ads/top?date=2025-09-09", "", false),
    )
    .await;
    assert_eq!(creative["source"], "booking");
    assert_eq!(creative["image_url"], "https://cdn.example/banner.png");

    let (status, _) = send(
        &h.router,
        json_request("GET", "/api/v1/ads/newsletter?date=2025-09-09", "", false),
    )
    .await;
    assert_eq!(status, 204);

    let (status, body) = send(
        &h.router,
        json_request("GET", "/api/v1/ads/popup", "", false),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], 1002);
}

#[tokio::test]
async fn legacy_ads_can_be_deactivated() {
    let h = harness();
    let (_, ad) = send(
        &h.router,
        json_request(
            "POST",
            "/api/v1/admin/legacy-ads",
            r#"{"title":"House","position":"bottom","image_url":"https://cdn.example/house.png","link_url":"https://deals.example"}"#,
            true,
        ),
    )
    .await;
    let id = ad["id"].as_i64().unwrap_or_default();

    let (status, patched) = send(
        &h.router,
        json_request(
            "PATCH",
            &format!("/api/v1/admin/legacy-ads/{id}"),
            r#"{"active":false}"#,
            true,
        ),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(patched["active"], false);

    let (status, _) = send(
        &h.router,
        json_request("GET", "/api/v1/ads/bottom?date=2025-01-01", "", false),
    )
    .await;
    assert_eq!(status, 204);

    let (status, _) = send(
        &h.router,
        json_request("PATCH", "/api/v1/admin/legacy-ads/999", r#"{"active":true}"#, true),
    )
    .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn delete_requires_rejected_status() {
    let h = harness();
    let order = order_body("3", "bottom", "2025-10-10");
    let (_, created) = send(&h.router, webhook_request(&order, &signature(&order))).await;
    let id = created["created"][0].as_str().unwrap_or_default().to_string();

    let (status, _) = send(
        &h.router,
        json_request("DELETE", &format!("/api/v1/admin/bookings/{id}"), "", true),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = send(
        &h.router,
        json_request("POST", &format!("/api/v1/admin/bookings/{id}/reject"), "", true),
    )
    .await;
    assert_eq!(status, 200);

    let (status, _) = send(
        &h.router,
        json_request("DELETE", &format!("/api/v1/admin/bookings/{id}"), "", true),
    )
    .await;
    assert_eq!(status, 204);

    let (status, _) = send(
        &h.router,
        json_request("GET", &format!("/api/v1/admin/bookings/{id}"), "", true),
    )
    .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn system_endpoints() {
    let h = harness();
    let (status, health) = send(&h.router, json_request("GET", "/health", "", false)).await;
    assert_eq!(status, 200);
    assert_eq!(health["status"], "healthy");

    let (status, types) = send(
        &h.router,
        json_request("GET", "/config/ad-types", "", false),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(types.as_array().map(Vec::len), Some(3));

    let (status, doc) = send(
        &h.router,
        json_request("GET", "/api-docs/openapi.json", "", false),
    )
    .await;
    assert_eq!(status, 200);
    assert!(doc["paths"]["/api/v1/checkout"].is_object());
}
