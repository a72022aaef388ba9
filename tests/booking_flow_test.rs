//! End-to-end booking lifecycle over HTTP: checkout, webhook, approve,
//! reject with refund, and re-booking a freed slot.

#![allow(clippy::panic, clippy::indexing_slicing)]

mod common;

use serde_json::Value;

use adslot_gateway::domain::BookingStatus;
use adslot_gateway::persistence::{BookingFilter, BookingStore};

use common::{harness, json_request, order_body, send, signature, webhook_request};

fn booking_on<'a>(list: &'a Value, date: &str) -> &'a Value {
    let Some(found) = list["data"]
        .as_array()
        .and_then(|rows| rows.iter().find(|b| b["selected_date"] == date))
    else {
        panic!("no booking on {date}");
    };
    found
}

#[tokio::test]
async fn checkout_webhook_review_and_rebook() {
    let h = harness();

    // Checkout creates nothing locally.
    let (status, body) = send(
        &h.router,
        json_request(
            "POST",
            "/api/v1/checkout",
            r#"{"dates":["2025-03-01","2025-03-02"],"image_url":"https://cdn.example/banner.png","link_url":"https://advertiser.example","ad_type":"bottom"}"#,
            false,
        ),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(body["quantity"], 2);
    assert_eq!(body["checkout_url"], "https://pay.example/checkout/abc");
    let Ok(none_yet) = h.store.list(&BookingFilter::default()).await else {
        panic!("list failed");
    };
    assert!(none_yet.is_empty());

    // The provider confirms payment.
    let order = order_body("5001", "bottom", "2025-03-01,2025-03-02");
    let (status, body) = send(&h.router, webhook_request(&order, &signature(&order))).await;
    assert_eq!(status, 200);
    assert_eq!(body["created"].as_array().map(Vec::len), Some(2));

    let (status, list) = send(
        &h.router,
        json_request("GET", "/api/v1/admin/bookings?ad_type=bottom", "", true),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(list["pagination"]["total"], 2);
    let first = booking_on(&list, "2025-03-01");
    let second = booking_on(&list, "2025-03-02");
    assert_eq!(first["status"], "paid");
    assert_eq!(second["status"], "paid");
    assert_eq!(second["order_id"], "5001");
    let first_id = first["id"].as_str().unwrap_or_default().to_string();
    let second_id = second["id"].as_str().unwrap_or_default().to_string();

    // Approve the first date.
    let (status, approved) = send(
        &h.router,
        json_request("POST", &format!("/api/v1/admin/bookings/{first_id}/approve"), "", true),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(approved["status"], "approved");

    // Reject the second date with its order id.
    let (status, rejected) = send(
        &h.router,
        json_request(
            "POST",
            &format!("/api/v1/admin/bookings/{second_id}/reject"),
            r#"{"order_id":"5001"}"#,
            true,
        ),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(rejected["status"], "rejected");
    assert_eq!(h.provider.refunds.lock().await.as_slice(), ["5001".to_string()]);

    // The freed date can be bought again; the rejected row is replaced.
    let (status, _) = send(
        &h.router,
        json_request(
            "POST",
            "/api/v1/checkout",
            r#"{"from":"2025-03-02","to":"2025-03-02","image_url":"https://cdn.example/new.png","link_url":"https://new.example","ad_type":"bottom"}"#,
            false,
        ),
    )
    .await;
    assert_eq!(status, 201);

    let rebook = order_body("5002", "bottom", "2025-03-02");
    let (status, body) = send(&h.router, webhook_request(&rebook, &signature(&rebook))).await;
    assert_eq!(status, 200);
    assert_eq!(body["replaced"], serde_json::json!(["2025-03-02"]));

    let Ok(on_second) = h
        .store
        .find_by_slot(
            chrono::NaiveDate::from_ymd_opt(2025, 3, 2).unwrap_or_default(),
            adslot_gateway::domain::AdType::Bottom,
        )
        .await
    else {
        panic!("lookup failed");
    };
    assert_eq!(on_second.len(), 1);
    assert_eq!(on_second[0].status, BookingStatus::Paid);
    assert_eq!(on_second[0].order_id.as_deref(), Some("5002"));
}

#[tokio::test]
async fn replayed_webhook_creates_no_duplicates() {
    let h = harness();
    let order = order_body("6001", "top", "2025-04-10,2025-04-11");
    let sig = signature(&order);

    let (status, _) = send(&h.router, webhook_request(&order, &sig)).await;
    assert_eq!(status, 200);
    let (status, replay) = send(&h.router, webhook_request(&order, &sig)).await;
    assert_eq!(status, 200);
    assert_eq!(replay["created"], serde_json::json!([]));
    assert_eq!(replay["skipped"].as_array().map(Vec::len), Some(2));

    let Ok(all) = h.store.list(&BookingFilter::default()).await else {
        panic!("list failed");
    };
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn forged_webhook_is_refused_without_changes() {
    let h = harness();
    let order = order_body("7001", "newsletter", "2025-05-01");

    let (status, body) = send(&h.router, webhook_request(&order, "deadbeef")).await;
    assert_eq!(status, 401);
    assert_eq!(body["error"]["code"], 1101);

    let tampered = order.replace("2025-05-01", "2025-05-02");
    let (status, _) = send(&h.router, webhook_request(&tampered, &signature(&order))).await;
    assert_eq!(status, 401);

    let Ok(all) = h.store.list(&BookingFilter::default()).await else {
        panic!("list failed");
    };
    assert!(all.is_empty());
}

#[tokio::test]
async fn failed_refund_keeps_booking_status() {
    let h = harness();
    let order = order_body("8001", "bottom", "2025-06-01");
    let (_, body) = send(&h.router, webhook_request(&order, &signature(&order))).await;
    let id = body["created"][0].as_str().unwrap_or_default().to_string();

    h.provider.set_refunds_failing(true);
    let (status, err) = send(
        &h.router,
        json_request("POST", &format!("/api/v1/admin/bookings/{id}/reject"), "", true),
    )
    .await;
    assert_eq!(status, 502);
    assert_eq!(err["error"]["code"], 3002);

    let (_, booking) = send(
        &h.router,
        json_request("GET", &format!("/api/v1/admin/bookings/{id}"), "", true),
    )
    .await;
    assert_eq!(booking["status"], "paid");
}

#[tokio::test]
async fn date_edit_onto_held_slot_is_refused() {
    let h = harness();
    let order = order_body("9001", "top", "2025-07-01,2025-07-02");
    let (_, body) = send(&h.router, webhook_request(&order, &signature(&order))).await;
    let id = body["created"][0].as_str().unwrap_or_default().to_string();

    let (status, err) = send(
        &h.router,
        json_request(
            "PATCH",
            &format!("/api/v1/admin/bookings/{id}/date"),
            r#"{"selected_date":"2025-07-02"}"#,
            true,
        ),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(err["error"]["code"], 2002);
    assert_eq!(err["error"]["details"], "2025-07-02");

    let (status, moved) = send(
        &h.router,
        json_request(
            "PATCH",
            &format!("/api/v1/admin/bookings/{id}/date"),
            r#"{"selected_date":"2025-07-03"}"#,
            true,
        ),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(moved["selected_date"], "2025-07-03");
}

#[tokio::test]
async fn stuck_refund_is_reconciled() {
    let h = harness();
    let order = order_body("9901", "newsletter", "2025-08-01");
    let (_, body) = send(&h.router, webhook_request(&order, &signature(&order))).await;
    let Some(id) = body["created"][0]
        .as_str()
        .and_then(|s| s.parse::<uuid::Uuid>().ok())
    else {
        panic!("created id expected");
    };
    let id = adslot_gateway::domain::BookingId::from_uuid(id);

    let Ok(_) = h
        .store
        .update_status(id, BookingStatus::Paid, BookingStatus::RefundPending)
        .await
    else {
        panic!("status update failed");
    };
    h.provider.refunded_upstream.lock().await.insert("9901".to_string());

    let (status, report) = send(
        &h.router,
        json_request("POST", "/api/v1/admin/bookings/reconcile", "", true),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(report["checked"], 1);
    assert_eq!(report["rejected"].as_array().map(Vec::len), Some(1));

    let Ok(booking) = h.service.get_booking(id).await else {
        panic!("booking missing");
    };
    assert_eq!(booking.status, BookingStatus::Rejected);
}
