//! Shared fixtures: an in-memory store, a scriptable payment provider,
//! and a fully wired router.

#![allow(dead_code, clippy::panic)]

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use tokio::sync::Mutex;
use tower::ServiceExt;

use adslot_gateway::api::auth::AdminToken;
use adslot_gateway::app_state::AppState;
use adslot_gateway::domain::EventBus;
use adslot_gateway::error::ApiError;
use adslot_gateway::notify::NoopNotifier;
use adslot_gateway::payment::signature::sign;
use adslot_gateway::payment::{CheckoutRequest, CheckoutSession, PaymentProvider};
use adslot_gateway::persistence::{BookingStore, InMemoryStore};
use adslot_gateway::service::{BookingService, ServiceSettings};

pub const SECRET: &str = "whsec_integration";
pub const ADMIN: &str = "admin-token";

#[derive(Debug, Default)]
pub struct FakeProvider {
    pub fail_refunds: AtomicBool,
    pub refunds: Mutex<Vec<String>>,
    pub checkouts: Mutex<Vec<CheckoutRequest>>,
    pub refunded_upstream: Mutex<HashSet<String>>,
}

impl FakeProvider {
    pub fn set_refunds_failing(&self, failing: bool) {
        self.fail_refunds.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl PaymentProvider for FakeProvider {
    async fn create_checkout(&self, request: &CheckoutRequest) -> Result<CheckoutSession, ApiError> {
        self.checkouts.lock().await.push(request.clone());
        Ok(CheckoutSession {
            url: "https://pay.example/checkout/abc".to_string(),
        })
    }

    async fn refund_order(&self, order_id: &str) -> Result<(), ApiError> {
        if self.fail_refunds.load(Ordering::SeqCst) {
            return Err(ApiError::PaymentProvider("refund declined".to_string()));
        }
        self.refunds.lock().await.push(order_id.to_string());
        Ok(())
    }

    async fn order_refunded(&self, order_id: &str) -> Result<bool, ApiError> {
        Ok(self.refunded_upstream.lock().await.contains(order_id))
    }
}

pub struct Harness {
    pub service: Arc<BookingService>,
    pub store: Arc<InMemoryStore>,
    pub provider: Arc<FakeProvider>,
    pub router: Router,
}

pub fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let provider = Arc::new(FakeProvider::default());
    let service = Arc::new(BookingService::new(
        Arc::clone(&store) as Arc<dyn BookingStore>,
        Arc::clone(&provider) as Arc<dyn PaymentProvider>,
        Arc::new(NoopNotifier),
        EventBus::new(64),
        ServiceSettings {
            webhook_secret: Some(SECRET.to_string()),
            max_booking_days: 31,
        },
    ));
    let state = AppState::new(Arc::clone(&service), Some(AdminToken::new(ADMIN)));
    Harness {
        service,
        store,
        provider,
        router: adslot_gateway::api::build_router(state),
    }
}

pub fn order_body(order_id: &str, ad_type: &str, dates: &str) -> String {
    format!(
        r#"{{"meta":{{"event_name":"order_created","custom_data":{{"dates":"{dates}","image_url":"https://cdn.example/banner.png","link_url":"https://advertiser.example","ad_type":"{ad_type}"}}}},"data":{{"id":"{order_id}","attributes":{{"user_name":"Grace","user_email":"grace@example.com"}}}}}}"#
    )
}

pub fn signature(body: &str) -> String {
    let Ok(sig) = sign(SECRET.as_bytes(), body.as_bytes()) else {
        panic!("signing failed");
    };
    sig
}

pub async fn send(router: &Router, request: Request<Body>) -> (u16, serde_json::Value) {
    let Ok(response) = router.clone().oneshot(request).await else {
        panic!("router failed");
    };
    read(response).await
}

pub async fn read(response: Response<Body>) -> (u16, serde_json::Value) {
    let status = response.status().as_u16();
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("body read failed");
    };
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

pub fn json_request(method: &str, uri: &str, body: &str, admin: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if admin {
        builder = builder.header("authorization", format!("Bearer {ADMIN}"));
    }
    let Ok(request) = builder.body(Body::from(body.to_string())) else {
        panic!("request build failed");
    };
    request
}

pub fn webhook_request(body: &str, sig: &str) -> Request<Body> {
    let Ok(request) = Request::builder()
        .method("POST")
        .uri("/api/v1/webhooks/payment")
        .header("content-type", "application/json")
        .header("x-signature", sig)
        .body(Body::from(body.to_string()))
    else {
        panic!("request build failed");
    };
    request
}
