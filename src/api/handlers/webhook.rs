//! Payment webhook receiver.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse};
use crate::payment::signature::SIGNATURE_HEADER;
use crate::service::WebhookOutcome;

/// `POST /webhooks/payment` — Signed order notification from the provider.
///
/// The body is taken as raw bytes: the signature covers them exactly.
///
/// # Errors
///
/// [`ApiError::InvalidSignature`] on a missing or wrong `X-Signature`.
#[utoipa::path(
    post,
    path = "/api/v1/webhooks/payment",
    tag = "Webhooks",
    summary = "Payment provider webhook",
    description = "Verifies the HMAC-SHA256 `X-Signature` header over the raw body, then creates one paid booking per free date of an `order_created` event. Other events and signed but unreadable bodies are acknowledged without changes.",
    request_body(content = String, content_type = "application/json"),
    params(
        ("X-Signature" = String, Header, description = "Hex HMAC-SHA256 of the raw body"),
    ),
    responses(
        (status = 200, description = "Delivery processed or acknowledged", body = WebhookOutcome),
        (status = 401, description = "Bad signature", body = ErrorResponse),
    )
)]
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let outcome = state
        .booking_service
        .handle_webhook(&body, signature)
        .await
        .inspect_err(|e| {
            if matches!(e, ApiError::InvalidSignature) {
                tracing::warn!(bytes = body.len(), "webhook rejected: bad signature");
            }
        })?;
    Ok(Json(outcome))
}

/// Webhook routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/webhooks/payment", post(payment_webhook))
}
