//! Checkout handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{CheckoutRequestDto, CheckoutResponse};
use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse};

/// `POST /checkout` — Open a hosted checkout for one or more dates.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid input, held dates, or provider failure.
#[utoipa::path(
    post,
    path = "/api/v1/checkout",
    tag = "Checkout",
    summary = "Start a checkout",
    description = "Validates the requested dates and creative, refuses dates already held for the placement, and returns the payment provider's hosted checkout URL. No booking is created until the provider confirms payment via webhook.",
    request_body = CheckoutRequestDto,
    responses(
        (status = 201, description = "Checkout created", body = CheckoutResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "One or more dates already booked", body = ErrorResponse),
        (status = 502, description = "Payment provider failure", body = ErrorResponse),
    )
)]
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequestDto>,
) -> Result<impl IntoResponse, ApiError> {
    let request = req.into_request(state.booking_service.max_booking_days())?;
    let dates = request.dates.clone();

    let session = state.booking_service.create_checkout(request).await?;

    let response = CheckoutResponse {
        checkout_url: session.url,
        quantity: dates.len(),
        dates,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Checkout routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/checkout", post(create_checkout))
}
