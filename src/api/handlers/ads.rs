//! Public read endpoints: slot availability and creative serving.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{CreativeQuery, SlotsQuery, SlotsResponse};
use crate::app_state::AppState;
use crate::domain::{AdType, Creative};
use crate::error::{ApiError, ErrorResponse};

/// `GET /slots/{ad_type}` — Dates already taken for a placement.
///
/// # Errors
///
/// [`ApiError::InvalidAdType`] on an unknown placement.
#[utoipa::path(
    get,
    path = "/api/v1/slots/{ad_type}",
    tag = "Ads",
    summary = "Taken dates",
    description = "Lists dates held by a paid, approved or refund-pending booking, for building a date picker.",
    params(
        ("ad_type" = AdType, Path, description = "Placement"),
        SlotsQuery,
    ),
    responses(
        (status = 200, description = "Taken dates", body = SlotsResponse),
        (status = 400, description = "Unknown placement", body = ErrorResponse),
    )
)]
pub async fn taken_slots(
    State(state): State<AppState>,
    Path(ad_type): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let ad_type: AdType = ad_type.parse()?;
    let taken = state
        .booking_service
        .taken_dates(ad_type, query.from, query.to)
        .await?;
    Ok(Json(SlotsResponse { ad_type, taken }))
}

/// `GET /ads/{ad_type}` — The creative to display for a date.
///
/// # Errors
///
/// [`ApiError::InvalidAdType`] on an unknown placement.
#[utoipa::path(
    get,
    path = "/api/v1/ads/{ad_type}",
    tag = "Ads",
    summary = "Creative to serve",
    description = "Returns the approved booking's creative for the date, else the highest-priority active legacy ad for the position, else 204.",
    params(
        ("ad_type" = AdType, Path, description = "Placement"),
        CreativeQuery,
    ),
    responses(
        (status = 200, description = "Creative", body = Creative),
        (status = 204, description = "Nothing to serve"),
        (status = 400, description = "Unknown placement", body = ErrorResponse),
    )
)]
pub async fn serve_creative(
    State(state): State<AppState>,
    Path(ad_type): Path<String>,
    Query(query): Query<CreativeQuery>,
) -> Result<Response, ApiError> {
    let ad_type: AdType = ad_type.parse()?;
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    Ok(match state.booking_service.creative_for(ad_type, date).await? {
        Some(creative) => Json(creative).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// Public ad routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/slots/{ad_type}", get(taken_slots))
        .route("/ads/{ad_type}", get(serve_creative))
}
