//! Admin management of legacy fallback ads.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};

use crate::api::dto::LegacyAdQuery;
use crate::app_state::AppState;
use crate::domain::{LegacyAd, LegacyAdPatch, NewLegacyAd};
use crate::error::{ApiError, ErrorResponse};

/// `GET /admin/legacy-ads` — List legacy ads.
///
/// # Errors
///
/// Returns [`ApiError`] on store failures.
#[utoipa::path(
    get,
    path = "/api/v1/admin/legacy-ads",
    tag = "Admin",
    summary = "List legacy ads",
    params(LegacyAdQuery),
    responses(
        (status = 200, description = "Legacy ads by priority", body = Vec<LegacyAd>),
    ),
    security(("admin_token" = []))
)]
pub async fn list_legacy_ads(
    State(state): State<AppState>,
    Query(query): Query<LegacyAdQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let ads = state
        .booking_service
        .list_legacy_ads(query.position, query.active_only)
        .await?;
    Ok(Json(ads))
}

/// `POST /admin/legacy-ads` — Create a legacy ad.
///
/// # Errors
///
/// [`ApiError::InvalidRequest`] on an empty title or bad URL.
#[utoipa::path(
    post,
    path = "/api/v1/admin/legacy-ads",
    tag = "Admin",
    summary = "Create legacy ad",
    request_body = NewLegacyAd,
    responses(
        (status = 201, description = "Legacy ad created", body = LegacyAd),
        (status = 400, description = "Invalid request", body = ErrorResponse),
    ),
    security(("admin_token" = []))
)]
pub async fn create_legacy_ad(
    State(state): State<AppState>,
    Json(req): Json<NewLegacyAd>,
) -> Result<impl IntoResponse, ApiError> {
    let ad = state.booking_service.create_legacy_ad(req).await?;
    Ok((StatusCode::CREATED, Json(ad)))
}

/// `PATCH /admin/legacy-ads/{id}` — Update a legacy ad.
///
/// # Errors
///
/// [`ApiError::LegacyAdNotFound`] if absent.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/legacy-ads/{id}",
    tag = "Admin",
    summary = "Update legacy ad",
    params(("id" = i64, Path, description = "Legacy ad id")),
    request_body = LegacyAdPatch,
    responses(
        (status = 200, description = "Updated legacy ad", body = LegacyAd),
        (status = 404, description = "Legacy ad not found", body = ErrorResponse),
    ),
    security(("admin_token" = []))
)]
pub async fn update_legacy_ad(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<LegacyAdPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let ad = state.booking_service.update_legacy_ad(id, req).await?;
    Ok(Json(ad))
}

/// Legacy ad routes, nested under `/admin`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/legacy-ads", get(list_legacy_ads).post(create_legacy_ad))
        .route("/legacy-ads/{id}", patch(update_legacy_ad))
}
