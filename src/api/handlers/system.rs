//! System endpoints: health check and placement catalog.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::AdType;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Bookable placement info.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdTypeInfo {
    ad_type: AdType,
    label: &'static str,
}

/// `GET /config/ad-types` — List bookable placements.
#[utoipa::path(
    get,
    path = "/config/ad-types",
    tag = "System",
    summary = "List placements",
    description = "Returns every placement that can be booked per calendar date.",
    responses(
        (status = 200, description = "Placement catalog", body = Vec<AdTypeInfo>),
    )
)]
pub async fn ad_types_handler() -> impl IntoResponse {
    let types: Vec<AdTypeInfo> = AdType::ALL
        .into_iter()
        .map(|ad_type| AdTypeInfo {
            ad_type,
            label: ad_type.label(),
        })
        .collect();
    (StatusCode::OK, Json(types))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/ad-types", get(ad_types_handler))
}
