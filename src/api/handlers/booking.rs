//! Admin booking handlers: list, inspect, approve, reject, delete, edit.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use crate::api::dto::{
    BookingDto, BookingListResponse, CreativeEditRequest, DateEditRequest, PaginationParams,
    RejectRequest,
};
use crate::app_state::AppState;
use crate::domain::BookingId;
use crate::error::{ApiError, ErrorResponse};
use crate::persistence::BookingFilter;
use crate::service::ReconcileReport;

/// `GET /admin/bookings` — List bookings with filters and pagination.
///
/// # Errors
///
/// Returns [`ApiError`] on store failures.
#[utoipa::path(
    get,
    path = "/api/v1/admin/bookings",
    tag = "Admin",
    summary = "List bookings",
    description = "Bookings ordered by date, optionally filtered by placement, status and date range.",
    params(BookingFilter, PaginationParams),
    responses(
        (status = 200, description = "Paginated booking list", body = BookingListResponse),
        (status = 401, description = "Missing or wrong admin token", body = ErrorResponse),
    ),
    security(("admin_token" = []))
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(filter): Query<BookingFilter>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let bookings = state.booking_service.list_bookings(&filter).await?;
    let (data, pagination) = params.paginate(bookings, BookingDto::from);
    Ok(Json(BookingListResponse { data, pagination }))
}

/// `GET /admin/bookings/{id}` — Get one booking.
///
/// # Errors
///
/// [`ApiError::BookingNotFound`] if absent.
#[utoipa::path(
    get,
    path = "/api/v1/admin/bookings/{id}",
    tag = "Admin",
    summary = "Get booking",
    params(("id" = uuid::Uuid, Path, description = "Booking UUID")),
    responses(
        (status = 200, description = "Booking", body = BookingDto),
        (status = 404, description = "Booking not found", body = ErrorResponse),
    ),
    security(("admin_token" = []))
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .booking_service
        .get_booking(BookingId::from_uuid(id))
        .await?;
    Ok(Json(BookingDto::from(booking)))
}

/// `POST /admin/bookings/{id}/approve` — Approve a paid booking.
///
/// # Errors
///
/// [`ApiError::InvalidTransition`] unless the booking is `paid`.
#[utoipa::path(
    post,
    path = "/api/v1/admin/bookings/{id}/approve",
    tag = "Admin",
    summary = "Approve booking",
    description = "Moves a paid booking to approved; its creative starts being served.",
    params(("id" = uuid::Uuid, Path, description = "Booking UUID")),
    responses(
        (status = 200, description = "Approved booking", body = BookingDto),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Booking is not paid", body = ErrorResponse),
    ),
    security(("admin_token" = []))
)]
pub async fn approve_booking(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .booking_service
        .approve(BookingId::from_uuid(id))
        .await?;
    Ok(Json(BookingDto::from(booking)))
}

/// `POST /admin/bookings/{id}/reject` — Refund and reject a booking.
///
/// The body is optional.
///
/// # Errors
///
/// Returns [`ApiError`] if the refund cannot be issued; the booking then
/// keeps its previous status.
#[utoipa::path(
    post,
    path = "/api/v1/admin/bookings/{id}/reject",
    tag = "Admin",
    summary = "Reject booking",
    description = "Refunds the order at the payment provider, then marks the booking rejected and frees its slot. If the refund fails the booking is left unchanged.",
    params(("id" = uuid::Uuid, Path, description = "Booking UUID")),
    request_body(content = RejectRequest, description = "Optional order id override"),
    responses(
        (status = 200, description = "Rejected booking", body = BookingDto),
        (status = 400, description = "No order id known", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Booking cannot be rejected", body = ErrorResponse),
        (status = 502, description = "Refund failed", body = ErrorResponse),
    ),
    security(("admin_token" = []))
)]
pub async fn reject_booking(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let req: RejectRequest = if body.iter().all(u8::is_ascii_whitespace) {
        RejectRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::InvalidRequest(format!("reject body: {e}")))?
    };

    let booking = state
        .booking_service
        .reject(BookingId::from_uuid(id), req.order_id)
        .await?;
    Ok(Json(BookingDto::from(booking)))
}

/// `DELETE /admin/bookings/{id}` — Delete a rejected booking.
///
/// # Errors
///
/// [`ApiError::InvalidRequest`] unless the booking is `rejected`.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/bookings/{id}",
    tag = "Admin",
    summary = "Delete booking",
    params(("id" = uuid::Uuid, Path, description = "Booking UUID")),
    responses(
        (status = 204, description = "Booking deleted"),
        (status = 400, description = "Booking is not rejected", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
    ),
    security(("admin_token" = []))
)]
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .booking_service
        .delete(BookingId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /admin/bookings/{id}/date` — Move a booking to another date.
///
/// # Errors
///
/// [`ApiError::SlotConflict`] if the target date is held.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/bookings/{id}/date",
    tag = "Admin",
    summary = "Change booking date",
    params(("id" = uuid::Uuid, Path, description = "Booking UUID")),
    request_body = DateEditRequest,
    responses(
        (status = 200, description = "Updated booking", body = BookingDto),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Target date already booked", body = ErrorResponse),
    ),
    security(("admin_token" = []))
)]
pub async fn edit_booking_date(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<DateEditRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .booking_service
        .edit_date(BookingId::from_uuid(id), req.selected_date)
        .await?;
    Ok(Json(BookingDto::from(booking)))
}

/// `PATCH /admin/bookings/{id}/creative` — Replace image and/or link.
///
/// # Errors
///
/// [`ApiError::InvalidRequest`] on empty or non-http(s) URLs.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/bookings/{id}/creative",
    tag = "Admin",
    summary = "Change booking creative",
    params(("id" = uuid::Uuid, Path, description = "Booking UUID")),
    request_body = CreativeEditRequest,
    responses(
        (status = 200, description = "Updated booking", body = BookingDto),
        (status = 400, description = "Invalid URL", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
    ),
    security(("admin_token" = []))
)]
pub async fn edit_booking_creative(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<CreativeEditRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .booking_service
        .update_creative(BookingId::from_uuid(id), req.image_url, req.link_url)
        .await?;
    Ok(Json(BookingDto::from(booking)))
}

/// `POST /admin/bookings/reconcile` — Settle bookings stuck in `refund_pending`.
///
/// # Errors
///
/// Returns [`ApiError`] if pending bookings cannot be listed.
#[utoipa::path(
    post,
    path = "/api/v1/admin/bookings/reconcile",
    tag = "Admin",
    summary = "Reconcile refunds",
    description = "Runs one reconciliation pass immediately instead of waiting for the background job.",
    responses(
        (status = 200, description = "Reconciliation report", body = ReconcileReport),
    ),
    security(("admin_token" = []))
)]
pub async fn reconcile_refunds(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let report = state.booking_service.reconcile_refunds().await?;
    Ok(Json(report))
}

/// Admin booking routes, nested under `/admin`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings))
        .route("/bookings/reconcile", post(reconcile_refunds))
        .route("/bookings/{id}", get(get_booking).delete(delete_booking))
        .route("/bookings/{id}/approve", post(approve_booking))
        .route("/bookings/{id}/reject", post(reject_booking))
        .route("/bookings/{id}/date", patch(edit_booking_date))
        .route("/bookings/{id}/creative", patch(edit_booking_creative))
}
