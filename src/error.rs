//! Error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type of the crate. Each variant maps
//! to a numeric code, an HTTP status, and the structured JSON body below.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{AdType, BookingId, BookingStatus};
use crate::domain::date_range::join_dates;

/// Structured JSON error response body.
///
/// ```json
/// {
///   "error": {
///     "code": 2002,
///     "message": "slot already booked: top on 2025-03-01",
///     "details": "2025-03-01"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional machine-friendly details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Crate-wide error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category              | HTTP Status                  |
/// |-----------|-----------------------|------------------------------|
/// | 1000–1099 | Validation            | 400 Bad Request              |
/// | 1100–1199 | Authentication        | 401 Unauthorized             |
/// | 2000–2999 | Not found / conflict  | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server / upstream     | 500 / 502                    |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown placement tag.
    #[error("invalid ad type: {0}")]
    InvalidAdType(String),

    /// Reject needs a provider order id and none is known.
    #[error("booking {0} has no order id; refund must be handled manually")]
    MissingOrderId(BookingId),

    /// Webhook signature did not match the body.
    #[error("invalid webhook signature")]
    InvalidSignature,

    /// Admin credentials missing or wrong.
    #[error("unauthorized")]
    Unauthorized,

    /// No booking with this id.
    #[error("booking not found: {0}")]
    BookingNotFound(BookingId),

    /// No legacy ad with this id.
    #[error("legacy ad not found: {0}")]
    LegacyAdNotFound(i64),

    /// One or more `(date, ad_type)` slots are already held.
    #[error("slot already booked: {ad_type} on {}", join_dates(.dates))]
    SlotConflict {
        /// Placement of the contested slots.
        ad_type: AdType,
        /// Dates already held.
        dates: Vec<NaiveDate>,
    },

    /// Status change not allowed by the booking state machine.
    #[error("cannot move booking from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: BookingStatus,
        /// Requested status.
        to: BookingStatus,
    },

    /// Payment provider call failed or returned an error.
    #[error("payment provider error: {0}")]
    PaymentProvider(String),

    /// Notification endpoint call failed.
    #[error("notification error: {0}")]
    Notification(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// A setting needed by this operation is missing.
    #[error("missing configuration: {0}")]
    Configuration(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidAdType(_) => 1002,
            Self::MissingOrderId(_) => 1003,
            Self::InvalidSignature => 1101,
            Self::Unauthorized => 1102,
            Self::BookingNotFound(_) => 2001,
            Self::SlotConflict { .. } => 2002,
            Self::InvalidTransition { .. } => 2003,
            Self::LegacyAdNotFound(_) => 2004,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::PaymentProvider(_) => 3002,
            Self::Configuration(_) => 3003,
            Self::Notification(_) => 3004,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidAdType(_) | Self::MissingOrderId(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidSignature | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BookingNotFound(_) | Self::LegacyAdNotFound(_) => StatusCode::NOT_FOUND,
            Self::SlotConflict { .. } | Self::InvalidTransition { .. } => StatusCode::CONFLICT,
            Self::PaymentProvider(_) | Self::Notification(_) => StatusCode::BAD_GATEWAY,
            Self::PersistenceError(_) | Self::Configuration(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::SlotConflict { dates, .. } => Some(join_dates(dates)),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::PaymentProvider(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
