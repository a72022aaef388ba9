//! Bookings: one sold slot for one calendar date and one placement.
//!
//! [`BookingStatus`] is a small state machine. Only the payment webhook
//! creates bookings (as [`BookingStatus::Paid`]); admin actions move them
//! forward, and a [`BookingStatus::Rejected`] booking never comes back.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::AdType;
use crate::error::ApiError;

/// Unique identifier for a booking.
///
/// Wraps a UUID v4 generated at insert time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct BookingId(uuid::Uuid);

impl BookingId {
    /// Creates a new random `BookingId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Wraps an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for BookingId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

/// Lifecycle state of a booking.
///
/// ```text
/// pending ─▶ paid ─▶ approved
///              │        │
///              ▼        ▼
///          refund_pending ─▶ rejected
/// ```
///
/// `refund_pending` may also fall back to the status it came from when
/// the refund call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting payment. Nothing currently creates this state.
    Pending,
    /// Payment confirmed by the provider webhook.
    Paid,
    /// Creative reviewed and accepted by an admin.
    Approved,
    /// Rejection started; the refund has not been confirmed yet.
    RefundPending,
    /// Refunded and rejected. The slot is free again.
    Rejected,
}

impl BookingStatus {
    /// Returns the wire / database tag for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Approved => "approved",
            Self::RefundPending => "refund_pending",
            Self::Rejected => "rejected",
        }
    }

    /// Whether a booking in this status occupies its `(date, ad_type)` slot.
    #[must_use]
    pub const fn holds_slot(&self) -> bool {
        !matches!(self, Self::Rejected)
    }

    /// Whether a reject (refund) may be started from this status.
    #[must_use]
    pub const fn can_reject(&self) -> bool {
        matches!(self, Self::Paid | Self::Approved)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Paid)
                | (Self::Paid, Self::Approved)
                | (Self::Paid | Self::Approved, Self::RefundPending)
                | (Self::RefundPending, Self::Rejected)
                | (Self::RefundPending, Self::Paid | Self::Approved)
        )
    }

    /// Checks a transition, returning [`ApiError::InvalidTransition`] when
    /// it is not allowed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidTransition`] for an illegal move.
    pub fn ensure_transition(&self, next: Self) -> Result<(), ApiError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(ApiError::InvalidTransition {
                from: *self,
                to: next,
            })
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "approved" => Ok(Self::Approved),
            "refund_pending" => Ok(Self::RefundPending),
            "rejected" => Ok(Self::Rejected),
            other => Err(ApiError::InvalidRequest(format!(
                "unknown booking status: {other}"
            ))),
        }
    }
}

/// A persisted booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier.
    pub id: BookingId,
    /// The single calendar date this booking occupies.
    pub selected_date: NaiveDate,
    /// Placement bought.
    pub ad_type: AdType,
    /// Current lifecycle state.
    pub status: BookingStatus,
    /// Buyer name as reported by the payment provider.
    pub buyer_name: Option<String>,
    /// Buyer email / contact as reported by the payment provider.
    pub buyer_contact: Option<String>,
    /// Creative image.
    pub image_url: String,
    /// Click-through target.
    pub link_url: String,
    /// Payment provider order reference, needed for refunds.
    pub order_id: Option<String>,
    /// Insert timestamp (immutable).
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// The `(date, ad_type)` slot this booking occupies.
    #[must_use]
    pub const fn slot(&self) -> (NaiveDate, AdType) {
        (self.selected_date, self.ad_type)
    }
}

/// Fields needed to insert a booking. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    /// Date of the slot.
    pub selected_date: NaiveDate,
    /// Placement of the slot.
    pub ad_type: AdType,
    /// Initial status (the webhook always uses [`BookingStatus::Paid`]).
    pub status: BookingStatus,
    /// Buyer name.
    pub buyer_name: Option<String>,
    /// Buyer contact.
    pub buyer_contact: Option<String>,
    /// Creative image.
    pub image_url: String,
    /// Click-through target.
    pub link_url: String,
    /// Provider order reference.
    pub order_id: Option<String>,
}

impl NewBooking {
    /// Materializes the booking with a fresh id and timestamps.
    #[must_use]
    pub fn into_booking(self) -> Booking {
        let now = Utc::now();
        Booking {
            id: BookingId::new(),
            selected_date: self.selected_date,
            ad_type: self.ad_type,
            status: self.status,
            buyer_name: self.buyer_name,
            buyer_contact: self.buyer_contact,
            image_url: self.image_url,
            link_url: self.link_url,
            order_id: self.order_id,
            created_at: now,
            updated_at: now,
        }
    }
}
