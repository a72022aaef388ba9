//! Domain events reflecting booking mutations.
//!
//! Every write path publishes a [`BookingEvent`] through the
//! [`super::EventBus`]; the admin WebSocket feed forwards them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::{AdType, BookingId, BookingStatus};

/// Event emitted after a booking changes.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum BookingEvent {
    /// The webhook materialized a paid booking.
    BookingCreated {
        /// New booking.
        booking_id: BookingId,
        /// Slot date.
        selected_date: NaiveDate,
        /// Slot placement.
        ad_type: AdType,
        /// Provider order reference.
        order_id: Option<String>,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A booking moved between statuses.
    StatusChanged {
        /// Booking affected.
        booking_id: BookingId,
        /// Slot placement.
        ad_type: AdType,
        /// Previous status.
        from: BookingStatus,
        /// New status.
        to: BookingStatus,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// An admin moved a booking to another date.
    DateChanged {
        /// Booking affected.
        booking_id: BookingId,
        /// Slot placement.
        ad_type: AdType,
        /// Previous date.
        old_date: NaiveDate,
        /// New date.
        new_date: NaiveDate,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Image or link of a booking changed.
    CreativeUpdated {
        /// Booking affected.
        booking_id: BookingId,
        /// Slot placement.
        ad_type: AdType,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A rejected booking was deleted, freeing its slot.
    BookingDeleted {
        /// Booking removed.
        booking_id: BookingId,
        /// Slot date.
        selected_date: NaiveDate,
        /// Slot placement.
        ad_type: AdType,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl BookingEvent {
    /// Returns the booking this event is about.
    #[must_use]
    pub const fn booking_id(&self) -> BookingId {
        match self {
            Self::BookingCreated { booking_id, .. }
            | Self::StatusChanged { booking_id, .. }
            | Self::DateChanged { booking_id, .. }
            | Self::CreativeUpdated { booking_id, .. }
            | Self::BookingDeleted { booking_id, .. } => *booking_id,
        }
    }

    /// Returns the placement of the affected booking.
    #[must_use]
    pub const fn ad_type(&self) -> AdType {
        match self {
            Self::BookingCreated { ad_type, .. }
            | Self::StatusChanged { ad_type, .. }
            | Self::DateChanged { ad_type, .. }
            | Self::CreativeUpdated { ad_type, .. }
            | Self::BookingDeleted { ad_type, .. } => *ad_type,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::BookingCreated { .. } => "booking_created",
            Self::StatusChanged { .. } => "status_changed",
            Self::DateChanged { .. } => "date_changed",
            Self::CreativeUpdated { .. } => "creative_updated",
            Self::BookingDeleted { .. } => "booking_deleted",
        }
    }
}
