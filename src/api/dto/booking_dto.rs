//! Admin booking DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::PaginationMeta;
use crate::domain::{AdType, Booking, BookingId, BookingStatus};

/// Full booking as shown to admins.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingDto {
    /// Booking id.
    pub id: BookingId,
    /// Slot date.
    pub selected_date: NaiveDate,
    /// Slot placement.
    pub ad_type: AdType,
    /// Lifecycle state.
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
    /// Insert timestamp.
    pub created_at: DateTime<Utc>,
    /// Last change.
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            selected_date: b.selected_date,
            ad_type: b.ad_type,
            status: b.status,
            buyer_name: b.buyer_name,
            buyer_contact: b.buyer_contact,
            image_url: b.image_url,
            link_url: b.link_url,
            order_id: b.order_id,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

/// Paginated booking list.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingListResponse {
    /// Bookings on this page.
    pub data: Vec<BookingDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Body of `POST /admin/bookings/{id}/reject`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RejectRequest {
    /// Order to refund when the booking has none stored.
    #[serde(default)]
    pub order_id: Option<String>,
}

/// Body of `PATCH /admin/bookings/{id}/date`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DateEditRequest {
    /// New slot date.
    pub selected_date: NaiveDate,
}

/// Body of `PATCH /admin/bookings/{id}/creative`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreativeEditRequest {
    /// New image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// New link.
    #[serde(default)]
    pub link_url: Option<String>,
}
