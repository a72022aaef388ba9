//! Database rows for the `bookings` and `legacy_ads` tables.
//!
//! Enumerations are stored as `TEXT` and parsed on the way out, so a row
//! with an unknown tag surfaces as a persistence error instead of a panic.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{Booking, BookingId, LegacyAd};
use crate::error::ApiError;

/// A row from the `bookings` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingRow {
    /// Primary key.
    pub id: Uuid,
    /// Slot date.
    pub selected_date: NaiveDate,
    /// Placement tag.
    pub ad_type: String,
    /// Status tag.
    pub status: String,
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
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = ApiError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BookingId::from_uuid(row.id),
            selected_date: row.selected_date,
            ad_type: row.ad_type.parse().map_err(corrupt_row)?,
            status: row.status.parse().map_err(corrupt_row)?,
            buyer_name: row.buyer_name,
            buyer_contact: row.buyer_contact,
            image_url: row.image_url,
            link_url: row.link_url,
            order_id: row.order_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A row from the `legacy_ads` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LegacyAdRow {
    /// Primary key.
    pub id: i64,
    /// Internal title.
    pub title: String,
    /// Placement tag.
    pub position: String,
    /// Creative image.
    pub image_url: String,
    /// Click-through target.
    pub link_url: String,
    /// Whether the ad may be served.
    pub active: bool,
    /// Ordering weight.
    pub priority: i32,
    /// Insert timestamp.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<LegacyAdRow> for LegacyAd {
    type Error = ApiError;

    fn try_from(row: LegacyAdRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            title: row.title,
            position: row.position.parse().map_err(corrupt_row)?,
            image_url: row.image_url,
            link_url: row.link_url,
            active: row.active,
            priority: row.priority,
            created_at: row.created_at,
        })
    }
}

fn corrupt_row(err: ApiError) -> ApiError {
    ApiError::PersistenceError(format!("corrupt row: {err}"))
}
