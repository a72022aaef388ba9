//! Legacy ads and creative resolution.
//!
//! A legacy ad is an always-on fallback creative for a position. When no
//! approved booking covers the requested date, the highest-priority
//! active legacy ad for that position is shown instead.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AdType, Booking, BookingId, BookingStatus};

/// Fallback creative stored in the `legacy_ads` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LegacyAd {
    /// Row identifier.
    pub id: i64,
    /// Internal title.
    pub title: String,
    /// Position this creative fills.
    pub position: AdType,
    /// Creative image.
    pub image_url: String,
    /// Click-through target.
    pub link_url: String,
    /// Inactive ads are never served.
    pub active: bool,
    /// Higher wins when several ads are active for a position.
    pub priority: i32,
    /// Insert timestamp.
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a legacy ad.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewLegacyAd {
    /// Internal title.
    pub title: String,
    /// Position this creative fills.
    pub position: AdType,
    /// Creative image.
    pub image_url: String,
    /// Click-through target.
    pub link_url: String,
    /// Defaults to `true`.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Defaults to `0`.
    #[serde(default)]
    pub priority: i32,
}

/// Partial update of a legacy ad. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LegacyAdPatch {
    /// New title.
    pub title: Option<String>,
    /// New image.
    pub image_url: Option<String>,
    /// New link.
    pub link_url: Option<String>,
    /// Enable / disable.
    pub active: Option<bool>,
    /// New priority.
    pub priority: Option<i32>,
}

impl LegacyAdPatch {
    /// Applies the patch in place.
    pub fn apply(&self, ad: &mut LegacyAd) {
        if let Some(title) = &self.title {
            ad.title.clone_from(title);
        }
        if let Some(image_url) = &self.image_url {
            ad.image_url.clone_from(image_url);
        }
        if let Some(link_url) = &self.link_url {
            ad.link_url.clone_from(link_url);
        }
        if let Some(active) = self.active {
            ad.active = active;
        }
        if let Some(priority) = self.priority {
            ad.priority = priority;
        }
    }
}

const fn default_active() -> bool {
    true
}

/// Where a served creative came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum CreativeSource {
    /// A paid, approved booking.
    Booking {
        /// Booking that owns the slot.
        booking_id: BookingId,
    },
    /// A fallback legacy ad.
    Legacy {
        /// Legacy ad row id.
        legacy_ad_id: i64,
    },
}

/// The creative to display for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Creative {
    /// Date served.
    pub date: NaiveDate,
    /// Position served.
    pub ad_type: AdType,
    /// Creative image.
    pub image_url: String,
    /// Click-through target.
    pub link_url: String,
    /// Origin of the creative.
    #[serde(flatten)]
    pub source: CreativeSource,
}

/// Picks the creative for `(date, ad_type)`.
///
/// Only [`BookingStatus::Approved`] bookings are served; paid bookings
/// still await review. Legacy ties on priority go to the lowest id.
#[must_use]
pub fn resolve_creative(
    bookings: &[Booking],
    legacy: &[LegacyAd],
    date: NaiveDate,
    ad_type: AdType,
) -> Option<Creative> {
    if let Some(booking) = bookings
        .iter()
        .find(|b| b.slot() == (date, ad_type) && b.status == BookingStatus::Approved)
    {
        return Some(Creative {
            date,
            ad_type,
            image_url: booking.image_url.clone(),
            link_url: booking.link_url.clone(),
            source: CreativeSource::Booking {
                booking_id: booking.id,
            },
        });
    }

    legacy
        .iter()
        .filter(|ad| ad.active && ad.position == ad_type)
        .max_by(|a, b| a.priority.cmp(&b.priority).then(b.id.cmp(&a.id)))
        .map(|ad| Creative {
            date,
            ad_type,
            image_url: ad.image_url.clone(),
            link_url: ad.link_url.clone(),
            source: CreativeSource::Legacy {
                legacy_ad_id: ad.id,
            },
        })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::NewBooking;

    fn d(day: u32) -> NaiveDate {
        let Some(date) = NaiveDate::from_ymd_opt(2025, 3, day) else {
            panic!("valid date");
        };
        date
    }

    fn booking(day: u32, status: BookingStatus) -> Booking {
        NewBooking {
            selected_date: d(day),
            ad_type: AdType::Top,
            status,
            buyer_name: None,
            buyer_contact: None,
            image_url: format!("https://cdn.example/booking-{day}.png"),
            link_url: "https://advertiser.example".to_string(),
            order_id: None,
        }
        .into_booking()
    }

    fn legacy(id: i64, position: AdType, active: bool, priority: i32) -> LegacyAd {
        LegacyAd {
            id,
            title: format!("legacy {id}"),
            position,
            image_url: format!("https://cdn.example/legacy-{id}.png"),
            link_url: "https://partner.example".to_string(),
            active,
            priority,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn approved_booking_wins() {
        let b = booking(1, BookingStatus::Approved);
        let ads = vec![legacy(1, AdType::Top, true, 100)];
        let Some(creative) = resolve_creative(&[b.clone()], &ads, d(1), AdType::Top) else {
            panic!("expected creative");
        };
        assert_eq!(creative.source, CreativeSource::Booking { booking_id: b.id });
        assert_eq!(creative.image_url, b.image_url);
    }

    #[test]
    fn paid_booking_falls_back_to_legacy() {
        let b = booking(1, BookingStatus::Paid);
        let ads = vec![legacy(7, AdType::Top, true, 0)];
        let Some(creative) = resolve_creative(&[b], &ads, d(1), AdType::Top) else {
            panic!("expected creative");
        };
        assert_eq!(creative.source, CreativeSource::Legacy { legacy_ad_id: 7 });
    }

    #[test]
    fn highest_priority_active_legacy_is_chosen() {
        let ads = vec![
            legacy(1, AdType::Top, true, 1),
            legacy(2, AdType::Top, false, 50),
            legacy(3, AdType::Top, true, 10),
            legacy(4, AdType::Bottom, true, 99),
            legacy(5, AdType::Top, true, 10),
        ];
        let Some(creative) = resolve_creative(&[], &ads, d(2), AdType::Top) else {
            panic!("expected creative");
        };
        assert_eq!(creative.source, CreativeSource::Legacy { legacy_ad_id: 3 });
    }

    #[test]
    fn nothing_to_serve() {
        let ads = vec![legacy(1, AdType::Bottom, true, 1)];
        assert!(resolve_creative(&[], &ads, d(2), AdType::Newsletter).is_none());
    }

    #[test]
    fn patch_updates_only_given_fields() {
        let mut ad = legacy(1, AdType::Top, true, 1);
        LegacyAdPatch {
            active: Some(false),
            priority: Some(9),
            ..LegacyAdPatch::default()
        }
        .apply(&mut ad);
        assert!(!ad.active);
        assert_eq!(ad.priority, 9);
        assert_eq!(ad.title, "legacy 1");
    }
}
