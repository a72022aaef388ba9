//! In-memory implementation of [`BookingStore`].
//!
//! Used when `PERSISTENCE_ENABLED=false` and throughout the tests. The
//! slot uniqueness rule is checked under the write lock, so concurrent
//! inserts for the same slot cannot both succeed.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use super::{BookingFilter, BookingStore};
use crate::domain::{
    AdType, Booking, BookingId, BookingStatus, LegacyAd, LegacyAdPatch, NewBooking, NewLegacyAd,
};
use crate::error::ApiError;

#[derive(Debug, Default)]
struct Tables {
    bookings: HashMap<BookingId, Booking>,
    legacy_ads: Vec<LegacyAd>,
    next_legacy_id: i64,
}

impl Tables {
    fn slot_taken(&self, date: NaiveDate, ad_type: AdType, except: Option<BookingId>) -> bool {
        self.bookings.values().any(|b| {
            b.slot() == (date, ad_type) && b.status.holds_slot() && Some(b.id) != except
        })
    }

    fn booking_mut(&mut self, id: BookingId) -> Result<&mut Booking, ApiError> {
        self.bookings
            .get_mut(&id)
            .ok_or(ApiError::BookingNotFound(id))
    }
}

/// Thread-safe in-memory store.
///
/// Cloning shares the underlying tables.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted(mut bookings: Vec<Booking>) -> Vec<Booking> {
    bookings.sort_by(|a, b| {
        a.selected_date
            .cmp(&b.selected_date)
            .then(a.ad_type.as_str().cmp(b.ad_type.as_str()))
            .then(a.created_at.cmp(&b.created_at))
    });
    bookings
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn insert(&self, new: NewBooking) -> Result<Booking, ApiError> {
        let mut tables = self.tables.write().await;
        if new.status.holds_slot() && tables.slot_taken(new.selected_date, new.ad_type, None) {
            return Err(ApiError::SlotConflict {
                ad_type: new.ad_type,
                dates: vec![new.selected_date],
            });
        }
        let booking = new.into_booking();
        tables.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn get(&self, id: BookingId) -> Result<Booking, ApiError> {
        let tables = self.tables.read().await;
        tables
            .bookings
            .get(&id)
            .cloned()
            .ok_or(ApiError::BookingNotFound(id))
    }

    async fn find_by_slot(
        &self,
        date: NaiveDate,
        ad_type: AdType,
    ) -> Result<Vec<Booking>, ApiError> {
        let tables = self.tables.read().await;
        Ok(sorted(
            tables
                .bookings
                .values()
                .filter(|b| b.slot() == (date, ad_type))
                .cloned()
                .collect(),
        ))
    }

    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, ApiError> {
        let tables = self.tables.read().await;
        Ok(sorted(
            tables
                .bookings
                .values()
                .filter(|b| filter.matches(b))
                .cloned()
                .collect(),
        ))
    }

    async fn update_status(
        &self,
        id: BookingId,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> Result<Booking, ApiError> {
        let mut tables = self.tables.write().await;
        let booking = tables.booking_mut(id)?;
        if booking.status != expected {
            return Err(ApiError::InvalidTransition {
                from: booking.status,
                to: next,
            });
        }
        booking.status = next;
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }

    async fn update_date(&self, id: BookingId, date: NaiveDate) -> Result<Booking, ApiError> {
        let mut tables = self.tables.write().await;
        let (ad_type, holds) = {
            let booking = tables.booking_mut(id)?;
            (booking.ad_type, booking.status.holds_slot())
        };
        if holds && tables.slot_taken(date, ad_type, Some(id)) {
            return Err(ApiError::SlotConflict {
                ad_type,
                dates: vec![date],
            });
        }
        let booking = tables.booking_mut(id)?;
        booking.selected_date = date;
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }

    async fn update_creative(
        &self,
        id: BookingId,
        image_url: Option<String>,
        link_url: Option<String>,
    ) -> Result<Booking, ApiError> {
        let mut tables = self.tables.write().await;
        let booking = tables.booking_mut(id)?;
        if let Some(image_url) = image_url {
            booking.image_url = image_url;
        }
        if let Some(link_url) = link_url {
            booking.link_url = link_url;
        }
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }

    async fn delete(&self, id: BookingId) -> Result<(), ApiError> {
        let mut tables = self.tables.write().await;
        tables
            .bookings
            .remove(&id)
            .map(|_| ())
            .ok_or(ApiError::BookingNotFound(id))
    }

    async fn list_legacy_ads(
        &self,
        position: Option<AdType>,
        active_only: bool,
    ) -> Result<Vec<LegacyAd>, ApiError> {
        let tables = self.tables.read().await;
        let mut ads: Vec<LegacyAd> = tables
            .legacy_ads
            .iter()
            .filter(|ad| position.is_none_or(|p| ad.position == p))
            .filter(|ad| !active_only || ad.active)
            .cloned()
            .collect();
        ads.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
        Ok(ads)
    }

    async fn insert_legacy_ad(&self, new: NewLegacyAd) -> Result<LegacyAd, ApiError> {
        let mut tables = self.tables.write().await;
        tables.next_legacy_id += 1;
        let ad = LegacyAd {
            id: tables.next_legacy_id,
            title: new.title,
            position: new.position,
            image_url: new.image_url,
            link_url: new.link_url,
            active: new.active,
            priority: new.priority,
            created_at: Utc::now(),
        };
        tables.legacy_ads.push(ad.clone());
        Ok(ad)
    }

    async fn update_legacy_ad(&self, id: i64, patch: LegacyAdPatch) -> Result<LegacyAd, ApiError> {
        let mut tables = self.tables.write().await;
        let ad = tables
            .legacy_ads
            .iter_mut()
            .find(|ad| ad.id == id)
            .ok_or(ApiError::LegacyAdNotFound(id))?;
        patch.apply(ad);
        Ok(ad.clone())
    }
}
