//! Persistence layer: bookings and legacy ads.
//!
//! [`BookingStore`] is the port the service layer talks to. Two
//! implementations exist: [`postgres::PostgresStore`] backed by
//! `sqlx::PgPool`, and [`in_memory::InMemoryStore`] for tests and for
//! running with persistence disabled.
//!
//! Both enforce slot uniqueness on write: at most one non-rejected
//! booking per `(selected_date, ad_type)`. A violation is reported as
//! [`ApiError::SlotConflict`].

pub mod in_memory;
pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{
    AdType, Booking, BookingId, BookingStatus, LegacyAd, LegacyAdPatch, NewBooking, NewLegacyAd,
};
use crate::error::ApiError;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

/// Filter for [`BookingStore::list`]. Empty fields match everything.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookingFilter {
    /// Only this placement.
    pub ad_type: Option<AdType>,
    /// Only this status.
    pub status: Option<BookingStatus>,
    /// Dates on or after.
    pub from: Option<NaiveDate>,
    /// Dates on or before.
    pub to: Option<NaiveDate>,
}

impl BookingFilter {
    /// Filter on a single placement.
    #[must_use]
    pub fn for_ad_type(ad_type: AdType) -> Self {
        Self {
            ad_type: Some(ad_type),
            ..Self::default()
        }
    }

    /// Filter on a single status.
    #[must_use]
    pub fn with_status(status: BookingStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Returns `true` if `booking` passes every set criterion.
    #[must_use]
    pub fn matches(&self, booking: &Booking) -> bool {
        self.ad_type.is_none_or(|t| booking.ad_type == t)
            && self.status.is_none_or(|s| booking.status == s)
            && self.from.is_none_or(|d| booking.selected_date >= d)
            && self.to.is_none_or(|d| booking.selected_date <= d)
    }
}

/// Storage port for bookings and legacy ads.
///
/// Listing methods return bookings ordered by `(selected_date, ad_type,
/// created_at)`.
#[async_trait]
pub trait BookingStore: Send + Sync + fmt::Debug {
    /// Inserts a booking.
    ///
    /// # Errors
    ///
    /// [`ApiError::SlotConflict`] if the slot is already held by a
    /// non-rejected booking; [`ApiError::PersistenceError`] otherwise.
    async fn insert(&self, new: NewBooking) -> Result<Booking, ApiError>;

    /// Fetches one booking.
    ///
    /// # Errors
    ///
    /// [`ApiError::BookingNotFound`] if absent.
    async fn get(&self, id: BookingId) -> Result<Booking, ApiError>;

    /// Every booking (any status) for `(date, ad_type)`.
    ///
    /// # Errors
    ///
    /// [`ApiError::PersistenceError`] on storage failure.
    async fn find_by_slot(&self, date: NaiveDate, ad_type: AdType)
    -> Result<Vec<Booking>, ApiError>;

    /// Bookings matching `filter`.
    ///
    /// # Errors
    ///
    /// [`ApiError::PersistenceError`] on storage failure.
    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, ApiError>;

    /// Compare-and-set status update: succeeds only if the booking is
    /// currently `expected`.
    ///
    /// # Errors
    ///
    /// [`ApiError::BookingNotFound`] if absent,
    /// [`ApiError::InvalidTransition`] if the current status is not
    /// `expected`.
    async fn update_status(
        &self,
        id: BookingId,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> Result<Booking, ApiError>;

    /// Moves a booking to another date.
    ///
    /// # Errors
    ///
    /// [`ApiError::SlotConflict`] if the target slot is held,
    /// [`ApiError::BookingNotFound`] if absent.
    async fn update_date(&self, id: BookingId, date: NaiveDate) -> Result<Booking, ApiError>;

    /// Replaces image and/or link. `None` keeps the current value.
    ///
    /// # Errors
    ///
    /// [`ApiError::BookingNotFound`] if absent.
    async fn update_creative(
        &self,
        id: BookingId,
        image_url: Option<String>,
        link_url: Option<String>,
    ) -> Result<Booking, ApiError>;

    /// Removes a booking permanently.
    ///
    /// # Errors
    ///
    /// [`ApiError::BookingNotFound`] if absent.
    async fn delete(&self, id: BookingId) -> Result<(), ApiError>;

    /// Legacy ads, optionally for one position and/or active only,
    /// highest priority first.
    ///
    /// # Errors
    ///
    /// [`ApiError::PersistenceError`] on storage failure.
    async fn list_legacy_ads(
        &self,
        position: Option<AdType>,
        active_only: bool,
    ) -> Result<Vec<LegacyAd>, ApiError>;

    /// Inserts a legacy ad.
    ///
    /// # Errors
    ///
    /// [`ApiError::PersistenceError`] on storage failure.
    async fn insert_legacy_ad(&self, new: NewLegacyAd) -> Result<LegacyAd, ApiError>;

    /// Applies a partial update to a legacy ad.
    ///
    /// # Errors
    ///
    /// [`ApiError::LegacyAdNotFound`] if absent.
    async fn update_legacy_ad(&self, id: i64, patch: LegacyAdPatch) -> Result<LegacyAd, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_matches_on_every_field() {
        let booking = NewBooking {
            selected_date: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap_or_default(),
            ad_type: AdType::Bottom,
            status: BookingStatus::Paid,
            buyer_name: None,
            buyer_contact: None,
            image_url: String::new(),
            link_url: String::new(),
            order_id: None,
        }
        .into_booking();

        assert!(BookingFilter::default().matches(&booking));
        assert!(BookingFilter::for_ad_type(AdType::Bottom).matches(&booking));
        assert!(!BookingFilter::for_ad_type(AdType::Top).matches(&booking));
        assert!(!BookingFilter::with_status(BookingStatus::Approved).matches(&booking));

        let window = BookingFilter {
            from: NaiveDate::from_ymd_opt(2025, 3, 1),
            to: NaiveDate::from_ymd_opt(2025, 3, 4),
            ..BookingFilter::default()
        };
        assert!(!window.matches(&booking));
    }
}
