//! Booking service: admin workflow and read paths.
//!
//! Checkout, webhook processing and refund reconciliation live in sibling
//! modules as further `impl BookingService` blocks.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::domain::conflict::{check_date_edit, slot_holders};
use crate::domain::creative::resolve_creative;
use crate::domain::{
    AdType, Booking, BookingEvent, BookingId, BookingStatus, Creative, EventBus, LegacyAd,
    LegacyAdPatch, NewLegacyAd,
};
use crate::error::ApiError;
use crate::notify::Notifier;
use crate::payment::PaymentProvider;
use crate::persistence::{BookingFilter, BookingStore};

/// Settings the service needs from [`crate::config::AppConfig`].
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Shared secret for webhook signatures. `None` makes the webhook
    /// answer with a configuration error.
    pub webhook_secret: Option<String>,
    /// Longest date range one checkout may cover.
    pub max_booking_days: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            webhook_secret: None,
            max_booking_days: 62,
        }
    }
}

/// Orchestration layer for every booking operation.
///
/// Stateless coordinator over the store, the payment provider, the
/// notifier and the event bus. Every mutation follows: load → check the
/// state machine → write (compare-and-set) → publish event.
#[derive(Debug, Clone)]
pub struct BookingService {
    pub(super) store: Arc<dyn BookingStore>,
    pub(super) provider: Arc<dyn PaymentProvider>,
    pub(super) notifier: Arc<dyn Notifier>,
    pub(super) event_bus: EventBus,
    pub(super) settings: ServiceSettings,
}

impl BookingService {
    /// Creates a new `BookingService`.
    #[must_use]
    pub fn new(
        store: Arc<dyn BookingStore>,
        provider: Arc<dyn PaymentProvider>,
        notifier: Arc<dyn Notifier>,
        event_bus: EventBus,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            store,
            provider,
            notifier,
            event_bus,
            settings,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns the configured maximum checkout length in days.
    #[must_use]
    pub fn max_booking_days(&self) -> usize {
        self.settings.max_booking_days
    }

    /// Fetches one booking.
    ///
    /// # Errors
    ///
    /// [`ApiError::BookingNotFound`] if absent.
    pub async fn get_booking(&self, id: BookingId) -> Result<Booking, ApiError> {
        self.store.get(id).await
    }

    /// Lists bookings matching `filter`.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, ApiError> {
        self.store.list(filter).await
    }

    /// Approves a paid booking.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidTransition`] unless the booking is `paid`.
    pub async fn approve(&self, id: BookingId) -> Result<Booking, ApiError> {
        let booking = self.store.get(id).await?;
        booking.status.ensure_transition(BookingStatus::Approved)?;

        let approved = self
            .store
            .update_status(id, booking.status, BookingStatus::Approved)
            .await?;
        self.publish_status(&approved, booking.status);

        tracing::info!(%id, date = %approved.selected_date, ad_type = %approved.ad_type, "booking approved");
        Ok(approved)
    }

    /// Rejects a booking after refunding its order.
    ///
    /// The booking is parked in `refund_pending` while the refund call is
    /// in flight. If the refund fails the booking returns to its previous
    /// status and the error is returned; the booking only becomes
    /// `rejected` once the provider has confirmed the refund.
    ///
    /// `order_id` overrides the stored order reference only when the
    /// booking has none.
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingOrderId`] if no order reference is known,
    /// [`ApiError::InvalidTransition`] if the booking cannot be rejected,
    /// [`ApiError::PaymentProvider`] if the refund fails.
    pub async fn reject(
        &self,
        id: BookingId,
        order_id: Option<String>,
    ) -> Result<Booking, ApiError> {
        let booking = self.store.get(id).await?;
        if !booking.status.can_reject() {
            return Err(ApiError::InvalidTransition {
                from: booking.status,
                to: BookingStatus::Rejected,
            });
        }
        let order_id = refund_order_id(&booking, order_id)?;
        let prior = booking.status;

        let pending = self
            .store
            .update_status(id, prior, BookingStatus::RefundPending)
            .await?;
        self.publish_status(&pending, prior);

        if let Err(refund_err) = self.provider.refund_order(&order_id).await {
            tracing::warn!(%id, order_id, error = %refund_err, "refund failed; reverting status");
            match self
                .store
                .update_status(id, BookingStatus::RefundPending, prior)
                .await
            {
                Ok(reverted) => self.publish_status(&reverted, BookingStatus::RefundPending),
                Err(e) => tracing::error!(
                    %id,
                    error = %e,
                    "could not revert refund_pending; left for reconciliation"
                ),
            }
            return Err(refund_err);
        }

        let rejected = self
            .store
            .update_status(id, BookingStatus::RefundPending, BookingStatus::Rejected)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    %id,
                    order_id,
                    error = %e,
                    "refund issued but status update failed; left for reconciliation"
                );
            })?;
        self.publish_status(&rejected, BookingStatus::RefundPending);

        tracing::info!(%id, order_id, "booking rejected and refunded");
        Ok(rejected)
    }

    /// Deletes a rejected booking, freeing nothing but the row itself
    /// (rejected bookings already release their slot).
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidRequest`] unless the booking is `rejected`.
    pub async fn delete(&self, id: BookingId) -> Result<(), ApiError> {
        let booking = self.store.get(id).await?;
        if booking.status != BookingStatus::Rejected {
            return Err(ApiError::InvalidRequest(format!(
                "booking {id} is {}; only rejected bookings can be deleted",
                booking.status
            )));
        }
        self.store.delete(id).await?;

        let _ = self.event_bus.publish(BookingEvent::BookingDeleted {
            booking_id: id,
            selected_date: booking.selected_date,
            ad_type: booking.ad_type,
            timestamp: Utc::now(),
        });
        tracing::info!(%id, date = %booking.selected_date, ad_type = %booking.ad_type, "booking deleted");
        Ok(())
    }

    /// Moves a booking to `new_date`.
    ///
    /// Every other slot-holding booking of the same ad type is scanned
    /// first; the store then re-checks uniqueness on write.
    ///
    /// # Errors
    ///
    /// [`ApiError::SlotConflict`] if the target date is taken.
    pub async fn edit_date(&self, id: BookingId, new_date: NaiveDate) -> Result<Booking, ApiError> {
        let booking = self.store.get(id).await?;
        if booking.selected_date == new_date {
            return Ok(booking);
        }

        let same_type = self
            .store
            .list(&BookingFilter::for_ad_type(booking.ad_type))
            .await?;
        check_date_edit(&same_type, id, booking.ad_type, new_date)?;

        let updated = self.store.update_date(id, new_date).await?;
        let _ = self.event_bus.publish(BookingEvent::DateChanged {
            booking_id: id,
            ad_type: updated.ad_type,
            old_date: booking.selected_date,
            new_date,
            timestamp: Utc::now(),
        });
        tracing::info!(%id, old = %booking.selected_date, new = %new_date, "booking date changed");
        Ok(updated)
    }

    /// Replaces the creative (image and/or link) of a booking.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidRequest`] if nothing is given or a URL is not
    /// `http(s)`.
    pub async fn update_creative(
        &self,
        id: BookingId,
        image_url: Option<String>,
        link_url: Option<String>,
    ) -> Result<Booking, ApiError> {
        if image_url.is_none() && link_url.is_none() {
            return Err(ApiError::InvalidRequest(
                "nothing to update: give image_url and/or link_url".to_string(),
            ));
        }
        let image_url = image_url
            .map(|u| validate_url("image_url", &u))
            .transpose()?;
        let link_url = link_url.map(|u| validate_url("link_url", &u)).transpose()?;

        let updated = self.store.update_creative(id, image_url, link_url).await?;
        let _ = self.event_bus.publish(BookingEvent::CreativeUpdated {
            booking_id: id,
            ad_type: updated.ad_type,
            timestamp: Utc::now(),
        });
        Ok(updated)
    }

    /// Dates in `from..=to` already held for `ad_type`, ascending.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn taken_dates(
        &self,
        ad_type: AdType,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<NaiveDate>, ApiError> {
        let bookings = self
            .store
            .list(&BookingFilter {
                ad_type: Some(ad_type),
                from,
                to,
                ..BookingFilter::default()
            })
            .await?;
        let mut dates: Vec<NaiveDate> = bookings
            .iter()
            .filter(|b| b.status.holds_slot())
            .map(|b| b.selected_date)
            .collect();
        dates.sort_unstable();
        dates.dedup();
        Ok(dates)
    }

    /// The creative to serve for `(date, ad_type)`, if any.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn creative_for(
        &self,
        ad_type: AdType,
        date: NaiveDate,
    ) -> Result<Option<Creative>, ApiError> {
        let bookings = self.store.find_by_slot(date, ad_type).await?;
        if slot_holders(&bookings, date, ad_type).nth(1).is_some() {
            tracing::warn!(%date, %ad_type, "more than one booking holds this slot");
        }
        let legacy = self.store.list_legacy_ads(Some(ad_type), true).await?;
        Ok(resolve_creative(&bookings, &legacy, date, ad_type))
    }

    /// Lists legacy ads.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list_legacy_ads(
        &self,
        position: Option<AdType>,
        active_only: bool,
    ) -> Result<Vec<LegacyAd>, ApiError> {
        self.store.list_legacy_ads(position, active_only).await
    }

    /// Creates a legacy ad.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidRequest`] on an empty title or bad URL.
    pub async fn create_legacy_ad(&self, mut new: NewLegacyAd) -> Result<LegacyAd, ApiError> {
        if new.title.trim().is_empty() {
            return Err(ApiError::InvalidRequest("title is required".to_string()));
        }
        new.image_url = validate_url("image_url", &new.image_url)?;
        new.link_url = validate_url("link_url", &new.link_url)?;
        let ad = self.store.insert_legacy_ad(new).await?;
        tracing::info!(id = ad.id, position = %ad.position, "legacy ad created");
        Ok(ad)
    }

    /// Updates a legacy ad.
    ///
    /// # Errors
    ///
    /// [`ApiError::LegacyAdNotFound`] if absent, [`ApiError::InvalidRequest`]
    /// on a bad URL.
    pub async fn update_legacy_ad(
        &self,
        id: i64,
        mut patch: LegacyAdPatch,
    ) -> Result<LegacyAd, ApiError> {
        patch.image_url = patch
            .image_url
            .map(|u| validate_url("image_url", &u))
            .transpose()?;
        patch.link_url = patch
            .link_url
            .map(|u| validate_url("link_url", &u))
            .transpose()?;
        self.store.update_legacy_ad(id, patch).await
    }

    pub(super) fn publish_status(&self, booking: &Booking, from: BookingStatus) {
        let _ = self.event_bus.publish(BookingEvent::StatusChanged {
            booking_id: booking.id,
            ad_type: booking.ad_type,
            from,
            to: booking.status,
            timestamp: Utc::now(),
        });
    }
}

/// Picks the order id to refund.
fn refund_order_id(booking: &Booking, requested: Option<String>) -> Result<String, ApiError> {
    let requested = requested
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let stored = booking
        .order_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    match (stored, requested) {
        (Some(stored), Some(requested)) if stored != requested => Err(ApiError::InvalidRequest(
            format!("order id {requested} does not match booking {}", booking.id),
        )),
        (Some(stored), _) => Ok(stored.to_string()),
        (None, Some(requested)) => Ok(requested),
        (None, None) => Err(ApiError::MissingOrderId(booking.id)),
    }
}

/// Trims `value` and requires an `http(s)` URL.
pub(crate) fn validate_url(field: &str, value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidRequest(format!("{field} is required")));
    }
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(ApiError::InvalidRequest(format!(
            "{field} must be an http(s) URL"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::NewBooking;

    fn booking(order_id: Option<&str>) -> Booking {
        NewBooking {
            selected_date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap_or_default(),
            ad_type: AdType::Bottom,
            status: BookingStatus::Paid,
            buyer_name: None,
            buyer_contact: None,
            image_url: "https://cdn.example/a.png".to_string(),
            link_url: "https://example.com".to_string(),
            order_id: order_id.map(str::to_string),
        }
        .into_booking()
    }

    #[test]
    fn stored_order_id_is_used() {
        let b = booking(Some("1001"));
        assert_eq!(refund_order_id(&b, None).ok().as_deref(), Some("1001"));
        assert_eq!(
            refund_order_id(&b, Some("1001".to_string())).ok().as_deref(),
            Some("1001")
        );
    }

    #[test]
    fn mismatched_order_id_is_refused() {
        let b = booking(Some("1001"));
        assert!(matches!(
            refund_order_id(&b, Some("2002".to_string())),
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[test]
    fn requested_order_id_fills_a_gap() {
        let b = booking(None);
        assert_eq!(
            refund_order_id(&b, Some(" 3003 ".to_string())).ok().as_deref(),
            Some("3003")
        );
    }

    #[test]
    fn no_order_id_anywhere_is_missing() {
        let b = booking(Some("  "));
        assert!(matches!(
            refund_order_id(&b, None),
            Err(ApiError::MissingOrderId(id)) if id == b.id
        ));
    }

    #[test]
    fn urls_must_be_http() {
        assert_eq!(
            validate_url("link_url", " https://example.com ").ok().as_deref(),
            Some("https://example.com")
        );
        assert!(validate_url("link_url", "").is_err());
        assert!(validate_url("link_url", "javascript:alert(1)").is_err());
    }
}
