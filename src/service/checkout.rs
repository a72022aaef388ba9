//! Checkout initiation.

use crate::domain::conflict::taken_dates;
use crate::domain::date_range::normalize;
use crate::error::ApiError;
use crate::payment::{CheckoutRequest, CheckoutSession};
use crate::persistence::BookingFilter;

use super::BookingService;
use super::booking_service::validate_url;

impl BookingService {
    /// Validates a purchase and opens a hosted checkout for it.
    ///
    /// Nothing is written: bookings only appear once the payment webhook
    /// confirms the order. Dates already held are refused up front so the
    /// buyer is not charged for a slot that cannot be delivered.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidRequest`] on empty or too many dates or bad URLs,
    /// [`ApiError::SlotConflict`] listing held dates, provider errors
    /// otherwise.
    pub async fn create_checkout(
        &self,
        mut request: CheckoutRequest,
    ) -> Result<CheckoutSession, ApiError> {
        request.dates = normalize(request.dates);
        if request.dates.is_empty() {
            return Err(ApiError::InvalidRequest(
                "at least one date is required".to_string(),
            ));
        }
        let max = self.settings.max_booking_days;
        if request.dates.len() > max {
            return Err(ApiError::InvalidRequest(format!(
                "{} dates requested; at most {max} per checkout",
                request.dates.len()
            )));
        }
        request.image_url = validate_url("image_url", &request.image_url)?;
        request.link_url = validate_url("link_url", &request.link_url)?;

        let (Some(first), Some(last)) = (request.dates.first(), request.dates.last()) else {
            return Err(ApiError::InvalidRequest(
                "at least one date is required".to_string(),
            ));
        };
        let existing = self
            .store
            .list(&BookingFilter {
                ad_type: Some(request.ad_type),
                from: Some(*first),
                to: Some(*last),
                ..BookingFilter::default()
            })
            .await?;
        let taken = taken_dates(&existing, request.ad_type, &request.dates);
        if !taken.is_empty() {
            return Err(ApiError::SlotConflict {
                ad_type: request.ad_type,
                dates: taken,
            });
        }

        let session = self.provider.create_checkout(&request).await?;
        tracing::info!(
            ad_type = %request.ad_type,
            days = request.quantity(),
            "checkout session opened"
        );
        Ok(session)
    }
}
