//! Payment webhook processing: the only path that creates bookings.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::conflict::slot_holders;
use crate::domain::date_range::join_dates;
use crate::domain::{BookingEvent, BookingId, BookingStatus, NewBooking};
use crate::error::ApiError;
use crate::notify::best_effort;
use crate::payment::{ConfirmedOrder, WebhookEvent, signature};

use super::BookingService;

/// Summary of one webhook delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct WebhookOutcome {
    /// Provider event name, or `"unparseable"`.
    pub event_name: String,
    /// Whether the event was an order that was turned into bookings.
    pub processed: bool,
    /// Bookings created, one per free date.
    #[schema(value_type = Vec<String>)]
    pub created: Vec<BookingId>,
    /// Dates whose rejected leftover rows were replaced.
    pub replaced: Vec<NaiveDate>,
    /// Dates skipped because the slot is already held (including replays).
    pub skipped: Vec<NaiveDate>,
    /// Dates that could not be written.
    pub failed: Vec<NaiveDate>,
}

impl WebhookOutcome {
    fn ignored(event_name: impl Into<String>) -> Self {
        Self {
            event_name: event_name.into(),
            ..Self::default()
        }
    }

    fn summary(&self, order: &ConfirmedOrder) -> String {
        let mut text = format!(
            "New {} booking order {}: {} created",
            order.ad_type.label(),
            order.order_id.as_deref().unwrap_or("(no id)"),
            self.created.len()
        );
        if !self.skipped.is_empty() {
            text.push_str(&format!(", already taken: {}", join_dates(&self.skipped)));
        }
        if !self.failed.is_empty() {
            text.push_str(&format!(", FAILED: {}", join_dates(&self.failed)));
        }
        text
    }
}

/// Result of claiming one slot for an order.
enum SlotClaim {
    Created { id: BookingId, replaced: bool },
    Taken { holder: BookingId, status: BookingStatus },
}

impl BookingService {
    /// Verifies, parses and applies a webhook delivery.
    ///
    /// The signature is checked over the raw bytes before anything else.
    /// A signed body that cannot be interpreted is acknowledged and logged
    /// so the provider does not retry it forever.
    ///
    /// # Errors
    ///
    /// [`ApiError::Configuration`] without a webhook secret,
    /// [`ApiError::InvalidSignature`] on a missing or wrong signature.
    pub async fn handle_webhook(
        &self,
        body: &[u8],
        signature_header: Option<&str>,
    ) -> Result<WebhookOutcome, ApiError> {
        let secret = self
            .settings
            .webhook_secret
            .as_deref()
            .ok_or_else(|| ApiError::Configuration("PAYMENT_WEBHOOK_SECRET".to_string()))?;
        let header = signature_header.ok_or(ApiError::InvalidSignature)?;
        signature::verify(secret.as_bytes(), body, header)?;

        let event: WebhookEvent = match serde_json::from_slice(body) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "signed webhook body is not a recognized event");
                return Ok(WebhookOutcome::ignored("unparseable"));
            }
        };
        if !event.is_order_created() {
            tracing::debug!(event_name = %event.meta.event_name, "webhook event ignored");
            return Ok(WebhookOutcome::ignored(event.meta.event_name));
        }

        let event_name = event.meta.event_name.clone();
        match ConfirmedOrder::try_from(event) {
            Ok(order) => Ok(self.process_order(order).await),
            Err(e) => {
                tracing::warn!(error = %e, "order_created webhook lacks usable booking data");
                Ok(WebhookOutcome::ignored(event_name))
            }
        }
    }

    /// Creates one `paid` booking per free date of `order`.
    ///
    /// Per-date failures do not stop the remaining dates. Replaying the
    /// same order skips every date it already holds.
    pub async fn process_order(&self, order: ConfirmedOrder) -> WebhookOutcome {
        let mut outcome = WebhookOutcome {
            event_name: crate::payment::webhook_event::ORDER_CREATED.to_string(),
            processed: true,
            ..WebhookOutcome::default()
        };

        for &date in &order.dates {
            match self.claim_slot(&order, date).await {
                Ok(SlotClaim::Created { id, replaced }) => {
                    outcome.created.push(id);
                    if replaced {
                        outcome.replaced.push(date);
                    }
                }
                Ok(SlotClaim::Taken { holder, status }) => {
                    tracing::warn!(
                        %date,
                        ad_type = %order.ad_type,
                        %holder,
                        %status,
                        order_id = order.order_id.as_deref(),
                        "slot already held; date skipped"
                    );
                    outcome.skipped.push(date);
                }
                Err(ApiError::SlotConflict { .. }) => {
                    tracing::warn!(%date, ad_type = %order.ad_type, "slot claimed concurrently; date skipped");
                    outcome.skipped.push(date);
                }
                Err(e) => {
                    tracing::error!(%date, ad_type = %order.ad_type, error = %e, "failed to store booking");
                    outcome.failed.push(date);
                }
            }
        }

        tracing::info!(
            order_id = order.order_id.as_deref(),
            ad_type = %order.ad_type,
            created = outcome.created.len(),
            skipped = outcome.skipped.len(),
            failed = outcome.failed.len(),
            "order processed"
        );

        let text = outcome.summary(&order);
        best_effort("order notification", self.notifier.notify(&text)).await;
        outcome
    }

    async fn claim_slot(&self, order: &ConfirmedOrder, date: NaiveDate) -> Result<SlotClaim, ApiError> {
        let existing = self.store.find_by_slot(date, order.ad_type).await?;
        if let Some(holder) = slot_holders(&existing, date, order.ad_type).next() {
            return Ok(SlotClaim::Taken {
                holder: holder.id,
                status: holder.status,
            });
        }

        let mut replaced = false;
        for leftover in existing.iter().filter(|b| b.status == BookingStatus::Rejected) {
            match self.store.delete(leftover.id).await {
                Ok(()) | Err(ApiError::BookingNotFound(_)) => replaced = true,
                Err(e) => return Err(e),
            }
        }

        let booking = self
            .store
            .insert(NewBooking {
                selected_date: date,
                ad_type: order.ad_type,
                status: BookingStatus::Paid,
                buyer_name: order.buyer_name.clone(),
                buyer_contact: order.buyer_contact.clone(),
                image_url: order.image_url.clone(),
                link_url: order.link_url.clone(),
                order_id: order.order_id.clone(),
            })
            .await?;

        let _ = self.event_bus.publish(BookingEvent::BookingCreated {
            booking_id: booking.id,
            selected_date: booking.selected_date,
            ad_type: booking.ad_type,
            order_id: booking.order_id.clone(),
            timestamp: Utc::now(),
        });
        Ok(SlotClaim::Created {
            id: booking.id,
            replaced,
        })
    }
}
