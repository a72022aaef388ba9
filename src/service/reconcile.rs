//! Recovery of bookings stuck in `refund_pending`.
//!
//! A booking stays in `refund_pending` when the process died between the
//! refund call and the final status write, or when the revert after a
//! failed refund could not be stored. The reconciler settles each one by
//! asking the provider.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use utoipa::ToSchema;

use crate::domain::{BookingId, BookingStatus};
use crate::error::ApiError;
use crate::persistence::BookingFilter;

use super::BookingService;

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReconcileReport {
    /// Bookings examined.
    pub checked: usize,
    /// Bookings moved to `rejected`.
    #[schema(value_type = Vec<String>)]
    pub rejected: Vec<BookingId>,
    /// Bookings still waiting (refund not confirmed, or no order id).
    #[schema(value_type = Vec<String>)]
    pub pending: Vec<BookingId>,
}

impl BookingService {
    /// Settles every booking in `refund_pending`.
    ///
    /// If the provider reports the order refunded, or a retried refund
    /// succeeds, the booking becomes `rejected`. Anything else leaves it in
    /// place for the next pass.
    ///
    /// # Errors
    ///
    /// Only a failure to list pending bookings aborts the pass.
    pub async fn reconcile_refunds(&self) -> Result<ReconcileReport, ApiError> {
        let stuck = self
            .store
            .list(&BookingFilter::with_status(BookingStatus::RefundPending))
            .await?;
        let mut report = ReconcileReport {
            checked: stuck.len(),
            ..ReconcileReport::default()
        };

        for booking in stuck {
            let Some(order_id) = booking.order_id.as_deref().filter(|o| !o.trim().is_empty())
            else {
                tracing::warn!(id = %booking.id, "refund_pending booking has no order id; needs manual review");
                report.pending.push(booking.id);
                continue;
            };

            let refunded = match self.provider.order_refunded(order_id).await {
                Ok(true) => true,
                Ok(false) => match self.provider.refund_order(order_id).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(id = %booking.id, order_id, error = %e, "refund retry failed");
                        false
                    }
                },
                Err(e) => {
                    tracing::warn!(id = %booking.id, order_id, error = %e, "refund status lookup failed");
                    false
                }
            };
            if !refunded {
                report.pending.push(booking.id);
                continue;
            }

            match self
                .store
                .update_status(booking.id, BookingStatus::RefundPending, BookingStatus::Rejected)
                .await
            {
                Ok(rejected) => {
                    self.publish_status(&rejected, BookingStatus::RefundPending);
                    tracing::info!(id = %booking.id, order_id, "stuck refund settled");
                    report.rejected.push(booking.id);
                }
                Err(e) => {
                    tracing::error!(id = %booking.id, error = %e, "could not settle refund_pending booking");
                    report.pending.push(booking.id);
                }
            }
        }

        Ok(report)
    }
}

/// Runs [`BookingService::reconcile_refunds`] every `interval`.
pub fn spawn_reconciler(service: Arc<BookingService>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match service.reconcile_refunds().await {
                Ok(report) if report.checked > 0 => tracing::info!(
                    checked = report.checked,
                    rejected = report.rejected.len(),
                    pending = report.pending.len(),
                    "refund reconciliation pass"
                ),
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "refund reconciliation failed"),
            }
        }
    })
}
