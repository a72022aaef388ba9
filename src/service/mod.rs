//! Service layer: business logic orchestration.
//!
//! [`BookingService`] coordinates the store, the payment provider and the
//! notifier, and emits events through the [`super::domain::EventBus`].
//! Its operations are split by concern:
//!
//! - `booking_service`: admin workflow (approve, reject, delete, edits)
//!   and read paths,
//! - `checkout`: validation and hosted checkout creation,
//! - `webhook`: signed order confirmations, the only booking creator,
//! - `reconcile`: settling bookings stuck in `refund_pending`.

pub mod booking_service;
pub mod checkout;
pub mod reconcile;
pub mod webhook;

pub use booking_service::{BookingService, ServiceSettings};
pub use reconcile::{ReconcileReport, spawn_reconciler};
pub use webhook::WebhookOutcome;
