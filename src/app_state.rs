//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::api::auth::AdminToken;
use crate::domain::EventBus;
use crate::service::BookingService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Booking service for all business logic.
    pub booking_service: Arc<BookingService>,
    /// Event bus for the admin WebSocket feed.
    pub event_bus: EventBus,
    /// Bearer token guarding `/api/v1/admin`. `None` leaves admin routes open.
    pub admin_token: Option<AdminToken>,
}

impl AppState {
    /// Builds state around `service`, sharing its event bus.
    #[must_use]
    pub fn new(booking_service: Arc<BookingService>, admin_token: Option<AdminToken>) -> Self {
        let event_bus = booking_service.event_bus().clone();
        Self {
            booking_service,
            event_bus,
            admin_token,
        }
    }
}
