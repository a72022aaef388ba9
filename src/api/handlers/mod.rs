//! REST endpoint handlers organized by resource.

pub mod ads;
pub mod booking;
pub mod checkout;
pub mod legacy_ads;
pub mod system;
pub mod webhook;

use axum::Router;
use axum::routing::get;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Public routes under `/api/v1`.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .merge(checkout::routes())
        .merge(webhook::routes())
        .merge(ads::routes())
}

/// Admin routes under `/api/v1/admin`, before the auth layer is applied.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .merge(booking::routes())
        .merge(legacy_ads::routes())
        .route("/ws", get(ws_handler))
}
