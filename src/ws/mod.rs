//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The admin endpoint at `/api/v1/admin/ws` streams booking events for the
//! placements a client subscribes to, and answers booking lookups.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
