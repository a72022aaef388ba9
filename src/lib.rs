//! # adslot-gateway
//!
//! Date-slot advertising sales: buyers pick calendar dates for a
//! placement, pay through a hosted checkout, and the payment provider's
//! signed webhook turns the order into bookings. Admins approve or reject
//! (with refund) each booking, and the public endpoints serve the creative
//! for any `(date, placement)` slot, falling back to house ads.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, admin WebSocket)
//!     │
//!     ├── REST Handlers (api/)        ── bearer guard on /api/v1/admin
//!     ├── WS Handler (ws/)
//!     │
//!     ├── BookingService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── BookingStore (persistence/) ── PostgreSQL or in-memory
//!     ├── PaymentProvider (payment/)  ── checkout, refund, webhook HMAC
//!     └── Notifier (notify)           ── best-effort chat messages
//! ```
//!
//! A slot `(date, ad_type)` is held by at most one booking whose status is
//! not `rejected`; the store enforces it on every write.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod notify;
pub mod payment;
pub mod persistence;
pub mod service;
pub mod ws;
