//! Payment provider integration: checkout creation, refunds, and the
//! signed webhook that confirms orders.
//!
//! The service layer depends on the [`PaymentProvider`] trait only;
//! [`http_provider::HttpPaymentProvider`] is the production
//! implementation.

pub mod http_provider;
pub mod signature;
pub mod webhook_event;

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::AdType;
use crate::error::ApiError;

pub use http_provider::HttpPaymentProvider;
pub use webhook_event::{ConfirmedOrder, WebhookEvent};

/// What the buyer is paying for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    /// Dates bought, sorted and unique. Quantity is `dates.len()`.
    pub dates: Vec<NaiveDate>,
    /// Creative image.
    pub image_url: String,
    /// Click-through target.
    pub link_url: String,
    /// Placement bought; selects the pricing variant.
    pub ad_type: AdType,
}

impl CheckoutRequest {
    /// Number of units (days) to charge for.
    #[must_use]
    pub fn quantity(&self) -> usize {
        self.dates.len()
    }
}

/// A checkout session created at the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    /// URL the buyer is redirected to.
    pub url: String,
}

/// Outbound calls to the payment provider.
#[async_trait]
pub trait PaymentProvider: Send + Sync + fmt::Debug {
    /// Creates a hosted checkout carrying the booking metadata.
    ///
    /// # Errors
    ///
    /// [`ApiError::Configuration`] if credentials or the variant for the
    /// ad type are missing; [`ApiError::PaymentProvider`] on API failure.
    async fn create_checkout(&self, request: &CheckoutRequest)
    -> Result<CheckoutSession, ApiError>;

    /// Refunds an order in full.
    ///
    /// # Errors
    ///
    /// [`ApiError::PaymentProvider`] unless the provider confirms.
    async fn refund_order(&self, order_id: &str) -> Result<(), ApiError>;

    /// Asks whether an order has already been refunded.
    ///
    /// # Errors
    ///
    /// [`ApiError::PaymentProvider`] on API failure.
    async fn order_refunded(&self, order_id: &str) -> Result<bool, ApiError>;
}
