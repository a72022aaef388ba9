//! OpenAPI document for every REST endpoint.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::dto;
use super::handlers::{ads, booking, checkout, legacy_ads, system, webhook};
use crate::domain;
use crate::error::{ErrorBody, ErrorResponse};
use crate::service::{ReconcileReport, WebhookOutcome};

/// Generated API description, served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "adslot-gateway",
        description = "Date-slot ad booking: checkout, payment webhook, admin review, creative serving."
    ),
    paths(
        system::health_handler,
        system::ad_types_handler,
        checkout::create_checkout,
        webhook::payment_webhook,
        ads::taken_slots,
        ads::serve_creative,
        booking::list_bookings,
        booking::get_booking,
        booking::approve_booking,
        booking::reject_booking,
        booking::delete_booking,
        booking::edit_booking_date,
        booking::edit_booking_creative,
        booking::reconcile_refunds,
        legacy_ads::list_legacy_ads,
        legacy_ads::create_legacy_ad,
        legacy_ads::update_legacy_ad,
    ),
    components(schemas(
        ErrorResponse,
        ErrorBody,
        domain::AdType,
        domain::BookingId,
        domain::BookingStatus,
        domain::Creative,
        domain::CreativeSource,
        domain::LegacyAd,
        domain::NewLegacyAd,
        domain::LegacyAdPatch,
        dto::BookingDto,
        dto::BookingListResponse,
        dto::PaginationMeta,
        dto::RejectRequest,
        dto::DateEditRequest,
        dto::CreativeEditRequest,
        dto::CheckoutRequestDto,
        dto::CheckoutResponse,
        dto::SlotsResponse,
        system::HealthResponse,
        system::AdTypeInfo,
        WebhookOutcome,
        ReconcileReport,
    )),
    modifiers(&AdminTokenScheme),
    tags(
        (name = "System", description = "Health and catalog"),
        (name = "Checkout", description = "Start a purchase"),
        (name = "Webhooks", description = "Payment provider callbacks"),
        (name = "Ads", description = "Public availability and serving"),
        (name = "Admin", description = "Booking review and legacy ads (bearer token)"),
    )
)]
pub struct ApiDoc;

/// Registers the `admin_token` bearer scheme referenced by admin paths.
#[derive(Debug)]
struct AdminTokenScheme;

impl Modify for AdminTokenScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_token",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
