//! adslot-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and admin WebSocket endpoints,
//! plus the background refund reconciler.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use adslot_gateway::api;
use adslot_gateway::api::auth::AdminToken;
use adslot_gateway::app_state::AppState;
use adslot_gateway::config::{AppConfig, LogFormat};
use adslot_gateway::domain::EventBus;
use adslot_gateway::notify::{HttpNotifier, NoopNotifier, Notifier};
use adslot_gateway::payment::HttpPaymentProvider;
use adslot_gateway::persistence::{BookingStore, InMemoryStore, PostgresStore};
use adslot_gateway::service::{BookingService, ServiceSettings, spawn_reconciler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting adslot-gateway");

    // Build persistence layer
    let store: Arc<dyn BookingStore> = if config.database.persistence_enabled {
        Arc::new(
            PostgresStore::connect(&config.database)
                .await
                .context("connecting to postgres")?,
        )
    } else {
        tracing::warn!("PERSISTENCE_ENABLED=false: bookings are kept in memory only");
        Arc::new(InMemoryStore::new())
    };

    // Build outbound clients
    let provider = Arc::new(
        HttpPaymentProvider::new(config.payment.clone(), config.http_timeout)
            .context("building payment client")?,
    );
    let notifier: Arc<dyn Notifier> = match &config.notify_webhook_url {
        Some(url) => Arc::new(
            HttpNotifier::new(url.clone(), config.http_timeout)
                .context("building notification client")?,
        ),
        None => Arc::new(NoopNotifier),
    };
    if config.payment.webhook_secret.is_none() {
        tracing::warn!("PAYMENT_WEBHOOK_SECRET unset: webhook deliveries will be refused");
    }

    // Build service layer
    let event_bus = EventBus::new(config.event_bus_capacity);
    let booking_service = Arc::new(BookingService::new(
        store,
        provider,
        notifier,
        event_bus,
        ServiceSettings {
            webhook_secret: config.payment.webhook_secret.clone(),
            max_booking_days: config.max_booking_days,
        },
    ));

    if config.reconcile_interval_secs > 0 {
        let _reconciler = spawn_reconciler(
            Arc::clone(&booking_service),
            Duration::from_secs(config.reconcile_interval_secs),
        );
    }

    // Build application state
    let admin_token = config.admin_token.as_deref().map(AdminToken::new);
    if admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN unset: admin routes are unauthenticated");
    }
    let app_state = AppState::new(booking_service, admin_token);

    // Build router
    let app = api::build_router(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
