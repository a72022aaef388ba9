//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single admin connection, dispatching
//! incoming commands and forwarding filtered booking events.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::{SubscriptionManager, parse_ad_types};
use crate::api::dto::BookingDto;
use crate::domain::{BookingEvent, BookingId};
use crate::service::BookingService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards events for subscribed placements from the
///   [`broadcast::Receiver`] to the client.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<BookingEvent>,
    service: Arc<BookingService>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(&text, &mut subs, &service).await;
                        if ws_tx.send(Message::text(reply.to_json())).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(booking_event) => {
                        if subs.matches(booking_event.ad_type()) {
                            let msg = WsMessage::new(
                                uuid::Uuid::new_v4().to_string(),
                                WsMessageType::Event,
                                serde_json::to_value(&booking_event).unwrap_or_default(),
                            );
                            if ws_tx.send(Message::text(msg.to_json())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Handles a text message from the client and builds the reply.
pub(crate) async fn handle_text_message(
    text: &str,
    subs: &mut SubscriptionManager,
    service: &BookingService,
) -> WsMessage {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return WsMessage::error("", 400, "malformed JSON");
    };
    if msg.msg_type != WsMessageType::Command {
        return WsMessage::error(msg.id, 400, "expected a command message");
    }
    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return WsMessage::error(msg.id, 404, "unknown command");
    };

    match command {
        WsCommand::Subscribe { ad_types } => {
            let (parsed, wildcard, unknown) = parse_ad_types(&ad_types);
            subs.subscribe(&parsed, wildcard);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                json!({
                    "subscribed": subs.subscribed(),
                    "wildcard": subs.is_subscribed_all(),
                    "ignored": unknown,
                }),
            )
        }
        WsCommand::Unsubscribe { ad_types } => {
            let (parsed, wildcard, unknown) = parse_ad_types(&ad_types);
            subs.unsubscribe(&parsed, wildcard);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                json!({
                    "subscribed": subs.subscribed(),
                    "wildcard": subs.is_subscribed_all(),
                    "ignored": unknown,
                }),
            )
        }
        WsCommand::GetBooking { booking_id } => {
            let Ok(uuid) = booking_id.parse::<uuid::Uuid>() else {
                return WsMessage::error(msg.id, 400, "booking_id is not a UUID");
            };
            match service.get_booking(BookingId::from_uuid(uuid)).await {
                Ok(booking) => WsMessage::new(
                    msg.id,
                    WsMessageType::Response,
                    serde_json::to_value(BookingDto::from(booking)).unwrap_or_default(),
                ),
                Err(e) => WsMessage::error(msg.id, e.status_code().as_u16(), &e.to_string()),
            }
        }
    }
}
