//! Payment provider webhook payloads.
//!
//! Only the fields the booking flow needs are modelled:
//!
//! ```json
//! {
//!   "meta": {
//!     "event_name": "order_created",
//!     "custom_data": {
//!       "dates": "2025-03-01,2025-03-02",
//!       "image_url": "https://…",
//!       "link_url": "https://…",
//!       "ad_type": "bottom"
//!     }
//!   },
//!   "data": {
//!     "id": "1234",
//!     "attributes": { "user_name": "Ada", "user_email": "ada@example.com" }
//!   }
//! }
//! ```

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::AdType;
use crate::domain::date_range::parse_date_list;
use crate::error::ApiError;

/// Event name that materializes bookings.
pub const ORDER_CREATED: &str = "order_created";

/// Top-level webhook envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    /// Event metadata, including checkout custom data.
    pub meta: WebhookMeta,
    /// Event subject (the order).
    #[serde(default)]
    pub data: Option<WebhookData>,
}

/// `meta` block of a webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookMeta {
    /// Provider event name, e.g. `order_created`.
    pub event_name: String,
    /// Custom metadata attached at checkout.
    #[serde(default)]
    pub custom_data: Option<CheckoutCustomData>,
}

/// Custom metadata round-tripped through the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutCustomData {
    /// Comma-separated ISO dates.
    pub dates: String,
    /// Creative image.
    pub image_url: String,
    /// Click-through target.
    pub link_url: String,
    /// Placement tag.
    pub ad_type: String,
}

/// `data` block of a webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookData {
    /// Order id; the provider may send it as a string or a number.
    pub id: serde_json::Value,
    /// Order attributes.
    #[serde(default)]
    pub attributes: OrderAttributes,
}

/// Buyer attributes of an order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderAttributes {
    /// Buyer display name.
    pub user_name: Option<String>,
    /// Buyer email.
    pub user_email: Option<String>,
}

impl WebhookEvent {
    /// Whether this event should create bookings.
    #[must_use]
    pub fn is_order_created(&self) -> bool {
        self.meta.event_name == ORDER_CREATED
    }
}

/// A confirmed order, validated and ready to turn into bookings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedOrder {
    /// Provider order reference.
    pub order_id: Option<String>,
    /// Buyer name.
    pub buyer_name: Option<String>,
    /// Buyer contact.
    pub buyer_contact: Option<String>,
    /// Dates bought, sorted and unique.
    pub dates: Vec<NaiveDate>,
    /// Placement bought.
    pub ad_type: AdType,
    /// Creative image.
    pub image_url: String,
    /// Click-through target.
    pub link_url: String,
}

impl TryFrom<WebhookEvent> for ConfirmedOrder {
    type Error = ApiError;

    fn try_from(event: WebhookEvent) -> Result<Self, Self::Error> {
        let custom = event
            .meta
            .custom_data
            .ok_or_else(|| ApiError::InvalidRequest("webhook has no custom_data".to_string()))?;

        let dates = parse_date_list(&custom.dates)?;
        let ad_type: AdType = custom.ad_type.parse()?;

        let (order_id, attributes) = match event.data {
            Some(data) => (order_id_string(&data.id), data.attributes),
            None => (None, OrderAttributes::default()),
        };

        Ok(Self {
            order_id,
            buyer_name: non_empty(attributes.user_name),
            buyer_contact: non_empty(attributes.user_email),
            dates,
            ad_type,
            image_url: custom.image_url,
            link_url: custom.link_url,
        })
    }
}

fn order_id_string(id: &serde_json::Value) -> Option<String> {
    match id {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn parse(json: &str) -> WebhookEvent {
        let Ok(event) = serde_json::from_str::<WebhookEvent>(json) else {
            panic!("fixture should parse");
        };
        event
    }

    #[test]
    fn order_created_with_string_id() {
        let event = parse(
            r#"{"meta":{"event_name":"order_created","custom_data":{
                "dates":"2025-03-02,2025-03-01","image_url":"https://cdn.example/a.png",
                "link_url":"https://advertiser.example","ad_type":"bottom"}},
              "data":{"id":"4242","attributes":{"user_name":"Ada","user_email":"ada@example.com"}}}"#,
        );
        assert!(event.is_order_created());
        let Ok(order) = ConfirmedOrder::try_from(event) else {
            panic!("valid order");
        };
        assert_eq!(order.order_id.as_deref(), Some("4242"));
        assert_eq!(order.ad_type, AdType::Bottom);
        assert_eq!(order.dates.len(), 2);
        assert!(order.dates.windows(2).all(|w| matches!(w, [a, b] if a < b)));
        assert_eq!(order.buyer_contact.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn numeric_order_id_is_stringified() {
        let event = parse(
            r#"{"meta":{"event_name":"order_created","custom_data":{
                "dates":"2025-03-01","image_url":"i","link_url":"l","ad_type":"top"}},
              "data":{"id":99,"attributes":{}}}"#,
        );
        let Ok(order) = ConfirmedOrder::try_from(event) else {
            panic!("valid order");
        };
        assert_eq!(order.order_id.as_deref(), Some("99"));
        assert!(order.buyer_name.is_none());
    }

    #[test]
    fn other_events_are_recognized() {
        let event = parse(r#"{"meta":{"event_name":"subscription_created"}}"#);
        assert!(!event.is_order_created());
    }

    #[test]
    fn missing_custom_data_is_invalid() {
        let event = parse(r#"{"meta":{"event_name":"order_created"},"data":{"id":"1"}}"#);
        assert!(ConfirmedOrder::try_from(event).is_err());
    }

    #[test]
    fn bad_ad_type_is_invalid() {
        let event = parse(
            r#"{"meta":{"event_name":"order_created","custom_data":{
                "dates":"2025-03-01","image_url":"i","link_url":"l","ad_type":"popup"}}}"#,
        );
        assert!(matches!(
            ConfirmedOrder::try_from(event),
            Err(ApiError::InvalidAdType(_))
        ));
    }
}
