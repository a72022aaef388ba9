//! HTTP client for a JSON:API payment provider (Lemon Squeezy style).
//!
//! - `POST {base}/v1/checkouts` creates a hosted checkout,
//! - `POST {base}/v1/orders/{id}/refund` refunds an order,
//! - `GET  {base}/v1/orders/{id}` reads the order's `refunded` flag.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{Value, json};

use super::{CheckoutRequest, CheckoutSession, PaymentProvider};
use crate::config::PaymentConfig;
use crate::domain::date_range::join_dates;
use crate::error::ApiError;

const JSON_API: &str = "application/vnd.api+json";

/// Longest slice of an upstream error body kept in error messages.
const MAX_ERROR_BODY: usize = 300;

/// Production [`PaymentProvider`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpPaymentProvider {
    client: reqwest::Client,
    config: PaymentConfig,
}

impl HttpPaymentProvider {
    /// Creates a provider client with the given outbound timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the HTTP client cannot be built.
    pub fn new(config: PaymentConfig, timeout: std::time::Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Internal(format!("http client: {e}")))?;
        Ok(Self { client, config })
    }

    fn api_key(&self) -> Result<&str, ApiError> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| ApiError::Configuration("PAYMENT_API_KEY".to_string()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_base.trim_end_matches('/'))
    }

    /// Builds the JSON:API checkout document.
    fn checkout_body(&self, request: &CheckoutRequest, variant: &str) -> Result<Value, ApiError> {
        let store_id = self
            .config
            .store_id
            .as_deref()
            .ok_or_else(|| ApiError::Configuration("PAYMENT_STORE_ID".to_string()))?;

        let variant_id = variant
            .parse::<i64>()
            .map_or_else(|_| Value::from(variant), Value::from);

        let mut attributes = json!({
            "checkout_data": {
                "custom": {
                    "dates": join_dates(&request.dates),
                    "image_url": request.image_url,
                    "link_url": request.link_url,
                    "ad_type": request.ad_type.as_str(),
                },
                "variant_quantities": [
                    { "variant_id": variant_id, "quantity": request.quantity() }
                ],
            },
        });
        if let (Some(redirect), Some(obj)) = (&self.config.redirect_url, attributes.as_object_mut())
        {
            obj.insert(
                "product_options".to_string(),
                json!({ "redirect_url": redirect }),
            );
        }

        Ok(json!({
            "data": {
                "type": "checkouts",
                "attributes": attributes,
                "relationships": {
                    "store": { "data": { "type": "stores", "id": store_id } },
                    "variant": { "data": { "type": "variants", "id": variant } },
                },
            }
        }))
    }
}

/// Order ids are interpolated into URL paths; keep them to a safe alphabet.
fn checked_order_id(order_id: &str) -> Result<&str, ApiError> {
    let trimmed = order_id.trim();
    if trimmed.is_empty()
        || !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ApiError::InvalidRequest(format!(
            "malformed order id: {order_id:?}"
        )));
    }
    Ok(trimmed)
}

/// Turns a non-2xx response into an [`ApiError::PaymentProvider`].
async fn ensure_success(
    response: reqwest::Response,
    action: &str,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let snippet: String = body.chars().take(MAX_ERROR_BODY).collect();
    Err(ApiError::PaymentProvider(format!(
        "{action} failed with {status}: {snippet}"
    )))
}

#[async_trait]
impl PaymentProvider for HttpPaymentProvider {
    async fn create_checkout(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, ApiError> {
        let api_key = self.api_key()?;
        let variant = self.config.variant_for(request.ad_type).ok_or_else(|| {
            ApiError::Configuration(format!(
                "PAYMENT_VARIANT_{}",
                request.ad_type.as_str().to_ascii_uppercase()
            ))
        })?;
        let body = self.checkout_body(request, variant)?;

        let response = self
            .client
            .post(self.url("/v1/checkouts"))
            .bearer_auth(api_key)
            .header(ACCEPT, JSON_API)
            .header(CONTENT_TYPE, JSON_API)
            .body(body.to_string())
            .send()
            .await?;
        let response = ensure_success(response, "checkout").await?;

        let doc: Value = response.json().await?;
        let url = doc
            .pointer("/data/attributes/url")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ApiError::PaymentProvider("checkout response has no url".to_string())
            })?;

        tracing::info!(
            ad_type = %request.ad_type,
            quantity = request.quantity(),
            "checkout created"
        );
        Ok(CheckoutSession {
            url: url.to_string(),
        })
    }

    async fn refund_order(&self, order_id: &str) -> Result<(), ApiError> {
        let api_key = self.api_key()?;
        let order_id = checked_order_id(order_id)?;

        let response = self
            .client
            .post(self.url(&format!("/v1/orders/{order_id}/refund")))
            .bearer_auth(api_key)
            .header(ACCEPT, JSON_API)
            .header(CONTENT_TYPE, JSON_API)
            .send()
            .await?;
        ensure_success(response, "refund").await?;

        tracing::info!(order_id, "order refunded");
        Ok(())
    }

    async fn order_refunded(&self, order_id: &str) -> Result<bool, ApiError> {
        let api_key = self.api_key()?;
        let order_id = checked_order_id(order_id)?;

        let response = self
            .client
            .get(self.url(&format!("/v1/orders/{order_id}")))
            .bearer_auth(api_key)
            .header(ACCEPT, JSON_API)
            .send()
            .await?;
        let response = ensure_success(response, "order lookup").await?;

        let doc: Value = response.json().await?;
        Ok(doc
            .pointer("/data/attributes/refunded")
            .and_then(Value::as_bool)
            .unwrap_or(false))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::AdType;

    fn provider(config: PaymentConfig) -> HttpPaymentProvider {
        let Ok(p) = HttpPaymentProvider::new(config, Duration::from_secs(1)) else {
            panic!("client should build");
        };
        p
    }

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            dates: vec![
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap_or_default(),
                NaiveDate::from_ymd_opt(2025, 3, 2).unwrap_or_default(),
            ],
            image_url: "https://cdn.example/a.png".to_string(),
            link_url: "https://advertiser.example".to_string(),
            ad_type: AdType::Bottom,
        }
    }

    #[test]
    fn checkout_body_carries_custom_data_and_quantity() {
        let p = provider(PaymentConfig {
            store_id: Some("77".to_string()),
            redirect_url: Some("https://deals.example/thanks".to_string()),
            ..PaymentConfig::default()
        });
        let Ok(body) = p.checkout_body(&request(), "555") else {
            panic!("body should build");
        };
        assert_eq!(
            body.pointer("/data/attributes/checkout_data/custom/dates")
                .and_then(Value::as_str),
            Some("2025-03-01,2025-03-02")
        );
        assert_eq!(
            body.pointer("/data/attributes/checkout_data/custom/ad_type")
                .and_then(Value::as_str),
            Some("bottom")
        );
        assert_eq!(
            body.pointer("/data/attributes/checkout_data/variant_quantities/0/quantity")
                .and_then(Value::as_u64),
            Some(2)
        );
        assert_eq!(
            body.pointer("/data/attributes/checkout_data/variant_quantities/0/variant_id")
                .and_then(Value::as_i64),
            Some(555)
        );
        assert_eq!(
            body.pointer("/data/relationships/store/data/id")
                .and_then(Value::as_str),
            Some("77")
        );
        assert!(body.pointer("/data/attributes/product_options/redirect_url").is_some());
    }

    #[test]
    fn checkout_body_needs_store_id() {
        let p = provider(PaymentConfig::default());
        assert!(matches!(
            p.checkout_body(&request(), "1"),
            Err(ApiError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_request() {
        let p = provider(PaymentConfig {
            api_base: "http://127.0.0.1:9".to_string(),
            ..PaymentConfig::default()
        });
        assert!(matches!(
            p.create_checkout(&request()).await,
            Err(ApiError::Configuration(_))
        ));
        assert!(matches!(
            p.refund_order("1").await,
            Err(ApiError::Configuration(_))
        ));
    }

    #[test]
    fn order_ids_are_restricted() {
        assert!(checked_order_id("12345").is_ok());
        assert!(checked_order_id("ord_1-a").is_ok());
        assert!(checked_order_id("../admin").is_err());
        assert!(checked_order_id(" ").is_err());
    }
}
