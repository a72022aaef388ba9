//! Checkout DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::AdType;
use crate::domain::date_range::{expand_range, normalize};
use crate::error::ApiError;
use crate::payment::CheckoutRequest;

/// Body of `POST /checkout`.
///
/// Give either an explicit `dates` list or an inclusive `from`/`to` range.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckoutRequestDto {
    /// Explicit dates; duplicates are ignored.
    #[serde(default)]
    pub dates: Option<Vec<NaiveDate>>,
    /// Range start (inclusive).
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Range end (inclusive).
    #[serde(default)]
    pub to: Option<NaiveDate>,
    /// Creative image.
    pub image_url: String,
    /// Click-through target.
    pub link_url: String,
    /// Placement to buy.
    pub ad_type: AdType,
}

impl CheckoutRequestDto {
    /// Resolves the requested dates into a [`CheckoutRequest`].
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidRequest`] if both or neither forms are given, or
    /// if the range is inverted or longer than `max_days`.
    pub fn into_request(self, max_days: usize) -> Result<CheckoutRequest, ApiError> {
        let dates = match (self.dates, self.from, self.to) {
            (Some(dates), None, None) => normalize(dates),
            (None, Some(from), Some(to)) => expand_range(from, to, max_days)?,
            (None, None, None) => {
                return Err(ApiError::InvalidRequest(
                    "give `dates` or `from` and `to`".to_string(),
                ));
            }
            _ => {
                return Err(ApiError::InvalidRequest(
                    "give either `dates` or a complete `from`/`to` range".to_string(),
                ));
            }
        };
        Ok(CheckoutRequest {
            dates,
            image_url: self.image_url,
            link_url: self.link_url,
            ad_type: self.ad_type,
        })
    }
}

/// Response of `POST /checkout`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckoutResponse {
    /// Hosted checkout URL to redirect the buyer to.
    pub checkout_url: String,
    /// Dates being purchased.
    pub dates: Vec<NaiveDate>,
    /// Units charged.
    pub quantity: usize,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn dto(json: &str) -> CheckoutRequestDto {
        let Ok(dto) = serde_json::from_str(json) else {
            panic!("fixture should parse");
        };
        dto
    }

    #[test]
    fn range_is_expanded() {
        let req = dto(r#"{"from":"2025-03-01","to":"2025-03-03","image_url":"i","link_url":"l","ad_type":"top"}"#);
        let Ok(request) = req.into_request(62) else {
            panic!("range should expand");
        };
        assert_eq!(request.quantity(), 3);
    }

    #[test]
    fn explicit_dates_are_deduplicated() {
        let req = dto(r#"{"dates":["2025-03-02","2025-03-01","2025-03-02"],"image_url":"i","link_url":"l","ad_type":"newsletter"}"#);
        let Ok(request) = req.into_request(62) else {
            panic!("dates should resolve");
        };
        assert_eq!(request.quantity(), 2);
    }

    #[test]
    fn mixed_forms_are_rejected() {
        let req = dto(r#"{"dates":["2025-03-02"],"from":"2025-03-01","image_url":"i","link_url":"l","ad_type":"top"}"#);
        assert!(matches!(req.into_request(62), Err(ApiError::InvalidRequest(_))));
        let req = dto(r#"{"image_url":"i","link_url":"l","ad_type":"top"}"#);
        assert!(matches!(req.into_request(62), Err(ApiError::InvalidRequest(_))));
    }
}
