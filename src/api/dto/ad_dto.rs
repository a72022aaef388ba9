//! Public slot and creative DTOs, plus legacy ad queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::AdType;

/// Query of `GET /slots/{ad_type}`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SlotsQuery {
    /// First date to report (inclusive).
    pub from: Option<NaiveDate>,
    /// Last date to report (inclusive).
    pub to: Option<NaiveDate>,
}

/// Response of `GET /slots/{ad_type}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SlotsResponse {
    /// Placement queried.
    pub ad_type: AdType,
    /// Dates that can no longer be bought.
    pub taken: Vec<NaiveDate>,
}

/// Query of `GET /ads/{ad_type}`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CreativeQuery {
    /// Date to serve; defaults to today (UTC).
    pub date: Option<NaiveDate>,
}

/// Query of `GET /admin/legacy-ads`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LegacyAdQuery {
    /// Only this position.
    pub position: Option<AdType>,
    /// Only active ads.
    #[serde(default)]
    pub active_only: bool,
}
