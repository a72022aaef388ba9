//! Ad placement types.
//!
//! Each `(date, AdType)` pair is one bookable slot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;

/// Placement an advertiser can buy for a given calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdType {
    /// Banner at the top of the deals page.
    Top,
    /// Banner at the bottom of the deals page.
    Bottom,
    /// Slot in the daily newsletter.
    Newsletter,
}

impl AdType {
    /// Every placement, in display order.
    pub const ALL: [Self; 3] = [Self::Top, Self::Bottom, Self::Newsletter];

    /// Returns the wire / database tag for this placement.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Newsletter => "newsletter",
        }
    }

    /// Short human-readable label used in notifications.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Top => "top banner",
            Self::Bottom => "bottom banner",
            Self::Newsletter => "newsletter ad",
        }
    }
}

impl fmt::Display for AdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "newsletter" => Ok(Self::Newsletter),
            other => Err(ApiError::InvalidAdType(other.to_string())),
        }
    }
}
