//! Per-connection subscription manager.
//!
//! Tracks which placements a WebSocket client follows and provides
//! server-side event filtering.

use std::collections::HashSet;

use crate::domain::AdType;

/// Manages the set of placement subscriptions for a single connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed placements. If `subscribe_all` is true, this set is ignored.
    ad_types: HashSet<AdType>,
    /// Whether the client subscribes to every placement (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds placements to the subscription set.
    pub fn subscribe(&mut self, ad_types: &[AdType], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        self.ad_types.extend(ad_types.iter().copied());
    }

    /// Removes placements from the subscription set.
    pub fn unsubscribe(&mut self, ad_types: &[AdType], wildcard: bool) {
        if wildcard {
            self.subscribe_all = false;
        }
        for ad_type in ad_types {
            self.ad_types.remove(ad_type);
        }
    }

    /// Returns `true` if events for `ad_type` should be forwarded.
    #[must_use]
    pub fn matches(&self, ad_type: AdType) -> bool {
        self.subscribe_all || self.ad_types.contains(&ad_type)
    }

    /// Explicitly subscribed placements, in display order.
    #[must_use]
    pub fn subscribed(&self) -> Vec<AdType> {
        AdType::ALL
            .into_iter()
            .filter(|t| self.ad_types.contains(t))
            .collect()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

/// Splits raw tags into placements and a wildcard flag.
///
/// Unknown tags are returned separately so the client can be told.
#[must_use]
pub fn parse_ad_types(tags: &[String]) -> (Vec<AdType>, bool, Vec<String>) {
    let mut ad_types = Vec::new();
    let mut wildcard = false;
    let mut unknown = Vec::new();
    for tag in tags {
        if tag.trim() == "*" {
            wildcard = true;
        } else if let Ok(ad_type) = tag.parse::<AdType>() {
            ad_types.push(ad_type);
        } else {
            unknown.push(tag.clone());
        }
    }
    (ad_types, wildcard, unknown)
}
