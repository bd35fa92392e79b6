//! The canonical listing shape handed to consumers.

use serde::{Deserialize, Serialize};

/// A normalized property listing.
///
/// Transient projection of a provider record; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub address: String,
    pub price: u64,
    pub bedrooms: u32,
    pub bathrooms: f64,
    /// Living area in square feet
    pub area: u32,
    pub year_built: i32,
    pub property_type: String,

    /// Primary image (first photo, or the placeholder)
    pub image: String,
    pub images: Vec<String>,

    pub description: String,
    pub features: Vec<String>,
    pub neighborhood: String,
    pub walk_score: u32,
    pub trend: Trend,
    pub days_on_market: u32,

    /// `round(price / area)`, 0 when area is unknown
    pub price_per_area: u64,
    pub premium: bool,

    pub estimated_value: EstimatedValue,
    pub price_history: PriceHistory,
}

/// Market direction inferred from time on market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl Trend {
    /// Fresh listings are "rising", stale ones "falling".
    pub fn from_days_on_market(days: u32) -> Self {
        if days < 14 {
            Trend::Rising
        } else if days > 60 {
            Trend::Falling
        } else {
            Trend::Stable
        }
    }
}

/// A value estimate. Not an appraisal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatedValue {
    pub amount: u64,
    /// Always true today: the amount is derived from list price, not comps.
    pub approximate: bool,
}

impl EstimatedValue {
    pub fn approximate(amount: u64) -> Self {
        Self {
            amount,
            approximate: true,
        }
    }
}

/// Ordered price points, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub points: Vec<PricePoint>,
    /// True when the points were synthesized rather than supplied by the provider.
    pub synthetic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    /// `YYYY-MM` for synthesized points; provider-defined otherwise
    pub period: String,
    pub price: u64,
}

impl PricePoint {
    pub fn new(period: impl Into<String>, price: u64) -> Self {
        Self {
            period: period.into(),
            price,
        }
    }
}
