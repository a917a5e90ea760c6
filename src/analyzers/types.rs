//! Aggregate rows handed to the presentation layer.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Mean price for one district, rendered as a bar-chart bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictAggregate {
    pub district: String,
    pub mean_price: f64,
}

/// Raw price distribution for one district, rendered as a boxplot column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictPrices {
    pub district: String,
    pub prices: Vec<f64>,
}

/// Price statistics for one (bedrooms, bathrooms) group, rendered as a
/// heatmap cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomGroupAggregate {
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub mean_price: f64,
    /// Sample standard deviation; `None` for singleton groups.
    pub price_stddev: Option<f64>,
    pub listing_count: usize,
}

/// Complete analysis artifact written as `report.json`.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub total_listings: usize,
    /// Listings with a real (non-sentinel) district.
    pub resolved_listings: usize,
    pub district_means: Vec<DistrictAggregate>,
    pub district_prices: Vec<DistrictPrices>,
    pub room_groups: Vec<RoomGroupAggregate>,
}
