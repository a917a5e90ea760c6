//! Price aggregation over enriched listings.
//!
//! This module filters out unresolved listings, groups prices by district
//! and by bedroom/bathroom counts, and produces the aggregate rows the
//! presentation layer renders as boxplots, bar charts, and heatmaps.

pub mod aggregate;
pub mod types;
pub mod utility;
