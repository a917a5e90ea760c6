//! District enrichment over the listing sequence.
//!
//! Walks listings in input order, reverse-geocoding each coordinate and
//! attaching the resulting district name. Lookup failures of any kind
//! degrade to the `"Unknown"` sentinel; a single bad lookup never aborts
//! the run. Identical coordinates are resolved once per run.

use ordered_float::OrderedFloat;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

use crate::geocode::{Address, ReverseGeocoder};
use crate::listing::{Listing, UNKNOWN_DISTRICT};

#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Language the geocoder should localize names to.
    pub language: String,
    /// Pause between distinct external lookups. Memo hits do not sleep.
    pub request_delay: Duration,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            language: "es".to_string(),
            request_delay: Duration::from_millis(1000),
        }
    }
}

/// Picks the district name out of a structured address.
///
/// Precedence: suburb, then city district, then town. Empty strings count
/// as absent. Falls back to the [`UNKNOWN_DISTRICT`] sentinel.
pub fn district_from_address(address: &Address) -> String {
    [&address.suburb, &address.city_district, &address.town]
        .into_iter()
        .flatten()
        .find(|name| !name.is_empty())
        .cloned()
        .unwrap_or_else(|| UNKNOWN_DISTRICT.to_string())
}

/// Assigns a district to every listing, in place and in input order.
///
/// Never fails: each lookup error is logged and absorbed as the sentinel
/// for that listing, and the loop continues.
pub async fn assign_districts<G: ReverseGeocoder>(
    listings: &mut [Listing],
    geocoder: &G,
    options: &ResolveOptions,
) {
    let mut memo: HashMap<(OrderedFloat<f64>, OrderedFloat<f64>), String> = HashMap::new();
    let mut lookups = 0usize;
    let mut failures = 0usize;

    for listing in listings.iter_mut() {
        let key = (
            OrderedFloat(listing.latitude),
            OrderedFloat(listing.longitude),
        );

        if let Some(district) = memo.get(&key) {
            listing.district = Some(district.clone());
            continue;
        }

        if lookups > 0 && !options.request_delay.is_zero() {
            tokio::time::sleep(options.request_delay).await;
        }
        lookups += 1;

        let district = match geocoder
            .reverse(listing.latitude, listing.longitude, &options.language)
            .await
        {
            Ok(address) => district_from_address(&address),
            Err(e) => {
                failures += 1;
                warn!(
                    latitude = listing.latitude,
                    longitude = listing.longitude,
                    error = %e,
                    "Reverse geocoding failed, assigning sentinel district"
                );
                UNKNOWN_DISTRICT.to_string()
            }
        };

        memo.insert(key, district.clone());
        listing.district = Some(district);
    }

    info!(
        listings = listings.len(),
        lookups, failures, "District resolution complete"
    );
}
