use chrono::Utc;
use ordered_float::OrderedFloat;
use regex::Regex;
use std::collections::HashMap;

use crate::analyzers::types::{
    AnalysisReport, DistrictAggregate, DistrictPrices, RoomGroupAggregate,
};
use crate::analyzers::utility::{first_integer, mean, sample_stddev};
use crate::listing::Listing;

/// Listings eligible for aggregation: those resolved to a real district.
fn resolved(listings: &[Listing]) -> impl Iterator<Item = (&str, &Listing)> {
    listings
        .iter()
        .filter_map(|l| l.resolved_district().map(|d| (d, l)))
}

/// Groups prices by district, preserving the full per-group series.
///
/// Output is sorted by district name so repeated runs produce identical
/// artifacts; consumers are free to re-sort for display.
pub fn district_price_series(listings: &[Listing]) -> Vec<DistrictPrices> {
    let mut groups: HashMap<&str, Vec<f64>> = HashMap::new();

    for (district, listing) in resolved(listings) {
        groups.entry(district).or_default().push(listing.price);
    }

    let mut rows: Vec<DistrictPrices> = groups
        .into_iter()
        .map(|(district, prices)| DistrictPrices {
            district: district.to_string(),
            prices,
        })
        .collect();
    rows.sort_by(|a, b| a.district.cmp(&b.district));
    rows
}

/// Mean price per district.
pub fn district_means(listings: &[Listing]) -> Vec<DistrictAggregate> {
    district_price_series(listings)
        .into_iter()
        .map(|group| DistrictAggregate {
            mean_price: mean(&group.prices),
            district: group.district,
        })
        .collect()
}

/// Price statistics grouped by (bedrooms, bathrooms).
///
/// The bedroom count is the first embedded integer of the free-text field;
/// rows without a digit there, or with a non-numeric bathroom count, are
/// excluded from this aggregate only.
pub fn room_group_stats(listings: &[Listing]) -> Vec<RoomGroupAggregate> {
    let digits = Regex::new(r"\d+").unwrap();
    let mut groups: HashMap<(u32, OrderedFloat<f64>), Vec<f64>> = HashMap::new();

    for (_, listing) in resolved(listings) {
        let Some(bedrooms) = first_integer(&digits, &listing.bedrooms_text) else {
            continue;
        };
        let Some(bathrooms) = parse_bathrooms(&listing.bathrooms_text) else {
            continue;
        };

        groups
            .entry((bedrooms, OrderedFloat(bathrooms)))
            .or_default()
            .push(listing.price);
    }

    let mut rows: Vec<RoomGroupAggregate> = groups
        .into_iter()
        .map(|((bedrooms, bathrooms), prices)| {
            let mean_price = mean(&prices);
            RoomGroupAggregate {
                bedrooms,
                bathrooms: bathrooms.into_inner(),
                mean_price,
                price_stddev: sample_stddev(&prices, mean_price),
                listing_count: prices.len(),
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        (a.bedrooms, OrderedFloat(a.bathrooms)).cmp(&(b.bedrooms, OrderedFloat(b.bathrooms)))
    });
    rows
}

fn parse_bathrooms(text: &str) -> Option<f64> {
    let parsed: f64 = text.trim().parse().ok()?;
    parsed.is_finite().then_some(parsed)
}

/// Runs every aggregate view over an enriched listing sequence.
pub fn analyze(listings: &[Listing]) -> AnalysisReport {
    AnalysisReport {
        generated_at: Utc::now(),
        total_listings: listings.len(),
        resolved_listings: resolved(listings).count(),
        district_means: district_means(listings),
        district_prices: district_price_series(listings),
        room_groups: room_group_stats(listings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::UNKNOWN_DISTRICT;

    fn listing(district: &str, price: f64, bedrooms: &str, bathrooms: &str) -> Listing {
        Listing {
            latitude: -12.1,
            longitude: -77.03,
            price,
            price_text: format!("S/ {price}"),
            location_text: String::new(),
            bedrooms_text: bedrooms.to_string(),
            bathrooms_text: bathrooms.to_string(),
            district: Some(district.to_string()),
        }
    }

    #[test]
    fn test_unknown_district_excluded_everywhere() {
        let listings = vec![
            listing("Miraflores", 100.0, "1 dorm.", "1"),
            listing(UNKNOWN_DISTRICT, 9999.0, "1 dorm.", "1"),
        ];

        let means = district_means(&listings);
        assert_eq!(means.len(), 1);
        assert!(means.iter().all(|r| r.district != UNKNOWN_DISTRICT));

        let rooms = room_group_stats(&listings);
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].listing_count, 1);
    }

    #[test]
    fn test_singleton_group_has_defined_mean_undefined_stddev() {
        let listings = vec![listing("Barranco", 1500.0, "2 dorm.", "1")];

        let rooms = room_group_stats(&listings);
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].mean_price, 1500.0);
        assert_eq!(rooms[0].price_stddev, None);
        assert_eq!(rooms[0].listing_count, 1);

        let means = district_means(&listings);
        assert_eq!(means[0].mean_price, 1500.0);
    }

    #[test]
    fn test_bedroom_text_parsing_scenarios() {
        let listings = vec![
            listing("Miraflores", 2000.0, "3 dorm.", "2"),
            listing("Miraflores", 3000.0, "3 dorm.", "2"),
        ];

        let rooms = room_group_stats(&listings);
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].bedrooms, 3);
        assert_eq!(rooms[0].bathrooms, 2.0);
        assert_eq!(rooms[0].mean_price, 2500.0);
        assert_eq!(rooms[0].listing_count, 2);
        assert!(rooms[0].price_stddev.is_some());
    }

    #[test]
    fn test_studio_excluded_from_rooms_kept_in_district() {
        let listings = vec![listing("Surquillo", 900.0, "Studio", "1")];

        assert!(room_group_stats(&listings).is_empty());

        let means = district_means(&listings);
        assert_eq!(means.len(), 1);
        assert_eq!(means[0].district, "Surquillo");
    }

    #[test]
    fn test_non_numeric_bathrooms_excluded() {
        let listings = vec![listing("Lince", 800.0, "1 dorm.", "sin datos")];
        assert!(room_group_stats(&listings).is_empty());
    }

    #[test]
    fn test_groups_split_by_bathroom_count() {
        let listings = vec![
            listing("Miraflores", 1000.0, "2 dorm.", "1"),
            listing("Miraflores", 2000.0, "2 dorm.", "2.5"),
        ];

        let rooms = room_group_stats(&listings);
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].bathrooms, 1.0);
        assert_eq!(rooms[1].bathrooms, 2.5);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let listings = vec![
            listing("Miraflores", 1000.0, "2 dorm.", "1"),
            listing("Barranco", 1500.0, "3 dorm.", "2"),
            listing(UNKNOWN_DISTRICT, 500.0, "1 dorm.", "1"),
        ];

        assert_eq!(district_means(&listings), district_means(&listings));
        assert_eq!(room_group_stats(&listings), room_group_stats(&listings));
        assert_eq!(
            district_price_series(&listings),
            district_price_series(&listings)
        );
    }

    #[test]
    fn test_output_sorted_for_determinism() {
        let listings = vec![
            listing("Surco", 1000.0, "2 dorm.", "1"),
            listing("Barranco", 1500.0, "1 dorm.", "1"),
            listing("Miraflores", 2000.0, "1 dorm.", "2"),
        ];

        let means = district_means(&listings);
        let districts: Vec<&str> = means.iter().map(|r| r.district.as_str()).collect();
        assert_eq!(districts, vec!["Barranco", "Miraflores", "Surco"]);

        let rooms = room_group_stats(&listings);
        assert_eq!(rooms[0].bedrooms, 1);
        assert_eq!(rooms[0].bathrooms, 1.0);
        assert_eq!(rooms[1].bedrooms, 1);
        assert_eq!(rooms[1].bathrooms, 2.0);
        assert_eq!(rooms[2].bedrooms, 2);
    }

    #[test]
    fn test_report_counts() {
        let listings = vec![
            listing("Miraflores", 1000.0, "2 dorm.", "1"),
            listing(UNKNOWN_DISTRICT, 500.0, "1 dorm.", "1"),
        ];

        let report = analyze(&listings);
        assert_eq!(report.total_listings, 2);
        assert_eq!(report.resolved_listings, 1);
        assert_eq!(report.district_means.len(), 1);
    }

    #[test]
    fn test_empty_input_yields_empty_aggregates() {
        let report = analyze(&[]);
        assert_eq!(report.total_listings, 0);
        assert!(report.district_means.is_empty());
        assert!(report.district_prices.is_empty());
        assert!(report.room_groups.is_empty());
    }
}
