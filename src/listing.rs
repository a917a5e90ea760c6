//! The rental listing record flowing through the pipeline.

use serde::{Deserialize, Serialize};

/// District value assigned when reverse geocoding fails or the address
/// carries no usable administrative subdivision.
pub const UNKNOWN_DISTRICT: &str = "Unknown";

/// One rental listing with parsed coordinates and price.
///
/// Produced by the loader, enriched in place by the resolver (`district`
/// goes from `None` to `Some`), and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub latitude: f64,
    pub longitude: f64,
    /// Price in local currency, already coerced to a number.
    pub price: f64,
    /// Display price as scraped, e.g. "S/ 2,500".
    pub price_text: String,
    /// Display location as scraped.
    pub location_text: String,
    /// Free-text bedroom count, e.g. "3 dorm.".
    pub bedrooms_text: String,
    /// Numeric-coercible bathroom count text.
    pub bathrooms_text: String,
    /// Administrative district, assigned by the resolver.
    pub district: Option<String>,
}

impl Listing {
    /// Returns the district name if resolution produced a real one.
    ///
    /// `None` for unenriched listings and for the [`UNKNOWN_DISTRICT`]
    /// sentinel, so aggregation can filter both with one check.
    pub fn resolved_district(&self) -> Option<&str> {
        match self.district.as_deref() {
            Some(UNKNOWN_DISTRICT) | None => None,
            Some(d) => Some(d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(district: Option<&str>) -> Listing {
        Listing {
            latitude: -12.1,
            longitude: -77.03,
            price: 1500.0,
            price_text: "S/ 1,500".to_string(),
            location_text: "Av. Larco 123".to_string(),
            bedrooms_text: "2 dorm.".to_string(),
            bathrooms_text: "1".to_string(),
            district: district.map(String::from),
        }
    }

    #[test]
    fn test_resolved_district_some() {
        let l = listing(Some("Miraflores"));
        assert_eq!(l.resolved_district(), Some("Miraflores"));
    }

    #[test]
    fn test_resolved_district_filters_sentinel() {
        assert_eq!(listing(Some(UNKNOWN_DISTRICT)).resolved_district(), None);
        assert_eq!(listing(None).resolved_district(), None);
    }
}
