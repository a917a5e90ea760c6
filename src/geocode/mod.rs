//! Reverse-geocoding collaborator.
//!
//! [`ReverseGeocoder`] is the seam the resolver works against;
//! [`NominatimClient`] is the production implementation. Tests substitute
//! their own implementations of the trait.

mod nominatim;

pub use nominatim::{DEFAULT_BASE_URL, NominatimClient};

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// Administrative subdivision fields of a reverse-geocoding response.
///
/// Field names follow the Nominatim address object; every field is optional
/// because coverage varies by area.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Address {
    pub suburb: Option<String>,
    pub city_district: Option<String>,
    pub town: Option<String>,
}

/// Maps a coordinate to a structured address, localized to `language`.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, latitude: f64, longitude: f64, language: &str) -> Result<Address>;
}
