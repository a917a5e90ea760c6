//! CSV loader for raw listing exports.
//!
//! Every field comes in as text and is coerced afterwards; a value that
//! fails numeric coercion becomes a missing value, never an error. Rows
//! missing a coordinate or a price are dropped, everything else survives
//! in input order.

use anyhow::Result;
use serde::Deserialize;
use std::io::Read;
use tracing::{debug, warn};

use crate::listing::Listing;

/// One raw CSV row, using the export's original column names.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "lat", default)]
    lat: String,
    #[serde(rename = "lon", default)]
    lon: String,
    #[serde(rename = "Precio_Soles", default)]
    precio_soles: String,
    #[serde(rename = "Precio", default)]
    precio: String,
    #[serde(rename = "Ubicación", default)]
    ubicacion: String,
    #[serde(rename = "Habitaciones", default)]
    habitaciones: String,
    #[serde(rename = "Baños", default)]
    banos: String,
}

/// Parses a field as `f64`, treating anything unparseable as missing.
fn coerce_f64(raw: &str) -> Option<f64> {
    let parsed: f64 = raw.trim().parse().ok()?;
    parsed.is_finite().then_some(parsed)
}

/// Reads listings from a CSV source.
///
/// Returns every row with a usable latitude, longitude, and price, in
/// input order. Rows that fail those checks are dropped; rows the CSV
/// decoder cannot make sense of at all are skipped with a warning.
/// Empty input yields an empty vector.
pub fn load_listings<R: Read>(reader: R) -> Result<Vec<Listing>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut listings = Vec::new();

    let mut total_rows = 0usize;
    let mut dropped_coords = 0usize;
    let mut dropped_price = 0usize;

    for (idx, result) in rdr.deserialize().enumerate() {
        total_rows += 1;

        let record: RawRecord = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(row = idx + 1, error = %e, "Skipping undecodable CSV record");
                continue;
            }
        };

        let (Some(latitude), Some(longitude)) =
            (coerce_f64(&record.lat), coerce_f64(&record.lon))
        else {
            dropped_coords += 1;
            continue;
        };

        let Some(price) = coerce_f64(&record.precio_soles) else {
            dropped_price += 1;
            continue;
        };

        listings.push(Listing {
            latitude,
            longitude,
            price,
            price_text: record.precio,
            location_text: record.ubicacion,
            bedrooms_text: record.habitaciones,
            bathrooms_text: record.banos,
            district: None,
        });
    }

    debug!(
        total_rows,
        kept = listings.len(),
        dropped_coords,
        dropped_price,
        "Listing load complete"
    );

    Ok(listings)
}

/// Convenience wrapper for in-memory input (the cache layer hands bytes around).
pub fn load_listings_from_slice(bytes: &[u8]) -> Result<Vec<Listing>> {
    load_listings(bytes)
}
