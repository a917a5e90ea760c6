//! Output formatting and persistence for analysis artifacts.
//!
//! Everything the out-of-scope presentation layer consumes crosses this
//! boundary: map-marker data, the JSON report, and CSV aggregate rows.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::listing::Listing;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Map framing for the listing map: central Lima at district zoom.
pub const MAP_CENTER: (f64, f64) = (-12.1, -77.03);
pub const MAP_ZOOM: u8 = 12;

/// One map marker, keyed by coordinate and labeled with display texts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    /// Popup label, `"<price> - <location>"`.
    pub popup: String,
    /// Hover label, the display price.
    pub tooltip: String,
}

/// Marker set plus framing, written as `markers.json`.
#[derive(Debug, Serialize)]
pub struct MapView {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

/// Builds one marker per listing, preserving input order.
pub fn markers(listings: &[Listing]) -> Vec<MapMarker> {
    listings
        .iter()
        .map(|l| MapMarker {
            latitude: l.latitude,
            longitude: l.longitude,
            popup: format!("{} - {}", l.price_text, l.location_text),
            tooltip: l.price_text.clone(),
        })
        .collect()
}

/// Builds the full map view over a listing sequence.
pub fn map_view(listings: &[Listing]) -> MapView {
    MapView {
        center_latitude: MAP_CENTER.0,
        center_longitude: MAP_CENTER.1,
        zoom: MAP_ZOOM,
        markers: markers(listings),
    }
}

/// Logs a report as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Serializes a value as pretty JSON to a file, replacing prior content.
pub fn write_json(path: &str, value: &impl Serialize) -> Result<()> {
    let body = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, body)?;
    debug!(path, "JSON artifact written");
    Ok(())
}

/// Appends serializable rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_records<S: Serialize>(path: &str, rows: &[S]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = rows.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes the enriched listing sequence as CSV, replacing prior content.
pub fn write_listings(path: &str, listings: &[Listing]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for listing in listings {
        writer.serialize(listing)?;
    }
    writer.flush()?;
    debug!(path, rows = listings.len(), "Enriched listings written");
    Ok(())
}
