use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{Address, ReverseGeocoder};

/// Public Nominatim instance. Self-hosted deployments override this via
/// the `NOMINATIM_BASE_URL` environment variable.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Reverse-geocoding client speaking the Nominatim HTTP API.
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

/// Top-level reverse response. Nominatim reports lookup failures as a 200
/// with an `error` field instead of an HTTP error status.
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<Address>,
    error: Option<String>,
}

impl NominatimClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("rental_analyzer/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    async fn reverse(&self, latitude: f64, longitude: f64, language: &str) -> Result<Address> {
        let lat = latitude.to_string();
        let lon = longitude.to_string();

        let response = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("format", "jsonv2"),
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("accept-language", language),
            ])
            .send()
            .await
            .context("reverse geocoding request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "reverse geocoding failed with status {}: {}",
                status,
                body
            ));
        }

        let decoded: ReverseResponse = response
            .json()
            .await
            .context("malformed reverse geocoding response")?;

        if let Some(error) = decoded.error {
            return Err(anyhow!("geocoding service error: {}", error));
        }

        decoded
            .address
            .ok_or_else(|| anyhow!("reverse geocoding response carries no address"))
    }
}
