//! Reverse geocoding: turn a shared GPS position into a place name the weather
//! provider understands. Uses Nominatim (OpenStreetMap), no API key required.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};

use crate::error::{AdvisorError, Result};

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const USER_AGENT: &str = concat!("advisor/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Best-effort place name for a position: the city, else the country.
    async fn place_name(&self, latitude: f64, longitude: f64) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    country: Option<String>,
}

impl NominatimAddress {
    fn place(self) -> Option<String> {
        self.city
            .or(self.town)
            .or(self.village)
            .or(self.country)
            .filter(|name| !name.trim().is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    http: Client,
}

impl NominatimGeocoder {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).user_agent(USER_AGENT).build()?;
        Ok(Self { base_url: NOMINATIM_URL.to_string(), http })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn place_name(&self, latitude: f64, longitude: f64) -> Result<String> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(AdvisorError::Geocode(format!(
                "coordinates out of range: {latitude}, {longitude}"
            )));
        }

        let url = format!("{}/reverse", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("format", "json".to_string()),
                ("addressdetails", "1".to_string()),
                ("zoom", "10".to_string()),
            ])
            .send()
            .await
            .map_err(|e| if e.is_timeout() { AdvisorError::Timeout } else { e.into() })?;

        if !response.status().is_success() {
            tracing::debug!("Reverse geocode returned status {}", response.status());
            return Err(AdvisorError::Geocode(format!("status {}", response.status())));
        }

        let body: NominatimResponse = response
            .json()
            .await
            .map_err(|e| AdvisorError::Geocode(format!("parse error: {e}")))?;

        let place = body
            .address
            .and_then(NominatimAddress::place)
            .ok_or_else(|| AdvisorError::Geocode("no place at these coordinates".into()))?;

        tracing::info!("Reverse geocoded to: {}", place);
        Ok(place)
    }
}
