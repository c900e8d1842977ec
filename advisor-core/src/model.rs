use serde::{Deserialize, Serialize};

use crate::{error::AdvisorError, messages::Language};

/// What the user asked about.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Free-text place name, e.g. "London".
    Place(String),
    /// Shared GPS position.
    Coordinates { latitude: f64, longitude: f64 },
}

/// Per-request context. The language travels with the request rather than
/// living in shared state, so concurrent users never see each other's choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: String,
    pub language: Language,
}

impl RequestContext {
    pub fn new(user_id: impl Into<String>, language: Language) -> Self {
        Self { user_id: user_id.into(), language }
    }
}

/// Raw provider output. Providers fill in what they got; nothing is checked yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Observation {
    pub location_name: String,
    pub temperature_c: Option<f64>,
    pub wind_speed_mps: Option<f64>,
    pub cloud_pct: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub status: Option<String>,
}

/// Normalized weather snapshot for one place.
///
/// Only obtainable through [`WeatherReading::new`] or `TryFrom<Observation>`,
/// both of which guarantee finite numbers and percentages within `0..=100`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReading {
    temperature_c: f64,
    wind_speed_mps: f64,
    cloud_pct: u8,
    humidity_pct: u8,
    status: String,
}

impl WeatherReading {
    pub fn new(
        temperature_c: f64,
        wind_speed_mps: f64,
        cloud_pct: u8,
        humidity_pct: u8,
        status: impl Into<String>,
    ) -> Result<Self, AdvisorError> {
        if !temperature_c.is_finite() {
            return Err(AdvisorError::InvalidReading(format!(
                "temperature is not finite: {temperature_c}"
            )));
        }
        if !wind_speed_mps.is_finite() || wind_speed_mps < 0.0 {
            return Err(AdvisorError::InvalidReading(format!(
                "wind speed out of range: {wind_speed_mps}"
            )));
        }
        check_percent("cloud cover", cloud_pct)?;
        check_percent("humidity", humidity_pct)?;

        Ok(Self {
            temperature_c,
            wind_speed_mps,
            cloud_pct,
            humidity_pct,
            status: status.into(),
        })
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    pub fn temperature_f(&self) -> f64 {
        self.temperature_c * 9.0 / 5.0 + 32.0
    }

    pub fn wind_speed_mps(&self) -> f64 {
        self.wind_speed_mps
    }

    pub fn wind_speed_mph(&self) -> f64 {
        self.wind_speed_mps * MPS_TO_MPH
    }

    pub fn cloud_pct(&self) -> u8 {
        self.cloud_pct
    }

    pub fn humidity_pct(&self) -> u8 {
        self.humidity_pct
    }

    pub fn status(&self) -> &str {
        &self.status
    }
}

pub const MPS_TO_MPH: f64 = 2.237;

fn check_percent(field: &str, value: u8) -> Result<(), AdvisorError> {
    if value > 100 {
        return Err(AdvisorError::InvalidReading(format!("{field} above 100%: {value}")));
    }
    Ok(())
}

fn percent(field: &str, value: Option<f64>) -> Result<u8, AdvisorError> {
    let value = value.ok_or_else(|| AdvisorError::InvalidReading(format!("missing {field}")))?;
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(AdvisorError::InvalidReading(format!("{field} out of range: {value}")));
    }
    Ok(value.round() as u8)
}

impl TryFrom<Observation> for WeatherReading {
    type Error = AdvisorError;

    fn try_from(obs: Observation) -> Result<Self, Self::Error> {
        let temperature_c = obs
            .temperature_c
            .ok_or_else(|| AdvisorError::InvalidReading("missing temperature".into()))?;
        let wind_speed_mps = obs
            .wind_speed_mps
            .ok_or_else(|| AdvisorError::InvalidReading("missing wind speed".into()))?;
        let cloud_pct = percent("cloud cover", obs.cloud_pct)?;
        let humidity_pct = percent("humidity", obs.humidity_pct)?;

        WeatherReading::new(
            temperature_c,
            wind_speed_mps,
            cloud_pct,
            humidity_pct,
            obs.status.unwrap_or_default(),
        )
    }
}
