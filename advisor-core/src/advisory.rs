//! Maps a [`WeatherReading`] to the advisories a user should receive.
//!
//! Four independent axes are evaluated and concatenated in a fixed order:
//! temperature, cloud, wind, then the "pleasant conditions" composite. Each
//! key becomes one notification, so the order is part of the contract.

use serde::{Deserialize, Serialize};

use crate::model::WeatherReading;

/// Language-independent tag for one advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdvisoryKey {
    TempVeryCold,
    TempCold,
    TempMild,
    TempWarm,
    TempHot,
    TempExtremeHeat,
    SunstrokeRisk,
    RainLikely,
    SnowLikely,
    RainChance,
    SnowChance,
    WindStrong,
    WindStrongCold,
    CalmCold,
    MixedPleasant,
    MixedSocial,
}

impl AdvisoryKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisoryKey::TempVeryCold => "TEMP_VERY_COLD",
            AdvisoryKey::TempCold => "TEMP_COLD",
            AdvisoryKey::TempMild => "TEMP_MILD",
            AdvisoryKey::TempWarm => "TEMP_WARM",
            AdvisoryKey::TempHot => "TEMP_HOT",
            AdvisoryKey::TempExtremeHeat => "TEMP_EXTREME_HEAT",
            AdvisoryKey::SunstrokeRisk => "SUNSTROKE_RISK",
            AdvisoryKey::RainLikely => "RAIN_LIKELY",
            AdvisoryKey::SnowLikely => "SNOW_LIKELY",
            AdvisoryKey::RainChance => "RAIN_CHANCE",
            AdvisoryKey::SnowChance => "SNOW_CHANCE",
            AdvisoryKey::WindStrong => "WIND_STRONG",
            AdvisoryKey::WindStrongCold => "WIND_STRONG_COLD",
            AdvisoryKey::CalmCold => "CALM_COLD",
            AdvisoryKey::MixedPleasant => "MIXED_PLEASANT",
            AdvisoryKey::MixedSocial => "MIXED_SOCIAL",
        }
    }

    pub const fn all() -> &'static [AdvisoryKey] {
        &[
            AdvisoryKey::TempVeryCold,
            AdvisoryKey::TempCold,
            AdvisoryKey::TempMild,
            AdvisoryKey::TempWarm,
            AdvisoryKey::TempHot,
            AdvisoryKey::TempExtremeHeat,
            AdvisoryKey::SunstrokeRisk,
            AdvisoryKey::RainLikely,
            AdvisoryKey::SnowLikely,
            AdvisoryKey::RainChance,
            AdvisoryKey::SnowChance,
            AdvisoryKey::WindStrong,
            AdvisoryKey::WindStrongCold,
            AdvisoryKey::CalmCold,
            AdvisoryKey::MixedPleasant,
            AdvisoryKey::MixedSocial,
        ]
    }
}

impl std::fmt::Display for AdvisoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wind at or above this speed (m/s) counts as strong.
pub const STRONG_WIND_MPS: f64 = 8.0;

/// Classify a reading into an ordered list of advisories.
pub fn classify(reading: &WeatherReading) -> Vec<AdvisoryKey> {
    let t = reading.temperature_c();
    let wind = reading.wind_speed_mps();
    let cloud = reading.cloud_pct();

    let mut keys = Vec::with_capacity(4);
    temperature_axis(t, cloud, &mut keys);
    cloud_axis(t, cloud, &mut keys);
    wind_axis(t, wind, &mut keys);
    mixed_axis(t, wind, cloud, &mut keys);
    keys
}

fn temperature_axis(t: f64, cloud: u8, keys: &mut Vec<AdvisoryKey>) {
    let band = if t <= -10.0 {
        AdvisoryKey::TempVeryCold
    } else if t <= 0.0 {
        AdvisoryKey::TempCold
    } else if t <= 14.0 {
        AdvisoryKey::TempMild
    } else if t <= 30.0 {
        AdvisoryKey::TempWarm
    } else if t <= 39.0 {
        AdvisoryKey::TempHot
    } else {
        AdvisoryKey::TempExtremeHeat
    };
    keys.push(band);

    // Only place the cloud cover feeds the temperature axis.
    if band == AdvisoryKey::TempExtremeHeat && cloud < 50 {
        keys.push(AdvisoryKey::SunstrokeRisk);
    }
}

fn cloud_axis(t: f64, cloud: u8, keys: &mut Vec<AdvisoryKey>) {
    let freezing = t < 0.0;

    if cloud >= 70 {
        keys.push(if freezing { AdvisoryKey::SnowLikely } else { AdvisoryKey::RainLikely });
    }
    if (55..70).contains(&cloud) {
        keys.push(if freezing { AdvisoryKey::SnowChance } else { AdvisoryKey::RainChance });
    }
}

fn wind_axis(t: f64, wind: f64, keys: &mut Vec<AdvisoryKey>) {
    if wind >= STRONG_WIND_MPS {
        keys.push(AdvisoryKey::WindStrong);
        if t < -5.0 {
            keys.push(AdvisoryKey::WindStrongCold);
        }
    } else if t > -10.0 && t <= 0.0 {
        keys.push(AdvisoryKey::CalmCold);
    }
}

fn mixed_axis(t: f64, wind: f64, cloud: u8, keys: &mut Vec<AdvisoryKey>) {
    let fair = wind < STRONG_WIND_MPS && cloud < 55;

    if fair && t > 14.0 && t <= 36.0 {
        keys.push(AdvisoryKey::MixedPleasant);
    }
    if fair && t > 14.0 && t < 39.0 {
        keys.push(AdvisoryKey::MixedSocial);
    }
}
