//! Static message tables for the supported languages.

use serde::{Deserialize, Serialize};

use crate::{advisory::AdvisoryKey, model::WeatherReading, resolver::Match};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
        }
    }

    pub const fn all() -> &'static [Language] {
        &[Language::En, Language::Ru]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Language {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ru" => Ok(Language::Ru),
            _ => Err(anyhow::anyhow!(
                "Unknown language '{value}'. Supported languages: en, ru."
            )),
        }
    }
}

/// Text for one advisory.
pub fn render(key: AdvisoryKey, language: Language) -> &'static str {
    use AdvisoryKey::*;

    match language {
        Language::En => match key {
            TempVeryCold => "I'd stay at home today.",
            TempCold => "It's cold, find something warm to wear.🧣",
            TempMild => "Summer clothes are prohibited!🧤",
            TempWarm => "It's a warm day today.🌞",
            TempHot => "Please dress in summer attire.👕",
            TempExtremeHeat => "Is this because of global warming?",
            SunstrokeRisk => "There is a high risk of getting a sunstroke!🌡",
            RainLikely => "It might rain today.☔",
            SnowLikely => "Who does not like when it snows?🌨",
            RainChance => "There is a chance that it will rain.🌂",
            SnowChance => "Good news, it might snow today!❄",
            WindStrong => "There is a strong wind outside.🌪",
            WindStrongCold => "Not a good day for having a walk.",
            CalmCold => "It's a great time for having a winter walk!",
            MixedPleasant => "Time for merrymaking.🕶",
            MixedSocial => "It seems that it's the day to hang out with friends!🌟",
        },
        Language::Ru => match key {
            TempVeryCold => "Я бы сегодня остался дома.",
            TempCold => "Холодно, надо надеть что-то теплое.🧣",
            TempMild => "Летняя одежда запрещена!🧤",
            TempWarm => "Сегодня теплый день.🌞",
            TempHot => "Ну и жара, можно надеть летнюю одежду.👕",
            TempExtremeHeat => "Это что, из-за глобального потепления?!",
            SunstrokeRisk => "Повышен риск получения солнечного удара.🌡",
            RainLikely => "Возможно, сегодня пойдет дождь.☔",
            SnowLikely => "Да кто же не любит снег?🌨",
            RainChance => "Есть шанс, что пойдет дождь.🌂",
            SnowChance => "Кажется сегодня будет снег!❄",
            WindStrong => "Слишком сильный ветер.🌪",
            WindStrongCold => "Не очень хороший день для прогулки.",
            CalmCold => "Отличный день для зимней прогулки!",
            MixedPleasant => "Время для веселья.🕶",
            MixedSocial => "Кажется пора замутить вечеринку с друзьями!🌟",
        },
    }
}

/// The "current conditions" message sent before any advisory.
pub fn conditions_summary(location: &str, reading: &WeatherReading, language: Language) -> String {
    let celsius = whole(reading.temperature_c());
    let fahrenheit = whole(reading.temperature_f());
    let status = reading.status();
    let cloud = reading.cloud_pct();
    let wind = reading.wind_speed_mps();
    let mph = whole(reading.wind_speed_mph());
    let humidity = reading.humidity_pct();

    match language {
        Language::En => format!(
            "🌡 Temperature in {location}: {celsius}°C({fahrenheit}°F).\n\
             🌦 Weather status: {status}.\n\
             ☁ Cloudiness: {cloud}%.\n\
             🌬 Wind speed: {wind} m/s({mph} MPH).\n\
             💧 Humidity: {humidity}%."
        ),
        Language::Ru => format!(
            "🌡 Температура в {location}: {celsius}°C({fahrenheit}°F).\n\
             🌦 Статус погоды: {status}.\n\
             ☁ Процент облачности: {cloud}%.\n\
             🌬 Скорость ветра: {wind} м/с({mph} миль/ч).\n\
             💧 Влажность: {humidity}%."
        ),
    }
}

// Adding zero turns -0 into 0 so "-0°C" is never printed.
fn whole(value: f64) -> f64 {
    value.round() + 0.0
}

/// "Did you mean" message listing the candidates, one per line.
pub fn suggestions(matches: &[Match], language: Language) -> String {
    let list = matches
        .iter()
        .map(|m| format!("{}, {}", m.candidate.name, m.candidate.parent_region))
        .collect::<Vec<_>>()
        .join("\n");

    match language {
        Language::En => format!("Perhaps you mean one of the following:\n{list}."),
        Language::Ru => format!("Возможно вы имели в виду что-то из этого:\n{list}."),
    }
}

/// Generic failure message shown for unknown places and upstream errors alike.
pub fn error_message(language: Language) -> &'static str {
    match language {
        Language::En => "Unable to find the resource.❌\nPlease try again.",
        Language::Ru => "Не удалось найти ресурс❌.\nПожалуйста, попробуйте еще раз.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::LocationCandidate;

    #[test]
    fn language_roundtrip() {
        for lang in Language::all() {
            let parsed = Language::try_from(lang.as_str()).expect("roundtrip should succeed");
            assert_eq!(*lang, parsed);
        }
        assert_eq!(Language::try_from("RU").unwrap(), Language::Ru);
    }

    #[test]
    fn unknown_language_error() {
        let err = Language::try_from("de").unwrap_err();
        assert!(err.to_string().contains("Unknown language"));
    }

    #[test]
    fn every_key_has_text_in_every_language() {
        for lang in Language::all() {
            for key in AdvisoryKey::all() {
                assert!(!render(*key, *lang).is_empty(), "{key} / {lang}");
            }
        }
    }

    #[test]
    fn summary_reports_both_units() {
        let reading = WeatherReading::new(21.6, 4.0, 40, 63, "scattered clouds").unwrap();
        let text = conditions_summary("Tbilisi", &reading, Language::En);

        assert!(text.contains("Temperature in Tbilisi: 22°C(71°F)"));
        assert!(text.contains("Weather status: scattered clouds."));
        assert!(text.contains("Cloudiness: 40%"));
        assert!(text.contains("Wind speed: 4 m/s(9 MPH)"));
        assert!(text.contains("Humidity: 63%"));
    }

    #[test]
    fn summary_in_russian() {
        let reading = WeatherReading::new(-4.0, 2.5, 90, 80, "снег").unwrap();
        let text = conditions_summary("Москва", &reading, Language::Ru);
        assert!(text.starts_with("🌡 Температура в Москва: -4°C(25°F)"));
        assert!(text.contains("2.5 м/с(6 миль/ч)"));
    }

    #[test]
    fn summary_never_shows_negative_zero() {
        let reading = WeatherReading::new(-0.3, 0.0, 0, 0, "").unwrap();
        let text = conditions_summary("Oslo", &reading, Language::En);
        assert!(text.contains("Oslo: 0°C(31°F)"), "{text}");
    }

    #[test]
    fn suggestions_are_line_separated() {
        let matches = vec![
            Match { candidate: LocationCandidate::new("San Francisco", "United States"), score: 1.0 },
            Match { candidate: LocationCandidate::new("Santiago", "Chile"), score: 1.0 },
        ];
        let text = suggestions(&matches, Language::En);
        assert_eq!(
            text,
            "Perhaps you mean one of the following:\nSan Francisco, United States\nSantiago, Chile."
        );
    }
}
