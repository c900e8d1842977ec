use advisor_core::{
    AdvisoryPipeline, Config, Language, NominatimGeocoder, PlaceStore, Query, RequestContext,
    Resolver, ResolverStrategy, WeatherReading, classify, messages, provider_from_config,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, Select};

use crate::sink::StdoutSink;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "advisor", version, about = "Weather advisories for any place")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, default language and resolver mode.
    Configure,

    /// Show weather and advisories for a place name.
    Show {
        /// Place name, e.g. "London".
        place: String,

        /// Message language ("en" or "ru"); defaults to the configured one.
        #[arg(long)]
        lang: Option<String>,
    },

    /// Show weather and advisories for GPS coordinates.
    Here {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        #[arg(long)]
        lang: Option<String>,
    },

    /// Classify a reading offline and print the advisories it triggers.
    Classify {
        /// Temperature in °C.
        #[arg(long, allow_hyphen_values = true)]
        temp: f64,

        /// Wind speed in m/s.
        #[arg(long, default_value_t = 0.0)]
        wind: f64,

        /// Cloud cover in percent.
        #[arg(long, default_value_t = 0)]
        cloud: u8,

        /// Humidity in percent.
        #[arg(long, default_value_t = 50)]
        humidity: u8,

        #[arg(long)]
        lang: Option<String>,
    },

    /// Look up reference places offline, as the not-found fallback would.
    Places {
        query: String,

        /// "best_match" or "substring"; defaults to the configured mode.
        #[arg(long)]
        mode: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config)?,
            Command::Show { place, lang } => {
                let language = language_or_default(lang.as_deref(), &config)?;
                advise(&config, language, Query::Place(place)).await?;
            }
            Command::Here { lat, lon, lang } => {
                let language = language_or_default(lang.as_deref(), &config)?;
                advise(&config, language, Query::Coordinates { latitude: lat, longitude: lon })
                    .await?;
            }
            Command::Classify { temp, wind, cloud, humidity, lang } => {
                let language = language_or_default(lang.as_deref(), &config)?;
                let reading = WeatherReading::new(temp, wind, cloud, humidity, "")?;
                for key in classify(&reading) {
                    println!("{key}: {}", messages::render(key, language));
                }
            }
            Command::Places { query, mode } => {
                let strategy = match mode {
                    Some(mode) => ResolverStrategy::try_from(mode.as_str())?,
                    None => config.resolver,
                };
                let index = config.place_index()?;
                let matches = Resolver::new(strategy).resolve(&query, index.all());
                if matches.is_empty() {
                    println!("No matching places.");
                }
                for (n, m) in matches.iter().enumerate() {
                    println!(
                        "{}. {}, {} ({:.2})",
                        n + 1,
                        m.candidate.name,
                        m.candidate.parent_region,
                        m.score
                    );
                }
            }
        }

        Ok(())
    }
}

fn language_or_default(lang: Option<&str>, config: &Config) -> anyhow::Result<Language> {
    match lang {
        Some(code) => Language::try_from(code),
        None => Ok(config.language),
    }
}

async fn advise(config: &Config, language: Language, query: Query) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;
    let geocoder = NominatimGeocoder::new(config.timeout())?;
    let places = config.place_index()?;

    let pipeline = AdvisoryPipeline::new(provider, geocoder, places, config.resolver())
        .with_call_timeout(config.call_budget());

    let ctx = RequestContext::new("cli", language);
    let outcome = pipeline.handle(&ctx, &query, &StdoutSink).await;
    tracing::debug!(?outcome, "Request finished");

    Ok(())
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let languages = Language::all().to_vec();
    let start = languages.iter().position(|l| *l == config.language).unwrap_or(0);
    config.language = Select::new("Message language:", languages)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read language")?;

    let modes = vec!["best_match", "substring"];
    let mode = Select::new("Fallback place matching:", modes)
        .prompt()
        .context("Failed to read resolver mode")?;
    config.resolver = ResolverStrategy::try_from(mode)?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_negative_coordinates() {
        let cli = Cli::try_parse_from(["advisor", "here", "--lat", "-33.45", "--lon", "-70.66"])
            .unwrap();
        match cli.command {
            Command::Here { lat, lon, lang } => {
                assert_eq!(lat, -33.45);
                assert_eq!(lon, -70.66);
                assert_eq!(lang, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_classify_defaults() {
        let cli = Cli::try_parse_from(["advisor", "classify", "--temp", "-12"]).unwrap();
        match cli.command {
            Command::Classify { temp, wind, cloud, humidity, .. } => {
                assert_eq!(temp, -12.0);
                assert_eq!(wind, 0.0);
                assert_eq!(cloud, 0);
                assert_eq!(humidity, 50);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn explicit_language_wins() {
        let config = Config::default();
        assert_eq!(language_or_default(Some("ru"), &config).unwrap(), Language::Ru);
        assert_eq!(language_or_default(None, &config).unwrap(), Language::En);
        assert!(language_or_default(Some("fr"), &config).is_err());
    }
}
