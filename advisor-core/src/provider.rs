use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config,
    error::{AdvisorError, Result},
    messages::Language,
    model::Observation,
    provider::openweather::OpenWeatherProvider,
};

pub mod openweather;

/// Source of current weather observations.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions at `place`, with the status text in `language`.
    ///
    /// Returns [`AdvisorError::NotFound`] when the provider does not know the place.
    async fn current(&self, place: &str, language: Language) -> Result<Observation>;
}

#[async_trait]
impl<P: WeatherProvider + ?Sized> WeatherProvider for Box<P> {
    async fn current(&self, place: &str, language: Language) -> Result<Observation> {
        (**self).current(place, language).await
    }
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        AdvisorError::Config(
            "No OpenWeather API key configured.\n\
             Hint: run `advisor configure` or set the OWM_API environment variable."
                .to_string(),
        )
    })?;

    let provider = OpenWeatherProvider::new(api_key, config.timeout())?
        .with_retry(config.retry.clone());

    Ok(Box::new(provider))
}
