use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::{
    error::{AdvisorError, Result},
    messages::Language,
    model::Observation,
    retry::{RetryPolicy, with_retry},
};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn fetch_current(&self, place: &str, language: Language) -> Result<Observation> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        tracing::debug!(place, %language, "Requesting current weather from OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", place),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", language.as_str()),
            ])
            .send()
            .await
            .map_err(timeout_or_network)?;

        let status = res.status();
        let body = res.text().await.map_err(timeout_or_network)?;

        if status == StatusCode::NOT_FOUND {
            return Err(AdvisorError::NotFound(place.to_string()));
        }

        if !status.is_success() {
            return Err(AdvisorError::Upstream {
                status: status.as_u16(),
                message: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|e| {
            AdvisorError::Upstream {
                status: status.as_u16(),
                message: format!("Failed to parse OpenWeather current JSON: {e}"),
            }
        })?;

        Ok(parsed.into_observation(place))
    }
}

fn timeout_or_network(e: reqwest::Error) -> AdvisorError {
    if e.is_timeout() { AdvisorError::Timeout } else { AdvisorError::Network(e) }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    clouds: Option<OwClouds>,
}

impl OwCurrentResponse {
    fn into_observation(self, requested: &str) -> Observation {
        let location_name =
            if self.name.is_empty() { requested.to_string() } else { self.name };

        Observation {
            location_name,
            temperature_c: self.main.as_ref().and_then(|m| m.temp),
            humidity_pct: self.main.as_ref().and_then(|m| m.humidity),
            wind_speed_mps: self.wind.and_then(|w| w.speed),
            cloud_pct: self.clouds.and_then(|c| c.all),
            status: self.weather.into_iter().next().map(|w| w.description),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, place: &str, language: Language) -> Result<Observation> {
        with_retry(&self.retry, || self.fetch_current(place, language)).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> OpenWeatherProvider {
        OpenWeatherProvider::new("test_key", Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.uri())
            .with_retry(RetryPolicy { max_retries: 2, initial_delay_ms: 1, max_delay_ms: 2 })
    }

    #[tokio::test]
    async fn test_current_weather() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "London"))
            .and(query_param("appid", "test_key"))
            .and(query_param("units", "metric"))
            .and(query_param("lang", "ru"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "London",
                "weather": [{ "description": "пасмурно" }],
                "main": { "temp": 11.3, "humidity": 87 },
                "wind": { "speed": 5.1 },
                "clouds": { "all": 90 },
                "cod": 200
            })))
            .mount(&mock_server)
            .await;

        let obs = provider(&mock_server).current("London", Language::Ru).await.unwrap();

        assert_eq!(obs.location_name, "London");
        assert_eq!(obs.temperature_c, Some(11.3));
        assert_eq!(obs.humidity_pct, Some(87.0));
        assert_eq!(obs.wind_speed_mps, Some(5.1));
        assert_eq!(obs.cloud_pct, Some(90.0));
        assert_eq!(obs.status.as_deref(), Some("пасмурно"));
    }

    #[tokio::test]
    async fn test_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "cod": "404",
                "message": "city not found"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server).current("Londn", Language::En).await.unwrap_err();
        assert!(matches!(err, AdvisorError::NotFound(ref p) if p == "Londn"));
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .expect(3)
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server).current("London", Language::En).await.unwrap_err();
        assert!(matches!(err, AdvisorError::Upstream { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_unauthorized_is_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server).current("London", Language::En).await.unwrap_err();
        assert!(matches!(err, AdvisorError::Upstream { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_partial_response_leaves_fields_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Nowhere",
                "main": { "temp": 3.0 }
            })))
            .mount(&mock_server)
            .await;

        let obs = provider(&mock_server).current("Nowhere", Language::En).await.unwrap();
        assert_eq!(obs.temperature_c, Some(3.0));
        assert_eq!(obs.cloud_pct, None);
        assert_eq!(obs.status, None);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "ж".repeat(300);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
